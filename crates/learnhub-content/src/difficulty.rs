//! Mapping from practice levels to difficulty labels.

/// Difficulty label for a practice level on the 1-10 scale.
///
/// Levels outside the scale map to `"medium"`.
pub fn label_for_level(level: u8) -> &'static str {
    match level {
        1 | 2 => "beginner",
        3 | 4 => "easy",
        5 | 6 => "medium",
        7 | 8 => "hard",
        9 | 10 => "expert",
        _ => "medium",
    }
}
