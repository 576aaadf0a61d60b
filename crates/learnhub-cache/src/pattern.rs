//! Redis-style glob matching for key patterns.
//!
//! Both backends interpret `clear_pattern` arguments with the same
//! syntax, so the in-process store uses this matcher to mirror what
//! `SCAN ... MATCH` does on Redis:
//!
//! - `*` matches any run of characters, including none
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[^a]` match one character from (or outside) a set;
//!   as on Redis, `[!a]` is not a negation
//! - `\x` matches `x` literally

/// Characters with special meaning in a glob pattern.
const SPECIAL: [char; 5] = ['*', '?', '[', ']', '\\'];

/// Returns `true` if `key` matches the glob `pattern`.
pub fn matches(pattern: &str, key: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = key.chars().collect();

    let mut pi = 0;
    let mut si = 0;
    // Pattern position just after the most recent `*`, and the key
    // position that star is currently assumed to stretch to.
    let mut backtrack: Option<(usize, usize)> = None;

    while si < s.len() {
        if pi < p.len() {
            if p[pi] == '*' {
                while pi < p.len() && p[pi] == '*' {
                    pi += 1;
                }
                if pi == p.len() {
                    return true;
                }
                backtrack = Some((pi, si));
                continue;
            }
            if let Some(next) = match_token(&p, pi, s[si]) {
                pi = next;
                si += 1;
                continue;
            }
        }

        match backtrack {
            Some((star_pi, star_si)) => {
                pi = star_pi;
                si = star_si + 1;
                backtrack = Some((star_pi, star_si + 1));
            }
            None => return false,
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Escape every glob metacharacter so `literal` only matches itself.
pub fn escape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Pattern matching every key that contains `fragment` anywhere.
pub fn contains(fragment: &str) -> String {
    format!("*{}*", escape(fragment))
}

/// Pattern matching every key that starts with `prefix`.
pub fn prefix(prefix: &str) -> String {
    format!("{}*", escape(prefix))
}

/// Match the single token at `pi` against `c`, returning the index of the
/// next token on success.
fn match_token(p: &[char], pi: usize, c: char) -> Option<usize> {
    match p[pi] {
        '?' => Some(pi + 1),
        '[' => {
            let (matched, next) = match_class(p, pi + 1, c);
            matched.then_some(next)
        }
        '\\' if pi + 1 < p.len() => (p[pi + 1] == c).then_some(pi + 2),
        literal => (literal == c).then_some(pi + 1),
    }
}

/// Evaluate a bracket class starting just after `[`. An unterminated class
/// runs to the end of the pattern.
fn match_class(p: &[char], mut i: usize, c: char) -> (bool, usize) {
    let negate = i < p.len() && p[i] == '^';
    if negate {
        i += 1;
    }

    let mut matched = false;
    while i < p.len() && p[i] != ']' {
        if p[i] == '\\' && i + 1 < p.len() {
            matched |= p[i + 1] == c;
            i += 2;
        } else if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            let (lo, hi) = if p[i] <= p[i + 2] {
                (p[i], p[i + 2])
            } else {
                (p[i + 2], p[i])
            };
            matched |= (lo..=hi).contains(&c);
            i += 3;
        } else {
            matched |= p[i] == c;
            i += 1;
        }
    }

    let next = if i < p.len() { i + 1 } else { i };
    (matched != negate, next)
}
