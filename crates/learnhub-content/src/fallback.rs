//! Static content served when the generator is unavailable.
//!
//! Each document carries the same keys the matching prompt asks for, so
//! consumers never have to special-case a fallback.

use serde_json::{Value, json};

use crate::types::Chapter;

/// Fallback concept explanation for a chapter.
pub fn concept(chapter: &Chapter, language: &str) -> Value {
    let name = &chapter.name;
    json!({
        "title": format!("{name} - {} Concepts", title_case(&chapter.difficulty)),
        "overview": format!("Learn fundamental {name} concepts in {language}"),
        "learning_objectives": [
            format!("Understand basic {name} operations"),
            format!("Implement {name} in {language}"),
            "Analyze time and space complexity",
            "Solve practice problems"
        ],
        "theory_content": format!("<p>A detailed explanation of {name} is not available right now.</p>"),
        "code_examples": [],
        "practice_problems": [],
        "key_takeaways": ["Master core concepts", "Practice implementation", "Understand complexity"],
        "estimated_duration": "2-3 hours"
    })
}

/// Fallback practice question for a chapter at `level`.
pub fn question(chapter: &Chapter, level: u8, language: &str) -> Value {
    let name = &chapter.name;
    json!({
        "problem_id": format!("fallback_{}_{level}", slug(name)),
        "title": format!("Basic {name} Problem"),
        "description": format!("Implement a basic {name} operation in {language}"),
        "difficulty": "medium",
        "constraints": ["Time complexity: O(n)", "Space complexity: O(1)"],
        "examples": [
            {"input": "Sample input", "output": "Sample output", "explanation": "Sample explanation"}
        ],
        "hints": ["Think about the core operations", "Consider edge cases", "Optimize your solution"],
        "function_signature": "solution(input)",
        "test_cases": [{"input": "test", "expected_output": "result"}],
        "topics": [name],
        "generated_level": level
    })
}

/// Fallback code analysis.
pub fn code_analysis() -> Value {
    json!({
        "correctness_score": 0,
        "is_correct": false,
        "feedback": "Analysis service temporarily unavailable. Please check your code manually.",
        "strengths": [],
        "improvements": ["Service unavailable - try again later"],
        "efficiency_analysis": "Unable to analyze",
        "alternative_approaches": [],
        "code_quality": "Unable to assess",
        "bugs": ["Analysis service down"],
        "suggested_optimizations": []
    })
}

/// Fallback learning recommendation.
pub fn recommendation() -> Value {
    json!({
        "next_chapter": "Arrays & Strings",
        "reason": "Foundational chapter for all DSA topics",
        "preparation_required": "Basic programming knowledge",
        "estimated_difficulty": "Easy",
        "practice_focus": ["Array manipulation", "String operations"],
        "learning_path": ["Arrays & Strings", "Linked Lists", "Stacks & Queues"],
        "confidence_score": 80,
        "alternative_options": ["Linked Lists", "Complexity Analysis"]
    })
}

/// Lowercase `name` and replace spaces with underscores.
fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Uppercase the first letter of every word.
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
