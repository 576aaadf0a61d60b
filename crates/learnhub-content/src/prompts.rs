//! Prompt builders for each kind of generated content.
//!
//! Every prompt asks for a single JSON object and names the keys the
//! response must carry, so the generator can run in JSON mode.

use serde_json::Value;

use learnhub_core::types::Prompt;

use crate::difficulty::label_for_level;
use crate::types::{Chapter, CodeSubmission};

/// Build the prompt for a chapter's concept explanation.
pub fn concept(chapter: &Chapter, language: &str) -> Prompt {
    let difficulty = &chapter.difficulty;
    let topics = chapter.topics.join(", ");
    let user = format!(
        r#"You are an expert computer science educator specializing in data structures and algorithms.
Create a comprehensive learning module for "{name}" for {difficulty} level learners.
Primary topics to cover: {topics}
Programming language: {language}

The module must contain:

THEORY
- Core concepts with real-world analogies
- Key operations and how they are implemented
- Time and space complexity analysis
- Common use cases and applications

PRACTICE
- A step-by-step implementation guide in {language}
- Code examples with detailed explanations
- Common pitfalls and best practices

EXERCISES
- 3 practice problems of increasing difficulty
- Sample inputs and expected outputs
- A hint for each problem

Respond with a JSON object with these keys:
- title: module title
- overview: brief description
- learning_objectives: array of 4-5 key objectives
- theory_content: detailed HTML-formatted theory
- code_examples: array of objects with "code", "explanation", "complexity"
- practice_problems: array of objects with "problem", "hint", "solution_approach"
- key_takeaways: array of main points
- estimated_duration: estimated study time

Keep it engaging, practical, and suitable for the {difficulty} level."#,
        name = chapter.name,
    );

    Prompt::new(
        "You are an expert DSA educator creating comprehensive learning materials.",
        user,
        0.7,
        4000,
    )
}

/// Build the prompt for a practice question at `level` (1-10).
pub fn question(chapter: &Chapter, level: u8, language: &str) -> Prompt {
    let difficulty = label_for_level(level);
    let focus = chapter
        .topics
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let user = format!(
        r#"Create a {difficulty} level coding problem about {name} for {language} programmers.
Focus on: {focus}
Difficulty level: {level}/10

Requirements:
- The problem tests fundamental DSA concepts
- A clear problem statement with examples
- 3-5 test cases with inputs and expected outputs
- Constraints and edge cases
- A solution that fits in 15-40 lines of {language}
- Hints that gradually reveal the solution

Respond with a JSON object with these keys:
- problem_id: unique identifier
- title: problem title
- description: detailed problem statement
- difficulty: "{difficulty}"
- constraints: array of constraints
- examples: array of objects with "input", "output", "explanation"
- hints: array of 3 hints, general to specific
- function_signature: function signature in {language}
- test_cases: array of objects with "input", "expected_output"
- topics: array of relevant topics

Make it practical and interview-relevant."#,
        name = chapter.name,
    );

    Prompt::new(
        "You create high-quality coding problems for technical interviews.",
        user,
        0.8,
        3000,
    )
}

/// Build the prompt for reviewing a submitted solution.
pub fn code_analysis(submission: &CodeSubmission) -> Prompt {
    let language = &submission.language;
    let test_cases = pretty(&Value::Array(submission.test_cases.clone()));
    let user = format!(
        r#"Analyze this {language} solution.

PROBLEM:
{problem}

CODE:
```{language}
{code}
```

TEST CASES:
{test_cases}

Respond with a JSON object with these keys:
- correctness_score: 0-100
- is_correct: boolean
- feedback: detailed analysis of the solution
- strengths: array of what is done well
- improvements: array of specific improvements needed
- efficiency_analysis: time and space complexity assessment
- alternative_approaches: array of other possible solutions
- code_quality: assessment of readability and conventions
- bugs: array of bugs or unhandled edge cases
- suggested_optimizations: array of optimization suggestions

Be constructive and specific. Point out both what works and what can improve."#,
        problem = submission.question_description,
        code = submission.code,
    );

    Prompt::new(
        "You are an expert code reviewer providing constructive feedback.",
        user,
        0.3,
        2000,
    )
}

/// Build the prompt for recommending what to study next.
pub fn recommendation(completed_chapters: &[Value], performance: &Value, language: &str) -> Prompt {
    let completed = pretty(&Value::Array(completed_chapters.to_vec()));
    let performance = pretty(performance);
    let user = format!(
        r#"Recommend next steps for this learner.

COMPLETED CHAPTERS:
{completed}

PERFORMANCE SUMMARY:
{performance}

TARGET LANGUAGE: {language}

Respond with a JSON object with these keys:
- next_chapter: chapter to study next
- reason: why this chapter
- preparation_required: prerequisite review needed
- estimated_difficulty: Easy, Medium or Hard for this learner
- practice_focus: array of topics to practice
- learning_path: array of the next 3 chapters
- confidence_score: 0-100
- alternative_options: array of other good options

Base the recommendation on the logical progression of DSA topics, the
learner's performance, common interview requirements, and foundational
knowledge."#,
    );

    Prompt::new(
        "You are a learning path advisor for computer science education.",
        user,
        0.5,
        1500,
    )
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
