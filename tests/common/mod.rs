#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;

use quarkdex::core::clock::{Clock, ManualClock};
use quarkdex::core::config::Config;
use quarkdex::query::QueryLimits;
use quarkdex::storage::layout::DataLayout;
use quarkdex::storage::quiz_store::QuizStore;
use quarkdex::QuizEngine;

pub const IBM_QUESTIONS: u64 = 50;

fn question(id: u64, text: &str) -> Value {
    json!({
        "id": id,
        "question": text,
        "options": [
            {"letter": "A", "text": "first", "is_correct": true},
            {"letter": "B", "text": "second", "is_correct": false}
        ],
        "correct_answer": "A"
    })
}

pub fn write_collection(dir: &Path, id: &str, title: &str, questions: Vec<Value>) {
    let body = json!({
        "quiz_title": title,
        "description": format!("{} description", title),
        "total_questions": questions.len(),
        "questions_per_quiz": 10,
        "questions": questions,
    });
    fs::create_dir_all(dir.join("quizzes")).unwrap();
    fs::write(
        dir.join("quizzes").join(format!("{}.json", id)),
        serde_json::to_vec_pretty(&body).unwrap(),
    )
    .unwrap();
}

/// Three collections (55 questions, 3 of them mentioning "cat") plus one
/// malformed file.
pub fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let ibm = (1..=IBM_QUESTIONS)
        .map(|i| question(i, &format!("IBM history question number {}?", i)))
        .collect();
    write_collection(root, "ibm-trivia", "IBM Trivia", ibm);

    write_collection(
        root,
        "animals",
        "Animal Facts",
        vec![
            question(1, "What sound does a cat make?"),
            question(2, "Which wild Cat is the largest?"),
            question(3, "Is a catfish a fish?"),
        ],
    );

    write_collection(
        root,
        "physics",
        "physics basics",
        vec![question(1, "What is gravity?"), question(2, "What is mass?")],
    );

    fs::write(root.join("quizzes").join("broken.json"), b"{ not json").unwrap();
    dir
}

pub fn engine_with_clock(root: &Path, clock: Arc<dyn Clock>) -> QuizEngine {
    let config = Config::default().with_data_dir(root);
    QuizEngine::new(
        QuizStore::new(DataLayout::new(root)),
        QueryLimits::for_quizzes(&config),
        config.quiz_cache_ttl,
        clock,
    )
}

pub fn engine(root: &Path) -> QuizEngine {
    engine_with_clock(root, Arc::new(ManualClock::new(0)))
}
