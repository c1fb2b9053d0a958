use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    #[serde(alias = "key")]
    pub letter: String,
    pub text: String,
    #[serde(default, alias = "isCorrect", skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// A question record as stored in a collection file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    #[serde(alias = "primaryText")]
    pub question: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuizOption>,
    #[serde(default, alias = "correctAnswer", skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// Storage stats of the file a collection was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub file_size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// A loaded question set. Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCollection {
    pub id: String,
    pub title: String,
    pub description: String,
    pub declared_total: u64,
    pub questions_per_collection: u64,
    pub questions: Vec<Question>,
    pub meta: CollectionMeta,
}

impl QuizCollection {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Position (0-based) of the question with `id`, in source order.
    pub fn position_of(&self, id: u64) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }
}

/// On-disk layout of a collection file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CollectionFile {
    #[serde(default, alias = "title")]
    pub quiz_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "declaredTotal")]
    pub total_questions: u64,
    #[serde(default, alias = "questionsPerCollection")]
    pub questions_per_quiz: u64,
    #[serde(alias = "records")]
    pub questions: Vec<Question>,
}

impl CollectionFile {
    /// First record id that appears more than once, if any.
    pub fn duplicate_id(&self) -> Option<u64> {
        let mut seen = HashSet::with_capacity(self.questions.len());
        self.questions.iter().map(|q| q.id).find(|id| !seen.insert(*id))
    }

    pub fn into_collection(self, id: String, meta: CollectionMeta) -> QuizCollection {
        QuizCollection {
            id,
            title: self.quiz_title,
            description: self.description,
            declared_total: self.total_questions,
            questions_per_collection: self.questions_per_quiz,
            questions: self.questions,
            meta,
        }
    }
}
