use serde::Serialize;

use crate::core::types::{Question, QuizOption};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicOption {
    pub letter: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// A question as it may leave the core. Built field by field from the
/// stored record; the stored record is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicQuestion {
    pub id: u64,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PublicOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl PublicQuestion {
    pub fn without_options(mut self) -> Self {
        self.options = None;
        self
    }

    pub fn has_answer_fields(&self) -> bool {
        self.correct_answer.is_some()
            || self
                .options
                .iter()
                .flatten()
                .any(|option| option.is_correct.is_some())
    }
}

/// Project `question` for output, keeping answer fields only when asked.
pub fn sanitize(question: &Question, include_answers: bool) -> PublicQuestion {
    let options = (!question.options.is_empty()).then(|| {
        question
            .options
            .iter()
            .map(|option| sanitize_option(option, include_answers))
            .collect()
    });

    PublicQuestion {
        id: question.id,
        question: question.question.clone(),
        options,
        correct_answer: if include_answers {
            question.correct_answer.clone()
        } else {
            None
        },
    }
}

fn sanitize_option(option: &QuizOption, include_answers: bool) -> PublicOption {
    PublicOption {
        letter: option.letter.clone(),
        text: option.text.clone(),
        is_correct: if include_answers { option.is_correct } else { None },
    }
}
