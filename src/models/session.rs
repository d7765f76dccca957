// src/models/session.rs

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::question::{PublicQuestion, QuestionBank, QuestionRecord, parse_option_key};
use crate::error::AppError;

/// Where a session stands. Progress is forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Index of the next question to answer. Equals the question count once
    /// every question has been answered.
    InProgress(usize),
    Finished,
}

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_key: String,
    pub correct_text: String,
}

/// Final tally of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub topic: String,
    pub score: u32,
    pub total: u32,
}

/// One pass over every question of a bank, in a random order.
#[derive(Debug, Clone)]
pub struct QuizSession {
    topic: String,
    questions: Vec<QuestionRecord>,
    score: u32,
    state: SessionState,
}

impl QuizSession {
    /// Starts a session over `questions` in the given order.
    pub fn new(topic: &str, questions: Vec<QuestionRecord>) -> Result<Self, AppError> {
        if questions.is_empty() {
            return Err(AppError::NoQuestions(topic.to_string()));
        }
        Ok(QuizSession {
            topic: topic.to_string(),
            questions,
            score: 0,
            state: SessionState::InProgress(0),
        })
    }

    /// Starts a session over the whole bank, freshly permuted.
    pub fn shuffled<R: Rng + ?Sized>(
        topic: &str,
        bank: QuestionBank,
        rng: &mut R,
    ) -> Result<Self, AppError> {
        let mut questions: Vec<QuestionRecord> = bank
            .into_iter()
            .map(|(id, question)| QuestionRecord { id, question })
            .collect();
        questions.shuffle(rng);
        Self::new(topic, questions)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn total(&self) -> u32 {
        self.questions.len() as u32
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The question awaiting an answer, with its index.
    pub fn current(&self) -> Option<(usize, PublicQuestion)> {
        match self.state {
            SessionState::InProgress(i) => self.questions.get(i).map(|q| (i, q.into())),
            SessionState::Finished => None,
        }
    }

    /// Scores `chosen_key` for the question at `index`.
    ///
    /// Only the current question may be answered, and each one exactly once.
    /// A key outside the canonical set is rejected without consuming the
    /// question so the caller can re-prompt.
    pub fn answer(&mut self, index: usize, chosen_key: &str) -> Result<AnswerOutcome, AppError> {
        let next = match self.state {
            SessionState::Finished => {
                return Err(AppError::InvalidSession("the quiz is already finished".to_string()));
            }
            SessionState::InProgress(next) => next,
        };

        if next >= self.questions.len() {
            return Err(AppError::InvalidSession(
                "all questions have been answered".to_string(),
            ));
        }
        if index < next {
            return Err(AppError::InvalidSession(format!(
                "question {} was already answered",
                index + 1
            )));
        }
        if index > next {
            return Err(AppError::InvalidSession(format!(
                "question {} must be answered first",
                next + 1
            )));
        }

        let key = parse_option_key(chosen_key)?;
        let question = &self.questions[index].question;
        let correct = key == question.answer;
        if correct {
            self.score += 1;
        }
        let outcome = AnswerOutcome {
            correct,
            correct_key: question.answer.clone(),
            correct_text: question.correct_text().to_string(),
        };

        self.state = SessionState::InProgress(next + 1);
        Ok(outcome)
    }

    /// The result the session would finish with, without closing it.
    /// Unanswered questions count as incorrect.
    pub fn result(&self) -> Result<SessionResult, AppError> {
        if self.state == SessionState::Finished {
            return Err(AppError::InvalidSession("the quiz is already finished".to_string()));
        }
        Ok(SessionResult {
            topic: self.topic.clone(),
            score: self.score,
            total: self.total(),
        })
    }

    /// Closes the session.
    pub fn finish(&mut self) -> Result<SessionResult, AppError> {
        let result = self.result()?;
        self.state = SessionState::Finished;
        Ok(result)
    }
}
