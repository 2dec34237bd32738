//! Check-in progression: one yes/no answer per habit, then the journal.

use chrono::Utc;

use crate::error::{DaySlotError, Result};
use crate::habits::{self, HabitQuestion};
use crate::types::{CheckInRecord, HabitAnswer, UserConfig};

/// Result of answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Ask this next (prompt text already formatted).
    Next(String),
    /// Every habit has exactly one answer.
    Complete,
}

/// In-progress check-in over the configured habits.
#[derive(Debug, Clone)]
pub struct CheckIn {
    questions: Vec<HabitQuestion>,
    answers: Vec<HabitAnswer>,
}

impl CheckIn {
    /// `None` when the user has no habits to ask about.
    pub fn new(config: &UserConfig) -> Option<Self> {
        let questions = habits::questions(config);
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            answers: Vec::new(),
        })
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    /// Prompt for the current question, `None` once complete.
    pub fn prompt(&self) -> Option<String> {
        let index = self.answers.len();
        self.questions
            .get(index)
            .map(|q| habits::question_text(q, index + 1, self.total()))
    }

    /// Record the answer for the current question.
    pub fn answer(&mut self, yes: bool) -> Result<Progress> {
        let question = self
            .questions
            .get(self.answers.len())
            .ok_or_else(|| DaySlotError::Validation("check-in already complete".into()))?;
        self.answers.push(HabitAnswer {
            habit: question.habit.clone(),
            kind: question.kind,
            yes,
        });
        Ok(match self.prompt() {
            Some(next) => Progress::Next(next),
            None => Progress::Complete,
        })
    }

    pub fn answers(&self) -> &[HabitAnswer] {
        &self.answers
    }

    /// The record to persist once every habit is answered.
    pub fn record(&self, date: &str) -> Result<CheckInRecord> {
        if !self.is_complete() {
            return Err(DaySlotError::Validation(format!(
                "check-in incomplete: {}/{} answered",
                self.answered(),
                self.total()
            )));
        }
        Ok(CheckInRecord {
            date: date.to_string(),
            answers: self.answers.clone(),
            journal: None,
            summary: None,
            recorded_at: Utc::now(),
            completed_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HabitKind;

    fn config(pos: &[&str], neg: &[&str]) -> UserConfig {
        UserConfig {
            start_hour: 7,
            journal_channel_id: "100000000000000000".into(),
            positive_habits: pos.iter().map(|s| s.to_string()).collect(),
            negative_habits: neg.iter().map(|s| s.to_string()).collect(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_habits_no_checkin() {
        assert!(CheckIn::new(&config(&[], &[])).is_none());
    }

    #[test]
    fn test_one_answer_per_habit() {
        let mut checkin = CheckIn::new(&config(&["Read", "Gym"], &["Smoke"])).unwrap();
        assert_eq!(
            checkin.prompt().unwrap(),
            "**Question 1 of 3**\n\nDid you **Read** today?"
        );
        assert!(matches!(checkin.answer(true).unwrap(), Progress::Next(_)));
        match checkin.answer(false).unwrap() {
            Progress::Next(text) => assert!(text.contains("Did you avoid **Smoke**")),
            Progress::Complete => panic!("expected a third question"),
        }
        assert!(!checkin.is_complete());
        assert!(checkin.record("2026-03-01").is_err());

        assert_eq!(checkin.answer(true).unwrap(), Progress::Complete);
        assert!(checkin.is_complete());
        assert!(checkin.prompt().is_none());

        // A fourth answer is refused; the count stays at one per habit.
        assert!(checkin.answer(true).is_err());
        let record = checkin.record("2026-03-01").unwrap();
        assert_eq!(record.answers.len(), 3);
        assert_eq!(record.answers[2].kind, HabitKind::Negative);
        assert!(record.answers[2].yes);
        assert!(record.journal.is_none());
    }
}
