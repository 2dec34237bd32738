//! Habit prompts, scoreboard, and the daily summary.

use crate::types::{DailySummary, HabitAnswer, HabitKind, UserConfig};

/// A habit to ask about during check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitQuestion {
    pub habit: String,
    pub kind: HabitKind,
}

/// Positive habits first, then negative ones, in configured order.
pub fn questions(config: &UserConfig) -> Vec<HabitQuestion> {
    let positive = config.positive_habits.iter().map(|h| HabitQuestion {
        habit: h.clone(),
        kind: HabitKind::Positive,
    });
    let negative = config.negative_habits.iter().map(|h| HabitQuestion {
        habit: h.clone(),
        kind: HabitKind::Negative,
    });
    positive.chain(negative).collect()
}

/// Lead-in for a question, tuned for a few common habits.
pub fn prefix(habit: &str, kind: HabitKind) -> &'static str {
    let lower = habit.to_lowercase();
    match kind {
        HabitKind::Positive if lower.contains("gym") => "Did you go to the",
        HabitKind::Positive if lower.contains("protein") => "Did you take your",
        HabitKind::Positive => "Did you",
        HabitKind::Negative => "Did you avoid",
    }
}

/// `**Question 2 of 5**\n\nDid you avoid **Smoke** today?`
pub fn question_text(question: &HabitQuestion, number: usize, total: usize) -> String {
    format!(
        "**Question {number} of {total}**\n\n{} **{}** today?",
        prefix(&question.habit, question.kind),
        question.habit
    )
}

/// One scoreboard line per answer.
pub fn scoreboard_line(answer: &HabitAnswer) -> String {
    match (answer.kind, answer.yes) {
        (HabitKind::Positive, true) => format!("✅ {}", answer.habit),
        (HabitKind::Positive, false) => format!("❌ {}", answer.habit),
        (HabitKind::Negative, true) => format!("✅ Avoided {}", answer.habit),
        (HabitKind::Negative, false) => format!("❌ Indulged in {}", answer.habit),
    }
}

/// Scoreboard block, one line per answer; empty when there are no answers.
pub fn scoreboard(answers: &[HabitAnswer]) -> String {
    answers
        .iter()
        .map(scoreboard_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of good outcomes.
pub fn score(answers: &[HabitAnswer]) -> usize {
    answers.iter().filter(|a| a.yes).count()
}

/// Build the summary title and narrative for `user_name`.
pub fn summarize(answers: &[HabitAnswer], user_name: &str) -> DailySummary {
    let total = answers.len();
    let score = score(answers);
    let percentage = if total > 0 {
        score as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    // Integer comparison keeps tier boundaries exact.
    let at_least = |pct: usize| total > 0 && score * 100 >= pct * total;

    let (title, text) = if total > 0 && score == total {
        (
            "The Pinnacle of Discipline",
            format!(
                "{user_name} had a perfect day, demonstrating flawless discipline. They completed all {total} goals, remaining steadfast and focused. An outstanding performance."
            ),
        )
    } else if at_least(80) {
        (
            "The Master Practitioner",
            format!(
                "{user_name} showed exceptional focus, achieving {score}/{total} of their goals. A few minor slips couldn't overshadow a day of strong commitment and progress."
            ),
        )
    } else if at_least(60) {
        (
            "The Steady Hand",
            format!(
                "{user_name} had a solid day. With {score}/{total} habits completed, they built positive momentum and successfully navigated most of the day's challenges."
            ),
        )
    } else if at_least(40) {
        (
            "A Day of Mixed Results",
            format!(
                "{user_name}'s day was a mix of wins and challenges, hitting {score}/{total} targets. This day provides valuable lessons on what to focus on tomorrow."
            ),
        )
    } else if score > 0 {
        (
            "The Uphill Battle",
            format!(
                "{user_name} struggled with focus today, completing {score}/{total} habits. While it was a tough day, every completed habit is a small victory to build on."
            ),
        )
    } else {
        (
            "The Day of Reflection",
            format!(
                "It was a challenging day for {user_name}, with {score}/{total} habits met. Today is best used as a day of rest and reflection to come back stronger tomorrow."
            ),
        )
    };

    DailySummary {
        score,
        total,
        percentage,
        title: title.to_string(),
        text,
    }
}
