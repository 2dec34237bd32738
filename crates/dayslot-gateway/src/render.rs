//! Embeds for the schedule and the daily journal.

use dayslot_channels::discord::response::{Embed, FIELD_VALUE_LIMIT, clip};
use dayslot_core::planner;
use dayslot_core::types::{DailySummary, DaySchedule, Slot};

pub const SCHEDULE_COLOR: u32 = 0x9B59B6;
pub const JOURNAL_COLOR: u32 = 0x3498DB;

/// Field body for one slot: task lines, then the remaining minutes.
pub fn slot_field_value(slot: &Slot) -> String {
    let tasks = if slot.tasks.is_empty() {
        "*Empty*".to_string()
    } else {
        slot.tasks
            .iter()
            .map(|t| format!("{} {} ({}m)\n", t.status.emoji(), t.name, t.duration))
            .collect()
    };
    format!("{tasks}\n*Remaining: {}m*", slot.remaining_minutes)
}

pub fn schedule_embed(schedule: &DaySchedule, author: &str, icon_url: Option<String>) -> Embed {
    let title = format!("Today's Schedule ({})", schedule.date);
    schedule.slots.iter().fold(
        Embed::new(title).color(SCHEDULE_COLOR).author(author, icon_url),
        |embed, slot| {
            embed.field(
                &format!(
                    "Slot {} ({})",
                    slot.number(),
                    planner::time_range(slot.start_hour)
                ),
                &slot_field_value(slot),
                false,
            )
        },
    )
}

pub struct JournalEntry<'a> {
    pub date: &'a str,
    pub summary: &'a DailySummary,
    pub scoreboard: &'a str,
    pub journal: Option<&'a str>,
    pub author: &'a str,
    pub icon_url: Option<String>,
}

pub fn journal_embed(entry: JournalEntry<'_>) -> Embed {
    let mut embed = Embed::new(format!("Daily Journal: {}", entry.date))
        .color(JOURNAL_COLOR)
        .description(&format!(
            "**Status: {}**\n\n*{}*",
            entry.summary.title, entry.summary.text
        ))
        .author(entry.author, entry.icon_url);

    if !entry.scoreboard.is_empty() {
        embed = embed.field("Habit Scoreboard", entry.scoreboard, false);
    }
    let journal = match entry.journal.map(str::trim).filter(|j| !j.is_empty()) {
        // keep the closing fence inside the field limit
        Some(text) => format!("```{}```", clip(text, FIELD_VALUE_LIMIT - 6)),
        None => "*No journal entry provided.*".to_string(),
    };
    embed.field("Journal Entry", &journal, false)
}
