//! `/checkin`: habit questions over DM, the journal, and the daily summary.
//!
//! ```text
//!  /checkin ─▶ DM Q1 [Yes][No] ─▶ … ─▶ Qn ─▶ save answers
//!                 │ 5 min idle                  │
//!                 ▼                             ▼
//!             "timed out"            [Write journal][Skip] ── 10 min idle ──┐
//!                                        │          │                       │
//!                                   journal modal   └──────▶ post summary ◀─┘
//!                                        └─────────────────▶ post summary
//! ```

use std::sync::Arc;

use chrono::Utc;
use dayslot_channels::discord::{
    ButtonStyle, Component, Interaction, InteractionResponse, MessagePayload, Modal, TextInput,
    TextInputStyle,
};
use dayslot_core::checkin::{CheckIn, Progress};
use dayslot_core::error::{DaySlotError, Result};
use dayslot_core::habits;
use dayslot_core::planner;

use super::{
    CHECKIN_JOURNAL, CHECKIN_NO, CHECKIN_SKIP, CHECKIN_YES, JOURNAL_MODAL, author, require_config,
};
use crate::render::{self, JournalEntry};
use crate::server::AppState;
use crate::sessions::{Session, Stage};

const JOURNAL_INPUT: &str = "journal";

pub const INACTIVE: &str = "This check-in is no longer active. Use `/checkin` to start a new one.";
pub const TIMED_OUT: &str = "Your check-in timed out. Please use `/checkin` to try again.";
pub const GOT_BUSY: &str =
    "Looks like you got busy. I'll skip the journal entry for today, but your habits are saved!";
pub const SAVE_FAILED: &str =
    "I couldn't save your check-in. Please use `/checkin` to try again.";
pub const COMPLETE: &str =
    "✅ **Check-in complete!**\n\nAll habits recorded. Want to write a short journal entry about your day?";

fn answer_buttons() -> Vec<Component> {
    vec![Component::row(vec![
        Component::button(ButtonStyle::Success, "Yes", CHECKIN_YES),
        Component::button(ButtonStyle::Danger, "No", CHECKIN_NO),
    ])]
}

fn journal_buttons() -> Vec<Component> {
    vec![Component::row(vec![
        Component::button(ButtonStyle::Primary, "Write journal", CHECKIN_JOURNAL),
        Component::button(ButtonStyle::Secondary, "Skip", CHECKIN_SKIP),
    ])]
}

/// A click only counts on the DM the session is driving.
fn on_session_message(session: &Session, interaction: &Interaction) -> bool {
    interaction
        .message
        .as_ref()
        .is_none_or(|m| m.id == session.message.message_id)
}

pub async fn start(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let config = match require_config(state, &user.id).await? {
        Ok(config) => config,
        Err(reply) => return Ok(reply),
    };
    let Some(checkin) = CheckIn::new(&config) else {
        return Ok(InteractionResponse::ephemeral(
            "You haven't set up any habits yet! Use `/setup` first.",
        ));
    };
    let question = checkin
        .prompt()
        .ok_or_else(|| DaySlotError::Validation("check-in has no questions".into()))?;

    let payload = MessagePayload::text(question).with_rows(answer_buttons());
    let message = match state.messenger.send_dm(&user.id, payload).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("⚠️ Could not DM user {}: {e}", user.id);
            return Ok(InteractionResponse::ephemeral(
                "I can't DM you! Please enable DMs from server members.",
            ));
        }
    };

    let session = Session::new(
        checkin,
        planner::today(),
        message,
        user.display_name(),
        user.avatar_url(),
    );
    if state.sessions.begin(&user.id, session).is_some() {
        tracing::debug!("🔄 Replaced an unfinished check-in for user {}", user.id);
    }
    arm_answer_timeout(state, &user.id, 0);
    tracing::info!("📝 Check-in started for user {}", user.id);

    Ok(InteractionResponse::ephemeral(
        "Starting your daily check-in... (Check your DMs!)",
    ))
}

pub async fn answer(
    state: &Arc<AppState>,
    interaction: &Interaction,
    yes: bool,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let step = state
        .sessions
        .update(&user.id, |s| {
            if s.stage != Stage::Answering || !on_session_message(s, interaction) {
                return None;
            }
            let progress = s.checkin.answer(yes);
            s.turn += 1;
            if matches!(progress, Ok(Progress::Complete)) {
                s.stage = Stage::AwaitingJournal;
            }
            Some((progress, s.turn, s.checkin.clone(), s.date.clone()))
        })
        .flatten();
    let Some((progress, turn, checkin, date)) = step else {
        return Ok(InteractionResponse::ephemeral(INACTIVE));
    };

    match progress? {
        Progress::Next(question) => {
            arm_answer_timeout(state, &user.id, turn);
            Ok(InteractionResponse::update(
                MessagePayload::text(question).with_rows(answer_buttons()),
            ))
        }
        Progress::Complete => {
            let saved = match checkin.record(&date) {
                Ok(record) => state
                    .users
                    .save_checkin(&user.id, &record)
                    .await
                    .map(|()| record),
                Err(e) => Err(e),
            };
            let record = match saved {
                Ok(record) => record,
                Err(e) => {
                    tracing::error!("❌ Saving check-in for user {} failed: {e}", user.id);
                    state.sessions.finish(&user.id);
                    return Ok(InteractionResponse::update(
                        MessagePayload::text(SAVE_FAILED).clear_components(),
                    ));
                }
            };
            arm_journal_timeout(state, &user.id, turn);
            tracing::info!(
                "📝 User {} answered {} habits for {date}",
                user.id,
                record.answers.len()
            );
            Ok(InteractionResponse::update(
                MessagePayload::text(COMPLETE).with_rows(journal_buttons()),
            ))
        }
    }
}

fn awaiting_journal(state: &AppState, user_id: &str, interaction: &Interaction) -> bool {
    state
        .sessions
        .update(user_id, |s| {
            s.stage == Stage::AwaitingJournal && on_session_message(s, interaction)
        })
        .unwrap_or(false)
}

pub fn journal_modal() -> Modal {
    Modal::new(JOURNAL_MODAL, "Daily Journal").input(
        TextInput::new(JOURNAL_INPUT, "How was your day overall?", TextInputStyle::Paragraph)
            .placeholder("Write a few lines about your day...")
            .length(1, 4000),
    )
}

pub async fn open_journal(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    if !awaiting_journal(state, &user.id, interaction) {
        return Ok(InteractionResponse::ephemeral(INACTIVE));
    }
    Ok(InteractionResponse::modal(journal_modal()))
}

pub async fn skip_journal(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    if !awaiting_journal(state, &user.id, interaction) {
        return Ok(InteractionResponse::ephemeral(INACTIVE));
    }
    let Some(session) = state.sessions.finish(&user.id) else {
        return Ok(InteractionResponse::ephemeral(INACTIVE));
    };
    spawn_summary(state, &user.id, session, None);
    Ok(InteractionResponse::update(
        MessagePayload::text("Skipping the journal today. Generating your daily summary...")
            .clear_components(),
    ))
}

pub async fn submit_journal(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    if !awaiting_journal(state, &user.id, interaction) {
        return Ok(InteractionResponse::ephemeral(INACTIVE));
    }
    let Some(session) = state.sessions.finish(&user.id) else {
        return Ok(InteractionResponse::ephemeral(INACTIVE));
    };
    let journal = interaction
        .modal_value(JOURNAL_INPUT)
        .map(str::trim)
        .filter(|j| !j.is_empty())
        .map(str::to_string);
    spawn_summary(state, &user.id, session, journal);
    Ok(InteractionResponse::update(
        MessagePayload::text("Journal entry received! Generating your daily summary...")
            .clear_components(),
    ))
}

fn arm_answer_timeout(state: &Arc<AppState>, user_id: &str, turn: u64) {
    let delay = state.sessions.answer_timeout;
    let owned = Arc::clone(state);
    let uid = user_id.to_string();
    state.sessions.arm_timeout(user_id, delay, move || async move {
        let state = owned;
        let Some(session) = state.sessions.expire(&uid, turn) else {
            return;
        };
        tracing::info!("⏰ Check-in for user {uid} timed out");
        let payload = MessagePayload::text(TIMED_OUT).clear_components();
        if let Err(e) = state.messenger.edit_message(&session.message, payload).await {
            tracing::warn!("⚠️ Could not edit timed-out check-in for {uid}: {e}");
        }
    });
}

fn arm_journal_timeout(state: &Arc<AppState>, user_id: &str, turn: u64) {
    let delay = state.sessions.journal_timeout;
    let owned = Arc::clone(state);
    let uid = user_id.to_string();
    state.sessions.arm_timeout(user_id, delay, move || async move {
        let state = owned;
        let Some(session) = state.sessions.expire(&uid, turn) else {
            return;
        };
        tracing::info!("⏰ Journal wait for user {uid} expired");
        dm(&state, &uid, GOT_BUSY.to_string()).await;
        post_summary(&state, &uid, session, None).await;
    });
}

fn spawn_summary(state: &Arc<AppState>, user_id: &str, session: Session, journal: Option<String>) {
    let state = Arc::clone(state);
    let uid = user_id.to_string();
    tokio::spawn(async move {
        post_summary(&state, &uid, session, journal).await;
    });
}

async fn dm(state: &AppState, user_id: &str, text: String) {
    if let Err(e) = state
        .messenger
        .send_dm(user_id, MessagePayload::text(text))
        .await
    {
        tracing::warn!("⚠️ Could not DM user {user_id}: {e}");
    }
}

/// Score the day, store the summary with the journal, and post the
/// journal embed. Failures are reported to the user by DM.
pub async fn post_summary(
    state: &AppState,
    user_id: &str,
    session: Session,
    journal: Option<String>,
) {
    let config = match state.users.config(user_id).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            dm(state, user_id, "I can't find your config! Please use `/setup` again.".into()).await;
            return;
        }
        Err(e) => {
            tracing::error!("❌ Loading config for {user_id} failed: {e}");
            dm(state, user_id, "I can't find your config! Please use `/setup` again.".into()).await;
            return;
        }
    };

    let answers = session.checkin.answers();
    let summary = habits::summarize(answers, &session.user_name);
    let scoreboard = habits::scoreboard(answers);

    if let Err(e) = save_summary(state, user_id, &session, journal.clone(), &summary).await {
        tracing::error!("❌ Saving summary for {user_id} failed: {e}");
    }

    let embed = render::journal_embed(JournalEntry {
        date: &session.date,
        summary: &summary,
        scoreboard: &scoreboard,
        journal: journal.as_deref(),
        author: &session.user_name,
        icon_url: Some(session.avatar_url.clone()),
    })
    .timestamp(Utc::now().to_rfc3339());

    let channel = &config.journal_channel_id;
    match state
        .messenger
        .send_channel_message(channel, MessagePayload::embed(embed))
        .await
    {
        Ok(_) => tracing::info!(
            "📔 Posted journal for user {user_id} to {channel} ({}/{})",
            summary.score,
            summary.total
        ),
        Err(DaySlotError::NotFound(_)) => {
            dm(
                state,
                user_id,
                format!("I can't find your journal channel (ID: {channel}). Maybe it was deleted?"),
            )
            .await;
        }
        Err(e) => {
            tracing::warn!("⚠️ Posting journal to {channel} failed: {e}");
            dm(
                state,
                user_id,
                format!(
                    "I failed to post your summary to <#{channel}>. Do I have 'Send Messages' and 'Embed Links' permissions? Error: {e}"
                ),
            )
            .await;
        }
    }
}

async fn save_summary(
    state: &AppState,
    user_id: &str,
    session: &Session,
    journal: Option<String>,
    summary: &dayslot_core::types::DailySummary,
) -> Result<()> {
    let mut record = match state.users.checkin(user_id, &session.date).await? {
        Some(record) => record,
        None => session.checkin.record(&session.date)?,
    };
    record.journal = journal;
    record.summary = Some(summary.clone());
    record.completed_at = Some(Utc::now());
    state.users.save_checkin(user_id, &record).await
}
