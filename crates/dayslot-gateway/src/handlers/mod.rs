//! Interaction handlers: one per slash command, plus the component and
//! modal callbacks they open.

pub mod checkin;
pub mod schedule;
pub mod setup;
pub mod tasks;

use std::sync::Arc;

use dayslot_channels::discord::commands;
use dayslot_channels::discord::{Interaction, InteractionResponse, InteractionType, User};
use dayslot_core::error::{DaySlotError, Result};
use dayslot_core::types::UserConfig;

use crate::server::AppState;

// Component / modal custom ids.
pub const SETUP_MODAL: &str = "setup:modal";
pub const START_SELECT: &str = "starttask:select";
pub const DONE_SELECT: &str = "done:select";
pub const REFLECT_PREFIX: &str = "reflect:";
pub const CHECKIN_YES: &str = "checkin:yes";
pub const CHECKIN_NO: &str = "checkin:no";
pub const CHECKIN_JOURNAL: &str = "checkin:journal";
pub const CHECKIN_SKIP: &str = "checkin:skip";
pub const JOURNAL_MODAL: &str = "journal:modal";

pub const NEEDS_SETUP: &str = "You must run `/setup` first!";

/// Answer one interaction. Handler errors become an ephemeral error reply.
pub async fn dispatch(state: &Arc<AppState>, interaction: &Interaction) -> InteractionResponse {
    match route(state, interaction).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                "❌ Interaction {} ({:?}) failed: {e}",
                interaction.id,
                interaction.kind
            );
            InteractionResponse::ephemeral(format!("An error occurred: {e}"))
        }
    }
}

async fn route(state: &Arc<AppState>, interaction: &Interaction) -> Result<InteractionResponse> {
    match interaction.kind {
        InteractionType::Ping => Ok(InteractionResponse::pong()),
        InteractionType::ApplicationCommand => {
            let name = interaction.command_name().unwrap_or_default();
            tracing::debug!("⚡ /{name} from {:?}", interaction.user_id());
            match name {
                commands::SETUP => setup::command(state, interaction).await,
                commands::ADD_TASK => tasks::add(state, interaction).await,
                commands::START_TASK => tasks::start_menu(state, interaction).await,
                commands::SCHEDULE => schedule::show(state, interaction).await,
                commands::DONE => tasks::done_menu(state, interaction).await,
                commands::CHECKIN => checkin::start(state, interaction).await,
                other => Ok(InteractionResponse::ephemeral(format!(
                    "Unknown command `/{other}`."
                ))),
            }
        }
        InteractionType::MessageComponent => match interaction.custom_id().unwrap_or_default() {
            START_SELECT => tasks::start_selected(state, interaction).await,
            DONE_SELECT => tasks::done_selected(state, interaction).await,
            CHECKIN_YES => checkin::answer(state, interaction, true).await,
            CHECKIN_NO => checkin::answer(state, interaction, false).await,
            CHECKIN_JOURNAL => checkin::open_journal(state, interaction).await,
            CHECKIN_SKIP => checkin::skip_journal(state, interaction).await,
            other => Err(DaySlotError::Validation(format!("unknown component '{other}'"))),
        },
        InteractionType::ModalSubmit => {
            let id = interaction.custom_id().unwrap_or_default();
            if id == SETUP_MODAL {
                setup::submit(state, interaction).await
            } else if id == JOURNAL_MODAL {
                checkin::submit_journal(state, interaction).await
            } else if let Some(task_id) = id.strip_prefix(REFLECT_PREFIX) {
                tasks::reflect(state, interaction, task_id).await
            } else {
                Err(DaySlotError::Validation(format!("unknown modal '{id}'")))
            }
        }
        other => Err(DaySlotError::Validation(format!(
            "unsupported interaction type {other:?}"
        ))),
    }
}

/// The user who triggered the interaction.
pub(crate) fn author(interaction: &Interaction) -> Result<&User> {
    interaction
        .author()
        .ok_or_else(|| DaySlotError::Validation("interaction has no user".into()))
}

/// Load the user's config; `Err(reply)` tells them to run `/setup`.
pub(crate) async fn require_config(
    state: &AppState,
    user_id: &str,
) -> Result<std::result::Result<UserConfig, InteractionResponse>> {
    Ok(state
        .users
        .config(user_id)
        .await?
        .ok_or_else(|| InteractionResponse::ephemeral(NEEDS_SETUP)))
}

/// First selected value of a select menu.
pub(crate) fn selected(interaction: &Interaction) -> Result<&str> {
    interaction
        .selected_values()
        .first()
        .map(String::as_str)
        .ok_or_else(|| DaySlotError::Validation("no option selected".into()))
}
