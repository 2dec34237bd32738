//! `/setup`: the configuration modal.

use std::sync::Arc;

use dayslot_channels::discord::{Interaction, InteractionResponse, Modal, TextInput, TextInputStyle};
use dayslot_core::error::Result;
use dayslot_core::setup::{SetupError, SetupForm};
use dayslot_core::types::UserConfig;

use super::{SETUP_MODAL, author};
use crate::server::AppState;

const HOUR: &str = "start_hour";
const CHANNEL: &str = "journal_channel";
const POSITIVE: &str = "positive_habits";
const NEGATIVE: &str = "negative_habits";

/// Modal pre-filled with the current config, if any.
pub fn setup_modal(existing: Option<&UserConfig>) -> Modal {
    let hour = existing.map(|c| c.start_hour.to_string()).unwrap_or_default();
    let channel = existing
        .map(|c| c.journal_channel_id.clone())
        .unwrap_or_default();
    let positive = existing
        .map(|c| c.positive_habits.join("\n"))
        .unwrap_or_default();
    let negative = existing
        .map(|c| c.negative_habits.join("\n"))
        .unwrap_or_default();

    Modal::new(SETUP_MODAL, "Welcome! Let's get you set up.")
        .input(
            TextInput::new(HOUR, "What hour do you usually wake up? (0-23)", TextInputStyle::Short)
                .placeholder("e.g., 7 for 7 AM")
                .length(1, 2)
                .value(&hour),
        )
        .input(
            TextInput::new(CHANNEL, "Channel ID for your Journal", TextInputStyle::Short)
                .placeholder("Right-click a channel and \"Copy Channel ID\"")
                .length(17, 20)
                .value(&channel),
        )
        .input(
            TextInput::new(POSITIVE, "Positive Habits (one per line)", TextInputStyle::Paragraph)
                .placeholder("Meditate\nGo to the gym\nRead a book")
                .optional()
                .value(&positive),
        )
        .input(
            TextInput::new(NEGATIVE, "Negative Habits (one per line)", TextInputStyle::Paragraph)
                .placeholder("Smoke\nEat junk food\nSugary drinks")
                .optional()
                .value(&negative),
        )
}

pub async fn command(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let existing = state.users.config(&user.id).await?;
    Ok(InteractionResponse::modal(setup_modal(existing.as_ref())))
}

pub async fn submit(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let field = |id: &str| interaction.modal_value(id).unwrap_or_default().to_string();
    let form = SetupForm {
        start_hour: field(HOUR),
        journal_channel: field(CHANNEL),
        positive_habits: field(POSITIVE),
        negative_habits: field(NEGATIVE),
    };

    let config = match form.parse() {
        Ok(config) => config,
        Err(e) => return Ok(InteractionResponse::ephemeral(e.to_string())),
    };

    let visible = match state.messenger.channel_exists(&config.journal_channel_id).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!("⚠️ Channel lookup for {} failed: {e}", config.journal_channel_id);
            false
        }
    };
    if !visible {
        let raw = form.journal_channel.trim().to_string();
        return Ok(InteractionResponse::ephemeral(
            SetupError::UnknownChannel(raw).to_string(),
        ));
    }

    state.users.save_config(&user.id, &config).await?;
    Ok(InteractionResponse::ephemeral(setup_complete(&config)))
}

pub fn setup_complete(config: &UserConfig) -> String {
    format!(
        "🎉 **Setup complete!**\n\n\
         Your day will be structured from **{:02}:00**.\n\
         Your journal entries will be posted in <#{}>.\n\
         I'll track your {} positive and {} negative habits.\n\n\
         You can now use `/addtask` to start planning your day!",
        config.start_hour,
        config.journal_channel_id,
        config.positive_habits.len(),
        config.negative_habits.len()
    )
}
