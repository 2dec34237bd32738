//! `/schedule`: today's four slots as an embed.

use std::sync::Arc;

use dayslot_channels::discord::{Interaction, InteractionResponse, MessagePayload};
use dayslot_core::error::Result;
use dayslot_core::planner;

use super::{author, require_config};
use crate::render;
use crate::server::AppState;

pub async fn show(state: &Arc<AppState>, interaction: &Interaction) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let config = match require_config(state, &user.id).await? {
        Ok(config) => config,
        Err(reply) => return Ok(reply),
    };
    let schedule = state
        .users
        .schedule_or_create(&user.id, &planner::today(), config.start_hour)
        .await?;
    let embed = render::schedule_embed(&schedule, user.display_name(), Some(user.avatar_url()));
    Ok(InteractionResponse::message(
        MessagePayload::embed(embed).ephemeral(),
    ))
}
