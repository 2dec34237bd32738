//! `/addtask`, `/starttask`, `/done` and the reflection modal.

use std::sync::Arc;

use chrono::Utc;
use dayslot_channels::discord::{
    Component, Interaction, InteractionResponse, MessagePayload, Modal, SelectOption, TextInput,
    TextInputStyle,
};
use dayslot_core::error::{DaySlotError, Result};
use dayslot_core::planner::{self, PlacementError};
use dayslot_core::types::{Reflection, Task, TaskStatus};

use super::{DONE_SELECT, REFLECT_PREFIX, START_SELECT, author, require_config, selected};
use crate::server::AppState;

const DIFFICULTIES: &str = "difficulties";
const INTERRUPTIONS: &str = "interruptions";
const FEELINGS: &str = "feelings";

pub const TASK_NOT_FOUND: &str = "Error: Task not found.";
pub const ALREADY_COMPLETED: &str = "That task is already completed.";
pub const NO_SCHEDULE: &str = "Error: Could not find schedule.";

fn task_menu(custom_id: &str, placeholder: &str, tasks: &[&Task]) -> Vec<Component> {
    let options = tasks
        .iter()
        .map(|t| SelectOption::new(&t.label(), &t.id))
        .collect();
    vec![Component::row(vec![Component::select(
        custom_id,
        placeholder,
        options,
    )])]
}

pub async fn add(state: &Arc<AppState>, interaction: &Interaction) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let config = match require_config(state, &user.id).await? {
        Ok(config) => config,
        Err(reply) => return Ok(reply),
    };

    let name = interaction.option_str("name").unwrap_or_default().trim();
    if name.is_empty() {
        return Err(DaySlotError::Validation("task name is required".into()));
    }
    let duration = match interaction.option_i64("duration") {
        Some(d) if d > 0 => u32::try_from(d).unwrap_or(u32::MAX),
        _ => {
            return Ok(InteractionResponse::ephemeral(
                PlacementError::InvalidDuration.to_string(),
            ));
        }
    };

    let mut schedule = state
        .users
        .schedule_or_create(&user.id, &planner::today(), config.start_hour)
        .await?;
    let reply = match planner::place_task(&mut schedule, name, duration) {
        Ok((index, task)) => {
            state.users.save_schedule(&user.id, &schedule).await?;
            let slot = &schedule.slots[index];
            tracing::info!(
                "📅 User {} added '{}' ({}m) to slot {}",
                user.id,
                task.name,
                task.duration,
                slot.number()
            );
            format!(
                "✅ Task **'{}'** ({}m) has been added to **Slot {} ({})**.",
                task.name,
                task.duration,
                slot.number(),
                planner::time_range(slot.start_hour)
            )
        }
        Err(PlacementError::NoCapacity(d)) => format!(
            "❌ No available slot found that can fit **{d}** minutes. Try adding a shorter task or completing existing ones."
        ),
        Err(e) => e.to_string(),
    };
    Ok(InteractionResponse::ephemeral(reply))
}

pub async fn start_menu(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let config = match require_config(state, &user.id).await? {
        Ok(config) => config,
        Err(reply) => return Ok(reply),
    };
    let schedule = state
        .users
        .schedule_or_create(&user.id, &planner::today(), config.start_hour)
        .await?;
    let pending = planner::pending_tasks(&schedule);
    if pending.is_empty() {
        return Ok(InteractionResponse::ephemeral("You have no pending tasks to start!"));
    }
    Ok(InteractionResponse::message(
        MessagePayload::text("Which task would you like to start?")
            .with_rows(task_menu(START_SELECT, "Choose a task to start...", &pending))
            .ephemeral(),
    ))
}

pub async fn start_selected(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let task_id = selected(interaction)?;
    let today = planner::today();
    let Some(mut schedule) = state.users.schedule(&user.id, &today).await? else {
        return Ok(InteractionResponse::ephemeral(NO_SCHEDULE));
    };
    let Some(task) = planner::find_task_mut(&mut schedule, task_id) else {
        return Ok(InteractionResponse::ephemeral(TASK_NOT_FOUND));
    };
    if task.status == TaskStatus::Completed {
        return Ok(InteractionResponse::ephemeral(ALREADY_COMPLETED));
    }
    task.status = TaskStatus::InProgress;
    task.started_at = Some(Utc::now());
    let task = task.clone();

    state.users.save_schedule(&user.id, &schedule).await?;
    state.timers.start(&user.id, &task).await?;

    Ok(InteractionResponse::update(
        MessagePayload::text(format!(
            "▶️ Timer started for **'{}'** ({}m). I'll DM you when it's over!",
            task.name, task.duration
        ))
        .clear_components(),
    ))
}

pub async fn done_menu(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let config = match require_config(state, &user.id).await? {
        Ok(config) => config,
        Err(reply) => return Ok(reply),
    };
    let schedule = state
        .users
        .schedule_or_create(&user.id, &planner::today(), config.start_hour)
        .await?;
    let open = planner::open_tasks(&schedule);
    if open.is_empty() {
        return Ok(InteractionResponse::ephemeral("You have no tasks to mark as complete!"));
    }
    Ok(InteractionResponse::message(
        MessagePayload::text("Which task did you complete?")
            .with_rows(task_menu(DONE_SELECT, "Choose a task to complete...", &open))
            .ephemeral(),
    ))
}

pub fn reflection_modal(task_id: &str) -> Modal {
    let question = |id: &str, label: &str, placeholder: &str| {
        TextInput::new(id, label, TextInputStyle::Paragraph)
            .placeholder(placeholder)
            .optional()
    };
    Modal::new(&format!("{REFLECT_PREFIX}{task_id}"), "Task Reflection")
        .input(question(
            DIFFICULTIES,
            "What difficulties were encountered?",
            "e.g., The concept was harder than I thought, I felt tired...",
        ))
        .input(question(
            INTERRUPTIONS,
            "Were there any interruptions?",
            "e.g., Friends messaged me, I got a phone call...",
        ))
        .input(question(
            FEELINGS,
            "How did you feel during the task?",
            "e.g., Focused, distracted, motivated, bored...",
        ))
}

pub async fn done_selected(
    state: &Arc<AppState>,
    interaction: &Interaction,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let task_id = selected(interaction)?;
    let Some(mut schedule) = state.users.schedule(&user.id, &planner::today()).await? else {
        return Ok(InteractionResponse::ephemeral(NO_SCHEDULE));
    };
    match planner::find_task_mut(&mut schedule, task_id) {
        None => return Ok(InteractionResponse::ephemeral(TASK_NOT_FOUND)),
        Some(task) if task.status == TaskStatus::Completed => {
            return Ok(InteractionResponse::ephemeral(ALREADY_COMPLETED));
        }
        Some(_) => {}
    }
    state.timers.cancel(&user.id, task_id).await?;
    Ok(InteractionResponse::modal(reflection_modal(task_id)))
}

pub async fn reflect(
    state: &Arc<AppState>,
    interaction: &Interaction,
    task_id: &str,
) -> Result<InteractionResponse> {
    let user = author(interaction)?;
    let Some(mut schedule) = state.users.schedule(&user.id, &planner::today()).await? else {
        return Ok(InteractionResponse::ephemeral(NO_SCHEDULE));
    };
    let Some(task) = planner::find_task_mut(&mut schedule, task_id) else {
        return Ok(InteractionResponse::ephemeral(
            "Error: Could not find the task to save reflection.",
        ));
    };

    let answer = |id: &str| interaction.modal_value(id).unwrap_or_default().trim().to_string();
    let now = Utc::now();
    task.status = TaskStatus::Completed;
    task.completed_at = Some(now);
    task.reflection = Some(Reflection {
        difficulties: answer(DIFFICULTIES),
        interruptions: answer(INTERRUPTIONS),
        feelings: answer(FEELINGS),
        recorded_at: now,
    });
    let name = task.name.clone();

    state.users.save_schedule(&user.id, &schedule).await?;
    tracing::info!("✅ User {} completed '{name}'", user.id);
    Ok(InteractionResponse::ephemeral(
        "Reflection saved! Task marked as complete.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::dispatch;
    use crate::testing::{TestBot, USER, command, component, modal};
    use serde_json::json;
    use std::time::Duration;

    fn addtask(name: &str, duration: i64) -> Interaction {
        command(
            "addtask",
            json!([
                {"name": "name", "type": 3, "value": name},
                {"name": "duration", "type": 4, "value": duration}
            ]),
        )
    }

    async fn today(bot: &TestBot) -> dayslot_core::types::DaySchedule {
        bot.state
            .users
            .schedule(USER, &planner::today())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_addtask_first_fit() {
        let bot = TestBot::new();
        bot.configure(&[], &[]).await;

        let reply = dispatch(&bot.state, &addtask("Deep work", 180)).await;
        assert_eq!(
            reply.content(),
            Some("✅ Task **'Deep work'** (180m) has been added to **Slot 1 (07:00 - 11:00)**.")
        );
        let reply = dispatch(&bot.state, &addtask("Writing", 90)).await;
        assert_eq!(
            reply.content(),
            Some("✅ Task **'Writing'** (90m) has been added to **Slot 2 (11:00 - 15:00)**.")
        );
        let reply = dispatch(&bot.state, &addtask("Email", 60)).await;
        assert!(reply.content().unwrap().contains("**Slot 1 (07:00 - 11:00)**"));

        let day = today(&bot).await;
        assert_eq!(day.slots[0].remaining_minutes, 0);
        assert_eq!(day.slots[1].remaining_minutes, 150);
    }

    #[tokio::test]
    async fn test_addtask_rejections() {
        let bot = TestBot::new();
        bot.configure(&[], &[]).await;

        let reply = dispatch(&bot.state, &addtask("Nap", 0)).await;
        assert_eq!(reply.content(), Some("Duration must be a positive number of minutes."));
        let reply = dispatch(&bot.state, &addtask("Nap", -5)).await;
        assert_eq!(reply.content(), Some("Duration must be a positive number of minutes."));

        let reply = dispatch(&bot.state, &addtask("Marathon", 300)).await;
        assert_eq!(
            reply.content(),
            Some("❌ No available slot found that can fit **300** minutes. Try adding a shorter task or completing existing ones.")
        );
    }

    #[tokio::test]
    async fn test_starttask_without_pending() {
        let bot = TestBot::new();
        bot.configure(&[], &[]).await;
        let reply = dispatch(&bot.state, &command("starttask", json!([]))).await;
        assert_eq!(reply.content(), Some("You have no pending tasks to start!"));
        let reply = dispatch(&bot.state, &command("done", json!([]))).await;
        assert_eq!(reply.content(), Some("You have no tasks to mark as complete!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_task_arms_timer_and_dms() {
        let bot = TestBot::new();
        bot.configure(&[], &[]).await;
        dispatch(&bot.state, &addtask("Read", 30)).await;
        let task_id = today(&bot).await.slots[0].tasks[0].id.clone();

        let menu = dispatch(&bot.state, &command("starttask", json!([]))).await;
        let v = serde_json::to_value(&menu).unwrap();
        let select = &v["data"]["components"][0]["components"][0];
        assert_eq!(select["custom_id"], START_SELECT);
        assert_eq!(select["options"][0]["label"], "Read (30m)");
        assert_eq!(select["options"][0]["value"], task_id.as_str());

        let click = component(START_SELECT, &[task_id.as_str()], "c", "m");
        let reply = dispatch(&bot.state, &click).await;
        assert!(reply.is_update());
        assert_eq!(
            reply.content(),
            Some("▶️ Timer started for **'Read'** (30m). I'll DM you when it's over!")
        );
        assert_eq!(reply.payload().unwrap().components, Some(vec![]));

        let task = &today(&bot).await.slots[0].tasks[0];
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.started_at.is_some());
        assert!(bot.state.timers.is_armed(USER, &task_id));

        tokio::time::sleep(Duration::from_secs(30 * 60 + 1)).await;
        let dms = bot.messenger.dm_texts();
        assert_eq!(dms.len(), 1);
        assert!(dms[0].starts_with("🔔 **Time's up!** Your task **'Read'** is due to end."));
    }

    #[tokio::test]
    async fn test_start_unknown_task() {
        let bot = TestBot::new();
        bot.configure(&[], &[]).await;
        dispatch(&bot.state, &addtask("Read", 30)).await;
        let reply = dispatch(&bot.state, &component(START_SELECT, &["nope"], "c", "m")).await;
        assert_eq!(reply.content(), Some(TASK_NOT_FOUND));
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_flow_cancels_timer_and_saves_reflection() {
        let bot = TestBot::new();
        bot.configure(&[], &[]).await;
        dispatch(&bot.state, &addtask("Read", 30)).await;
        let task_id = today(&bot).await.slots[0].tasks[0].id.clone();
        dispatch(&bot.state, &component(START_SELECT, &[task_id.as_str()], "c", "m")).await;

        let menu = dispatch(&bot.state, &command("done", json!([]))).await;
        let v = serde_json::to_value(&menu).unwrap();
        assert_eq!(v["data"]["components"][0]["components"][0]["custom_id"], DONE_SELECT);

        let click = component(DONE_SELECT, &[task_id.as_str()], "c", "m2");
        let reply = dispatch(&bot.state, &click).await;
        assert!(reply.is_modal());
        let v = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["data"]["custom_id"], format!("reflect:{task_id}"));
        assert_eq!(v["data"]["title"], "Task Reflection");
        assert!(!bot.state.timers.is_armed(USER, &task_id));

        let submit = modal(
            &format!("reflect:{task_id}"),
            &[(DIFFICULTIES, "Tired"), (INTERRUPTIONS, ""), (FEELINGS, " Focused ")],
        );
        let reply = dispatch(&bot.state, &submit).await;
        assert_eq!(reply.content(), Some("Reflection saved! Task marked as complete."));

        let task = today(&bot).await.slots[0].tasks[0].clone();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.completed_at.is_some());
        let reflection = task.reflection.unwrap();
        assert_eq!(reflection.difficulties, "Tired");
        assert_eq!(reflection.interruptions, "");
        assert_eq!(reflection.feelings, "Focused");

        // Timer was cancelled: no DM after the duration.
        tokio::time::sleep(Duration::from_secs(31 * 60)).await;
        assert!(bot.messenger.dm_texts().is_empty());

        // Completed tasks can't be started or completed again.
        let click = component(START_SELECT, &[task_id.as_str()], "c", "m");
        let reply = dispatch(&bot.state, &click).await;
        assert_eq!(reply.content(), Some(ALREADY_COMPLETED));
        let click = component(DONE_SELECT, &[task_id.as_str()], "c", "m");
        let reply = dispatch(&bot.state, &click).await;
        assert_eq!(reply.content(), Some(ALREADY_COMPLETED));
    }

    #[tokio::test]
    async fn test_reflect_missing_task() {
        let bot = TestBot::new();
        bot.configure(&[], &[]).await;
        let reply = dispatch(&bot.state, &modal("reflect:x", &[])).await;
        assert_eq!(reply.content(), Some(NO_SCHEDULE));

        dispatch(&bot.state, &addtask("Read", 30)).await;
        let reply = dispatch(&bot.state, &modal("reflect:x", &[])).await;
        assert_eq!(
            reply.content(),
            Some("Error: Could not find the task to save reflection.")
        );
    }
}
