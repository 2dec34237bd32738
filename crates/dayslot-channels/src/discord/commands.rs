//! Slash command definitions registered with Discord.

use serde_json::{Value, json};

pub const SETUP: &str = "setup";
pub const ADD_TASK: &str = "addtask";
pub const START_TASK: &str = "starttask";
pub const SCHEDULE: &str = "schedule";
pub const DONE: &str = "done";
pub const CHECKIN: &str = "checkin";

const STRING: u8 = 3;
const INTEGER: u8 = 4;
const CHAT_INPUT: u8 = 1;

fn command(name: &str, description: &str, options: Vec<Value>) -> Value {
    json!({
        "name": name,
        "type": CHAT_INPUT,
        "description": description,
        "options": options,
    })
}

/// Every command the bot answers, in the shape the bulk-overwrite endpoint takes.
pub fn definitions() -> Vec<Value> {
    vec![
        command(SETUP, "Set up your daily schedule and habits.", vec![]),
        command(
            ADD_TASK,
            "Add a new task to your schedule for today.",
            vec![
                json!({
                    "name": "name",
                    "type": STRING,
                    "description": "The name of the task.",
                    "required": true,
                    "max_length": 100,
                }),
                json!({
                    "name": "duration",
                    "type": INTEGER,
                    "description": "How long the task takes, in minutes.",
                    "required": true,
                    "min_value": 1,
                    "max_value": 240,
                }),
            ],
        ),
        command(START_TASK, "Start a timer for one of your tasks.", vec![]),
        command(SCHEDULE, "View your schedule for today.", vec![]),
        command(DONE, "Mark a task as complete and log your reflection.", vec![]),
        command(CHECKIN, "Start your daily habit check-in.", vec![]),
    ]
}
