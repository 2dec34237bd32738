//! Incoming interaction payloads.

use serde::Deserialize;
use serde_json::Value;

/// Interaction `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    MessageComponent,
    Autocomplete,
    ModalSubmit,
    Unknown(u8),
}

impl From<u8> for InteractionType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            4 => Self::Autocomplete,
            5 => Self::ModalSubmit,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub application_id: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub data: Option<InteractionData>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Set in guilds.
    #[serde(default)]
    pub member: Option<Member>,
    /// Set in DMs.
    #[serde(default)]
    pub user: Option<User>,
    /// The message a component was attached to.
    #[serde(default)]
    pub message: Option<ComponentMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub component_type: Option<u8>,
    #[serde(default)]
    pub values: Vec<String>,
    /// Modal submits: action rows of text inputs.
    #[serde(default)]
    pub components: Vec<ModalRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalRow {
    #[serde(default)]
    pub components: Vec<ModalField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalField {
    #[serde(default)]
    pub custom_id: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => format!("https://cdn.discordapp.com/avatars/{}/{hash}.png", self.id),
            None => {
                let index = self.id.parse::<u64>().map(|id| (id >> 22) % 6).unwrap_or(0);
                format!("https://cdn.discordapp.com/embed/avatars/{index}.png")
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentMessage {
    pub id: String,
    #[serde(default)]
    pub channel_id: String,
}

impl Interaction {
    /// Who triggered the interaction, in a guild or a DM.
    pub fn author(&self) -> Option<&User> {
        self.member
            .as_ref()
            .map(|m| &m.user)
            .or(self.user.as_ref())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.author().map(|u| u.id.as_str())
    }

    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref()?.name.as_deref()
    }

    pub fn custom_id(&self) -> Option<&str> {
        self.data.as_ref()?.custom_id.as_deref()
    }

    /// Raw value of a slash-command option.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.data
            .as_ref()?
            .options
            .iter()
            .find(|o| o.name == name)?
            .value
            .as_ref()
    }

    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.option(name)?.as_str()
    }

    pub fn option_i64(&self, name: &str) -> Option<i64> {
        self.option(name)?.as_i64()
    }

    /// Values picked in a select menu.
    pub fn selected_values(&self) -> &[String] {
        self.data
            .as_ref()
            .map(|d| d.values.as_slice())
            .unwrap_or(&[])
    }

    /// Text submitted for a modal input, empty inputs included.
    pub fn modal_value(&self, custom_id: &str) -> Option<&str> {
        self.data
            .as_ref()?
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .find(|f| f.custom_id == custom_id)?
            .value
            .as_deref()
    }
}
