//! Interaction responses, message payloads, embeds and components.

use serde::Serialize;

/// Message flag: only the invoking user sees the reply.
pub const EPHEMERAL: u64 = 1 << 6;

/// Discord's limit on an embed field value.
pub const FIELD_VALUE_LIMIT: usize = 1024;
/// Discord's limit on an embed description.
pub const DESCRIPTION_LIMIT: usize = 4096;
/// Maximum options in one select menu.
pub const SELECT_OPTION_LIMIT: usize = 25;

const PONG: u8 = 1;
const CHANNEL_MESSAGE: u8 = 4;
const UPDATE_MESSAGE: u8 = 7;
const MODAL: u8 = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Message(MessagePayload),
    Modal(Modal),
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: PONG,
            data: None,
        }
    }

    /// Reply with a new message.
    pub fn message(payload: MessagePayload) -> Self {
        Self {
            kind: CHANNEL_MESSAGE,
            data: Some(ResponseData::Message(payload)),
        }
    }

    /// Plain text only the invoking user sees.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self::message(MessagePayload::text(text).ephemeral())
    }

    /// Edit the message the clicked component belongs to.
    pub fn update(payload: MessagePayload) -> Self {
        Self {
            kind: UPDATE_MESSAGE,
            data: Some(ResponseData::Message(payload)),
        }
    }

    pub fn modal(modal: Modal) -> Self {
        Self {
            kind: MODAL,
            data: Some(ResponseData::Modal(modal)),
        }
    }

    pub fn is_update(&self) -> bool {
        self.kind == UPDATE_MESSAGE
    }

    pub fn is_modal(&self) -> bool {
        self.kind == MODAL
    }

    /// The message payload, when this response carries one.
    pub fn payload(&self) -> Option<&MessagePayload> {
        match &self.data {
            Some(ResponseData::Message(p)) => Some(p),
            _ => None,
        }
    }

    /// Shortcut for the message text.
    pub fn content(&self) -> Option<&str> {
        self.payload()?.content.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
    /// `None` keeps a message's components on edit; `Some(vec![])` clears them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl MessagePayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: Some(vec![embed]),
            ..Default::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(EPHEMERAL);
        self
    }

    /// Attach rows of components.
    pub fn with_rows(mut self, rows: Vec<Component>) -> Self {
        self.components = Some(rows);
        self
    }

    /// Remove every component when used as an edit.
    pub fn clear_components(mut self) -> Self {
        self.components = Some(Vec::new());
        self
    }

    pub fn is_ephemeral(&self) -> bool {
        self.flags.is_some_and(|f| f & EPHEMERAL != 0)
    }
}

// ── Embeds ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(clip(text, DESCRIPTION_LIMIT));
        self
    }

    pub fn author(mut self, name: &str, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.to_string(),
            icon_url,
        });
        self
    }

    /// Add a field; the value is clipped to 1024 characters.
    pub fn field(mut self, name: &str, value: &str, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.to_string(),
            value: clip(value, FIELD_VALUE_LIMIT),
            inline,
        });
        self
    }

    /// RFC 3339 timestamp shown in the footer.
    pub fn timestamp(mut self, rfc3339: String) -> Self {
        self.timestamp = Some(rfc3339);
        self
    }
}

/// Clip to at most `limit` characters, marking the cut with `...`.
pub fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

// ── Components ────────────────────────────────────────────

const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
const STRING_SELECT: u8 = 3;
const TEXT_INPUT: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    ActionRow(ActionRow),
    Button(Button),
    Select(SelectMenu),
    TextInput(TextInput),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary = 1,
    Secondary = 2,
    Success = 3,
    Danger = 4,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    pub style: u8,
    pub label: String,
    pub custom_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectMenu {
    #[serde(rename = "type")]
    kind: u8,
    pub custom_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
    pub min_values: u8,
    pub max_values: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: clip(label, 100),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputStyle {
    Short = 1,
    Paragraph = 2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextInput {
    #[serde(rename = "type")]
    kind: u8,
    pub custom_id: String,
    pub style: u8,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
}

impl TextInput {
    pub fn new(custom_id: &str, label: &str, style: TextInputStyle) -> Self {
        Self {
            kind: TEXT_INPUT,
            custom_id: custom_id.to_string(),
            style: style as u8,
            label: label.to_string(),
            placeholder: None,
            value: None,
            required: true,
            min_length: None,
            max_length: None,
        }
    }

    pub fn placeholder(mut self, text: &str) -> Self {
        self.placeholder = Some(text.to_string());
        self
    }

    /// Pre-filled value; empty strings are left unset.
    pub fn value(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.value = Some(text.to_string());
        }
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn length(mut self, min: u16, max: u16) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }
}

impl Component {
    pub fn row(components: Vec<Component>) -> Self {
        Self::ActionRow(ActionRow {
            kind: ACTION_ROW,
            components,
        })
    }

    pub fn button(style: ButtonStyle, label: &str, custom_id: &str) -> Self {
        Self::Button(Button {
            kind: BUTTON,
            style: style as u8,
            label: label.to_string(),
            custom_id: custom_id.to_string(),
        })
    }

    /// Single-choice select menu; options beyond 25 are dropped.
    pub fn select(custom_id: &str, placeholder: &str, mut options: Vec<SelectOption>) -> Self {
        options.truncate(SELECT_OPTION_LIMIT);
        Self::Select(SelectMenu {
            kind: STRING_SELECT,
            custom_id: custom_id.to_string(),
            placeholder: Some(placeholder.to_string()),
            options,
            min_values: 1,
            max_values: 1,
        })
    }
}

// ── Modals ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modal {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<Component>,
}

impl Modal {
    pub fn new(custom_id: &str, title: &str) -> Self {
        Self {
            custom_id: custom_id.to_string(),
            title: title.to_string(),
            components: Vec::new(),
        }
    }

    /// Add a text input on its own row.
    pub fn input(mut self, input: TextInput) -> Self {
        self.components
            .push(Component::row(vec![Component::TextInput(input)]));
        self
    }

    pub fn inputs(&self) -> impl Iterator<Item = &TextInput> {
        self.components
            .iter()
            .filter_map(|row| match row {
                Component::ActionRow(r) => Some(r.components.iter()),
                _ => None,
            })
            .flatten()
            .filter_map(|c| match c {
                Component::TextInput(t) => Some(t),
                _ => None,
            })
    }
}
