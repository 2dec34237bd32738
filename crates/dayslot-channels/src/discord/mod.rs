//! Discord HTTP interactions + REST API v10.

pub mod commands;
pub mod model;
pub mod response;
pub mod rest;
pub mod verify;

pub use model::{Interaction, InteractionType, User};
pub use response::{
    ButtonStyle, Component, Embed, InteractionResponse, MessagePayload, Modal, SelectOption,
    TextInput, TextInputStyle,
};
