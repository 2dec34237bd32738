//! # DaySlot Gateway
//! HTTP surface of the bot: Discord POSTs signed interactions to
//! `/interactions`, handlers read and write the user's documents and answer
//! in the HTTP response. Follow-up messages go out through the REST client.

pub mod handlers;
pub mod render;
pub mod routes;
pub mod server;
pub mod sessions;

#[cfg(test)]
pub(crate) mod testing;

pub use server::{AppState, build_router, start};
