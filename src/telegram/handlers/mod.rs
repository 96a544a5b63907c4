//! Telegram bot handler tree configuration
//!
//! This module provides the dispatcher schema for the bot. Handlers only
//! translate updates into [`crate::telegram::dispatcher::Inbound`] events,
//! persist the resulting screen and deliver the rendered menu.

mod schema;
mod types;

pub use schema::schema;
pub use types::{HandlerError, ScreenDialogue, ScreenStorage};
