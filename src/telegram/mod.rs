//! Telegram bot integration and handlers

pub mod bot;
pub mod callbacks;
pub mod context;
pub mod dispatcher;
pub mod handlers;
pub mod input;
pub mod markdown;
pub mod menu;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use callbacks::CallbackAction;
pub use context::AppContext;
pub use dispatcher::{dispatch, dispatch_shared, Inbound, Screen, Transition};
pub use handlers::{schema, HandlerError, ScreenDialogue, ScreenStorage};
pub use menu::RenderedMenu;
pub use teloxide::Bot;
