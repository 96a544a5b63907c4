//! Handler types shared by the dispatcher schema

use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::telegram::dispatcher::Screen;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Per-chat screen storage. Lives for the process lifetime only.
pub type ScreenStorage = InMemStorage<Screen>;

/// Dialogue handle injected into handlers by `enter_dialogue`
pub type ScreenDialogue = Dialogue<Screen, ScreenStorage>;
