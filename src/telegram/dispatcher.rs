//! Update dispatcher: maps an inbound event plus the caller's current screen
//! to the next screen and the menu to send back.
//!
//! The transport glue in [`crate::telegram::handlers`] owns the dialogue
//! storage and delivery; everything here is synchronous and testable with a
//! plain [`AppContext`].

use crate::core::AppError;
use crate::telegram::bot::Command;
use crate::telegram::callbacks::CallbackAction;
use crate::telegram::context::AppContext;
use crate::telegram::input::{parse_channel_id, parse_channel_input};
use crate::telegram::menu::{self, RenderedMenu};

/// Where the caller currently is. `AddChannel` and `RemoveChannel` wait for
/// one text message; the rest are idle screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Main,
    List,
    Admin,
    AddChannel,
    RemoveChannel,
}

/// An event delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    /// Raw callback data of a pressed button
    Button(String),
    /// Plain text message
    Text(String),
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub menu: RenderedMenu,
    pub next: Screen,
}

impl Transition {
    fn to(next: Screen, menu: RenderedMenu) -> Self {
        Self { menu, next }
    }
}

/// Handles one inbound event for `caller_id` sitting on `state`.
///
/// Never fails: store errors become the failure notice and keep `state`,
/// access violations become the denial notice and keep `state`.
pub fn dispatch(ctx: &AppContext, caller_id: i64, state: Screen, event: Inbound) -> Transition {
    match event {
        Inbound::Command(Command::Start) => show_main(ctx, caller_id),
        Inbound::Command(Command::Help) => Transition::to(Screen::Main, menu::help_menu(ctx.is_admin(caller_id))),
        Inbound::Command(Command::Channels) => show_channels(ctx, state),
        Inbound::Command(Command::Admin) => open_admin(ctx, caller_id, state),
        Inbound::Command(Command::Cancel) => cancel_input(ctx, caller_id, state),
        Inbound::Button(data) => match CallbackAction::parse(&data) {
            Some(action) => press(ctx, caller_id, state, action),
            None => {
                log::warn!("Unknown callback data {:?} from user {}", data, caller_id);
                show_main(ctx, caller_id)
            }
        },
        Inbound::Text(text) => match state {
            Screen::AddChannel => commit_add(ctx, caller_id, &text),
            Screen::RemoveChannel => commit_remove(ctx, caller_id, &text),
            Screen::Main | Screen::List | Screen::Admin => show_main(ctx, caller_id),
        },
    }
}

/// Handles an event from a chat that is not a private chat with the caller
/// (groups, channels, inline messages).
///
/// Screens are kept per private chat, which is per caller. A shared chat has
/// no screen of its own: every event starts from MAIN, and the add/remove
/// flows are refused because their follow-up text would be read from the
/// whole chat.
pub fn dispatch_shared(ctx: &AppContext, caller_id: i64, event: Inbound) -> Transition {
    let transition = dispatch(ctx, caller_id, Screen::Main, event);
    match transition.next {
        Screen::AddChannel | Screen::RemoveChannel => {
            log::info!("User {} tried to edit channels outside a private chat", caller_id);
            Transition::to(Screen::Main, menu::private_chat_only_menu(ctx.is_admin(caller_id)))
        }
        _ => transition,
    }
}

fn press(ctx: &AppContext, caller_id: i64, state: Screen, action: CallbackAction) -> Transition {
    match action {
        CallbackAction::ShowChannels => show_channels(ctx, state),
        CallbackAction::OpenAdmin => open_admin(ctx, caller_id, state),
        CallbackAction::BackToMain => show_main(ctx, caller_id),
        CallbackAction::AddChannel => start_add(ctx, caller_id, state),
        CallbackAction::RemoveChannel => start_remove(ctx, caller_id, state),
        CallbackAction::CancelInput => cancel_input(ctx, caller_id, state),
    }
}

fn show_main(ctx: &AppContext, caller_id: i64) -> Transition {
    Transition::to(Screen::Main, menu::main_menu(ctx.is_admin(caller_id)))
}

/// Maps a failed step to the notice the caller sees, keeping `state`.
fn rejected(ctx: &AppContext, caller_id: i64, state: Screen, err: AppError) -> Transition {
    match err {
        AppError::AccessDenied => {
            log::warn!("User {} denied admin action on screen {:?}", caller_id, state);
            Transition::to(state, menu::access_denied_menu(ctx.is_admin(caller_id)))
        }
        other if other.is_store_unavailable() => {
            log::error!("Store unavailable for user {} on screen {:?}: {}", caller_id, state, other);
            Transition::to(state, menu::failure_menu())
        }
        other => {
            log::error!("User {} action on screen {:?} failed: {}", caller_id, state, other);
            Transition::to(state, menu::failure_menu())
        }
    }
}

fn show_channels(ctx: &AppContext, state: Screen) -> Transition {
    match ctx.store.list_channels() {
        Ok(channels) => Transition::to(Screen::List, menu::channel_list_menu(&channels)),
        Err(e) => {
            log::error!("Failed to list channels: {}", e);
            Transition::to(state, menu::failure_menu())
        }
    }
}

fn open_admin(ctx: &AppContext, caller_id: i64, state: Screen) -> Transition {
    if let Err(e) = ctx.require_admin(caller_id) {
        return rejected(ctx, caller_id, state, e);
    }
    log::info!("Admin {} opened the admin panel", caller_id);
    Transition::to(Screen::Admin, menu::admin_panel_menu())
}

fn start_add(ctx: &AppContext, caller_id: i64, state: Screen) -> Transition {
    if let Err(e) = ctx.require_admin(caller_id) {
        return rejected(ctx, caller_id, state, e);
    }
    Transition::to(Screen::AddChannel, menu::add_channel_prompt(None))
}

fn start_remove(ctx: &AppContext, caller_id: i64, state: Screen) -> Transition {
    if let Err(e) = ctx.require_admin(caller_id) {
        return rejected(ctx, caller_id, state, e);
    }
    match ctx.store.list_channels() {
        Ok(channels) => Transition::to(Screen::RemoveChannel, menu::remove_channel_prompt(&channels, None)),
        Err(e) => rejected(ctx, caller_id, state, e),
    }
}

fn cancel_input(ctx: &AppContext, caller_id: i64, state: Screen) -> Transition {
    let in_flow = matches!(state, Screen::AddChannel | Screen::RemoveChannel);
    if in_flow && ctx.is_admin(caller_id) {
        Transition::to(Screen::Admin, menu::admin_panel_menu().with_notice("Cancelled."))
    } else {
        show_main(ctx, caller_id)
    }
}

fn commit_add(ctx: &AppContext, caller_id: i64, text: &str) -> Transition {
    let state = Screen::AddChannel;
    if let Err(e) = ctx.require_admin(caller_id) {
        return rejected(ctx, caller_id, state, e);
    }

    let input = match parse_channel_input(text) {
        Ok(input) => input,
        Err(reason) => {
            log::warn!("Admin {} sent invalid channel input: {}", caller_id, reason);
            return Transition::to(state, menu::add_channel_prompt(Some(&reason)));
        }
    };

    match ctx
        .store
        .add_channel(&input.name, &input.link, input.thumbnail.as_deref())
    {
        Ok(id) => Transition::to(
            Screen::Admin,
            menu::admin_panel_menu().with_notice(&format!("✅ Channel \"{}\" added with id {}.", input.name, id)),
        ),
        Err(AppError::Validation(reason)) => Transition::to(state, menu::add_channel_prompt(Some(&reason))),
        Err(e) => rejected(ctx, caller_id, state, e),
    }
}

fn commit_remove(ctx: &AppContext, caller_id: i64, text: &str) -> Transition {
    let state = Screen::RemoveChannel;
    if let Err(e) = ctx.require_admin(caller_id) {
        return rejected(ctx, caller_id, state, e);
    }

    let id = match parse_channel_id(text) {
        Ok(id) => id,
        Err(reason) => {
            log::warn!("Admin {} sent invalid channel id: {}", caller_id, reason);
            let channels = ctx.store.list_channels().unwrap_or_else(|e| {
                log::error!("Failed to list channels for remove prompt: {}", e);
                Vec::new()
            });
            return Transition::to(state, menu::remove_channel_prompt(&channels, Some(&reason)));
        }
    };

    // Reported as removed whether or not the id existed
    match ctx.store.remove_channel(id) {
        Ok(_) => Transition::to(
            Screen::Admin,
            menu::admin_panel_menu().with_notice(&format!("🗑 Channel {} removed.", id)),
        ),
        Err(e) => rejected(ctx, caller_id, state, e),
    }
}
