//! Dispatcher schema and handler chain builders
//!
//! Screens live in the dialogue storage keyed by chat id. Only private chats
//! get a dialogue, so a stored screen always belongs to exactly one caller.
//! Everything else goes through [`dispatch_shared`] without state.

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerError, ScreenDialogue, ScreenStorage};
use crate::telegram::bot::{caller_id, Command};
use crate::telegram::context::AppContext;
use crate::telegram::dispatcher::{dispatch, dispatch_shared, Inbound, Screen};
use crate::telegram::markdown::{edit_menu, send_menu};
use crate::telegram::menu::RenderedMenu;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same tree is used in production and in the handler tests.
/// The dispatcher must carry an `Arc<ScreenStorage>` dependency.
///
/// # Arguments
/// * `ctx` - Application context (channel store, administrator id)
pub fn schema(ctx: AppContext) -> UpdateHandler<HandlerError> {
    dptree::entry()
        // Commands in a private chat
        .branch(command_handler(ctx.clone()))
        // Commands in groups
        .branch(shared_command_handler(ctx.clone()))
        // Follow-up text for add/remove flows, and anything else typed in private chats
        .branch(message_handler(ctx.clone()))
        // Buttons on private chat messages
        .branch(callback_handler(ctx.clone()))
        // Buttons in groups and on inline messages
        .branch(shared_callback_handler(ctx))
}

fn is_private_callback(q: &CallbackQuery) -> bool {
    q.message.as_ref().is_some_and(|m| m.chat().is_private())
}

/// Handler for bot commands (/start, /channels, /admin, /cancel, /help)
fn command_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .enter_dialogue::<Message, ScreenStorage, Screen>()
        .filter_command::<Command>()
        .endpoint(
            move |bot: Bot, msg: Message, dialogue: ScreenDialogue, state: Screen, cmd: Command| {
                let ctx = ctx.clone();
                async move {
                    let caller = caller_id(msg.from.as_ref());
                    log::info!("🎯 Received command: {:?} from user {} (screen {:?})", cmd, caller, state);

                    let transition = dispatch(&ctx, caller, state, Inbound::Command(cmd));
                    dialogue.update(transition.next).await?;
                    send_menu(&bot, msg.chat.id, &transition.menu).await?;
                    Ok(())
                }
            },
        )
}

fn shared_command_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| !msg.chat.is_private())
        .filter_command::<Command>()
        .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
            let ctx = ctx.clone();
            async move {
                let caller = caller_id(msg.from.as_ref());
                log::info!("🎯 Received command: {:?} from user {} in chat {}", cmd, caller, msg.chat.id);

                let transition = dispatch_shared(&ctx, caller, Inbound::Command(cmd));
                send_menu(&bot, msg.chat.id, &transition.menu).await?;
                Ok(())
            }
        })
}

/// Handler for plain text in private chats
fn message_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .enter_dialogue::<Message, ScreenStorage, Screen>()
        .filter_map(|msg: Message| msg.text().map(str::to_owned))
        .endpoint(
            move |bot: Bot, msg: Message, dialogue: ScreenDialogue, state: Screen, text: String| {
                let ctx = ctx.clone();
                async move {
                    let caller = caller_id(msg.from.as_ref());
                    log::info!("Text from user {} on screen {:?}", caller, state);

                    let transition = dispatch(&ctx, caller, state, Inbound::Text(text));
                    dialogue.update(transition.next).await?;
                    send_menu(&bot, msg.chat.id, &transition.menu).await?;
                    Ok(())
                }
            },
        )
}

/// Handler for callback queries (inline keyboard buttons) in private chats
fn callback_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter(|q: CallbackQuery| is_private_callback(&q))
        .enter_dialogue::<CallbackQuery, ScreenStorage, Screen>()
        .endpoint(
            move |bot: Bot, q: CallbackQuery, dialogue: ScreenDialogue, state: Screen| {
                let ctx = ctx.clone();
                async move {
                    answer_callback(&bot, &q).await;

                    let Some(data) = q.data.clone() else {
                        return Ok(());
                    };
                    let caller = caller_id(Some(&q.from));
                    log::info!("Button {:?} from user {} (screen {:?})", data, caller, state);

                    let transition = dispatch(&ctx, caller, state, Inbound::Button(data));
                    dialogue.update(transition.next).await?;
                    reply_to_button(&bot, &q, &transition.menu).await?;
                    Ok(())
                }
            },
        )
}

fn shared_callback_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter(|q: CallbackQuery| !is_private_callback(&q))
        .endpoint(move |bot: Bot, q: CallbackQuery| {
            let ctx = ctx.clone();
            async move {
                answer_callback(&bot, &q).await;

                let Some(data) = q.data.clone() else {
                    return Ok(());
                };
                let caller = caller_id(Some(&q.from));
                log::info!("Button {:?} from user {} outside a private chat", data, caller);

                let transition = dispatch_shared(&ctx, caller, Inbound::Button(data));
                reply_to_button(&bot, &q, &transition.menu).await?;
                Ok(())
            }
        })
}

/// Clears the client spinner. Failure only affects the spinner.
async fn answer_callback(bot: &Bot, q: &CallbackQuery) {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query {:?}: {}", q.id, e);
    }
}

/// Edits the message the button sits on, or writes to the caller privately
/// when there is none (inline-mode messages).
async fn reply_to_button(bot: &Bot, q: &CallbackQuery, menu: &RenderedMenu) -> ResponseResult<()> {
    match q.message.as_ref() {
        Some(message) => edit_menu(bot, message.chat().id, message.id(), menu).await,
        None => {
            send_menu(bot, ChatId::from(q.from.id), menu).await?;
            Ok(())
        }
    }
}
