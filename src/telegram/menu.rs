//! Menu rendering.
//!
//! Every function here is pure: it takes the caller's role and/or the current
//! channel list and returns a [`RenderedMenu`]. Gating is the dispatcher's job;
//! the renderer draws whatever it is asked to.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use crate::core::utils::{escape_markdown_v2, markdown_v2_link};
use crate::storage::Channel;
use crate::telegram::callbacks::CallbackAction;

pub const MAIN_TITLE: &str = "📋 Channel directory";
pub const LIST_TITLE: &str = "📢 Channels";
pub const ADMIN_TITLE: &str = "🛠 Admin panel";
pub const NO_CHANNELS: &str = "No channels available yet.";
pub const ACCESS_DENIED: &str = "⛔ Sorry, the admin panel is only available to the administrator.";
pub const FAILURE: &str = "⚠️ Something went wrong, please try again later.";
pub const PRIVATE_CHAT_ONLY: &str = "🔒 Channels can only be added or removed in a private chat with the bot.";

pub const BUTTON_CHANNELS: &str = "📢 Show channels";
pub const BUTTON_ADMIN: &str = "🛠 Admin panel";
pub const BUTTON_ADD: &str = "➕ Add channel";
pub const BUTTON_REMOVE: &str = "➖ Remove channel";
pub const BUTTON_BACK: &str = "⬅️ Back";
pub const BUTTON_CANCEL: &str = "✖️ Cancel";

const HELP_TEXT: &str = "/start - main menu\n\
/channels - list channels\n\
/admin - admin panel (administrator only)\n\
/cancel - abort adding or removing a channel\n\
/help - this message";

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    Callback(CallbackAction),
    /// Opens a link in the client instead of calling back
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: ButtonAction,
}

impl MenuButton {
    pub fn callback(label: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(action),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    fn to_inline(&self) -> Option<InlineKeyboardButton> {
        match &self.action {
            ButtonAction::Callback(action) => Some(InlineKeyboardButton::callback(
                self.label.clone(),
                action.token(),
            )),
            ButtonAction::Url(raw) => match Url::parse(raw) {
                Ok(url) => Some(InlineKeyboardButton::url(self.label.clone(), url)),
                Err(e) => {
                    log::warn!("Skipping URL button {:?}: {}", raw, e);
                    None
                }
            },
        }
    }
}

/// A message text (MarkdownV2, already escaped) plus rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMenu {
    pub text: String,
    pub rows: Vec<Vec<MenuButton>>,
}

impl RenderedMenu {
    fn new(text: String, rows: Vec<Vec<MenuButton>>) -> Self {
        Self { text, rows }
    }

    /// Prepends a plain-text notice line above the menu text.
    pub fn with_notice(mut self, notice: &str) -> Self {
        self.text = format!("{}\n\n{}", escape_markdown_v2(notice), self.text);
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &MenuButton> {
        self.rows.iter().flatten()
    }

    pub fn has_action(&self, action: CallbackAction) -> bool {
        self.buttons().any(|b| b.action == ButtonAction::Callback(action))
    }

    pub fn keyboard(&self) -> InlineKeyboardMarkup {
        let rows: Vec<Vec<InlineKeyboardButton>> = self
            .rows
            .iter()
            .map(|row| row.iter().filter_map(MenuButton::to_inline).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        InlineKeyboardMarkup::new(rows)
    }
}

fn back_row() -> Vec<MenuButton> {
    vec![MenuButton::callback(BUTTON_BACK, CallbackAction::BackToMain)]
}

/// Main menu: "show channels" always, "admin panel" only for the administrator.
pub fn main_menu(is_admin: bool) -> RenderedMenu {
    let mut rows = vec![vec![MenuButton::callback(BUTTON_CHANNELS, CallbackAction::ShowChannels)]];
    if is_admin {
        rows.push(vec![MenuButton::callback(BUTTON_ADMIN, CallbackAction::OpenAdmin)]);
    }
    RenderedMenu::new(format!("*{}*", escape_markdown_v2(MAIN_TITLE)), rows)
}

/// Telegram allows 100 inline buttons per message; stay well below with room for the back row
pub const MAX_CHANNEL_BUTTONS: usize = 50;

/// Telegram caps message text at 4096 characters; leave room for the title and footer
const MAX_LIST_TEXT_CHARS: usize = 3800;

/// Appends `lines` while the text stays under [`MAX_LIST_TEXT_CHARS`], then a
/// footer counting the lines that did not fit. Returns how many were appended.
fn push_lines_capped(text: &mut String, lines: Vec<String>) -> usize {
    let total = lines.len();
    let mut text_chars = text.chars().count();
    let mut shown = 0;
    for line in lines {
        let line_chars = line.chars().count();
        if text_chars + line_chars > MAX_LIST_TEXT_CHARS {
            break;
        }
        text.push_str(&line);
        text_chars += line_chars;
        shown += 1;
    }
    if shown < total {
        text.push_str("\n\n");
        text.push_str(&escape_markdown_v2(&format!("…and {} more", total - shown)));
    }
    shown
}

/// Numbered list of clickable channel names, or the "no channels" message.
///
/// Long directories are cut to what fits in one message; URL buttons are
/// capped at [`MAX_CHANNEL_BUTTONS`].
pub fn channel_list_menu(channels: &[Channel]) -> RenderedMenu {
    if channels.is_empty() {
        return RenderedMenu::new(escape_markdown_v2(NO_CHANNELS), vec![back_row()]);
    }

    let mut text = format!("*{}*\n", escape_markdown_v2(LIST_TITLE));
    let lines = channels
        .iter()
        .enumerate()
        .map(|(position, channel)| {
            format!(
                "\n{}\\. {}",
                position + 1,
                markdown_v2_link(&channel.name, &channel.link)
            )
        })
        .collect();
    let shown = push_lines_capped(&mut text, lines);

    let mut rows: Vec<Vec<MenuButton>> = channels[..shown]
        .iter()
        .take(MAX_CHANNEL_BUTTONS)
        .map(|channel| vec![MenuButton::url(channel.name.clone(), channel.link.clone())])
        .collect();
    rows.push(back_row());

    RenderedMenu::new(text, rows)
}

/// Admin actions. Rendered for whoever asks; callers must gate it.
pub fn admin_panel_menu() -> RenderedMenu {
    RenderedMenu::new(
        format!("*{}*", escape_markdown_v2(ADMIN_TITLE)),
        vec![
            vec![
                MenuButton::callback(BUTTON_ADD, CallbackAction::AddChannel),
                MenuButton::callback(BUTTON_REMOVE, CallbackAction::RemoveChannel),
            ],
            back_row(),
        ],
    )
}

/// Prompt for `name | link | thumbnail`, with the previous rejection reason if any.
pub fn add_channel_prompt(rejection: Option<&str>) -> RenderedMenu {
    let mut text = String::new();
    if let Some(reason) = rejection {
        text.push_str(&escape_markdown_v2(&format!("❌ Invalid input: {}.", reason)));
        text.push_str("\n\n");
    }
    text.push_str(&escape_markdown_v2(
        "Send the channel as one message:\nname | link | thumbnail (optional)",
    ));
    text.push_str("\n\n");
    text.push_str(&format!(
        "_{}_",
        escape_markdown_v2("Example: News | https://t.me/news")
    ));

    RenderedMenu::new(
        text,
        vec![vec![MenuButton::callback(BUTTON_CANCEL, CallbackAction::CancelInput)]],
    )
}

/// Prompt for the id to remove, listing current channels as `id — name`.
pub fn remove_channel_prompt(channels: &[Channel], rejection: Option<&str>) -> RenderedMenu {
    let mut text = String::new();
    if let Some(reason) = rejection {
        text.push_str(&escape_markdown_v2(&format!("❌ Invalid input: {}.", reason)));
        text.push_str("\n\n");
    }
    text.push_str(&escape_markdown_v2("Send the id of the channel to remove."));
    if channels.is_empty() {
        text.push_str("\n\n");
        text.push_str(&escape_markdown_v2(NO_CHANNELS));
    } else {
        text.push('\n');
        let lines = channels
            .iter()
            .map(|channel| format!("\n`{}` — {}", channel.id, escape_markdown_v2(&channel.name)))
            .collect();
        push_lines_capped(&mut text, lines);
    }

    RenderedMenu::new(
        text,
        vec![vec![MenuButton::callback(BUTTON_CANCEL, CallbackAction::CancelInput)]],
    )
}

/// Main menu with the access-denied notice in place of the panel.
pub fn access_denied_menu(is_admin: bool) -> RenderedMenu {
    main_menu(is_admin).with_notice(ACCESS_DENIED)
}

/// Main menu explaining that editing needs a private chat.
pub fn private_chat_only_menu(is_admin: bool) -> RenderedMenu {
    main_menu(is_admin).with_notice(PRIVATE_CHAT_ONLY)
}

/// Opaque failure notice for store errors.
pub fn failure_menu() -> RenderedMenu {
    RenderedMenu::new(escape_markdown_v2(FAILURE), vec![back_row()])
}

pub fn help_menu(is_admin: bool) -> RenderedMenu {
    main_menu(is_admin).with_notice(HELP_TEXT)
}
