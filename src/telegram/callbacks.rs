//! Callback tokens carried by inline keyboard buttons.
//!
//! Format: `<screen>:<action>`. Tokens are stateless, so a button pressed on
//! an old message is still safe to process against the current state.

/// Action bound to an inline button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Main menu: show the channel list
    ShowChannels,
    /// Main menu: open the admin panel
    OpenAdmin,
    /// Any screen: return to the main menu
    BackToMain,
    /// Admin panel: start the add-channel flow
    AddChannel,
    /// Admin panel: start the remove-channel flow
    RemoveChannel,
    /// Add/remove prompt: abort and return to the admin panel
    CancelInput,
}

impl CallbackAction {
    pub const ALL: [CallbackAction; 6] = [
        CallbackAction::ShowChannels,
        CallbackAction::OpenAdmin,
        CallbackAction::BackToMain,
        CallbackAction::AddChannel,
        CallbackAction::RemoveChannel,
        CallbackAction::CancelInput,
    ];

    pub fn token(self) -> &'static str {
        match self {
            CallbackAction::ShowChannels => "main:channels",
            CallbackAction::OpenAdmin => "main:admin",
            CallbackAction::BackToMain => "main:back",
            CallbackAction::AddChannel => "admin:add",
            CallbackAction::RemoveChannel => "admin:remove",
            CallbackAction::CancelInput => "admin:cancel",
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.token() == data.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_parses_back() {
        for action in CallbackAction::ALL {
            assert_eq!(CallbackAction::parse(action.token()), Some(action));
        }
    }

    #[test]
    fn test_tokens_fit_telegram_limit() {
        // Telegram rejects callback_data longer than 64 bytes
        for action in CallbackAction::ALL {
            assert!(action.token().len() <= 64);
        }
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(CallbackAction::parse("main:settings"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }
}
