//! End-to-end flows through the dispatcher and a real SQLite file
//!
//! Run with: cargo test --test channel_flow_test

mod common;

use chanbot::telegram::menu;
use chanbot::telegram::{CallbackAction, Command, Screen};
use common::{TestEnvironment, ADMIN_ID, USER_ID};
use pretty_assertions::assert_eq;

#[test]
fn admin_adds_first_channel_through_menus() {
    let mut env = TestEnvironment::new().unwrap();
    assert!(env.ids().is_empty());

    let t = env.command(ADMIN_ID, Command::Start);
    assert!(t.menu.has_action(CallbackAction::OpenAdmin));

    env.press(ADMIN_ID, CallbackAction::OpenAdmin);
    assert_eq!(env.screen, Screen::Admin);

    env.press(ADMIN_ID, CallbackAction::AddChannel);
    assert_eq!(env.screen, Screen::AddChannel);

    // Empty thumbnail field is accepted and stored as absent
    env.type_text(ADMIN_ID, "News | https://t.me/news | ");
    assert_eq!(env.screen, Screen::Admin);

    let channels = env.store().list_channels().unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].id, 1);
    assert_eq!(channels[0].name, "News");
    assert_eq!(channels[0].link, "https://t.me/news");
    assert_eq!(channels[0].thumbnail, None);

    // Everyone sees it in the list
    let t = env.press(USER_ID, CallbackAction::ShowChannels);
    assert!(t.menu.text.contains("[News](https://t.me/news)"));
}

#[test]
fn admin_removes_middle_channel_and_order_is_kept() {
    let mut env = TestEnvironment::new().unwrap();
    for name in ["a", "b", "c"] {
        env.store().add_channel(name, &format!("https://t.me/{}", name), None).unwrap();
    }
    assert_eq!(env.ids(), vec![1, 2, 3]);

    env.command(ADMIN_ID, Command::Admin);
    env.press(ADMIN_ID, CallbackAction::RemoveChannel);
    assert_eq!(env.screen, Screen::RemoveChannel);

    env.type_text(ADMIN_ID, "2");
    assert_eq!(env.screen, Screen::Admin);
    assert_eq!(env.ids(), vec![1, 3]);
}

#[test]
fn non_admin_is_denied_and_nothing_changes() {
    let mut env = TestEnvironment::new().unwrap();
    env.store().add_channel("a", "https://t.me/a", None).unwrap();
    let before = env.store().list_channels().unwrap();

    let t = env.press(USER_ID, CallbackAction::OpenAdmin);
    assert_eq!(t.menu, menu::access_denied_menu(false));
    assert_eq!(env.screen, Screen::Main);
    assert_eq!(env.store().list_channels().unwrap(), before);

    // Stale admin buttons are checked again
    let t = env.press(USER_ID, CallbackAction::AddChannel);
    assert_eq!(t.menu, menu::access_denied_menu(false));
    assert_eq!(env.screen, Screen::Main);
}

#[test]
fn removing_missing_id_is_a_noop_that_still_reports_success() {
    let mut env = TestEnvironment::new().unwrap();
    env.store().add_channel("a", "https://t.me/a", None).unwrap();

    env.press(ADMIN_ID, CallbackAction::OpenAdmin);
    env.press(ADMIN_ID, CallbackAction::RemoveChannel);
    let t = env.type_text(ADMIN_ID, "41");

    assert_eq!(env.screen, Screen::Admin);
    assert!(t.menu.text.contains("removed"));
    assert_eq!(env.ids(), vec![1]);

    // Removing twice is the same as removing once
    assert!(env.store().remove_channel(1).unwrap());
    assert!(!env.store().remove_channel(1).unwrap());
    assert!(env.ids().is_empty());
}

#[test]
fn ids_are_never_reused_after_removal() {
    let env = TestEnvironment::new().unwrap();
    let first = env.store().add_channel("a", "https://t.me/a", None).unwrap();
    let second = env.store().add_channel("b", "https://t.me/b", None).unwrap();
    env.store().remove_channel(second).unwrap();
    let third = env.store().add_channel("c", "https://t.me/c", None).unwrap();

    assert!(first < second && second < third);
    assert_eq!(env.ids(), vec![first, third]);
}

#[test]
fn cancel_leaves_flow_without_writing() {
    let mut env = TestEnvironment::new().unwrap();
    env.press(ADMIN_ID, CallbackAction::OpenAdmin);
    env.press(ADMIN_ID, CallbackAction::AddChannel);

    env.command(ADMIN_ID, Command::Cancel);
    assert_eq!(env.screen, Screen::Admin);

    // Text after cancelling is no longer treated as channel input
    env.type_text(ADMIN_ID, "News | https://t.me/news");
    assert_eq!(env.screen, Screen::Main);
    assert!(env.ids().is_empty());
}

#[test]
fn channels_survive_reopening_the_database() {
    let env = TestEnvironment::new().unwrap();
    env.store().add_channel("a", "https://t.me/a", Some("https://example.com/a.png")).unwrap();

    let path = env.dir.path().join("channels.sqlite");
    let reopened = chanbot::storage::ChannelStore::open(path.to_str().unwrap()).unwrap();
    let channels = reopened.list_channels().unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].thumbnail.as_deref(), Some("https://example.com/a.png"));
}
