mod helpers;

use chipbot::dispatcher::FAILURE_LINE;
use chipbot::logging::TestLogSubscriber;
use chipbot_engine::GameState;
use helpers::*;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[test]
fn a_deal_that_cannot_be_drawn_is_undone() {
    let assets = SharedAssets::default();
    let mut bot = bot(2, 500, assets.clone());
    started(&mut bot, 2);
    let before = bot.tables().snapshot(TABLE);

    let out = say(&mut bot, 1, "!deal");
    assert_eq!(channel_lines(&out), vec![FAILURE_LINE]);
    assert_eq!(out.len(), 1, "no hand may leak out of a failed deal");
    assert_eq!(bot.tables().snapshot(TABLE), before);
    assert_eq!(bot.tables().get(TABLE).unwrap().state(), GameState::NoHands);

    assets.restock();
    let out = say(&mut bot, 1, "!deal");
    assert_eq!(out.len(), 3);
    assert_eq!(bot.tables().get(TABLE).unwrap().state(), GameState::Betting);
}

#[test]
fn a_showdown_that_cannot_be_drawn_is_undone() {
    let assets = SharedAssets::full();
    let mut bot = bot(2, 500, assets.clone());
    started(&mut bot, 2);
    say(&mut bot, 1, "!deal");
    say(&mut bot, 2, "!call");
    let before = bot.tables().snapshot(TABLE);

    assets.clear();
    let out = say(&mut bot, 1, "!call");
    assert_eq!(channel_lines(&out), vec![FAILURE_LINE]);
    let game = bot.tables().get(TABLE).expect("game restored");
    assert_eq!(game.state(), GameState::Betting);
    assert_eq!(game.pot(), 10);
    assert_eq!(bot.tables().snapshot(TABLE), before);

    assets.restock();
    let out = say(&mut bot, 1, "!call");
    assert!(out[0].image.is_some());
    assert!(bot.tables().get(TABLE).is_none());
}

#[test]
fn store_outages_fail_without_touching_the_game() {
    let mut bot = bot(2, 500, SharedAssets::full());
    say(&mut bot, 1, "!newgame");
    let before = bot.tables().snapshot(TABLE);

    bot.store().set_offline(true);
    let out = say(&mut bot, 2, "!join");
    assert_eq!(channel_lines(&out), vec![FAILURE_LINE]);
    assert_eq!(bot.tables().snapshot(TABLE), before);

    bot.store().set_offline(false);
    let out = say(&mut bot, 2, "!join");
    assert_eq!(channel_lines(&out)[0], "bo has joined the game!");
}

#[test]
fn failures_are_logged_as_errors() {
    let subscriber = TestLogSubscriber::new();
    let registry = Registry::default().with(subscriber.clone().into_layer());

    tracing::subscriber::with_default(registry, || {
        let mut bot = bot(2, 500, SharedAssets::default());
        started(&mut bot, 2);
        say(&mut bot, 1, "!deal");
    });

    let errors: Vec<_> = subscriber
        .entries()
        .into_iter()
        .filter(|e| e.level == Level::ERROR)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "command failed, game restored");
    assert!(errors[0].field("error").unwrap().starts_with("no card image for"));
}
