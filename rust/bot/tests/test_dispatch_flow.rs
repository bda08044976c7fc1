mod helpers;

use chipbot::Target;
use chipbot_engine::{GameState, PlayerId};
use helpers::*;

#[test]
fn dealing_sends_each_player_a_picture_of_their_hand() {
    let mut bot = bot(3, 500, SharedAssets::full());
    started(&mut bot, 3);

    let out = say(&mut bot, 1, "!deal");
    let lines = channel_lines(&out);
    assert_eq!(lines[0], "The hands have been dealt!");
    assert_eq!(
        lines.last().unwrap(),
        "It's bo's turn. The current bet is 10; they have put in 0 of 500."
    );
    assert!(out[0].image.is_none());

    let direct: Vec<_> = out
        .iter()
        .filter_map(|o| match o.target {
            Target::Direct(id) => Some((id, o)),
            Target::Channel(_) => None,
        })
        .collect();
    assert_eq!(
        direct.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        vec![PlayerId(1), PlayerId(2), PlayerId(3)]
    );
    for (_, msg) in direct {
        assert_eq!(msg.lines, vec!["Your hand:"]);
        let png = msg.image.as_ref().expect("hand image");
        assert_eq!(image_size(png), (2 * CARD_W, CARD_H));
    }
}

#[test]
fn a_called_hand_ends_with_a_picture_of_the_board() {
    let mut bot = bot(2, 500, SharedAssets::full());
    started(&mut bot, 2);
    say(&mut bot, 1, "!deal");

    let out = say(&mut bot, 2, "!call");
    assert_eq!(out[0].lines[0], "bo calls 10.");
    assert!(out[0].image.is_none());

    let out = say(&mut bot, 1, "!call");
    assert_eq!(out.len(), 1);
    let lines = &out[0].lines;
    assert!(lines.contains(&"The betting is over. Showdown!".to_string()));
    assert!(lines.iter().all(|l| !l.starts_with('-')));
    assert_eq!(
        lines.last().unwrap(),
        "The game is over. Message !newgame to play again."
    );
    let board = out[0].image.as_ref().expect("board image");
    assert_eq!(image_size(board), (5 * CARD_W, CARD_H));
    assert!(bot.tables().get(TABLE).is_none());
}

#[test]
fn rejections_are_answered_in_the_channel() {
    let mut bot = bot(2, 500, SharedAssets::full());
    let out = say(&mut bot, 1, "!deal");
    assert_eq!(
        channel_lines(&out),
        vec![
            "No game has been started for you to deal.",
            "Message !newgame to start one."
        ]
    );

    started(&mut bot, 2);
    let out = say(&mut bot, 2, "!deal");
    assert_eq!(
        channel_lines(&out),
        vec!["You aren't the dealer, bo.", "Please wait for ann to !deal."]
    );
    assert_eq!(bot.tables().get(TABLE).unwrap().state(), GameState::NoHands);
}

#[test]
fn unknown_commands_point_at_help() {
    let mut bot = bot(1, 500, SharedAssets::full());
    let out = say(&mut bot, 1, "!shuffle twice");
    assert_eq!(
        channel_lines(&out),
        vec![
            "!shuffle twice is not a valid command.",
            "Message !help to see the list of commands."
        ]
    );
    let help = channel_lines(&say(&mut bot, 1, "!help"));
    assert!(help[0].starts_with("```!all-in"));
}

#[test]
fn registration_is_idempotent_and_grants_a_balance() {
    let mut bot = bot(0, 0, SharedAssets::full());
    let out = say(&mut bot, 3, "!balance");
    assert_eq!(
        channel_lines(&out),
        vec!["cy, you have not registered yet!", "Message !reg to register."]
    );

    let out = say(&mut bot, 3, "!reg");
    assert_eq!(
        channel_lines(&out),
        vec!["Thank you for registering, cy! You start with 1000 chips."]
    );
    let out = say(&mut bot, 3, "!reg");
    assert_eq!(channel_lines(&out), vec!["cy, you have already registered!"]);
    let out = say(&mut bot, 3, "!balance");
    assert_eq!(channel_lines(&out), vec!["cy has 1000 chips."]);
}

#[test]
fn balances_below_the_buy_in_cannot_sit_down() {
    let mut bot = bot(1, 50, SharedAssets::full());
    let out = say(&mut bot, 1, "!newgame");
    assert_eq!(
        channel_lines(&out),
        vec!["ann needs at least 100 chips to buy in, but only has 50."]
    );
    say(&mut bot, 1, "!set buy_in 50");
    let out = say(&mut bot, 1, "!newgame");
    assert_eq!(channel_lines(&out)[0], "A new game has been started by ann!");
}

#[test]
fn options_can_be_listed_and_changed() {
    let mut bot = bot(1, 500, SharedAssets::full());
    let out = say(&mut bot, 1, "!set min_bet 25");
    assert_eq!(channel_lines(&out), vec!["The min_bet is now set to 25."]);

    let out = say(&mut bot, 1, "!set min_bet -4");
    assert_eq!(channel_lines(&out), vec!["Cannot set min_bet to a negative value!"]);

    let listing = channel_lines(&say(&mut bot, 1, "!options")).join("\n");
    assert!(listing.contains("min_bet  25"));
    assert!(listing.contains("buy_in   100"));
}

#[test]
fn dealer_reactions_query_the_account() {
    let mut bot = bot(2, 700, SharedAssets::full());
    let out = say(&mut bot, 1, "!dealer");
    assert_eq!(out[0].reactions, vec!["\u{27A1}", "\u{1F4B5}", "\u{2139}"]);

    let out = react(&mut bot, 2, "\u{1F4B5}");
    assert_eq!(channel_lines(&out), vec!["bo has 700 chips."]);
    let out = react(&mut bot, 2, "\u{2139}");
    assert_eq!(
        channel_lines(&out),
        vec!["bo is level 1 with 0 experience and 0 wins."]
    );
    assert!(react(&mut bot, 2, "\u{27A1}").is_empty());
}
