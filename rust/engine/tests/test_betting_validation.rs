mod helpers;

use chipbot_engine::errors::{ErrorKind, GameError, Move};
use chipbot_engine::game::GameState;
use helpers::{betting, committed};

#[test]
fn raise_over_the_stack_reports_the_maximum() {
    // p1 holds 100 and faces the opening bet of 10
    let (mut game, players) = betting(&[300, 100]);
    let a = &players[1];
    assert_eq!(game.current_player().unwrap().id(), a.id);

    let before = game.clone();
    let err = game.raise_bet(a, 200).unwrap_err();
    assert_eq!(
        err,
        GameError::RaiseTooLarge {
            amount: 200,
            max_raise: 90
        }
    );
    assert!(err.to_string().contains("maximum raise is 90"));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(game, before);

    game.raise_bet(a, 90).unwrap();
    assert_eq!(game.cur_bet(), 100);
    let raiser = game.player(a.id).unwrap();
    assert!(raiser.all_in());
    assert_eq!(raiser.cur_bet(), 100);
    assert_eq!(game.pot(), 100);
    assert_eq!(game.current_player().unwrap().name(), "p0");
}

#[test]
fn raise_succeeds_exactly_within_bounds() {
    let cases: [(i64, bool); 6] = [
        (-5, false),
        (0, false),
        (1, true),
        (140, true),
        (190, true),
        (191, false),
    ];
    for (amount, legal) in cases {
        let (mut game, players) = betting(&[200, 200, 200]);
        let before = game.clone();
        let stack = game.current_player().unwrap().max_bet();
        let result = game.raise_bet(&players[1], amount);
        assert_eq!(result.is_ok(), legal, "raise by {amount}");
        if legal {
            assert_eq!(game.cur_bet(), 10 + amount as u32);
            assert_eq!(game.pot(), committed(&game));
        } else {
            assert_eq!(game, before);
            assert_eq!(game.player(players[1].id).unwrap().max_bet(), stack);
        }
    }
}

#[test]
fn non_positive_raise_is_rejected() {
    let (mut game, players) = betting(&[200, 200]);
    assert_eq!(
        game.raise_bet(&players[1], -20).unwrap_err(),
        GameError::RaiseNotPositive {
            amount: -20,
            current_bet: 10
        }
    );
}

#[test]
fn no_raise_possible_once_the_table_bet_reaches_the_stack() {
    let (mut game, players) = betting(&[500, 200, 100]);
    game.raise_bet(&players[1], 140).unwrap();
    // p2 holds exactly 100, below the table bet of 150
    assert_eq!(
        game.raise_bet(&players[2], 1).unwrap_err(),
        GameError::CannotRaise { current_bet: 150 }
    );
}

#[test]
fn check_requires_a_matched_bet() {
    let (mut game, players) = betting(&[200, 200]);
    let err = game.check(&players[1]).unwrap_err();
    assert_eq!(
        err,
        GameError::MustCall {
            name: "p1".into(),
            owed: 10
        }
    );
    game.call(&players[1]).unwrap();
    game.raise_bet(&players[0], 20).unwrap();
    game.call(&players[1]).unwrap();
    assert_eq!(game.state(), GameState::NoGame, "all bets matched after a full pass");
}

#[test]
fn calling_around_the_table_closes_the_round() {
    let (mut game, players) = betting(&[200, 200, 200]);
    game.call(&players[1]).unwrap();
    game.call(&players[2]).unwrap();
    assert_eq!(game.pot(), 20);
    let reply = game.call(&players[0]).unwrap();
    let settlement = reply.settlement.expect("everyone matched");
    assert_eq!(settlement.pot, 30);
    assert_eq!(game.state(), GameState::NoGame);
}

#[test]
fn only_the_current_player_may_act() {
    let (mut game, players) = betting(&[200, 200, 200]);
    let before = game.clone();
    let err = game.call(&players[2]).unwrap_err();
    assert_eq!(
        err,
        GameError::NotYourTurn {
            name: "p2".into(),
            action: Move::Call,
            current: "p1".into()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(game.fold(&players[0]).is_err());
    assert!(game.all_in(&players[0]).is_err());
    assert_eq!(game, before);
}

#[test]
fn outsiders_are_told_they_are_not_playing() {
    let (mut game, _) = betting(&[200, 200]);
    let outsider = chipbot_engine::Actor::new(77, "zed");
    assert_eq!(
        game.check(&outsider).unwrap_err(),
        GameError::NotPlaying {
            name: "zed".into(),
            action: Move::Check
        }
    );
}

#[test]
fn call_short_of_the_bet_goes_all_in() {
    let (mut game, players) = betting(&[500, 300, 120]);
    game.raise_bet(&players[1], 190).unwrap();
    let reply = game.call(&players[2]).unwrap();
    let short = game.player(players[2].id).unwrap();
    assert!(short.all_in());
    assert_eq!(short.cur_bet(), 120);
    assert!(reply.lines[0].contains("is all in"));
    assert_eq!(game.pot(), 320);
    assert_eq!(game.current_player().unwrap().name(), "p0");
}

#[test]
fn all_in_above_the_table_bet_lifts_it() {
    let (mut game, players) = betting(&[400, 250, 400]);
    game.all_in(&players[1]).unwrap();
    assert_eq!(game.cur_bet(), 250);
    assert_eq!(game.pot(), 250);
    game.call(&players[2]).unwrap();
    game.call(&players[0]).unwrap();
    assert_eq!(game.state(), GameState::NoGame);
}

#[test]
fn all_in_players_are_exempt_from_matching() {
    let (mut game, players) = betting(&[400, 400, 150]);
    game.raise_bet(&players[1], 290).unwrap();
    game.all_in(&players[2]).unwrap();
    assert_eq!(game.cur_bet(), 300);
    assert_eq!(game.state(), GameState::Betting);
    // p2 only put in 150, yet the round closes once p0 matches
    let reply = game.call(&players[0]).unwrap();
    let settlement = reply.settlement.expect("round over");
    assert_eq!(settlement.pot, 750);
    assert_eq!(settlement.board.len(), 5);
}

#[test]
fn actions_before_the_deal_are_state_guarded() {
    let (mut game, players) = helpers::seated(&[200, 200]);
    assert_eq!(
        game.call(&players[0]).unwrap_err(),
        GameError::NotStarted(Move::Call)
    );
    game.start(&players[0]).unwrap();
    assert_eq!(
        game.raise_bet(&players[0], 5).unwrap_err(),
        GameError::NotDealt(Move::Raise)
    );
    assert_eq!(
        game.raise_bet(&players[0], 5).unwrap_err().kind(),
        ErrorKind::StateGuard
    );
}
