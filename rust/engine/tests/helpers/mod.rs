#![allow(dead_code)]

use chipbot_engine::game::{Game, TableConfig};
use chipbot_engine::player::Actor;
use chipbot_engine::GameOptions;

pub fn actors(n: usize) -> Vec<Actor> {
    (0..n).map(|i| Actor::new(i as u64 + 1, format!("p{i}"))).collect()
}

pub fn config(seed: u64) -> TableConfig {
    TableConfig {
        prefix: "!".to_string(),
        options: GameOptions {
            buy_in: 100,
            min_bet: 10,
        },
        seed: Some(seed),
    }
}

/// A game in `Waiting` with one player per stack, seated in order.
pub fn seated(stacks: &[u32]) -> (Game, Vec<Actor>) {
    let players = actors(stacks.len());
    let mut game = Game::new(config(42));
    game.new_game(&players[0], stacks[0]).expect("new game");
    for (actor, &stack) in players.iter().zip(stacks).skip(1) {
        game.join(actor, stack).expect("join");
    }
    (game, players)
}

/// A game in `Betting`, dealt by seat 0; seat 1 acts first.
pub fn betting(stacks: &[u32]) -> (Game, Vec<Actor>) {
    let (mut game, players) = seated(stacks);
    game.start(&players[0]).expect("start");
    game.deal(&players[0]).expect("deal");
    (game, players)
}

pub fn committed(game: &Game) -> u64 {
    game.players().iter().map(|p| u64::from(p.cur_bet())).sum()
}
