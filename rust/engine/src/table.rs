use std::collections::HashMap;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::game::{Game, GameState, Reply, TableConfig};
use crate::options::{GameOptions, OptionKey};
use crate::player::Actor;

/// Identity of the chat channel a game lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Live games by channel, plus each channel's table options.
///
/// A game is only ever created through [`Tables::new_game`] and is dropped
/// as soon as it returns to [`GameState::NoGame`]. Commands for a channel
/// without a game run against an idle placeholder that is never stored, so
/// they get the same state-specific rejections a stopped game would give.
///
/// Each new game's deck seed is drawn from one RNG seeded with the
/// configured seed, so a fixed seed replays the same sequence of games.
#[derive(Debug)]
pub struct Tables {
    defaults: TableConfig,
    seeds: ChaCha20Rng,
    games: HashMap<ChannelId, Game>,
    options: HashMap<ChannelId, GameOptions>,
}

impl Tables {
    pub fn new(defaults: TableConfig) -> Self {
        let seed = defaults.seed.unwrap_or_else(rand::random);
        Self {
            seeds: ChaCha20Rng::seed_from_u64(seed),
            defaults,
            games: HashMap::new(),
            options: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.defaults.prefix
    }

    pub fn get(&self, channel: ChannelId) -> Option<&Game> {
        self.games.get(&channel)
    }

    pub fn active_channels(&self) -> Vec<ChannelId> {
        let mut channels: Vec<ChannelId> = self.games.keys().copied().collect();
        channels.sort();
        channels
    }

    /// Options new games in `channel` start with.
    pub fn options(&self, channel: ChannelId) -> GameOptions {
        self.options
            .get(&channel)
            .copied()
            .unwrap_or(self.defaults.options)
    }

    pub fn new_game(
        &mut self,
        channel: ChannelId,
        actor: &Actor,
        stack: u32,
    ) -> Result<Reply, GameError> {
        if let Some(game) = self.games.get(&channel) {
            if game.state() != GameState::NoGame {
                return Err(GameError::GameInProgress {
                    joinable: game.state() == GameState::Waiting,
                });
            }
        }
        let config = TableConfig {
            seed: Some(self.seeds.random()),
            ..self.config_for(channel)
        };
        let mut game = Game::new(config);
        let reply = game.new_game(actor, stack)?;
        tracing::debug!(%channel, "game registered");
        self.games.insert(channel, game);
        Ok(reply)
    }

    /// Runs `f` against the channel's game and drops the game if `f` ended it.
    pub fn with_game<F>(&mut self, channel: ChannelId, f: F) -> Result<Reply, GameError>
    where
        F: FnOnce(&mut Game) -> Result<Reply, GameError>,
    {
        if let Some(game) = self.games.get_mut(&channel) {
            let reply = f(game);
            if game.state() == GameState::NoGame {
                self.games.remove(&channel);
                tracing::debug!(%channel, "game closed");
            }
            return reply;
        }
        let mut idle = Game::new(self.config_for(channel));
        let reply = f(&mut idle);
        debug_assert_eq!(idle.state(), GameState::NoGame);
        reply
    }

    /// Updates the channel's options and the live game, if any.
    pub fn set_option(
        &mut self,
        channel: ChannelId,
        key: OptionKey,
        value: i64,
    ) -> Result<Reply, GameError> {
        let mut options = self.options(channel);
        options.set(key, value)?;
        let reply = match self.games.get_mut(&channel) {
            Some(game) => game.set_option(key, value)?,
            None => Reply::new(vec![format!("The {key} is now set to {value}.")]),
        };
        self.options.insert(channel, options);
        Ok(reply)
    }

    pub fn show_options(&self, channel: ChannelId) -> Reply {
        match self.games.get(&channel) {
            Some(game) => game.show_options(),
            None => Reply::new(vec![self.options(channel).describe()]),
        }
    }

    /// Copy of the channel's game, used to undo a command whose output could
    /// not be delivered.
    pub fn snapshot(&self, channel: ChannelId) -> Option<Game> {
        self.games.get(&channel).cloned()
    }

    pub fn restore(&mut self, channel: ChannelId, snapshot: Option<Game>) {
        match snapshot {
            Some(game) => {
                self.games.insert(channel, game);
            }
            None => {
                self.games.remove(&channel);
            }
        }
    }

    fn config_for(&self, channel: ChannelId) -> TableConfig {
        TableConfig {
            options: self.options(channel),
            ..self.defaults.clone()
        }
    }
}
