//! # chipbot-engine: per-channel poker tables
//!
//! The rules side of a chat poker bot. Every chat channel gets at most one
//! [`game::Game`], which moves through a fixed lifecycle
//! (`NoGame → Waiting → NoHands → Betting → Showdown → NoGame`) and only
//! changes in response to validated player commands. Each accepted command
//! yields the lines to post back to the channel; each rejected one yields a
//! [`errors::GameError`] and leaves the game untouched.
//!
//! ## Core Modules
//!
//! - [`cards`] - Suit, Rank, Card and the `-AS-KD-` token encoding
//! - [`deck`] - Seeded ChaCha20 deck dealt from the front
//! - [`hand`] - Best-five-of-seven hand evaluation
//! - [`player`] - Player identity, stack and per-round contribution
//! - [`ledger`] - Seating order, turn pointer and pending actions
//! - [`options`] - Fixed set of numeric table options
//! - [`game`] - Lifecycle state machine and showdown
//! - [`betting`] - Call, check, raise, fold and all-in
//! - [`table`] - Registry of games by channel
//! - [`errors`] - Rejection taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use chipbot_engine::game::{GameState, TableConfig};
//! use chipbot_engine::player::Actor;
//! use chipbot_engine::table::{ChannelId, Tables};
//!
//! let mut tables = Tables::new(TableConfig { seed: Some(1), ..TableConfig::default() });
//! let channel = ChannelId(10);
//! let (ann, bo) = (Actor::new(1, "ann"), Actor::new(2, "bo"));
//!
//! tables.new_game(channel, &ann, 500).unwrap();
//! tables.with_game(channel, |g| g.join(&bo, 500)).unwrap();
//! tables.with_game(channel, |g| g.start(&ann)).unwrap();
//! let dealt = tables.with_game(channel, |g| g.deal(&ann)).unwrap();
//!
//! assert_eq!(dealt.private.len(), 2);
//! assert_eq!(tables.get(channel).unwrap().state(), GameState::Betting);
//! ```

pub mod betting;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod ledger;
pub mod options;
pub mod player;
pub mod table;

pub use errors::{ErrorKind, GameError, Move};
pub use game::{Game, GameState, Reply, Settlement, TableConfig};
pub use options::{GameOptions, OptionKey};
pub use player::{Actor, PlayerId};
pub use table::{ChannelId, Tables};
