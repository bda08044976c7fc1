use crate::cards::{encode_tokens, Card};
use crate::deck::Deck;
use crate::errors::{GameError, Move};
use crate::hand::{evaluate, HandRank};
use crate::ledger::{PlayerLedger, Turn};
use crate::options::{GameOptions, OptionKey};
use crate::player::{Actor, Player, PlayerId};

/// Most players one deck can serve: two cards each plus a five-card board.
pub const MAX_PLAYERS: usize = 10;

const BOARD_SIZE: usize = 5;

/// Lifecycle of one channel's game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    NoGame,
    Waiting,
    NoHands,
    Betting,
    Showdown,
}

/// Settings a game is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Command prefix quoted in hints (`!` in `!join`).
    pub prefix: String,
    pub options: GameOptions,
    /// Fixed deck seed; a random one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            options: GameOptions::default(),
            seed: None,
        }
    }
}

/// What a finished hand paid out. The engine never touches balances;
/// applying the payouts to accounts is left to the account store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub pot: u64,
    pub payouts: Vec<(PlayerId, u64)>,
    /// Community cards, empty when the pot went uncontested.
    pub board: Vec<Card>,
}

/// Lines produced by an accepted command. `private` lines go to a single
/// player only, e.g. their dealt cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub private: Vec<(PlayerId, Vec<String>)>,
    pub settlement: Option<Settlement>,
}

impl Reply {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }
}

/// One channel's game: seats, pot, table bet and deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub(crate) state: GameState,
    pub(crate) ledger: PlayerLedger,
    pub(crate) dealer: usize,
    pub(crate) pot: u64,
    pub(crate) cur_bet: u32,
    pub(crate) deck: Deck,
    pub(crate) options: GameOptions,
    pub(crate) prefix: String,
}

impl Game {
    pub fn new(config: TableConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            state: GameState::NoGame,
            ledger: PlayerLedger::new(),
            dealer: 0,
            pot: 0,
            cur_bet: 0,
            deck: Deck::new_with_seed(seed),
            options: config.options,
            prefix: config.prefix,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }
    /// Sum of every stack's contribution this hand; wider than a stack.
    pub fn pot(&self) -> u64 {
        self.pot
    }
    /// The contribution every active player must match.
    pub fn cur_bet(&self) -> u32 {
        self.cur_bet
    }
    pub fn players(&self) -> &[Player] {
        self.ledger.players()
    }
    pub fn ledger(&self) -> &PlayerLedger {
        &self.ledger
    }
    pub fn options(&self) -> &GameOptions {
        &self.options
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
    pub fn is_player(&self, id: PlayerId) -> bool {
        self.ledger.is_player(id)
    }
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.ledger.seat_of(id).map(|seat| &self.ledger.players()[seat])
    }
    pub fn dealer(&self) -> Option<&Player> {
        self.ledger.players().get(self.dealer)
    }
    pub fn current_player(&self) -> Option<&Player> {
        match self.state {
            GameState::Betting => self.ledger.current_player(),
            _ => None,
        }
    }

    /// Opens the table and seats the requester first.
    pub fn new_game(&mut self, actor: &Actor, stack: u32) -> Result<Reply, GameError> {
        if self.state != GameState::NoGame {
            return Err(GameError::GameInProgress {
                joinable: self.state == GameState::Waiting,
            });
        }
        self.check_buy_in(actor, stack)?;
        self.reset();
        self.ledger.add_player(actor, stack);
        self.state = GameState::Waiting;
        tracing::info!(player = %actor.id, stack, "new game opened");
        Ok(Reply::new(vec![
            format!("A new game has been started by {}!", actor.name),
            format!("Message {}join to join the game.", self.prefix),
        ]))
    }

    pub fn join(&mut self, actor: &Actor, stack: u32) -> Result<Reply, GameError> {
        match self.state {
            GameState::NoGame => return Err(GameError::NoGameToJoin),
            GameState::Waiting => {}
            _ => {
                return Err(GameError::JoinClosed {
                    name: actor.name.clone(),
                })
            }
        }
        if self.ledger.is_player(actor.id) {
            return Err(GameError::AlreadyJoined {
                name: actor.name.clone(),
            });
        }
        if self.ledger.len() >= MAX_PLAYERS {
            return Err(GameError::TableFull {
                name: actor.name.clone(),
                max: MAX_PLAYERS,
            });
        }
        self.check_buy_in(actor, stack)?;
        self.ledger.add_player(actor, stack);
        tracing::debug!(player = %actor.id, seats = self.ledger.len(), "player joined");
        Ok(Reply::new(vec![
            format!("{} has joined the game!", actor.name),
            format!(
                "Message {p}join to join the game, or {p}start to start the game.",
                p = self.prefix
            ),
        ]))
    }

    /// Closes the table to new players; the first seat becomes the dealer.
    pub fn start(&mut self, actor: &Actor) -> Result<Reply, GameError> {
        match self.state {
            GameState::NoGame => return Err(GameError::NoGameToStart),
            GameState::Waiting => {}
            _ => {
                return Err(GameError::AlreadyStarted {
                    name: actor.name.clone(),
                })
            }
        }
        if !self.ledger.is_player(actor.id) {
            return Err(GameError::NotJoined {
                name: actor.name.clone(),
            });
        }
        if self.ledger.len() < 2 {
            return Err(GameError::NotEnoughPlayers {
                joined: self.ledger.len(),
            });
        }
        self.dealer = 0;
        self.state = GameState::NoHands;
        let names: Vec<&str> = self.players().iter().map(Player::name).collect();
        let dealer = names[self.dealer].to_string();
        tracing::info!(players = names.len(), dealer = %dealer, "game started");
        Ok(Reply::new(vec![
            "The game has begun!".to_string(),
            format!("Players: {}", names.join(", ")),
            format!(
                "{dealer} is the dealer. Message {}deal to deal the hands.",
                self.prefix
            ),
        ]))
    }

    /// Deals two cards to every player and opens the betting round at the
    /// configured minimum bet.
    pub fn deal(&mut self, actor: &Actor) -> Result<Reply, GameError> {
        match self.state {
            GameState::NoGame => return Err(GameError::NoGameToDeal),
            GameState::Waiting => return Err(GameError::NotStarted(Move::Deal)),
            GameState::NoHands => {}
            GameState::Betting | GameState::Showdown => return Err(GameError::AlreadyDealt),
        }
        let dealer = self.ledger.players()[self.dealer].clone();
        if dealer.id() != actor.id {
            return Err(GameError::NotDealer {
                name: actor.name.clone(),
                dealer: dealer.name().to_string(),
            });
        }

        self.deck.shuffle();
        let mut private = Vec::with_capacity(self.ledger.len());
        for player in self.ledger.players_mut() {
            // MAX_PLAYERS keeps two cards per seat within the deck
            let hand = self.deck.draw(2).unwrap_or_default();
            private.push((
                player.id(),
                vec!["Your hand:".to_string(), encode_tokens(&hand)],
            ));
            player.reset_for_deal(hand);
        }
        self.pot = 0;
        self.cur_bet = self.options.min_bet;
        self.state = GameState::Betting;
        tracing::info!(
            players = self.ledger.len(),
            min_bet = self.cur_bet,
            "hands dealt"
        );

        let mut lines = vec![
            "The hands have been dealt!".to_string(),
            format!(
                "The minimum bet is {}. Everyone has to put in at least that much to stay in.",
                self.cur_bet
            ),
        ];
        let first = (self.dealer + 1) % self.ledger.len();
        let reply = match self.ledger.open_round(first) {
            Turn::Next(_) => {
                lines.push(self.turn_prompt());
                Reply::new(lines)
            }
            Turn::RoundOver => self.showdown(lines),
        };
        Ok(Reply { private, ..reply })
    }

    /// Abandons the game from any state but `NoGame`.
    pub fn stop(&mut self, actor: &Actor) -> Result<Reply, GameError> {
        if self.state == GameState::NoGame {
            return Err(GameError::NoGameToStop);
        }
        tracing::info!(player = %actor.id, state = ?self.state, "game stopped");
        self.reset();
        Ok(Reply::new(vec![format!(
            "Game has been stopped by {}!",
            actor.name
        )]))
    }

    pub fn show_options(&self) -> Reply {
        Reply::new(vec![self.options.describe()])
    }

    pub fn set_option(&mut self, key: OptionKey, value: i64) -> Result<Reply, GameError> {
        self.options.set(key, value)?;
        Ok(Reply::new(vec![format!("The {key} is now set to {value}.")]))
    }

    pub(crate) fn turn_prompt(&self) -> String {
        match self.ledger.current_player() {
            Some(p) => format!(
                "It's {}'s turn. The current bet is {}; they have put in {} of {}.",
                p.name(),
                self.cur_bet,
                p.cur_bet(),
                p.max_bet()
            ),
            None => String::new(),
        }
    }

    /// Resolves the hand, announces the result and closes the game.
    pub(crate) fn showdown(&mut self, mut lines: Vec<String>) -> Reply {
        self.state = GameState::Showdown;
        let contenders: Vec<usize> = (0..self.ledger.len())
            .filter(|&seat| !self.ledger.players()[seat].folded())
            .collect();

        let (winners, board) = match contenders.as_slice() {
            [only] => {
                let p = &self.ledger.players()[*only];
                lines.push(format!("{} wins {} chips uncontested!", p.name(), self.pot));
                (vec![*only], Vec::new())
            }
            _ => {
                let board = self.deck.draw(BOARD_SIZE).unwrap_or_default();
                lines.push("The betting is over. Showdown!".to_string());
                lines.push(encode_tokens(&board));
                let ranked: Vec<(usize, HandRank)> = contenders
                    .iter()
                    .map(|&seat| {
                        let p = &self.ledger.players()[seat];
                        let mut cards = p.hand().to_vec();
                        cards.extend_from_slice(&board);
                        (seat, evaluate(&cards))
                    })
                    .collect();
                for (seat, rank) in &ranked {
                    let p = &self.ledger.players()[*seat];
                    let shown: Vec<String> = p.hand().iter().map(Card::token).collect();
                    lines.push(format!(
                        "{} shows {}: {}",
                        p.name(),
                        shown.join(" "),
                        rank.category
                    ));
                }
                let best = ranked.iter().map(|(_, r)| *r).max();
                let winners = ranked
                    .iter()
                    .filter(|(_, r)| Some(*r) == best)
                    .map(|(seat, _)| *seat)
                    .collect();
                (winners, board)
            }
        };

        let payouts = self.split_pot(&winners);
        if board.len() == BOARD_SIZE {
            for (seat, amount) in winners.iter().zip(payouts.iter().map(|(_, a)| *a)) {
                let p = &self.ledger.players()[*seat];
                let mut cards = p.hand().to_vec();
                cards.extend_from_slice(&board);
                lines.push(format!(
                    "{} wins {} chips with a {}!",
                    p.name(),
                    amount,
                    evaluate(&cards).category
                ));
            }
        }
        lines.push(format!(
            "The game is over. Message {}newgame to play again.",
            self.prefix
        ));

        let settlement = Settlement {
            pot: self.pot,
            payouts,
            board,
        };
        tracing::info!(pot = settlement.pot, winners = ?settlement.payouts, "showdown settled");
        self.reset();
        Reply {
            lines,
            private: Vec::new(),
            settlement: Some(settlement),
        }
    }

    /// Equal shares; the odd chips go to the first winner in seating order.
    fn split_pot(&self, winners: &[usize]) -> Vec<(PlayerId, u64)> {
        if winners.is_empty() {
            return Vec::new();
        }
        let ways = winners.len() as u64;
        let share = self.pot / ways;
        let odd = self.pot % ways;
        winners
            .iter()
            .enumerate()
            .map(|(i, &seat)| {
                let bonus = if i == 0 { odd } else { 0 };
                (self.ledger.players()[seat].id(), share + bonus)
            })
            .collect()
    }

    fn check_buy_in(&self, actor: &Actor, stack: u32) -> Result<(), GameError> {
        if stack < self.options.buy_in {
            return Err(GameError::BuyInTooLow {
                name: actor.name.clone(),
                balance: stack,
                buy_in: self.options.buy_in,
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.state = GameState::NoGame;
        self.ledger.clear();
        self.dealer = 0;
        self.pot = 0;
        self.cur_bet = 0;
    }
}
