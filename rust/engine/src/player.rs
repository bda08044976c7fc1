use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Stable identity of a chat user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whoever issued a command: an id plus the name to address them by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: PlayerId,
    pub name: String,
}

impl Actor {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
        }
    }
}

/// A seated player. `max_bet` is the stack brought to the table and
/// `cur_bet` what has been committed this round; `cur_bet <= max_bet` holds
/// at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    max_bet: u32,
    cur_bet: u32,
    hand: Vec<Card>,
    folded: bool,
    all_in: bool,
}

impl Player {
    pub fn new(actor: &Actor, stack: u32) -> Self {
        Self {
            id: actor.id,
            name: actor.name.clone(),
            max_bet: stack,
            cur_bet: 0,
            hand: Vec::with_capacity(2),
            folded: false,
            all_in: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn max_bet(&self) -> u32 {
        self.max_bet
    }
    pub fn cur_bet(&self) -> u32 {
        self.cur_bet
    }
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }
    pub fn folded(&self) -> bool {
        self.folded
    }
    pub fn all_in(&self) -> bool {
        self.all_in
    }

    /// Chips still available to put in.
    pub fn remaining(&self) -> u32 {
        self.max_bet - self.cur_bet
    }

    /// Neither folded nor all in, so still owes decisions.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    pub(crate) fn reset_for_deal(&mut self, hand: Vec<Card>) {
        self.hand = hand;
        self.cur_bet = 0;
        self.folded = false;
        self.all_in = false;
    }

    /// Raises the contribution towards `target`, capped at the stack, and
    /// returns the chips added. Reaching the cap marks the player all in.
    pub(crate) fn contribute_to(&mut self, target: u32) -> u32 {
        let next = target.min(self.max_bet).max(self.cur_bet);
        let delta = next - self.cur_bet;
        self.cur_bet = next;
        if self.cur_bet == self.max_bet {
            self.all_in = true;
        }
        delta
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }
}
