use crate::player::{Actor, Player, PlayerId};

/// Result of moving the turn pointer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Turn {
    /// The seat now expected to act.
    Next(usize),
    /// Nobody owes an action, or fewer than two players are still in.
    RoundOver,
}

/// Seats in joining order, the turn pointer, and the seats that still owe an
/// action in the current betting round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerLedger {
    players: Vec<Player>,
    current: usize,
    pending: Vec<usize>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats a new player. Returns false if they are already seated.
    pub fn add_player(&mut self, actor: &Actor, stack: u32) -> bool {
        if self.is_player(actor.id) {
            return false;
        }
        self.players.push(Player::new(actor, stack));
        true
    }

    pub fn is_player(&self, id: PlayerId) -> bool {
        self.seat_of(id).is_some()
    }

    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn current_seat(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    pub(crate) fn player_mut(&mut self, seat: usize) -> &mut Player {
        &mut self.players[seat]
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Players who have not folded.
    pub fn contenders(&self) -> usize {
        self.players.iter().filter(|p| !p.folded()).count()
    }

    pub fn owes_action(&self, seat: usize) -> bool {
        self.pending.contains(&seat)
    }

    /// Starts a betting round: every player able to act owes an action and
    /// the turn goes to the first such seat at or after `first`.
    pub(crate) fn open_round(&mut self, first: usize) -> Turn {
        self.pending = (0..self.players.len())
            .filter(|&seat| self.players[seat].can_act())
            .collect();
        let n = self.players.len();
        match (0..n)
            .map(|step| (first + step) % n)
            .find(|&seat| self.pending.contains(&seat))
        {
            Some(seat) => {
                self.current = seat;
                Turn::Next(seat)
            }
            None => Turn::RoundOver,
        }
    }

    pub(crate) fn mark_acted(&mut self, seat: usize) {
        self.pending.retain(|&s| s != seat);
    }

    /// After a raise from `raiser`, everyone else still able to act has to
    /// respond again.
    pub(crate) fn reopen_after_raise(&mut self, raiser: usize) {
        self.pending = (0..self.players.len())
            .filter(|&seat| seat != raiser && self.players[seat].can_act())
            .collect();
    }

    /// Moves the pointer to the next seat, in seating order and wrapping
    /// around, that can still act and owes an action. Folded and all-in
    /// players are never selected.
    pub fn advance_turn(&mut self) -> Turn {
        self.pending.retain(|&seat| self.players[seat].can_act());
        if self.contenders() < 2 || self.pending.is_empty() {
            return Turn::RoundOver;
        }
        let n = self.players.len();
        for step in 1..=n {
            let seat = (self.current + step) % n;
            if self.players[seat].can_act() && self.pending.contains(&seat) {
                self.current = seat;
                return Turn::Next(seat);
            }
        }
        Turn::RoundOver
    }

    pub(crate) fn clear(&mut self) {
        self.players.clear();
        self.pending.clear();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(stacks: &[u32]) -> PlayerLedger {
        let mut ledger = PlayerLedger::new();
        for (i, &stack) in stacks.iter().enumerate() {
            assert!(ledger.add_player(&Actor::new(i as u64, format!("p{i}")), stack));
        }
        ledger
    }

    #[test]
    fn duplicate_players_are_refused() {
        let mut ledger = ledger(&[100]);
        assert!(!ledger.add_player(&Actor::new(0, "again"), 100));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_player(PlayerId(0)));
        assert!(!ledger.is_player(PlayerId(9)));
    }

    #[test]
    fn advance_skips_folded_and_all_in_seats() {
        let mut ledger = ledger(&[100, 100, 100, 100]);
        assert_eq!(ledger.open_round(0), Turn::Next(0));
        ledger.player_mut(1).fold();
        ledger.player_mut(2).contribute_to(100);
        ledger.mark_acted(0);
        assert_eq!(ledger.advance_turn(), Turn::Next(3));
        ledger.mark_acted(3);
        assert_eq!(ledger.advance_turn(), Turn::RoundOver);
    }

    #[test]
    fn advance_wraps_around_the_table() {
        let mut ledger = ledger(&[100, 100, 100]);
        ledger.open_round(2);
        ledger.mark_acted(2);
        assert_eq!(ledger.advance_turn(), Turn::Next(0));
    }

    #[test]
    fn round_ends_when_one_contender_remains() {
        let mut ledger = ledger(&[100, 100, 100]);
        ledger.open_round(0);
        ledger.player_mut(0).fold();
        ledger.player_mut(1).fold();
        assert_eq!(ledger.advance_turn(), Turn::RoundOver);
    }

    #[test]
    fn raise_reopens_action_for_everyone_else() {
        let mut ledger = ledger(&[100, 100, 100]);
        ledger.open_round(0);
        ledger.mark_acted(0);
        ledger.mark_acted(1);
        ledger.reopen_after_raise(2);
        assert!(ledger.owes_action(0));
        assert!(ledger.owes_action(1));
        assert!(!ledger.owes_action(2));
    }
}
