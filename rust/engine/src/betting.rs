//! Betting actions. Each one validates completely before touching the game,
//! so a rejected action leaves every field as it was.

use crate::errors::{GameError, Move};
use crate::game::{Game, GameState, Reply};
use crate::ledger::Turn;
use crate::player::Actor;

impl Game {
    /// Matches the table bet, going all in if the stack falls short.
    pub fn call(&mut self, actor: &Actor) -> Result<Reply, GameError> {
        let seat = self.acting_seat(actor, Move::Call)?;
        if self.ledger.players()[seat].remaining() == 0 {
            return Ok(self.push_all_in(seat));
        }
        let target = self.cur_bet;
        let player = self.ledger.player_mut(seat);
        let delta = player.contribute_to(target);
        let line = if player.all_in() {
            format!("{} calls with {} and is all in.", player.name(), delta)
        } else {
            format!("{} calls {}.", player.name(), delta)
        };
        self.pot += u64::from(delta);
        self.ledger.mark_acted(seat);
        tracing::debug!(seat, delta, pot = self.pot, "call");
        Ok(self.conclude(vec![line]))
    }

    /// Passes without betting; only allowed once the table bet is matched.
    pub fn check(&mut self, actor: &Actor) -> Result<Reply, GameError> {
        let seat = self.acting_seat(actor, Move::Check)?;
        let player = &self.ledger.players()[seat];
        if player.remaining() == 0 {
            return Ok(self.push_all_in(seat));
        }
        if player.cur_bet() != self.cur_bet {
            return Err(GameError::MustCall {
                name: actor.name.clone(),
                owed: self.cur_bet - player.cur_bet(),
            });
        }
        let line = format!("{} checks.", player.name());
        self.ledger.mark_acted(seat);
        tracing::debug!(seat, "check");
        Ok(self.conclude(vec![line]))
    }

    /// Raises the table bet by `amount`. Legal iff `0 < amount` and the new
    /// table bet fits within the actor's stack.
    pub fn raise_bet(&mut self, actor: &Actor, amount: i64) -> Result<Reply, GameError> {
        let seat = self.acting_seat(actor, Move::Raise)?;
        let player = &self.ledger.players()[seat];
        if player.remaining() == 0 {
            return Ok(self.push_all_in(seat));
        }
        if amount <= 0 {
            return Err(GameError::RaiseNotPositive {
                amount,
                current_bet: self.cur_bet,
            });
        }
        let max_raise = player.max_bet().saturating_sub(self.cur_bet);
        if max_raise == 0 {
            return Err(GameError::CannotRaise {
                current_bet: self.cur_bet,
            });
        }
        if amount > i64::from(max_raise) {
            return Err(GameError::RaiseTooLarge { amount, max_raise });
        }

        // amount <= max_raise, so it fits in u32 and the sum stays within the stack
        let target = self.cur_bet + amount as u32;
        let player = self.ledger.player_mut(seat);
        let delta = player.contribute_to(target);
        let mut lines = vec![format!(
            "{} raises by {}. The current bet is now {}.",
            player.name(),
            amount,
            target
        )];
        if player.all_in() {
            lines.push(format!("{} is all in.", player.name()));
        }
        self.cur_bet = target;
        self.pot += u64::from(delta);
        self.ledger.reopen_after_raise(seat);
        tracing::debug!(seat, amount, cur_bet = self.cur_bet, pot = self.pot, "raise");
        Ok(self.conclude(lines))
    }

    /// Gives up the hand. With a single contender left the round ends at once.
    pub fn fold(&mut self, actor: &Actor) -> Result<Reply, GameError> {
        let seat = self.acting_seat(actor, Move::Fold)?;
        let player = self.ledger.player_mut(seat);
        player.fold();
        let line = format!("{} has folded.", player.name());
        self.ledger.mark_acted(seat);
        tracing::debug!(seat, contenders = self.ledger.contenders(), "fold");
        Ok(self.conclude(vec![line]))
    }

    /// Commits the whole stack, lifting the table bet if it is exceeded.
    pub fn all_in(&mut self, actor: &Actor) -> Result<Reply, GameError> {
        let seat = self.acting_seat(actor, Move::AllIn)?;
        Ok(self.push_all_in(seat))
    }

    fn push_all_in(&mut self, seat: usize) -> Reply {
        let player = self.ledger.player_mut(seat);
        let stack = player.max_bet();
        let delta = player.contribute_to(stack);
        let line = format!("{} goes all in with {}.", player.name(), stack);
        self.pot += u64::from(delta);
        if stack > self.cur_bet {
            self.cur_bet = stack;
            self.ledger.reopen_after_raise(seat);
        } else {
            self.ledger.mark_acted(seat);
        }
        tracing::debug!(seat, delta, cur_bet = self.cur_bet, pot = self.pot, "all in");
        self.conclude(vec![line])
    }

    /// Validates that `actor` may make `action` now and returns their seat.
    fn acting_seat(&self, actor: &Actor, action: Move) -> Result<usize, GameError> {
        match self.state {
            GameState::NoGame => return Err(GameError::NoGame),
            GameState::Waiting => return Err(GameError::NotStarted(action)),
            _ => {}
        }
        let seat = self
            .ledger
            .seat_of(actor.id)
            .ok_or_else(|| GameError::NotPlaying {
                name: actor.name.clone(),
                action,
            })?;
        if self.state != GameState::Betting {
            return Err(GameError::NotDealt(action));
        }
        if self.ledger.current_seat() != seat {
            let current = self
                .ledger
                .current_player()
                .map(|p| p.name().to_string())
                .unwrap_or_default();
            return Err(GameError::NotYourTurn {
                name: actor.name.clone(),
                action,
                current,
            });
        }
        Ok(seat)
    }

    /// Hands the turn on, or settles the hand once the round is over.
    fn conclude(&mut self, mut lines: Vec<String>) -> Reply {
        match self.ledger.advance_turn() {
            Turn::Next(_) => {
                lines.push(format!("The pot is now {}.", self.pot));
                lines.push(self.turn_prompt());
                Reply::new(lines)
            }
            Turn::RoundOver => {
                tracing::debug!(pot = self.pot, "betting round complete");
                self.showdown(lines)
            }
        }
    }
}
