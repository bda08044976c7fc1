use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Numeric table settings. Each field is one `OptionKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameOptions {
    /// Chips a player must hold to take a seat.
    pub buy_in: u32,
    /// Table bet every player has to match right after the deal.
    pub min_bet: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            buy_in: 100,
            min_bet: 10,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OptionKey {
    BuyIn,
    MinBet,
}

impl OptionKey {
    pub const ALL: [OptionKey; 2] = [OptionKey::BuyIn, OptionKey::MinBet];

    pub fn name(self) -> &'static str {
        match self {
            OptionKey::BuyIn => "buy_in",
            OptionKey::MinBet => "min_bet",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OptionKey::BuyIn => "Chips a player needs in order to join a game",
            OptionKey::MinBet => "Bet every player must match after the deal",
        }
    }

    pub fn range(self) -> (u32, u32) {
        (1, 1_000_000)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| GameError::UnknownOption(s.to_string()))
    }
}

impl GameOptions {
    pub fn get(&self, key: OptionKey) -> u32 {
        match key {
            OptionKey::BuyIn => self.buy_in,
            OptionKey::MinBet => self.min_bet,
        }
    }

    /// Sets `key` after checking sign and range; on error nothing changes.
    pub fn set(&mut self, key: OptionKey, value: i64) -> Result<(), GameError> {
        if value < 0 {
            return Err(GameError::NegativeOption(key.name().to_string()));
        }
        let (min, max) = key.range();
        let checked = u32::try_from(value)
            .ok()
            .filter(|v| (min..=max).contains(v))
            .ok_or_else(|| GameError::OptionOutOfRange {
                key: key.name().to_string(),
                value,
                min,
                max,
            })?;
        match key {
            OptionKey::BuyIn => self.buy_in = checked,
            OptionKey::MinBet => self.min_bet = checked,
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let mut probe = *self;
        for key in OptionKey::ALL {
            probe.set(key, i64::from(self.get(key)))?;
        }
        Ok(())
    }

    /// Aligned `name  value  description` rows inside a code block.
    pub fn describe(&self) -> String {
        let name_width = OptionKey::ALL.iter().map(|k| k.name().len()).max().unwrap_or(0);
        let value_width = OptionKey::ALL
            .iter()
            .map(|&k| self.get(k).to_string().len())
            .max()
            .unwrap_or(0);
        let rows: Vec<String> = OptionKey::ALL
            .iter()
            .map(|&key| {
                format!(
                    "{:<nw$}  {:<vw$}  {}",
                    key.name(),
                    self.get(key),
                    key.description(),
                    nw = name_width,
                    vw = value_width
                )
            })
            .collect();
        format!("```{}```", rows.join("\n"))
    }
}
