//! Line-based stand-in for a chat client.
//!
//! Each input line is one event:
//!
//! ```text
//! 7 1001 ann: !newgame
//! react 7 1002 bo 💵
//! ```
//!
//! Replies are printed as `[#7] text` for channels and `[@1002] text` for
//! direct messages. Hand images are written to the image directory and
//! printed as their path.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chipbot_engine::{Actor, ChannelId};
use thiserror::Error;

use crate::dispatcher::{Incoming, IncomingReaction, Outgoing, Target};
use crate::error::BotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Message(Incoming),
    Reaction(IncomingReaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("expected '<channel> <user_id> <name>: <text>' or 'react <channel> <user_id> <name> <emoji>'")]
    Malformed,
    #[error("'{0}' is not a valid id")]
    BadId(String),
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_event(line: &str) -> Result<Option<Event>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if let Some(rest) = line.strip_prefix("react ") {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let [channel, user, name, emoji] = parts.as_slice() else {
            return Err(InputError::Malformed);
        };
        return Ok(Some(Event::Reaction(IncomingReaction {
            channel: ChannelId(parse_id(channel)?),
            author: Actor::new(parse_id(user)?, *name),
            emoji: emoji.to_string(),
        })));
    }

    let (header, text) = line.split_once(':').ok_or(InputError::Malformed)?;
    let parts: Vec<&str> = header.split_whitespace().collect();
    let [channel, user, name] = parts.as_slice() else {
        return Err(InputError::Malformed);
    };
    Ok(Some(Event::Message(Incoming {
        channel: ChannelId(parse_id(channel)?),
        author: Actor::new(parse_id(user)?, *name),
        text: text.trim().to_string(),
    })))
}

fn parse_id(raw: &str) -> Result<u64, InputError> {
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| InputError::BadId(raw.to_string()))
}

/// Prints outgoing messages and saves their images.
#[derive(Debug)]
pub struct Transcript {
    image_dir: PathBuf,
    images: usize,
}

impl Transcript {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            images: 0,
        }
    }

    pub fn write(&mut self, out: &mut dyn Write, msg: &Outgoing) -> Result<(), BotError> {
        let label = match msg.target {
            Target::Channel(channel) => format!("[{channel}]"),
            Target::Direct(player) => format!("[@{player}]"),
        };
        for line in msg.lines.iter().flat_map(|l| l.lines()) {
            writeln!(out, "{label} {line}")?;
        }
        if let Some(png) = &msg.image {
            self.images += 1;
            fs::create_dir_all(&self.image_dir)?;
            let path = self.image_dir.join(format!("hand_{:04}.png", self.images));
            fs::write(&path, png)?;
            writeln!(out, "{label} (image) {}", path.display())?;
        }
        if !msg.reactions.is_empty() {
            writeln!(out, "{label} (reactions) {}", msg.reactions.join(" "))?;
        }
        Ok(())
    }
}
