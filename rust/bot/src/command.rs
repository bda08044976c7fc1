//! Chat command parsing. Every command the bot understands is a variant of
//! [`Command`]; anything else is a [`ParseError`].

use chipbot_engine::options::OptionKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Join,
    Start,
    Deal,
    Call,
    Raise(i64),
    Check,
    Fold,
    AllIn,
    Options,
    Set { key: OptionKey, value: i64 },
    Help,
    Balance,
    Info,
    Stop,
    Register,
    Dealer,
}

/// Name and description of every command, as listed by `help`.
pub const COMMANDS: &[(&str, &str)] = &[
    ("newgame", "Starts a new game, allowing players to join."),
    ("join", "Lets you join a game that is about to begin"),
    ("start", "Begins a game after all players have joined"),
    ("deal", "Deals the hole cards to all the players"),
    ("call", "Matches the current bet"),
    ("raise", "Increase the size of current bet"),
    ("check", "Bet no money"),
    ("fold", "Discard your hand and forfeit the pot"),
    ("all-in", "Bets the entirety of your remaining chips"),
    ("options", "Show the list of options and their current values"),
    ("set", "Set the value of an option"),
    ("help", "Show the list of commands"),
    ("balance", "Shows how many chips you have"),
    ("info", "Shows your level, experience and wins"),
    ("stop", "Stop a game"),
    ("reg", "Register player in database"),
    ("dealer", "What do you wanna do?"),
];

const DEALER_REACTIONS: &[&str] = &["\u{27A1}", "\u{1F4B5}", "\u{2139}"];

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::NewGame => "newgame",
            Command::Join => "join",
            Command::Start => "start",
            Command::Deal => "deal",
            Command::Call => "call",
            Command::Raise(_) => "raise",
            Command::Check => "check",
            Command::Fold => "fold",
            Command::AllIn => "all-in",
            Command::Options => "options",
            Command::Set { .. } => "set",
            Command::Help => "help",
            Command::Balance => "balance",
            Command::Info => "info",
            Command::Stop => "stop",
            Command::Register => "reg",
            Command::Dealer => "dealer",
        }
    }

    /// Reactions the chat client should attach to this command's reply.
    pub fn reactions(&self) -> &'static [&'static str] {
        match self {
            Command::Dealer => DEALER_REACTIONS,
            _ => &[],
        }
    }
}

/// A reaction a player can click on a reply, routed back as a query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reaction {
    Balance,
    Info,
}

impl Reaction {
    pub fn from_emoji(emoji: &str) -> Option<Reaction> {
        match emoji {
            "\u{1F4B5}" => Some(Reaction::Balance),
            "\u{2139}" | "\u{2139}\u{FE0F}" => Some(Reaction::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0} is not a valid command.")]
    Unknown(String),
    #[error("Please follow {prefix}raise with the amount that you would like to raise it by.")]
    MissingRaiseAmount { prefix: String },
    #[error("Please follow {prefix}raise with an integer. '{value}' is not an integer.")]
    RaiseNotInteger { prefix: String, value: String },
    #[error("You must specify an option and value to set when using the {prefix}set command.")]
    MissingOption { prefix: String },
    #[error("You must specify a new value after the name of an option when using the {prefix}set command.")]
    MissingValue { prefix: String },
    #[error("'{0}' is not an option.")]
    UnknownOption(String),
    #[error("{key} must be set to an integer, and '{value}' is not a valid integer.")]
    ValueNotInteger { key: String, value: String },
}

impl ParseError {
    pub fn lines(&self, prefix: &str) -> Vec<String> {
        let hint = match self {
            ParseError::Unknown(_) => Some(format!(
                "Message {prefix}help to see the list of commands."
            )),
            ParseError::UnknownOption(_) => Some(format!(
                "Message {prefix}options to see the list of options."
            )),
            _ => None,
        };
        std::iter::once(self.to_string()).chain(hint).collect()
    }
}

/// Parses a chat message. Returns `None` for messages that are not
/// addressed to the bot (empty, or not starting with `prefix`).
pub fn parse(text: &str, prefix: &str) -> Option<Result<Command, ParseError>> {
    let mut tokens = text.split_whitespace();
    let name = tokens.next()?.strip_prefix(prefix)?;
    let args: Vec<&str> = tokens.collect();
    Some(parse_command(name, &args, text.trim(), prefix))
}

fn parse_command(
    name: &str,
    args: &[&str],
    content: &str,
    prefix: &str,
) -> Result<Command, ParseError> {
    let command = match name {
        "newgame" => Command::NewGame,
        "join" => Command::Join,
        "start" => Command::Start,
        "deal" => Command::Deal,
        "call" => Command::Call,
        "raise" => {
            let raw = args.first().ok_or_else(|| ParseError::MissingRaiseAmount {
                prefix: prefix.to_string(),
            })?;
            let amount = raw.parse().map_err(|_| ParseError::RaiseNotInteger {
                prefix: prefix.to_string(),
                value: raw.to_string(),
            })?;
            Command::Raise(amount)
        }
        "check" => Command::Check,
        "fold" => Command::Fold,
        "all-in" => Command::AllIn,
        "options" => Command::Options,
        "set" => match args {
            [] => {
                return Err(ParseError::MissingOption {
                    prefix: prefix.to_string(),
                })
            }
            [_] => {
                return Err(ParseError::MissingValue {
                    prefix: prefix.to_string(),
                })
            }
            [key, value, ..] => {
                let key: OptionKey = key
                    .parse()
                    .map_err(|_| ParseError::UnknownOption(key.to_string()))?;
                let value = value.parse().map_err(|_| ParseError::ValueNotInteger {
                    key: key.name().to_string(),
                    value: value.to_string(),
                })?;
                Command::Set { key, value }
            }
        },
        "help" => Command::Help,
        "balance" => Command::Balance,
        "info" => Command::Info,
        "stop" => Command::Stop,
        "reg" => Command::Register,
        "dealer" => Command::Dealer,
        _ => return Err(ParseError::Unknown(content.to_string())),
    };
    Ok(command)
}

/// The `help` text: every command with its description, aligned, sorted by
/// name and wrapped in a code block.
pub fn help_text(prefix: &str) -> String {
    let width = COMMANDS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut sorted: Vec<&(&str, &str)> = COMMANDS.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);
    let rows: Vec<String> = sorted
        .iter()
        .map(|(name, description)| {
            format!("{prefix}{name:<w$}  {description}", w = width)
        })
        .collect();
    format!("```{}```", rows.join("\n"))
}
