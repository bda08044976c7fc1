use thiserror::Error;

/// A table move that only makes sense once the game has begun.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Move {
    Deal,
    Call,
    Check,
    Raise,
    Fold,
    AllIn,
}

impl Move {
    pub fn verb(self) -> &'static str {
        match self {
            Move::Deal => "deal",
            Move::Call => "call",
            Move::Check => "check",
            Move::Raise => "raise",
            Move::Fold => "fold",
            Move::AllIn => "go all in",
        }
    }
}

/// Broad class of a rejection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The command does not apply to the game's current lifecycle state.
    StateGuard,
    /// The actor is not allowed to issue the command right now.
    Authorization,
    /// An argument broke a numeric or naming constraint.
    Validation,
}

/// Every way a command can be turned down. A rejected command never mutates
/// the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("No game has been started yet.")]
    NoGame,
    #[error("No game has been started yet for you to join.")]
    NoGameToJoin,
    #[error("There is no game waiting to be started.")]
    NoGameToStart,
    #[error("No game has been started for you to deal.")]
    NoGameToDeal,
    #[error("There is no game in progress!")]
    NoGameToStop,
    #[error("There is already a game in progress, you can't start a new game.")]
    GameInProgress { joinable: bool },
    #[error("The game is already in progress, {name}. You're not allowed to join right now.")]
    JoinClosed { name: String },
    #[error("You've already joined the game {name}!")]
    AlreadyJoined { name: String },
    #[error("The table is full, {name}. At most {max} players can sit at one game.")]
    TableFull { name: String, max: usize },
    #[error("{name} needs at least {buy_in} chips to buy in, but only has {balance}.")]
    BuyInTooLow {
        name: String,
        balance: u32,
        buy_in: u32,
    },
    #[error("The game has already started, {name}. It can't be started twice.")]
    AlreadyStarted { name: String },
    #[error("You are not a part of that game yet, {name}.")]
    NotJoined { name: String },
    #[error("The game must have at least two players before it can be started.")]
    NotEnoughPlayers { joined: usize },
    #[error("You can't {} because the game hasn't started yet.", .0.verb())]
    NotStarted(Move),
    #[error("The cards have already been dealt.")]
    AlreadyDealt,
    #[error("You aren't the dealer, {name}.")]
    NotDealer { name: String, dealer: String },
    #[error("You can't {}, because you're not playing, {name}.", .action.verb())]
    NotPlaying { name: String, action: Move },
    #[error("You can't {} because the hands haven't been dealt yet.", .0.verb())]
    NotDealt(Move),
    #[error("You can't {}, {name}, because it's {current}'s turn.", .action.verb())]
    NotYourTurn {
        name: String,
        action: Move,
        current: String,
    },
    #[error("You can't check, {name}, because you need to put in {owed} chips to call.")]
    MustCall { name: String, owed: u32 },
    #[error("A raise must be a positive amount on top of the current bet of {current_bet}, not {amount}.")]
    RaiseNotPositive { amount: i64, current_bet: u32 },
    #[error("You don't have enough chips to raise the current bet of {current_bet}.")]
    CannotRaise { current_bet: u32 },
    #[error("You don't have enough chips to raise by {amount}; the maximum raise is {max_raise}.")]
    RaiseTooLarge { amount: i64, max_raise: u32 },
    #[error("'{0}' is not an option.")]
    UnknownOption(String),
    #[error("Cannot set {0} to a negative value!")]
    NegativeOption(String),
    #[error("{key} must be between {min} and {max}, not {value}.")]
    OptionOutOfRange {
        key: String,
        value: i64,
        min: u32,
        max: u32,
    },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        use GameError::*;
        match self {
            NoGame | NoGameToJoin | NoGameToStart | NoGameToDeal | NoGameToStop
            | GameInProgress { .. } | JoinClosed { .. } | AlreadyStarted { .. }
            | NotStarted(_) | AlreadyDealt | NotDealt(_) => ErrorKind::StateGuard,
            AlreadyJoined { .. } | NotJoined { .. } | NotDealer { .. } | NotPlaying { .. }
            | NotYourTurn { .. } => ErrorKind::Authorization,
            TableFull { .. } | BuyInTooLow { .. } | NotEnoughPlayers { .. } | MustCall { .. }
            | RaiseNotPositive { .. } | CannotRaise { .. } | RaiseTooLarge { .. }
            | UnknownOption(_) | NegativeOption(_) | OptionOutOfRange { .. } => {
                ErrorKind::Validation
            }
        }
    }

    /// The explanation followed by a hint pointing at the command to use
    /// instead, when there is one.
    pub fn lines(&self, prefix: &str) -> Vec<String> {
        let hint = match self {
            GameError::NoGame | GameError::NoGameToDeal => {
                Some(format!("Message {prefix}newgame to start one."))
            }
            GameError::NoGameToJoin => Some(format!("Message {prefix}newgame to start a new game.")),
            GameError::NoGameToStart => Some(format!(
                "Message {prefix}newgame if you would like to start a new game."
            )),
            GameError::GameInProgress { joinable: true } => Some(format!(
                "It still hasn't started yet, so you can still message {prefix}join to join that game."
            )),
            GameError::NotJoined { .. } => Some(format!(
                "Please message {prefix}join if you are interested in playing."
            )),
            GameError::NotDealer { dealer, .. } => {
                Some(format!("Please wait for {dealer} to {prefix}deal."))
            }
            GameError::UnknownOption(_) => Some(format!(
                "Message {prefix}options to see the list of options."
            )),
            _ => None,
        };
        std::iter::once(self.to_string()).chain(hint).collect()
    }
}
