//! Routes chat messages to the tables and turns replies into outgoing
//! messages.
//!
//! A command either succeeds completely or changes nothing: the channel's
//! game is snapshotted first and put back if the store or the renderer
//! fails after the engine has already accepted the command.

use chipbot_engine::{Actor, ChannelId, Game, GameError, PlayerId, Reply, TableConfig, Tables};
use thiserror::Error;

use crate::command::{self, Command, Reaction};
use crate::render::{AssetSource, HandRenderer, RenderError};
use crate::store::{Account, PlayerStore, Registration, StoreError, STARTING_BALANCE};

pub const FAILURE_LINE: &str =
    "Something went wrong while handling that command. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub channel: ChannelId,
    pub author: Actor,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingReaction {
    pub channel: ChannelId,
    pub author: Actor,
    pub emoji: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    Channel(ChannelId),
    Direct(PlayerId),
}

/// One message for the chat client to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub target: Target,
    pub lines: Vec<String>,
    /// PNG of the cards named in the reply's card line.
    pub image: Option<Vec<u8>>,
    pub reactions: Vec<String>,
}

impl Outgoing {
    fn say(channel: ChannelId, lines: Vec<String>) -> Self {
        Self {
            target: Target::Channel(channel),
            lines,
            image: None,
            reactions: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("{name}, you have not registered yet!")]
    NotRegistered { name: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub struct Dispatcher<S, A> {
    tables: Tables,
    store: S,
    renderer: HandRenderer<A>,
}

impl<S: PlayerStore, A: AssetSource> Dispatcher<S, A> {
    pub fn new(config: TableConfig, store: S, assets: A) -> Self {
        Self {
            tables: Tables::new(config),
            store,
            renderer: HandRenderer::new(assets),
        }
    }

    pub fn prefix(&self) -> &str {
        self.tables.prefix()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles one chat message. Messages not addressed to the bot yield
    /// nothing.
    pub fn handle(&mut self, msg: &Incoming) -> Vec<Outgoing> {
        let prefix = self.prefix().to_string();
        let command = match command::parse(&msg.text, &prefix) {
            None => return Vec::new(),
            Some(Ok(command)) => command,
            Some(Err(e)) => {
                tracing::debug!(channel = %msg.channel, error = %e, "unparsable command");
                return vec![Outgoing::say(msg.channel, e.lines(&prefix))];
            }
        };

        let span = tracing::info_span!(
            "command",
            channel = %msg.channel,
            player = %msg.author.id,
            command = command.name()
        );
        let _guard = span.enter();

        let snapshot = self.tables.snapshot(msg.channel);
        let result = self
            .execute(msg.channel, &msg.author, &command)
            .and_then(|reply| self.deliver(msg.channel, reply, command.reactions()));
        match result {
            Ok(out) => out,
            Err(e) => self.report(msg.channel, snapshot, e),
        }
    }

    /// Handles a reaction to one of the bot's messages.
    pub fn handle_reaction(&mut self, reaction: &IncomingReaction) -> Vec<Outgoing> {
        let Some(query) = Reaction::from_emoji(&reaction.emoji) else {
            return Vec::new();
        };
        let result = match query {
            Reaction::Balance => self.balance_lines(&reaction.author),
            Reaction::Info => self.info_lines(&reaction.author),
        };
        match result {
            Ok(lines) => vec![Outgoing::say(reaction.channel, lines)],
            Err(e) => {
                let snapshot = self.tables.snapshot(reaction.channel);
                self.report(reaction.channel, snapshot, e)
            }
        }
    }

    fn execute(
        &mut self,
        channel: ChannelId,
        author: &Actor,
        command: &Command,
    ) -> Result<Reply, DispatchError> {
        let reply = match command {
            Command::NewGame => {
                let stack = self.stack_of(author)?;
                self.tables.new_game(channel, author, stack)?
            }
            Command::Join => {
                let stack = self.stack_of(author)?;
                self.tables.with_game(channel, |g| g.join(author, stack))?
            }
            Command::Start => self.tables.with_game(channel, |g| g.start(author))?,
            Command::Deal => self.tables.with_game(channel, |g| g.deal(author))?,
            Command::Call => self.tables.with_game(channel, |g| g.call(author))?,
            Command::Raise(amount) => {
                let amount = *amount;
                self.tables
                    .with_game(channel, |g| g.raise_bet(author, amount))?
            }
            Command::Check => self.tables.with_game(channel, |g| g.check(author))?,
            Command::Fold => self.tables.with_game(channel, |g| g.fold(author))?,
            Command::AllIn => self.tables.with_game(channel, |g| g.all_in(author))?,
            Command::Stop => self.tables.with_game(channel, |g| g.stop(author))?,
            Command::Options => self.tables.show_options(channel),
            Command::Set { key, value } => self.tables.set_option(channel, *key, *value)?,
            Command::Help => Reply::new(vec![crate::command::help_text(self.prefix())]),
            Command::Balance => Reply::new(self.balance_lines(author)?),
            Command::Info => Reply::new(self.info_lines(author)?),
            Command::Register => {
                let line = match self.store.register(author.id)? {
                    Registration::Created => format!(
                        "Thank you for registering, {}! You start with {} chips.",
                        author.name, STARTING_BALANCE
                    ),
                    Registration::AlreadyRegistered => {
                        format!("{}, you have already registered!", author.name)
                    }
                };
                Reply::new(vec![line])
            }
            Command::Dealer => Reply::new(vec!["What do you wanna do?".to_string()]),
        };
        Ok(reply)
    }

    /// Renders every message of `reply` before returning any of them.
    fn deliver(
        &self,
        channel: ChannelId,
        reply: Reply,
        reactions: &[&str],
    ) -> Result<Vec<Outgoing>, DispatchError> {
        if let Some(settlement) = &reply.settlement {
            tracing::info!(pot = settlement.pot, winners = settlement.payouts.len(), "hand settled");
        }
        let public = self.renderer.render(reply.lines)?;
        let mut out = vec![Outgoing {
            target: Target::Channel(channel),
            lines: public.lines,
            image: public.image,
            reactions: reactions.iter().map(|r| r.to_string()).collect(),
        }];
        for (player, lines) in reply.private {
            let rendered = self.renderer.render(lines)?;
            out.push(Outgoing {
                target: Target::Direct(player),
                lines: rendered.lines,
                image: rendered.image,
                reactions: Vec::new(),
            });
        }
        Ok(out)
    }

    fn report(
        &mut self,
        channel: ChannelId,
        snapshot: Option<Game>,
        error: DispatchError,
    ) -> Vec<Outgoing> {
        let prefix = self.prefix().to_string();
        let lines = match &error {
            DispatchError::Game(e) => {
                tracing::debug!(kind = ?e.kind(), error = %e, "command rejected");
                e.lines(&prefix)
            }
            DispatchError::NotRegistered { .. } => {
                vec![error.to_string(), format!("Message {prefix}reg to register.")]
            }
            DispatchError::Store(_) | DispatchError::Render(_) => {
                self.tables.restore(channel, snapshot);
                tracing::error!(%channel, error = %error, "command failed, game restored");
                vec![FAILURE_LINE.to_string()]
            }
        };
        vec![Outgoing::say(channel, lines)]
    }

    fn account_of(&self, author: &Actor) -> Result<Account, DispatchError> {
        self.store
            .account(author.id)?
            .ok_or_else(|| DispatchError::NotRegistered {
                name: author.name.clone(),
            })
    }

    fn stack_of(&self, author: &Actor) -> Result<u32, DispatchError> {
        Ok(self.account_of(author)?.balance)
    }

    fn balance_lines(&self, author: &Actor) -> Result<Vec<String>, DispatchError> {
        let account = self.account_of(author)?;
        Ok(vec![format!("{} has {} chips.", author.name, account.balance)])
    }

    fn info_lines(&self, author: &Actor) -> Result<Vec<String>, DispatchError> {
        let account = self.account_of(author)?;
        Ok(vec![format!(
            "{} is level {} with {} experience and {} wins.",
            author.name, account.level, account.experience, account.wins
        )])
    }
}
