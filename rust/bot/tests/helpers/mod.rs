#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chipbot::render::{AssetSource, RenderError};
use chipbot::store::{Account, MemoryStore};
use chipbot::{Dispatcher, Incoming, IncomingReaction, Outgoing, Target};
use chipbot_engine::cards::full_deck;
use chipbot_engine::{Actor, ChannelId, PlayerId, TableConfig};
use image::{Rgba, RgbaImage};

pub const CARD_W: u32 = 4;
pub const CARD_H: u32 = 6;

/// Card pictures that tests can take away and put back mid-game.
#[derive(Clone, Default)]
pub struct SharedAssets(pub Rc<RefCell<HashMap<String, RgbaImage>>>);

impl SharedAssets {
    pub fn full() -> Self {
        let assets = Self::default();
        assets.restock();
        assets
    }

    pub fn restock(&self) {
        let mut map = self.0.borrow_mut();
        for card in full_deck() {
            map.insert(
                format!("{}.png", card.token()),
                RgbaImage::from_pixel(CARD_W, CARD_H, Rgba([200, 0, 0, 255])),
            );
        }
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl AssetSource for SharedAssets {
    fn load(&self, id: &str) -> Result<RgbaImage, RenderError> {
        self.0
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| RenderError::MissingAsset(id.to_string()))
    }
}

pub type TestBot = Dispatcher<MemoryStore, SharedAssets>;

pub const TABLE: ChannelId = ChannelId(1);

pub fn actor(n: u64) -> Actor {
    Actor::new(n, ["ann", "bo", "cy", "di"][(n as usize - 1) % 4])
}

/// A bot whose players 1..=`registered` already hold `balance` chips.
pub fn bot(registered: u64, balance: u32, assets: SharedAssets) -> TestBot {
    let mut store = MemoryStore::new();
    for id in 1..=registered {
        store = store.with_account(
            PlayerId(id),
            Account {
                balance,
                ..Account::default()
            },
        );
    }
    let config = TableConfig {
        seed: Some(21),
        ..TableConfig::default()
    };
    Dispatcher::new(config, store, assets)
}

pub fn say(bot: &mut TestBot, player: u64, text: &str) -> Vec<Outgoing> {
    bot.handle(&Incoming {
        channel: TABLE,
        author: actor(player),
        text: text.to_string(),
    })
}

pub fn react(bot: &mut TestBot, player: u64, emoji: &str) -> Vec<Outgoing> {
    bot.handle_reaction(&IncomingReaction {
        channel: TABLE,
        author: actor(player),
        emoji: emoji.to_string(),
    })
}

pub fn channel_lines(out: &[Outgoing]) -> Vec<String> {
    out.iter()
        .filter(|o| matches!(o.target, Target::Channel(_)))
        .flat_map(|o| o.lines.clone())
        .collect()
}

/// Seats players 1..=`n` and starts the game with player 1 as dealer.
pub fn started(bot: &mut TestBot, n: u64) {
    say(bot, 1, "!newgame");
    for id in 2..=n {
        say(bot, id, "!join");
    }
    say(bot, 1, "!start");
}

pub fn image_size(png: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(png).expect("valid png");
    (img.width(), img.height())
}
