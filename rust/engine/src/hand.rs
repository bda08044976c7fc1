use std::fmt;

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Category {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        };
        f.write_str(name)
    }
}

/// Strength of the best five-card hand. Field order makes the derived `Ord`
/// compare category first, then kickers high to low.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct HandRank {
    pub category: Category,
    pub kickers: [u8; 5],
}

impl HandRank {
    fn new(category: Category, ranks: impl IntoIterator<Item = u8>) -> Self {
        let mut kickers = [0u8; 5];
        for (slot, rank) in kickers.iter_mut().zip(ranks) {
            *slot = rank;
        }
        Self { category, kickers }
    }
}

/// Evaluates the best five-card hand available in `cards` (five to seven cards).
pub fn evaluate(cards: &[Card]) -> HandRank {
    let mut counts = [0u8; 15];
    let mut by_suit = [0u16; 4];
    let mut suit_len = [0u8; 4];
    let mut mask = 0u16;
    for card in cards {
        let r = card.rank.value();
        counts[r as usize] += 1;
        mask |= 1 << r;
        let s = card.suit as usize;
        by_suit[s] |= 1 << r;
        suit_len[s] += 1;
    }

    let flush = (0..4).find(|&s| suit_len[s] >= 5).map(|s| by_suit[s]);
    if let Some(high) = flush.and_then(straight_high) {
        return HandRank::new(Category::StraightFlush, [high]);
    }

    let with_count = |n: u8| -> Vec<u8> {
        (2..=14u8)
            .rev()
            .filter(|&r| counts[r as usize] >= n)
            .collect()
    };
    let quads = with_count(4);
    let trips = with_count(3);
    let pairs = with_count(2);

    if let Some(&q) = quads.first() {
        return HandRank::new(Category::FourOfAKind, [q].into_iter().chain(top(mask & !bit(q), 1)));
    }
    if let Some(&t) = trips.first() {
        if let Some(&p) = pairs.iter().find(|&&p| p != t) {
            return HandRank::new(Category::FullHouse, [t, p]);
        }
    }
    if let Some(suited) = flush {
        return HandRank::new(Category::Flush, top(suited, 5));
    }
    if let Some(high) = straight_high(mask) {
        return HandRank::new(Category::Straight, [high]);
    }
    if let Some(&t) = trips.first() {
        return HandRank::new(Category::ThreeOfAKind, [t].into_iter().chain(top(mask & !bit(t), 2)));
    }
    match pairs.as_slice() {
        [high, low, ..] => HandRank::new(
            Category::TwoPair,
            [*high, *low]
                .into_iter()
                .chain(top(mask & !bit(*high) & !bit(*low), 1)),
        ),
        [p] => HandRank::new(Category::OnePair, [*p].into_iter().chain(top(mask & !bit(*p), 3))),
        [] => HandRank::new(Category::HighCard, top(mask, 5)),
    }
}

fn bit(rank: u8) -> u16 {
    1 << rank
}

fn top(mask: u16, n: usize) -> impl Iterator<Item = u8> {
    (2..=14u8).rev().filter(move |&r| mask & bit(r) != 0).take(n)
}

fn straight_high(mask: u16) -> Option<u8> {
    // ace also plays low
    let mask = if mask & bit(14) != 0 { mask | bit(1) } else { mask };
    (5..=14u8).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        mask & window == window
    })
}
