//! L1: the 36-card deck, rank strength, point values, and the card catalog
//! key a front end would map to an image URL. Pure, no mutable state.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::cards_types::{Card, Rank, Suit};

/// Ordinal strength in 0..=8, weakest (Six) to strongest (Ace).
pub fn rank_strength(rank: Rank) -> u8 {
    Rank::ALL.iter().position(|r| *r == rank).expect("exhaustive") as u8
}

/// Trick-scoring point value of a rank.
pub fn point_of(rank: Rank) -> u32 {
    match rank {
        Rank::Ace => 11,
        Rank::Ten => 10,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Jack => 2,
        Rank::Nine | Rank::Eight | Rank::Seven | Rank::Six => 0,
    }
}

/// Canonical 36-card deck: four suits in declaration order, nine ranks each
/// in strength order.
pub fn make_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(36);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::new(suit, rank));
        }
    }
    deck
}

/// Fisher-Yates shuffle via `rand`, seeded from OS entropy through `SmallRng`.
pub fn shuffled_deck() -> Vec<Card> {
    let mut deck = make_deck();
    let mut rng = SmallRng::from_os_rng();
    deck.shuffle(&mut rng);
    deck
}

/// Pure catalog lookup standing in for the out-of-scope image-decoration
/// collaborator: maps (suit, rank) to a stable key a front end can resolve
/// to an asset URL. Performs no I/O.
pub fn card_image_key(suit: Suit, rank: Rank) -> String {
    let suit_key = match suit {
        Suit::Clubs => "clubs",
        Suit::Diamonds => "diamonds",
        Suit::Hearts => "hearts",
        Suit::Spades => "spades",
    };
    let rank_key = match rank {
        Rank::Six => "6",
        Rank::Seven => "7",
        Rank::Eight => "8",
        Rank::Nine => "9",
        Rank::Ten => "10",
        Rank::Jack => "jack",
        Rank::Queen => "queen",
        Rank::King => "king",
        Rank::Ace => "ace",
    };
    format!("{suit_key}_{rank_key}")
}
