//! L2: trick evaluator. Given a challenger's card-set and the current
//! owner's card-set plus trump, computes the maximum pairing where
//! challenger cards strictly beat owner cards, by exact backtracking
//! (owner hands are bounded at 4 cards so this is constant work).

use crate::domain::cards::rank_strength;
use crate::domain::cards_types::{Card, Suit};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PlayOutcome {
    Lead,
    Beat,
    Partial,
    Discard,
}

/// `a` beats `b` iff same suit and strictly higher strength, or `a` is trump
/// and `b` is not. Off-suit, non-trump never beats.
pub fn card_beats(a: Card, b: Card, trump: Suit) -> bool {
    if a.suit == b.suit {
        return rank_strength(a.rank) > rank_strength(b.rank);
    }
    a.suit == trump && b.suit != trump
}

/// Largest subset of `challenger` that can be paired injectively with
/// `owner` such that each pair's challenger card beats its owner card.
pub fn max_beat_count(challenger: &[Card], owner: &[Card], trump: Suit) -> usize {
    let mut used = vec![false; challenger.len()];
    backtrack(owner, 0, challenger, &mut used, trump)
}

fn backtrack(owner: &[Card], idx: usize, challenger: &[Card], used: &mut [bool], trump: Suit) -> usize {
    if idx == owner.len() {
        return 0;
    }
    // Leave this owner card unmatched.
    let mut best = backtrack(owner, idx + 1, challenger, used, trump);
    for (i, cand) in challenger.iter().enumerate() {
        if used[i] || !card_beats(*cand, owner[idx], trump) {
            continue;
        }
        used[i] = true;
        let with_match = 1 + backtrack(owner, idx + 1, challenger, used, trump);
        used[i] = false;
        if with_match > best {
            best = with_match;
        }
    }
    best
}

/// Classify a follower's response against the current owner's cards.
pub fn classify(challenger: &[Card], owner: &[Card], trump: Suit) -> PlayOutcome {
    let beats = max_beat_count(challenger, owner, trump);
    let required = owner.len();
    if beats == 0 {
        PlayOutcome::Discard
    } else if beats < required {
        PlayOutcome::Partial
    } else {
        PlayOutcome::Beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards_types::Rank::*;
    use crate::domain::cards_types::Suit::*;

    fn c(suit: crate::domain::cards_types::Suit, rank: crate::domain::cards_types::Rank) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn s1_full_beat_with_trumps() {
        // Trump = Clubs. A leads [Spade A, Spade K]; B plays [Club 10, Club 9].
        let owner = [c(Spades, Ace), c(Spades, King)];
        let challenger = [c(Clubs, Ten), c(Clubs, Nine)];
        assert_eq!(max_beat_count(&challenger, &owner, Clubs), 2);
        assert_eq!(classify(&challenger, &owner, Clubs), PlayOutcome::Beat);
    }

    #[test]
    fn s2_partial_response() {
        // A leads [Spade Q, Spade J]; B plays [Club 10, Spade 6].
        let owner = [c(Spades, Queen), c(Spades, Jack)];
        let challenger = [c(Clubs, Ten), c(Spades, Six)];
        assert_eq!(max_beat_count(&challenger, &owner, Clubs), 1);
        assert_eq!(classify(&challenger, &owner, Clubs), PlayOutcome::Partial);
    }

    #[test]
    fn discard_when_nothing_beats() {
        let owner = [c(Spades, Ace)];
        let challenger = [c(Hearts, King)];
        assert_eq!(max_beat_count(&challenger, &owner, Clubs), 0);
        assert_eq!(classify(&challenger, &owner, Clubs), PlayOutcome::Discard);
    }

    #[test]
    fn trump_beats_any_non_trump() {
        assert!(card_beats(c(Clubs, Six), c(Spades, Ace), Clubs));
    }

    #[test]
    fn off_suit_non_trump_never_beats() {
        assert!(!card_beats(c(Hearts, Ace), c(Spades, Six), Clubs));
    }

    #[test]
    fn one_challenger_card_can_only_cover_one_owner_card() {
        // Challenger has a single card beating only one of two owner cards:
        // injective matching caps the count at 1, not 2.
        let owner = [c(Spades, Six), c(Clubs, Six)];
        let challenger = [c(Spades, Ace)];
        assert_eq!(max_beat_count(&challenger, &owner, Diamonds), 1);
    }
}
