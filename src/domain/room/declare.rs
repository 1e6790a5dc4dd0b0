//! §4.3.5 combination declarations.

use crate::domain::announcement::Announcement;
use crate::domain::combos::{is_bura, is_four_ends, is_molodka, is_moscow, Combo};
use crate::domain::room::errors::RoomError;
use crate::domain::room::state::Room;
use crate::domain::room::timeout::tick;

impl Room {
    /// Only valid before the round's first trick has started and before
    /// `combo_key` has been declared by this player already this round.
    pub fn declare_combination(
        &mut self,
        player_id: &str,
        combo_key: &str,
        now_ms: u64,
    ) -> Result<(), RoomError> {
        tick(self, now_ms);

        let combo = Combo::parse(combo_key).ok_or(RoomError::UnknownCombination)?;
        if combo == Combo::FourEnds && !self.config.enable_four_ends {
            return Err(RoomError::CombinationNotEnabled);
        }

        let round = self.round.as_mut().ok_or(RoomError::RoundNotActive)?;
        if !round.round_active {
            return Err(RoomError::RoundNotActive);
        }
        if round.reveal.is_some() {
            return Err(RoomError::AwaitReveal);
        }
        if round.trick_index_counter > 0 {
            return Err(RoomError::TrickAlreadyStarted);
        }
        let declared = round.declared_combos.entry(player_id.to_string()).or_default();
        if declared.contains(&combo) {
            return Err(RoomError::CombinationAlreadyDeclared);
        }

        let hand = round.hand_of(player_id).to_vec();
        let trump = round.trump;
        let recognized = match combo {
            Combo::Bura => is_bura(&hand, trump),
            Combo::Molodka => is_molodka(&hand, trump),
            Combo::Moscow => is_moscow(&hand, trump),
            Combo::FourEnds => is_four_ends(&hand),
        };
        if !recognized {
            return Err(RoomError::CombinationCardsMissing);
        }

        round
            .declared_combos
            .get_mut(player_id)
            .unwrap()
            .insert(combo);
        round.announcements.push(Announcement {
            player_id: player_id.to_string(),
            combo,
            cards: hand,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Room;
    use crate::domain::cards_types::{Card, Rank, Suit};
    use crate::domain::room::errors::RoomError;
    use crate::domain::table_config::TableConfig;

    fn room() -> Room {
        let mut r = Room::new("r1", "Table", TableConfig::default());
        r.add_player("a".into(), "A".into(), None).unwrap();
        r.add_player("b".into(), "B".into(), None).unwrap();
        r.start(0).unwrap();
        r
    }

    #[test]
    fn s4_declare_bura_then_reject_duplicate() {
        let mut r = room();
        r.round.as_mut().unwrap().trump = Suit::Clubs;
        r.round.as_mut().unwrap().hands.insert(
            "a".into(),
            vec![
                Card::new(Suit::Clubs, Rank::Ace),
                Card::new(Suit::Clubs, Rank::King),
                Card::new(Suit::Clubs, Rank::Queen),
                Card::new(Suit::Clubs, Rank::Jack),
            ],
        );
        r.declare_combination("a", "bura", 0).unwrap();
        assert_eq!(r.round.as_ref().unwrap().announcements.len(), 1);
        assert_eq!(
            r.declare_combination("a", "bura", 0),
            Err(RoomError::CombinationAlreadyDeclared)
        );
    }

    #[test]
    fn rejects_once_a_trick_has_started() {
        let mut r = room();
        r.round.as_mut().unwrap().trick_index_counter = 1;
        assert_eq!(
            r.declare_combination("a", "bura", 0),
            Err(RoomError::TrickAlreadyStarted)
        );
    }

    #[test]
    fn allowed_again_between_tricks_is_still_rejected_once_the_round_has_one_trick_closed() {
        // `trick_index_counter` only ever increments (§4.3.6), so it latches
        // "has the first trick of this round started" for the whole round
        // even after a trick closes and `current_trick` goes back to `None`
        // during the reveal window.
        let mut r = room();
        r.round.as_mut().unwrap().current_trick = None;
        r.round.as_mut().unwrap().trick_index_counter = 1;
        assert_eq!(
            r.declare_combination("a", "bura", 0),
            Err(RoomError::TrickAlreadyStarted)
        );
    }

    #[test]
    fn unknown_combo_key_is_rejected() {
        let mut r = room();
        assert_eq!(
            r.declare_combination("a", "nonsense", 0),
            Err(RoomError::UnknownCombination)
        );
    }
}
