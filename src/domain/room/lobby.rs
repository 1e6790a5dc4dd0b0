//! §4.3.1 lobby operations and §4.3.2 match start.

use crate::domain::room::errors::RoomError;
use crate::domain::room::round::start_new_round;
use crate::domain::room::state::{PlayerId, PlayerInfo, Room};

impl Room {
    /// Idempotent on an existing id; fails once the match has started or the
    /// room is full.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        display_name: String,
        avatar: Option<String>,
    ) -> Result<(), RoomError> {
        if self.has_player(&id) {
            return Ok(());
        }
        if self.started {
            return Err(RoomError::GameAlreadyStarted);
        }
        if self.players.len() >= self.config.max_players as usize {
            return Err(RoomError::RoomFull);
        }
        let seat = self.players.len();
        self.players.push(PlayerInfo {
            id: id.clone(),
            display_name,
            avatar,
            seat,
        });
        self.match_state.scores.entry(id.clone()).or_insert(0);
        self.match_state.game_wins.entry(id).or_insert(0);
        Ok(())
    }

    /// A no-op for a non-member. Clamps `turn_index` if removal shifts seats
    /// out from under the current turn; empties the room back to lobby state
    /// if the roster becomes empty.
    pub fn remove_player(&mut self, id: &str) {
        let Some(pos) = self.seat_of(id) else {
            return;
        };
        self.players.remove(pos);
        for (new_seat, p) in self.players.iter_mut().enumerate() {
            p.seat = new_seat;
        }
        self.match_state.scores.remove(id);
        self.match_state.game_wins.remove(id);

        if self.players.is_empty() {
            self.started = false;
            if let Some(round) = &mut self.round {
                round.round_active = false;
            }
            return;
        }

        if let Some(round) = &mut self.round {
            if round.turn_index >= self.players.len() {
                round.turn_index = 0;
            } else if round.turn_index > pos {
                round.turn_index -= 1;
            }
            round.hands.remove(id);
            round.taken.remove(id);
            round.declared_combos.remove(id);
        }
        if self.dealer_index >= self.players.len() {
            self.dealer_index = 0;
        }
    }

    /// Freezes the roster, picks a random dealer, and deals the first round.
    pub fn start(&mut self, now_ms: u64) -> Result<(), RoomError> {
        let required = self.config.variant_min().min(self.config.max_players).max(2);
        if (self.players.len() as u8) < required {
            return Err(RoomError::NotEnoughPlayers);
        }

        self.match_state = Default::default();
        for p in &self.players {
            self.match_state.scores.insert(p.id.clone(), 0);
            self.match_state.game_wins.insert(p.id.clone(), 0);
        }
        self.total_rounds = 0;
        self.last_trick_winner_id = None;
        self.match_id = Some(self.next_match_id());

        let n = self.players.len();
        self.dealer_index = (rand_below(&mut self.rng, n as u32)) as usize;

        self.started = true;
        start_new_round(self, true, now_ms);
        Ok(())
    }
}

fn rand_below(rng: &mut impl rand::RngCore, bound: u32) -> u32 {
    use rand::Rng;
    rng.random_range(0..bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table_config::TableConfig;

    fn room() -> Room {
        Room::new("r1", "Table", TableConfig::default())
    }

    #[test]
    fn add_player_is_idempotent() {
        let mut r = room();
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        assert_eq!(r.player_count(), 1);
    }

    #[test]
    fn add_player_fails_once_started() {
        let mut r = room();
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        r.add_player("b".into(), "Bob".into(), None).unwrap();
        r.start(0).unwrap();
        assert_eq!(
            r.add_player("c".into(), "Carl".into(), None),
            Err(RoomError::GameAlreadyStarted)
        );
    }

    #[test]
    fn add_player_fails_when_full() {
        let mut cfg = TableConfig::default();
        cfg.max_players = 2;
        let mut r = Room::new("r1", "Table", cfg);
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        r.add_player("b".into(), "Bob".into(), None).unwrap();
        assert_eq!(
            r.add_player("c".into(), "Carl".into(), None),
            Err(RoomError::RoomFull)
        );
    }

    #[test]
    fn remove_nonmember_is_noop() {
        let mut r = room();
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        r.remove_player("ghost");
        assert_eq!(r.player_count(), 1);
    }

    #[test]
    fn remove_last_player_resets_to_lobby() {
        let mut r = room();
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        r.add_player("b".into(), "Bob".into(), None).unwrap();
        r.start(0).unwrap();
        r.remove_player("a");
        r.remove_player("b");
        assert!(!r.started);
        assert!(r.players.is_empty());
    }

    #[test]
    fn start_requires_at_least_two_players() {
        let mut r = room();
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        assert_eq!(r.start(0), Err(RoomError::NotEnoughPlayers));
    }

    #[test]
    fn start_deals_four_cards_each_and_reveals_trump() {
        let mut r = room();
        r.add_player("a".into(), "Alice".into(), None).unwrap();
        r.add_player("b".into(), "Bob".into(), None).unwrap();
        r.start(0).unwrap();
        let round = r.round.as_ref().unwrap();
        assert_eq!(round.hand_of("a").len(), 4);
        assert_eq!(round.hand_of("b").len(), 4);
        // 36 - 8 dealt = 28 remaining in the deck; the trump card stays in
        // the deque (at the back) and is drawn last, it is never removed.
        assert_eq!(round.deck.len(), 28);
    }
}
