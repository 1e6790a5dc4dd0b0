//! §4.3.11 viewer-scoped snapshot projection: the only read path into a
//! Room, and the shape serialized into the `{type:"state"}` wire frame.

use serde::Serialize;

use crate::domain::cards_types::{Card, Suit};
use crate::domain::combos::Combo;
use crate::domain::room::state::{PlayerId, Room};
use crate::domain::room::timeout::tick;
use crate::domain::table_config::{DiscardVisibility, TableConfig};
use crate::domain::trick::Play;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: Option<String>,
    pub seat: usize,
    pub hand_count: usize,
    pub taken_count: usize,
    /// Always `false` from Room's own point of view; the Hub (§4.5) flips
    /// this on for players currently inside the disconnect-grace window,
    /// since only it tracks transport-level liveness.
    pub disconnected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayView {
    pub player_id: PlayerId,
    pub seat: usize,
    pub outcome: &'static str,
    pub is_owner: bool,
    pub card_count: usize,
    /// `None` when `discardVisibility` hides a non-owner's partial/discard
    /// response from this viewer.
    pub cards: Option<Vec<Card>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickView {
    pub trick_index: u32,
    pub leader_id: PlayerId,
    pub leader_seat: usize,
    pub required_count: usize,
    pub owner_id: PlayerId,
    pub owner_seat: usize,
    pub plays: Vec<PlayView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealView {
    pub trick: TrickView,
    pub winner_id: PlayerId,
    pub reveal_until_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub attacker_cards: Vec<Card>,
    pub defender_plays: Vec<PlayView>,
    pub reveal_until_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatTurnInfo {
    pub seat: usize,
    pub player_id: PlayerId,
    pub is_current_turn: bool,
    pub turn_deadline_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
    pub player_id: PlayerId,
    pub combo: Combo,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_id: String,
    pub name: String,
    pub variant_key: Option<String>,
    pub config: TableConfig,
    pub players: Vec<PlayerView>,
    pub started: bool,
    pub viewer_hand: Vec<Card>,
    pub current_trick: Option<TrickView>,
    pub reveal: Option<RevealView>,
    pub board: Option<BoardView>,
    pub announcements: Vec<AnnouncementView>,
    pub deck_size: usize,
    pub trump: Option<Suit>,
    pub trump_card: Option<Card>,
    pub scores: std::collections::HashMap<PlayerId, u32>,
    pub game_wins: std::collections::HashMap<PlayerId, u32>,
    pub round_number: Option<u32>,
    pub trick_index: Option<u32>,
    pub turn_player_id: Option<PlayerId>,
    pub turn_deadline_ms: Option<u64>,
    pub turns: Vec<SeatTurnInfo>,
    pub match_over: bool,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub discard_pile: Option<Vec<Card>>,
}

impl RoomSnapshot {
    /// Flags the given players as mid-grace-window disconnects. Called by
    /// the Hub after `to_state`, which has no notion of transport liveness.
    pub fn mark_disconnected(&mut self, player_ids: impl IntoIterator<Item = PlayerId>) {
        let ids: std::collections::HashSet<PlayerId> = player_ids.into_iter().collect();
        for p in &mut self.players {
            if ids.contains(&p.id) {
                p.disconnected = true;
            }
        }
    }
}

impl Room {
    /// Runs the lazy timeout/reveal checks, then renders the state this
    /// `viewer_id` is allowed to see. Always acquires the room's exclusive
    /// lock at the call site since it can itself mutate state (§5).
    pub fn to_state(&mut self, viewer_id: &str, now_ms: u64) -> RoomSnapshot {
        tick(self, now_ms);
        self.render_state(viewer_id)
    }

    fn render_state(&self, viewer_id: &str) -> RoomSnapshot {
        let players = self
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id.clone(),
                display_name: p.display_name.clone(),
                avatar: p.avatar.clone(),
                seat: p.seat,
                hand_count: self.round.as_ref().map(|r| r.hand_of(&p.id).len()).unwrap_or(0),
                taken_count: self
                    .round
                    .as_ref()
                    .and_then(|r| r.taken.get(&p.id))
                    .map(Vec::len)
                    .unwrap_or(0),
                disconnected: false,
            })
            .collect();

        let viewer_hand = self
            .round
            .as_ref()
            .map(|r| r.hand_of(viewer_id).to_vec())
            .unwrap_or_default();

        let current_trick = self
            .round
            .as_ref()
            .and_then(|r| r.current_trick.as_ref())
            .map(|t| self.render_trick(t, viewer_id));

        let reveal = self
            .round
            .as_ref()
            .and_then(|r| r.reveal.as_ref())
            .map(|rv| RevealView {
                trick: self.render_trick(&rv.trick, viewer_id),
                winner_id: rv.winner_id.clone(),
                reveal_until_ms: rv.reveal_until_ms,
            });

        let board = current_trick
            .as_ref()
            .map(|t| BoardView {
                attacker_cards: self
                    .round
                    .as_ref()
                    .and_then(|r| r.current_trick.as_ref())
                    .map(|trick| trick.owner_cards.clone())
                    .unwrap_or_default(),
                defender_plays: t.plays.iter().filter(|p| !p.is_owner).cloned().collect(),
                reveal_until_ms: None,
            })
            .or_else(|| {
                reveal.as_ref().map(|rv| BoardView {
                    attacker_cards: rv
                        .trick
                        .plays
                        .iter()
                        .find(|p| p.is_owner)
                        .and_then(|p| p.cards.clone())
                        .unwrap_or_default(),
                    defender_plays: rv.trick.plays.iter().filter(|p| !p.is_owner).cloned().collect(),
                    reveal_until_ms: Some(rv.reveal_until_ms),
                })
            });

        let announcements = self
            .round
            .as_ref()
            .map(|r| {
                r.announcements
                    .iter()
                    .map(|a| AnnouncementView {
                        player_id: a.player_id.clone(),
                        combo: a.combo,
                        cards: a.cards.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let turns = self
            .round
            .as_ref()
            .map(|r| {
                self.players
                    .iter()
                    .map(|p| SeatTurnInfo {
                        seat: p.seat,
                        player_id: p.id.clone(),
                        is_current_turn: r.round_active && r.turn_index == p.seat,
                        turn_deadline_ms: (r.round_active && r.turn_index == p.seat)
                            .then_some(r.turn_deadline_ms),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let discard_pile = self.round.as_ref().and_then(|r| {
            (self.config.discard_visibility == DiscardVisibility::Open).then(|| r.discard_pile.clone())
        });

        RoomSnapshot {
            room_id: self.room_id.clone(),
            name: self.name.clone(),
            variant_key: self.variant_key.clone(),
            config: self.config,
            players,
            started: self.started,
            viewer_hand,
            current_trick,
            reveal,
            board,
            announcements,
            deck_size: self.round.as_ref().map(|r| r.deck.len()).unwrap_or(0),
            trump: self.round.as_ref().map(|r| r.trump),
            trump_card: self.round.as_ref().map(|r| r.trump_card),
            scores: self.match_state.scores.clone(),
            game_wins: self.match_state.game_wins.clone(),
            round_number: self.round.as_ref().map(|r| r.round_number),
            trick_index: self.round.as_ref().map(|r| r.trick_index_counter),
            turn_player_id: self.current_player_id().cloned(),
            turn_deadline_ms: self.round.as_ref().filter(|r| r.round_active).map(|r| r.turn_deadline_ms),
            turns,
            match_over: self.match_state.match_over,
            winners: self.match_state.winners.clone(),
            losers: self.match_state.losers.clone(),
            winner_id: self.match_state.winner_id.clone(),
            discard_pile,
        }
    }

    fn render_trick(&self, trick: &crate::domain::trick::Trick, viewer_id: &str) -> TrickView {
        TrickView {
            trick_index: trick.trick_index,
            leader_id: trick.leader_id.clone(),
            leader_seat: trick.leader_seat,
            required_count: trick.required_count,
            owner_id: trick.owner_id.clone(),
            owner_seat: trick.owner_seat,
            plays: trick.plays.iter().map(|p| self.render_play(p, viewer_id)).collect(),
        }
    }

    fn render_play(&self, play: &Play, viewer_id: &str) -> PlayView {
        let outcome = match play.outcome {
            crate::domain::evaluator::PlayOutcome::Lead => "lead",
            crate::domain::evaluator::PlayOutcome::Beat => "beat",
            crate::domain::evaluator::PlayOutcome::Partial => "partial",
            crate::domain::evaluator::PlayOutcome::Discard => "discard",
        };
        let always_visible = matches!(
            play.outcome,
            crate::domain::evaluator::PlayOutcome::Lead | crate::domain::evaluator::PlayOutcome::Beat
        );
        let visible = always_visible
            || play.player_id == viewer_id
            || self.config.discard_visibility == DiscardVisibility::Open;
        PlayView {
            player_id: play.player_id.clone(),
            seat: play.seat,
            outcome,
            is_owner: play.is_owner,
            card_count: play.cards.len(),
            cards: visible.then(|| play.cards.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards_types::Rank;
    use crate::domain::table_config::TableConfig;

    fn room() -> Room {
        let mut r = Room::new("r1", "Table", TableConfig::default());
        r.add_player("a".into(), "A".into(), None).unwrap();
        r.add_player("b".into(), "B".into(), None).unwrap();
        r.start(0).unwrap();
        r
    }

    #[test]
    fn viewer_sees_only_their_own_hand() {
        let mut r = room();
        let snap_a = r.to_state("a", 0);
        assert_eq!(snap_a.viewer_hand.len(), 4);
        assert_eq!(snap_a.players.iter().find(|p| p.id == "b").unwrap().hand_count, 4);
    }

    #[test]
    fn face_down_discard_hides_cards_from_non_owner() {
        let mut r = room();
        r.config.discard_visibility = DiscardVisibility::FaceDown;
        r.round.as_mut().unwrap().trump = Suit::Clubs;
        r.round.as_mut().unwrap().hands.insert(
            "a".into(),
            vec![Card::new(Suit::Spades, Rank::Queen), Card::new(Suit::Spades, Rank::Jack)],
        );
        r.round.as_mut().unwrap().hands.insert(
            "b".into(),
            vec![Card::new(Suit::Hearts, Rank::Six), Card::new(Suit::Hearts, Rank::Seven)],
        );
        r.play_cards("a", vec![Card::new(Suit::Spades, Rank::Queen), Card::new(Suit::Spades, Rank::Jack)], None, None, 0)
            .unwrap();
        r.play_cards("b", vec![Card::new(Suit::Hearts, Rank::Six), Card::new(Suit::Hearts, Rank::Seven)], None, None, 0)
            .unwrap();

        let snap_b = r.to_state("b", 0);
        let reveal = snap_b.reveal.expect("trick closed into reveal");
        let b_play = reveal.trick.plays.iter().find(|p| p.player_id == "b").unwrap();
        assert!(b_play.cards.is_none());
        let snap_owner = r.to_state("a", 0);
        let reveal_owner = snap_owner.reveal.expect("trick closed into reveal");
        let owner_own_play = reveal_owner.trick.plays.iter().find(|p| p.player_id == "a").unwrap();
        assert!(owner_own_play.cards.is_some());
    }
}
