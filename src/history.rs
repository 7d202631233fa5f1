//! Game history and the undo ledger.
//!
//! Two different records share this module. [`HistoryEntry`] is the
//! human-facing log: one French sentence per notable mutation, tagged
//! with its player and causal chain so a driver can group and render it.
//! [`Snapshot`] and [`Ledger`] are the undo machinery: a full copy of the
//! game plus the interaction queue, captured before each action executes.
//! Snapshots are cheap because every collection in [`Game`] is a
//! persistent structure sharing its guts with the live state.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, SequenceId};
use crate::interaction::InteractionQueue;
use crate::state::Game;

/// One line of the match log. Presentation contract: the message may
/// embed «card names» and resource keywords; the engine never parses it
/// back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub message: String,
    pub player: PlayerId,
    pub sequence: SequenceId,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(message: impl Into<String>, player: PlayerId, sequence: SequenceId) -> Self {
        Self { message: message.into(), player, sequence }
    }
}

/// Everything needed to restore the engine to an action boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game: Game,
    pub queue: InteractionQueue,
    pub sequence: SequenceId,
    /// History length at capture time; undo truncates back to it.
    pub history_len: usize,
}

/// Append-only snapshot stack, popped by undo.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    snapshots: Vec<Snapshot>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardLibrary};
    use crate::core::CardId;
    use crate::state::GameOptions;

    fn fixture_game() -> Game {
        let mut library = CardLibrary::new();
        for i in 0..12 {
            library.register(Card::new(CardId::new(i), format!("Carte {i}")));
        }
        Game::new(&["Ada", "Grace"], &library, GameOptions::default())
    }

    #[test]
    fn test_ledger_pops_in_reverse_order() {
        let game = fixture_game();
        let mut ledger = Ledger::new();

        for sequence in 1..=3u32 {
            ledger.record(Snapshot {
                game: game.clone(),
                queue: InteractionQueue::new(),
                sequence: SequenceId::new(sequence),
                history_len: 0,
            });
        }

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.pop().map(|s| s.sequence), Some(SequenceId::new(3)));
        assert_eq!(ledger.pop().map(|s| s.sequence), Some(SequenceId::new(2)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_snapshot_keeps_old_state_alive() {
        let mut game = fixture_game();
        let snapshot = Snapshot {
            game: game.clone(),
            queue: InteractionQueue::new(),
            sequence: SequenceId::new(1),
            history_len: 0,
        };

        game.player_mut(PlayerId::new(0)).gain_media(5);
        assert_eq!(snapshot.game.player(PlayerId::new(0)).media, 0);
        assert_eq!(game.player(PlayerId::new(0)).media, 5);
    }

    #[test]
    fn test_history_entry_round_trip() {
        let entry = HistoryEntry::new(
            "Joueur 1 gagne 2 crédits",
            PlayerId::new(0),
            SequenceId::new(4),
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
