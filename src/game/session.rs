use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use super::event::GameEvent;
use super::tile::{Outcome, PairId, Tile, TileState};
use crate::error::{Error, Result};
use crate::mode::ProjectionMode;
use crate::scheduler::{Scheduler, SessionId, Timer, TimerKind, Timings};
use crate::vocabulary::TranslationRecord;

pub const POINTS_PER_MATCH: u32 = 10;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Complete,
}

/// Snapshot handed to the render surface after each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub locked: bool,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPair {
    first: usize,
    second: usize,
    kind: TimerKind,
}

/// One play-through of the matching game.
///
/// Tile positions are fixed at construction. Only tile states, the selection,
/// the score and the lock change afterwards. At most one timed step
/// (evaluation, removal or reset) is outstanding at any moment; `locked`
/// stays set from the second selection until that pair has settled.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    mode: ProjectionMode,
    timings: Timings,
    tiles: Vec<Tile>,
    selection: Vec<usize>,
    pending: Option<PendingPair>,
    score: u32,
    matched_count: usize,
    locked: bool,
    phase: SessionPhase,
}

impl GameSession {
    /// Build a session from sampled words: one prompt and one solution tile
    /// per word, shuffled once with `rng`.
    pub fn new<R: Rng + ?Sized>(
        words: &[TranslationRecord],
        mode: ProjectionMode,
        timings: Timings,
        rng: &mut R,
    ) -> Result<Self> {
        let mut tiles: Vec<Tile> = words
            .iter()
            .enumerate()
            .flat_map(|(pair_id, word)| {
                let (prompt, solution) = mode.project(word);
                [Tile::new(prompt, pair_id), Tile::new(solution, pair_id)]
            })
            .collect();
        tiles.shuffle(rng);

        let session = Self::build(tiles, mode, timings)?;
        info!(
            session = session.id,
            mode = mode.id(),
            tiles = session.tiles.len(),
            "new matching session"
        );
        Ok(session)
    }

    /// Build a session from an explicit, already ordered layout.
    pub fn from_layout<S: Into<String>>(
        layout: Vec<(S, PairId)>,
        mode: ProjectionMode,
        timings: Timings,
    ) -> Result<Self> {
        let tiles = layout
            .into_iter()
            .map(|(content, pair_id)| Tile::new(content, pair_id))
            .collect();
        Self::build(tiles, mode, timings)
    }

    fn build(tiles: Vec<Tile>, mode: ProjectionMode, timings: Timings) -> Result<Self> {
        timings.validate()?;
        if tiles.is_empty() {
            return Err(Error::invalid("a session needs at least one word"));
        }
        if tiles.len() % 2 != 0 {
            return Err(Error::invalid(format!("odd tile count {}", tiles.len())));
        }
        let mut counts: HashMap<PairId, usize> = HashMap::new();
        for tile in &tiles {
            *counts.entry(tile.pair_id).or_insert(0) += 1;
        }
        if let Some((pair_id, n)) = counts.iter().find(|(_, n)| **n != 2) {
            return Err(Error::invalid(format!(
                "pair {pair_id} appears {n} times, expected 2"
            )));
        }

        Ok(Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            mode,
            timings,
            tiles,
            selection: Vec::with_capacity(2),
            pending: None,
            score: 0,
            matched_count: 0,
            locked: false,
            phase: SessionPhase::Active,
        })
    }

    /// Handle a click on `index`. Clicks on a locked board, on a tile that is
    /// not idle, or outside the board are ignored.
    pub fn select_tile(&mut self, index: usize, scheduler: &mut dyn Scheduler) -> Vec<GameEvent> {
        if self.phase == SessionPhase::Complete || self.locked {
            trace!(session = self.id, index, "click ignored: board locked");
            return vec![];
        }
        let Some(tile) = self.tiles.get_mut(index) else {
            trace!(session = self.id, index, "click ignored: out of range");
            return vec![];
        };
        if !tile.is_selectable() || self.selection.contains(&index) {
            trace!(session = self.id, index, state = ?tile.state, "click ignored");
            return vec![];
        }

        tile.state = TileState::Selected;
        self.selection.push(index);
        let mut events = vec![GameEvent::TileSelected { index }];

        if let [first, second] = self.selection[..] {
            self.locked = true;
            scheduler.schedule(
                self.timings.delay(TimerKind::Evaluate),
                Timer {
                    session: self.id,
                    kind: TimerKind::Evaluate,
                },
            );
            debug!(session = self.id, first, second, "evaluation scheduled");
            events.push(GameEvent::EvaluationScheduled { first, second });
        }
        events
    }

    /// Compare the two selected tiles and schedule their removal or reset.
    pub fn evaluate(&mut self, scheduler: &mut dyn Scheduler) -> Vec<GameEvent> {
        let [first, second] = self.selection[..] else {
            debug!(
                session = self.id,
                selected = self.selection.len(),
                "stale evaluation ignored"
            );
            if self.pending.is_none() {
                self.locked = false;
            }
            return vec![];
        };
        self.selection.clear();

        let is_match = self.tiles[first].pair_id == self.tiles[second].pair_id;
        let outcome = if is_match {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        let events = vec![
            GameEvent::Feedback {
                index: first,
                outcome,
            },
            GameEvent::Feedback {
                index: second,
                outcome,
            },
        ];

        let kind = if is_match {
            self.score += POINTS_PER_MATCH;
            self.tiles[first].state = TileState::MatchedPendingRemoval;
            self.tiles[second].state = TileState::MatchedPendingRemoval;
            TimerKind::Removal
        } else {
            TimerKind::Reset
        };
        debug!(session = self.id, first, second, ?outcome, score = self.score, "pair evaluated");

        self.pending = Some(PendingPair {
            first,
            second,
            kind,
        });
        scheduler.schedule(
            self.timings.delay(kind),
            Timer {
                session: self.id,
                kind,
            },
        );
        events
    }

    /// Take a matched pair off the board and unlock it.
    pub fn complete_removal(&mut self) -> Vec<GameEvent> {
        let Some(pair) = self.take_pending(TimerKind::Removal) else {
            return vec![];
        };
        self.tiles[pair.first].state = TileState::Removed;
        self.tiles[pair.second].state = TileState::Removed;
        self.matched_count += 2;
        self.locked = false;

        let mut events = vec![GameEvent::PairRemoved {
            first: pair.first,
            second: pair.second,
        }];
        if self.matched_count == self.tiles.len() {
            self.phase = SessionPhase::Complete;
            info!(session = self.id, score = self.score, "matching session complete");
            events.push(GameEvent::Completed { score: self.score });
        }
        events
    }

    /// Return a mismatched pair to idle and unlock the board.
    pub fn complete_reset(&mut self) -> Vec<GameEvent> {
        let Some(pair) = self.take_pending(TimerKind::Reset) else {
            return vec![];
        };
        self.tiles[pair.first].state = TileState::Idle;
        self.tiles[pair.second].state = TileState::Idle;
        self.locked = false;

        vec![GameEvent::PairReset {
            first: pair.first,
            second: pair.second,
        }]
    }

    /// Dispatch a fired timer. Timers addressed to another session are dropped.
    pub fn fire(&mut self, timer: Timer, scheduler: &mut dyn Scheduler) -> Vec<GameEvent> {
        if timer.session != self.id {
            debug!(
                session = self.id,
                timer_session = timer.session,
                "timer for discarded session ignored"
            );
            return vec![];
        }
        match timer.kind {
            TimerKind::Evaluate => self.evaluate(scheduler),
            TimerKind::Removal => self.complete_removal(),
            TimerKind::Reset => self.complete_reset(),
        }
    }

    fn take_pending(&mut self, kind: TimerKind) -> Option<PendingPair> {
        match self.pending {
            Some(pair) if pair.kind == kind => self.pending.take(),
            _ => {
                debug!(session = self.id, ?kind, "no matching pending pair");
                None
            }
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn total_pairs(&self) -> usize {
        self.tiles.len() / 2
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            matched_pairs: self.matched_count / 2,
            total_pairs: self.total_pairs(),
            locked: self.locked,
            complete: self.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        scheduled: Vec<(Duration, Timer)>,
    }

    impl Scheduler for Recorder {
        fn schedule(&mut self, after: Duration, timer: Timer) {
            self.scheduled.push((after, timer));
        }
    }

    fn word(hanzi: &str, pinyin: &str) -> TranslationRecord {
        TranslationRecord {
            hanzi: hanzi.to_string(),
            pinyin: pinyin.to_string(),
            english: format!("{hanzi}-en"),
            spanish: format!("{hanzi}-es"),
        }
    }

    fn three_words() -> Vec<TranslationRecord> {
        vec![word("水", "shuǐ"), word("火", "huǒ"), word("土", "tǔ")]
    }

    // Layout: 0/1 are pair 0, 2/3 are pair 1.
    fn fixed() -> GameSession {
        GameSession::from_layout(
            vec![("shuǐ", 0), ("水", 0), ("huǒ", 1), ("火", 1)],
            ProjectionMode::PinyinHanzi,
            Timings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_session_from_three_words() {
        let mut rng = StdRng::seed_from_u64(11);
        let session = GameSession::new(
            &three_words(),
            ProjectionMode::PinyinHanzi,
            Timings::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(session.tiles().len(), 6);
        let mut counts: HashMap<PairId, usize> = HashMap::new();
        for tile in session.tiles() {
            *counts.entry(tile.pair_id).or_default() += 1;
            assert_eq!(tile.state, TileState::Idle);
        }
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&n| n == 2));

        assert_eq!(session.score(), 0);
        assert_eq!(session.matched_count(), 0);
        assert!(!session.is_locked());
        assert!(session.selection().is_empty());
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_pairs_share_projected_content() {
        let mut rng = StdRng::seed_from_u64(3);
        let session = GameSession::new(
            &three_words(),
            ProjectionMode::PinyinHanzi,
            Timings::default(),
            &mut rng,
        )
        .unwrap();

        for pair_id in 0..3 {
            let mut contents: Vec<&str> = session
                .tiles()
                .iter()
                .filter(|t| t.pair_id == pair_id)
                .map(|t| t.content.as_str())
                .collect();
            contents.sort();
            let w = &three_words()[pair_id];
            let mut expected = vec![w.pinyin.as_str(), w.hanzi.as_str()];
            expected.sort();
            assert_eq!(contents, expected);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let make = |seed| {
            GameSession::new(
                &three_words(),
                ProjectionMode::HanziEnglish,
                Timings::default(),
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap()
        };
        assert_eq!(make(99).tiles(), make(99).tiles());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(fixed().id(), fixed().id());
    }

    #[test]
    fn test_rejects_empty_word_list() {
        let err = GameSession::new(
            &[],
            ProjectionMode::PinyinHanzi,
            Timings::default(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert_matches!(err, Error::InvalidConfiguration(_));
    }

    #[test]
    fn test_rejects_odd_layout() {
        let err = GameSession::from_layout(
            vec![("a", 0), ("b", 0), ("c", 1)],
            ProjectionMode::PinyinHanzi,
            Timings::default(),
        )
        .unwrap_err();
        assert_matches!(err, Error::InvalidConfiguration(m) if m.contains("odd"));
    }

    #[test]
    fn test_rejects_unbalanced_pairs() {
        let err = GameSession::from_layout(
            vec![("a", 0), ("b", 0), ("c", 0), ("d", 1)],
            ProjectionMode::PinyinHanzi,
            Timings::default(),
        )
        .unwrap_err();
        assert_matches!(err, Error::InvalidConfiguration(_));
    }

    #[test]
    fn test_rejects_invalid_timings() {
        let err = GameSession::from_layout(
            vec![("a", 0), ("b", 0)],
            ProjectionMode::PinyinHanzi,
            Timings {
                evaluate_ms: 0,
                removal_ms: 1,
                reset_ms: 1,
            },
        )
        .unwrap_err();
        assert_matches!(err, Error::InvalidConfiguration(_));
    }

    #[test]
    fn test_first_selection_does_not_schedule() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        let events = s.select_tile(0, &mut rec);

        assert_eq!(events, vec![GameEvent::TileSelected { index: 0 }]);
        assert_eq!(s.tiles()[0].state, TileState::Selected);
        assert_eq!(s.selection(), &[0]);
        assert!(!s.is_locked());
        assert!(rec.scheduled.is_empty());
    }

    #[test]
    fn test_second_selection_locks_and_schedules_evaluation() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        let events = s.select_tile(2, &mut rec);

        assert_eq!(
            events,
            vec![
                GameEvent::TileSelected { index: 2 },
                GameEvent::EvaluationScheduled {
                    first: 0,
                    second: 2
                },
            ]
        );
        assert!(s.is_locked());
        assert_eq!(
            rec.scheduled,
            vec![(
                Duration::from_millis(500),
                Timer {
                    session: s.id(),
                    kind: TimerKind::Evaluate
                }
            )]
        );
    }

    #[test]
    fn test_duplicate_click_ignored() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(1, &mut rec);
        assert!(s.select_tile(1, &mut rec).is_empty());
        assert_eq!(s.selection(), &[1]);
        assert!(!s.is_locked());
    }

    #[test]
    fn test_out_of_range_click_ignored() {
        let mut s = fixed();
        let mut rec = Recorder::default();
        assert!(s.select_tile(17, &mut rec).is_empty());
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_third_click_while_locked_ignored() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        s.select_tile(2, &mut rec);
        assert!(s.select_tile(3, &mut rec).is_empty());

        assert_eq!(s.selection(), &[0, 2]);
        assert_eq!(s.tiles()[3].state, TileState::Idle);
        assert_eq!(rec.scheduled.len(), 1);
    }

    #[test]
    fn test_match_flow() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        s.select_tile(1, &mut rec);
        let events = s.evaluate(&mut rec);

        assert_eq!(
            events,
            vec![
                GameEvent::Feedback {
                    index: 0,
                    outcome: Outcome::Correct
                },
                GameEvent::Feedback {
                    index: 1,
                    outcome: Outcome::Correct
                },
            ]
        );
        assert_eq!(s.score(), 10);
        assert_eq!(s.tiles()[0].state, TileState::MatchedPendingRemoval);
        assert_eq!(s.tiles()[1].state, TileState::MatchedPendingRemoval);
        assert!(s.selection().is_empty());
        assert!(s.is_locked());
        assert_eq!(rec.scheduled[1].0, Duration::from_millis(600));
        assert_eq!(rec.scheduled[1].1.kind, TimerKind::Removal);

        let events = s.complete_removal();
        assert_eq!(
            events,
            vec![GameEvent::PairRemoved {
                first: 0,
                second: 1
            }]
        );
        assert_eq!(s.tiles()[0].state, TileState::Removed);
        assert_eq!(s.tiles()[1].state, TileState::Removed);
        assert_eq!(s.matched_count(), 2);
        assert!(!s.is_locked());
        assert!(!s.is_complete());
    }

    #[test]
    fn test_mismatch_flow() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        s.select_tile(3, &mut rec);
        let events = s.evaluate(&mut rec);

        assert_matches!(
            events.as_slice(),
            [
                GameEvent::Feedback {
                    index: 0,
                    outcome: Outcome::Incorrect
                },
                GameEvent::Feedback {
                    index: 3,
                    outcome: Outcome::Incorrect
                }
            ]
        );
        assert_eq!(s.tiles()[0].state, TileState::Selected);
        assert_eq!(s.tiles()[3].state, TileState::Selected);
        assert!(s.is_locked());
        assert_eq!(rec.scheduled[1].0, Duration::from_millis(900));
        assert_eq!(rec.scheduled[1].1.kind, TimerKind::Reset);

        let events = s.complete_reset();
        assert_eq!(
            events,
            vec![GameEvent::PairReset {
                first: 0,
                second: 3
            }]
        );
        assert_eq!(s.tiles()[0].state, TileState::Idle);
        assert_eq!(s.tiles()[3].state, TileState::Idle);
        assert_eq!(s.score(), 0);
        assert!(!s.is_locked());

        // Both tiles can be picked again
        assert_eq!(s.select_tile(0, &mut rec).len(), 1);
    }

    #[test]
    fn test_clicks_ignored_until_pair_settles() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        s.select_tile(1, &mut rec);
        s.evaluate(&mut rec);

        assert!(s.select_tile(2, &mut rec).is_empty());
        assert!(s.select_tile(0, &mut rec).is_empty());

        s.complete_removal();
        assert_eq!(s.select_tile(2, &mut rec).len(), 1);
    }

    #[test]
    fn test_removed_tiles_never_reselected() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        s.select_tile(1, &mut rec);
        s.evaluate(&mut rec);
        s.complete_removal();

        assert!(s.select_tile(0, &mut rec).is_empty());
        assert!(s.select_tile(1, &mut rec).is_empty());
        assert_eq!(s.tiles()[0].state, TileState::Removed);
    }

    #[test]
    fn test_completion() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        for (a, b) in [(0, 1), (2, 3)] {
            s.select_tile(a, &mut rec);
            s.select_tile(b, &mut rec);
            s.evaluate(&mut rec);
            let events = s.complete_removal();
            if b == 3 {
                assert_eq!(events.last(), Some(&GameEvent::Completed { score: 20 }));
            }
        }

        assert!(s.is_complete());
        assert_eq!(s.matched_count(), 4);
        assert!(s.tiles().iter().all(|t| t.state == TileState::Removed));
        assert_eq!(
            s.summary(),
            GameSummary {
                score: 20,
                matched_pairs: 2,
                total_pairs: 2,
                locked: false,
                complete: true,
            }
        );
        for i in 0..4 {
            assert!(s.select_tile(i, &mut rec).is_empty());
        }
    }

    #[test]
    fn test_stale_evaluation_unlocks() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        assert!(s.evaluate(&mut rec).is_empty());
        assert!(!s.is_locked());
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_repeated_evaluation_keeps_lock_while_pending() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(0, &mut rec);
        s.select_tile(1, &mut rec);
        s.evaluate(&mut rec);
        assert!(s.evaluate(&mut rec).is_empty());

        assert!(s.is_locked());
        assert_eq!(s.score(), 10);
        assert_eq!(rec.scheduled.len(), 2);
    }

    #[test]
    fn test_completion_steps_are_idempotent() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        assert!(s.complete_removal().is_empty());
        assert!(s.complete_reset().is_empty());

        s.select_tile(0, &mut rec);
        s.select_tile(1, &mut rec);
        s.evaluate(&mut rec);

        // A reset cannot settle a pending removal
        assert!(s.complete_reset().is_empty());
        assert_eq!(s.complete_removal().len(), 1);
        assert!(s.complete_removal().is_empty());
        assert_eq!(s.matched_count(), 2);
    }

    #[test]
    fn test_fire_dispatches_by_kind() {
        let mut s = fixed();
        let mut rec = Recorder::default();

        s.select_tile(2, &mut rec);
        s.select_tile(3, &mut rec);
        let (_, evaluate) = rec.scheduled[0];
        s.fire(evaluate, &mut rec);
        let (_, removal) = rec.scheduled[1];
        let events = s.fire(removal, &mut rec);

        assert_eq!(
            events,
            vec![GameEvent::PairRemoved {
                first: 2,
                second: 3
            }]
        );
    }

    #[test]
    fn test_fire_ignores_other_sessions() {
        let mut old = fixed();
        let mut current = fixed();
        let mut rec = Recorder::default();

        old.select_tile(0, &mut rec);
        old.select_tile(1, &mut rec);
        let (_, stale) = rec.scheduled[0];

        current.select_tile(0, &mut rec);
        current.select_tile(1, &mut rec);
        assert!(current.fire(stale, &mut rec).is_empty());
        assert_eq!(current.score(), 0);
        assert!(current.is_locked());
        assert_eq!(current.selection(), &[0, 1]);
    }

    #[test]
    fn test_summary_while_locked() {
        let mut s = fixed();
        let mut rec = Recorder::default();
        s.select_tile(0, &mut rec);
        s.select_tile(2, &mut rec);
        let summary = s.summary();
        assert!(summary.locked);
        assert_eq!(summary.matched_pairs, 0);
        assert_eq!(summary.total_pairs, 2);
    }
}
