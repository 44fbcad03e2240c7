// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

use chrono::Duration;

use crate::error::Fallible;
use crate::error::fail;
use crate::policy::Policy;
use crate::scheduler::compute_next_state;
use crate::types::card_id::CardId;
use crate::types::grade::Grade;
use crate::types::state::LearningState;
use crate::types::timestamp::Timestamp;

/// One recorded review, including the post-review statistics snapshot so the
/// caller can persist it.
#[derive(Clone, Debug)]
pub struct ReviewRecord {
    pub card_id: CardId,
    pub grade: Grade,
    pub state: LearningState,
    pub time_spent: Duration,
    pub hints_used: u32,
    pub recorded_at: Timestamp,
}

/// An active study session: the queue of due cards selected at planning
/// time, the position within it, and the append-only review log.
pub struct Session {
    policy: Policy,
    states: HashMap<CardId, LearningState>,
    queue: Vec<CardId>,
    current_index: usize,
    records: Vec<ReviewRecord>,
    paused: bool,
}

impl Session {
    /// Select and order the cards due at `now`. `cards` is in collection
    /// order; at most `limit` cards enter the queue. An empty due set gives
    /// an immediately complete session.
    pub fn plan(
        cards: &[(CardId, LearningState)],
        policy: Policy,
        limit: usize,
        now: Timestamp,
    ) -> Self {
        let due: Vec<(CardId, Option<Timestamp>)> = cards
            .iter()
            .filter(|(_, state)| state.is_due(now))
            .map(|(id, state)| (*id, state.next_review_at))
            .collect();
        let mut queue = policy.order(due);
        queue.truncate(limit);
        let states = cards
            .iter()
            .filter(|(id, _)| queue.contains(id))
            .map(|(id, state)| (*id, state.clone()))
            .collect();
        Self {
            policy,
            states,
            queue,
            current_index: 0,
            records: Vec::new(),
            paused: false,
        }
    }

    /// The card currently being reviewed, or `None` when the session is
    /// complete.
    pub fn current_card(&self) -> Option<CardId> {
        self.queue.get(self.current_index).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index == self.queue.len()
    }

    /// Freeze the session. The queue keeps its order; `advance` is refused
    /// until `resume`.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Record a review of the current card: compute its new statistics,
    /// append to the review log, and move to the next card.
    pub fn advance(
        &mut self,
        grade: Grade,
        time_spent: Duration,
        hints_used: u32,
        now: Timestamp,
    ) -> Fallible<()> {
        if self.paused {
            return fail("session is paused");
        }
        let card_id = match self.current_card() {
            Some(id) => id,
            None => return fail("session is already complete"),
        };
        let state = match self.states.get(&card_id) {
            Some(state) => state,
            None => return fail("card is not part of this session"),
        };
        let new_state = compute_next_state(&self.policy, state, grade, now)?;
        self.records.push(ReviewRecord {
            card_id,
            grade,
            state: new_state.clone(),
            time_spent,
            hints_used,
            recorded_at: now,
        });
        self.states.insert(card_id, new_state);
        self.current_index += 1;
        Ok(())
    }

    pub fn queue(&self) -> &[CardId] {
        &self.queue
    }

    pub fn position(&self) -> usize {
        self.current_index
    }

    /// Reviews recorded so far, in order. Records are never rewritten.
    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::sm2::Sm2Config;

    fn id(n: u8) -> CardId {
        CardId::hash_bytes(&[n])
    }

    fn day(n: i64) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()) + Duration::days(n)
    }

    fn policy() -> Policy {
        Policy::SpacedRepetition(Sm2Config::default())
    }

    fn reviewed(due: Timestamp) -> LearningState {
        let mut state = LearningState::new();
        state.review_count = 1;
        state.correct_count = 1;
        state.last_reviewed_at = Some(due + Duration::days(-1));
        state.next_review_at = Some(due);
        state.interval = Duration::days(1);
        state.streak = 1;
        state
    }

    #[test]
    fn test_plan_selects_only_due_cards() {
        // Five cards, two due.
        let cards = vec![
            (id(1), reviewed(day(10))),
            (id(2), reviewed(day(-3))),
            (id(3), reviewed(day(20))),
            (id(4), reviewed(day(-1))),
            (id(5), reviewed(day(2))),
        ];
        let session = Session::plan(&cards, policy(), 100, day(0));
        // Most overdue first.
        assert_eq!(session.queue(), &[id(2), id(4)]);
    }

    #[test]
    fn test_plan_puts_never_reviewed_cards_first() {
        let cards = vec![
            (id(1), reviewed(day(-1))),
            (id(2), LearningState::new()),
        ];
        let session = Session::plan(&cards, policy(), 100, day(0));
        assert_eq!(session.queue(), &[id(2), id(1)]);
    }

    #[test]
    fn test_plan_respects_session_size() {
        let cards: Vec<(CardId, LearningState)> =
            (0..30u8).map(|n| (id(n), LearningState::new())).collect();
        let session = Session::plan(&cards, policy(), 20, day(0));
        assert_eq!(session.queue().len(), 20);
    }

    #[test]
    fn test_empty_due_set_is_complete_not_an_error() {
        let cards = vec![(id(1), reviewed(day(5)))];
        let session = Session::plan(&cards, policy(), 100, day(0));
        assert!(session.is_complete());
        assert!(session.current_card().is_none());
    }

    #[test]
    fn test_advance_records_and_moves_on() -> Fallible<()> {
        let cards = vec![
            (id(1), LearningState::new()),
            (id(2), LearningState::new()),
        ];
        let mut session = Session::plan(&cards, Policy::Sequential, 100, day(0));
        assert_eq!(session.current_card(), Some(id(1)));

        session.advance(Grade::Good, Duration::seconds(4), 0, day(0))?;
        assert_eq!(session.position(), 1);
        assert_eq!(session.current_card(), Some(id(2)));
        assert_eq!(session.records().len(), 1);
        let record = &session.records()[0];
        assert_eq!(record.card_id, id(1));
        assert_eq!(record.grade, Grade::Good);
        assert_eq!(record.state.review_count, 1);

        session.advance(Grade::Again, Duration::seconds(9), 1, day(0))?;
        assert!(session.is_complete());
        assert!(session.advance(Grade::Good, Duration::zero(), 0, day(0)).is_err());
        Ok(())
    }

    #[test]
    fn test_earlier_records_are_untouched_by_later_advances() -> Fallible<()> {
        let cards: Vec<(CardId, LearningState)> =
            (0..3u8).map(|n| (id(n), LearningState::new())).collect();
        let mut session = Session::plan(&cards, Policy::Sequential, 100, day(0));
        session.advance(Grade::Hard, Duration::seconds(2), 0, day(0))?;
        let first = session.records()[0].clone();
        session.advance(Grade::Easy, Duration::seconds(3), 0, day(0))?;
        session.advance(Grade::Good, Duration::seconds(5), 0, day(0))?;
        assert_eq!(session.records()[0].card_id, first.card_id);
        assert_eq!(session.records()[0].grade, first.grade);
        assert_eq!(session.records().len(), 3);
        Ok(())
    }

    #[test]
    fn test_pause_refuses_advance_and_keeps_order() -> Fallible<()> {
        let cards: Vec<(CardId, LearningState)> =
            (0..3u8).map(|n| (id(n), LearningState::new())).collect();
        let mut session = Session::plan(&cards, Policy::Sequential, 100, day(0));
        let queue_before: Vec<CardId> = session.queue().to_vec();
        session.pause();
        assert!(session.advance(Grade::Good, Duration::zero(), 0, day(0)).is_err());
        assert_eq!(session.position(), 0);
        session.resume();
        session.advance(Grade::Good, Duration::zero(), 0, day(0))?;
        assert_eq!(session.queue(), queue_before.as_slice());
        Ok(())
    }

    #[test]
    fn test_repeat_review_of_same_card_schedules_forward() -> Fallible<()> {
        // The same card can be planned again in a later session; its state
        // carries forward through the log.
        let cards = vec![(id(1), LearningState::new())];
        let mut session = Session::plan(&cards, policy(), 100, day(0));
        session.advance(Grade::Good, Duration::seconds(3), 0, day(0))?;
        let state = session.records()[0].state.clone();
        assert_eq!(state.next_review_at, Some(day(1)));

        let cards = vec![(id(1), state)];
        let mut session = Session::plan(&cards, policy(), 100, day(1));
        assert_eq!(session.queue(), &[id(1)]);
        session.advance(Grade::Good, Duration::seconds(3), 0, day(1))?;
        assert_eq!(session.records()[0].state.interval, Duration::days(6));
        Ok(())
    }
}
