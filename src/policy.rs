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

use chrono::Duration;
use rand::seq::SliceRandom;

use crate::leitner;
use crate::leitner::LeitnerConfig;
use crate::sm2;
use crate::sm2::Sm2Config;
use crate::types::card_id::CardId;
use crate::types::grade::Grade;
use crate::types::state::LearningState;
use crate::types::timestamp::Timestamp;

/// The scheduling policy governing a collection. A closed set: the policy is
/// chosen once per collection and applied uniformly to all its cards.
#[derive(Clone, Debug)]
pub enum Policy {
    /// Ease-factor interval growth.
    SpacedRepetition(Sm2Config),
    /// Fixed-box progression.
    Leitner(LeitnerConfig),
    /// Collection order, ignoring statistics.
    Sequential,
    /// A fresh random order every session.
    Shuffle,
}

impl Policy {
    /// The interval-growth rule: the ease factor, interval, and streak a
    /// card has after one review under this policy.
    pub fn review(&self, state: &LearningState, grade: Grade) -> (f64, Duration, u32) {
        match self {
            Policy::SpacedRepetition(config) => sm2::review(config, state, grade),
            Policy::Leitner(config) => leitner::review(config, state, grade),
            Policy::Sequential | Policy::Shuffle => bookkeeping_only(state, grade),
        }
    }

    /// Order a session's due set. `due` is in collection order; each entry
    /// carries the card's next review time, `None` for never-reviewed cards.
    pub fn order(&self, due: Vec<(CardId, Option<Timestamp>)>) -> Vec<CardId> {
        match self {
            Policy::SpacedRepetition(_) | Policy::Leitner(_) => {
                // Most overdue first; never-reviewed cards before everything.
                // The sort is stable, so ties keep collection order.
                let mut due = due;
                due.sort_by_key(|(_, next_review_at)| *next_review_at);
                due.into_iter().map(|(id, _)| id).collect()
            }
            Policy::Sequential => due.into_iter().map(|(id, _)| id).collect(),
            Policy::Shuffle => {
                let mut ids: Vec<CardId> = due.into_iter().map(|(id, _)| id).collect();
                ids.shuffle(&mut rand::rng());
                ids
            }
        }
    }
}

/// Sequential and shuffle sessions ignore due dates: counts and streak are
/// still tracked, but the card stays due immediately.
fn bookkeeping_only(state: &LearningState, grade: Grade) -> (f64, Duration, u32) {
    let streak = if grade.is_success() {
        state.streak + 1
    } else {
        0
    };
    (state.ease_factor, Duration::zero(), streak)
}
