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

use crate::types::timestamp::Timestamp;

/// The ease factor assigned to a card that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Per-card learning statistics. A plain value: the scheduler consumes one
/// and produces a fresh one, it never mutates in place.
#[derive(Clone, PartialEq, Debug)]
pub struct LearningState {
    /// The number of times the card has been reviewed.
    pub review_count: u32,
    /// The number of reviews with a successful grade.
    pub correct_count: u32,
    /// The number of reviews graded `Again`.
    pub incorrect_count: u32,
    /// When the card was last reviewed. `None` before the first review.
    pub last_reviewed_at: Option<Timestamp>,
    /// When the card is next due. `None` before the first review.
    pub next_review_at: Option<Timestamp>,
    /// Multiplicative interval growth rate, floored by the scheduler.
    pub ease_factor: f64,
    /// The duration until the card is next due.
    pub interval: Duration,
    /// Consecutive successful reviews. Reset to zero on `Again`.
    pub streak: u32,
}

impl LearningState {
    /// The state of a card that has never been reviewed.
    pub fn new() -> Self {
        Self {
            review_count: 0,
            correct_count: 0,
            incorrect_count: 0,
            last_reviewed_at: None,
            next_review_at: None,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: Duration::zero(),
            streak: 0,
        }
    }

    /// A card is due if it has never been reviewed, or its next review time
    /// has passed.
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.next_review_at {
            None => true,
            Some(due) => due <= now,
        }
    }
}

impl Default for LearningState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_new_card_defaults() {
        let state = LearningState::new();
        assert_eq!(state.review_count, 0);
        assert_eq!(state.correct_count, 0);
        assert_eq!(state.incorrect_count, 0);
        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.interval, Duration::zero());
        assert_eq!(state.streak, 0);
        assert!(state.last_reviewed_at.is_none());
        assert!(state.next_review_at.is_none());
    }

    #[test]
    fn test_new_card_is_due() {
        let now = Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());
        assert!(LearningState::new().is_due(now));
    }

    #[test]
    fn test_due_boundary() {
        let now = Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());
        let mut state = LearningState::new();
        state.next_review_at = Some(now);
        assert!(state.is_due(now));
        state.next_review_at = Some(now + Duration::seconds(1));
        assert!(!state.is_due(now));
    }
}
