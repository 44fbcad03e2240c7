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
use serde::Deserialize;

use crate::types::grade::Grade;
use crate::types::state::LearningState;

/// Tunable constants for the ease-factor algorithm. Every value can be
/// overridden from `collection.toml`.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Sm2Config {
    /// The lowest value the ease factor may reach.
    pub min_ease: f64,
    /// Ease factor delta after `Again`.
    pub ease_again: f64,
    /// Ease factor delta after `Hard`.
    pub ease_hard: f64,
    /// Ease factor delta after `Good`.
    pub ease_good: f64,
    /// Ease factor delta after `Easy`.
    pub ease_easy: f64,
    /// Relearning interval after a failed review, in minutes.
    pub relearn_minutes: i64,
    /// Interval after the first successful review, in days.
    pub first_interval_days: i64,
    /// Interval after the second successful review, in days.
    pub second_interval_days: i64,
}

impl Default for Sm2Config {
    fn default() -> Self {
        Self {
            min_ease: 1.3,
            ease_again: -0.20,
            ease_hard: -0.15,
            ease_good: 0.0,
            ease_easy: 0.15,
            relearn_minutes: 10,
            first_interval_days: 1,
            second_interval_days: 6,
        }
    }
}

impl Sm2Config {
    fn ease_delta(&self, grade: Grade) -> f64 {
        match grade {
            Grade::Again => self.ease_again,
            Grade::Hard => self.ease_hard,
            Grade::Good => self.ease_good,
            Grade::Easy => self.ease_easy,
        }
    }
}

/// Compute the ease factor, interval, and streak after one review.
///
/// A failed review resets the card to the relearning interval. The first two
/// successful reviews after a reset get fixed intervals; from the third
/// onwards the interval grows by the ease factor, scaled by the grade's
/// score. Growth never shrinks the interval: a `Hard` review on a card with
/// a low ease factor keeps the previous interval rather than losing ground.
pub fn review(config: &Sm2Config, state: &LearningState, grade: Grade) -> (f64, Duration, u32) {
    let ease = (state.ease_factor + config.ease_delta(grade)).max(config.min_ease);
    if !grade.is_success() {
        return (ease, Duration::minutes(config.relearn_minutes), 0);
    }
    let streak = state.streak + 1;
    let interval = match streak {
        1 => Duration::days(config.first_interval_days),
        2 => Duration::days(config.second_interval_days),
        _ => grown_interval(state.interval, ease, grade),
    };
    (ease, interval, streak)
}

fn grown_interval(previous: Duration, ease: f64, grade: Grade) -> Duration {
    let seconds = previous.num_seconds() as f64 * ease * grade.score();
    let grown = Duration::seconds(seconds.round() as i64);
    grown.max(previous)
}
