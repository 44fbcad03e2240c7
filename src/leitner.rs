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

/// Tunable constants for the fixed-box progression.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LeitnerConfig {
    /// Review interval for each box, in days. Promotion stops at the last
    /// box. Must not be empty.
    pub box_days: Vec<i64>,
}

impl Default for LeitnerConfig {
    fn default() -> Self {
        Self {
            box_days: vec![1, 2, 4, 7, 14],
        }
    }
}

/// Compute the ease factor, interval, and streak after one review.
///
/// The box index is the streak clamped to the box table: a success promotes
/// the card one box, a failure demotes it to box zero. The ease factor is
/// not used by this progression and passes through unchanged.
pub fn review(config: &LeitnerConfig, state: &LearningState, grade: Grade) -> (f64, Duration, u32) {
    let streak = if grade.is_success() {
        state.streak + 1
    } else {
        0
    };
    let box_index = (streak as usize).min(config.box_days.len() - 1);
    let interval = Duration::days(config.box_days[box_index]);
    (state.ease_factor, interval, streak)
}
