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

use crate::error::Fallible;
use crate::error::fail;
use crate::policy::Policy;
use crate::types::grade::Grade;
use crate::types::state::LearningState;
use crate::types::timestamp::Timestamp;

/// Apply one review to a card's statistics, producing the new statistics and
/// next due time.
///
/// Review times must be monotonic per card: `now` must not precede the last
/// recorded review. Violating this refuses the review and leaves the state
/// untouched.
pub fn compute_next_state(
    policy: &Policy,
    state: &LearningState,
    grade: Grade,
    now: Timestamp,
) -> Fallible<LearningState> {
    if let Some(last) = state.last_reviewed_at {
        if now < last {
            return fail("review time precedes the card's last review");
        }
    }
    let (ease_factor, interval, streak) = policy.review(state, grade);
    let (correct, incorrect) = if grade.is_success() { (1, 0) } else { (0, 1) };
    Ok(LearningState {
        review_count: state.review_count + 1,
        correct_count: state.correct_count + correct,
        incorrect_count: state.incorrect_count + incorrect,
        last_reviewed_at: Some(now),
        next_review_at: Some(now + interval),
        ease_factor,
        interval,
        streak,
    })
}
