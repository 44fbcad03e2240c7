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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    cards_in_deck_count: usize,
    cards_in_db_count: usize,
    due_count: usize,
    new_count: usize,
    today_review_count: usize,
}

pub fn print_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let collection = Collection::open(directory)?;
    let now = Timestamp::now();
    let states = collection.states()?;

    let stats = Stats {
        cards_in_deck_count: states.len(),
        cards_in_db_count: collection.db.card_count()?,
        due_count: states.iter().filter(|(_, s)| s.is_due(now)).count(),
        new_count: states.iter().filter(|(_, s)| s.review_count == 0).count(),
        today_review_count: collection.db.review_count_since(now.start_of_day())?,
    };

    match format {
        StatsFormat::Text => {
            println!("Cards in deck:  {}", stats.cards_in_deck_count);
            println!("Cards tracked:  {}", stats.cards_in_db_count);
            println!("Due now:        {}", stats.due_count);
            println!("Never reviewed: {}", stats.new_count);
            println!("Reviews today:  {}", stats.today_review_count);
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}
