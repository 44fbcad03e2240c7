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

use std::collections::HashSet;
use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::CollectionConfig;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_deck;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::state::LearningState;

pub struct Collection {
    pub directory: PathBuf,
    pub config: CollectionConfig,
    pub db: Database,
    pub cards: Vec<Card>,
}

impl Collection {
    pub fn open(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = CollectionConfig::load(&directory)?;

        let db_path: PathBuf = directory.join("cadence.db");
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        let cards = {
            log::debug!("Loading deck...");
            let start = Instant::now();
            let cards = parse_deck(&directory)?;
            let end = Instant::now();
            let duration = end.duration_since(start).as_millis();
            log::debug!("Deck loaded in {duration}ms.");
            cards
        };

        // Cards in the deck but not in the database are new. Cards removed
        // from the deck keep their rows: the review log is append-only.
        let known: HashSet<CardId> = db.card_ids()?;
        for card in &cards {
            if !known.contains(&card.id()) {
                db.add_card(card)?;
            }
        }

        Ok(Self {
            directory,
            config,
            db,
            cards,
        })
    }

    /// Every card paired with its current statistics, in collection order.
    /// Never-reviewed cards get the default state.
    pub fn states(&self) -> Fallible<Vec<(CardId, LearningState)>> {
        let mut latest = self.db.latest_states()?;
        Ok(self
            .cards
            .iter()
            .map(|card| {
                let state = latest.remove(&card.id()).unwrap_or_default();
                (card.id(), state)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_open_non_existent_directory() {
        let result = Collection::open(Some("./derpherp".to_string()));
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_open_registers_new_cards() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join("deck.cards"),
            "Q: one?\nA: 1\n\nQ: two?\nA: 2\n",
        )?;
        let collection = Collection::open(Some(dir.path().display().to_string()))?;
        assert_eq!(collection.cards.len(), 2);
        assert_eq!(collection.db.card_count()?, 2);

        // Reopening does not duplicate them.
        drop(collection);
        let collection = Collection::open(Some(dir.path().display().to_string()))?;
        assert_eq!(collection.db.card_count()?, 2);
        Ok(())
    }

    #[test]
    fn test_states_default_for_unreviewed_cards() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("deck.cards"), "Q: one?\nA: 1\n")?;
        let collection = Collection::open(Some(dir.path().display().to_string()))?;
        let states = collection.states()?;
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].1, LearningState::new());
        Ok(())
    }

    #[test]
    fn test_config_is_read_from_directory() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("collection.toml"), "policy = \"sequential\"\n")?;
        write(dir.path().join("deck.cards"), "Q: one?\nA: 1\n")?;
        let collection = Collection::open(Some(dir.path().display().to_string()))?;
        assert_eq!(
            collection.config.policy,
            crate::config::PolicyKind::Sequential
        );
        Ok(())
    }
}
