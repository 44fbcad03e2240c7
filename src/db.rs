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
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use chrono::Duration;
use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::session::ReviewRecord;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::state::LearningState;
use crate::types::timestamp::Timestamp;

/// The review log. Reviews are append-only: a card's current statistics are
/// the snapshot carried by its most recent review row, and a card with no
/// rows has never been reviewed.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Return the set of all card ids in the database.
    pub fn card_ids(&self) -> Fallible<HashSet<CardId>> {
        let mut ids = HashSet::new();
        let conn = self.acquire();
        let mut stmt = conn.prepare("select card_id from cards;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: CardId = row.get(0)?;
            ids.insert(id);
        }
        Ok(ids)
    }

    /// Add a new card to the database.
    pub fn add_card(&self, card: &Card) -> Fallible<()> {
        log::debug!("Adding new card: {}", card.id());
        let conn = self.acquire();
        let sql = "insert into cards (card_id, deck_name, front, back) values (?, ?, ?, ?);";
        conn.execute(
            sql,
            (card.id(), card.deck_name(), card.front(), card.back()),
        )?;
        Ok(())
    }

    /// The current statistics of every card that has been reviewed at least
    /// once: the snapshot from its latest review row. Cards with no rows are
    /// absent from the map.
    pub fn latest_states(&self) -> Fallible<HashMap<CardId, LearningState>> {
        let mut states = HashMap::new();
        let conn = self.acquire();
        let sql = "select card_id, review_count, correct_count, incorrect_count, \
                   recorded_at, due_at, ease_factor, interval_seconds, streak \
                   from reviews r \
                   where review_id = (select max(review_id) from reviews where card_id = r.card_id);";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: CardId = row.get(0)?;
            let recorded_at: Timestamp = row.get(4)?;
            let due_at: Timestamp = row.get(5)?;
            let interval_seconds: i64 = row.get(7)?;
            let state = LearningState {
                review_count: row.get(1)?,
                correct_count: row.get(2)?,
                incorrect_count: row.get(3)?,
                last_reviewed_at: Some(recorded_at),
                next_review_at: Some(due_at),
                ease_factor: row.get(6)?,
                interval: Duration::seconds(interval_seconds),
                streak: row.get(8)?,
            };
            states.insert(id, state);
        }
        Ok(states)
    }

    /// Save a study session and its reviews to the database.
    pub fn save_session(
        &self,
        started_at: Timestamp,
        ended_at: Timestamp,
        records: &[ReviewRecord],
    ) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let session_id = insert_session(&tx, started_at, ended_at)?;
        for record in records {
            insert_review(&tx, session_id, record)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn card_count(&self) -> Fallible<usize> {
        let conn = self.acquire();
        let count: i64 = conn.query_row("select count(*) from cards;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The number of reviews recorded at or after `since`.
    pub fn review_count_since(&self, since: Timestamp) -> Fallible<usize> {
        let conn = self.acquire();
        let sql = "select count(*) from reviews where recorded_at >= ?;";
        let count: i64 = conn.query_row(sql, [since], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

type SessionId = i64;

fn insert_session(
    tx: &Transaction,
    started_at: Timestamp,
    ended_at: Timestamp,
) -> Fallible<SessionId> {
    let sql = "insert into sessions (started_at, ended_at) values (?, ?) returning session_id;";
    let session_id: SessionId = tx.query_row(sql, (started_at, ended_at), |row| row.get(0))?;
    Ok(session_id)
}

fn insert_review(tx: &Transaction, session_id: SessionId, record: &ReviewRecord) -> Fallible<()> {
    let sql = "insert into reviews (session_id, card_id, recorded_at, grade, time_spent_ms, \
               hints_used, review_count, correct_count, incorrect_count, ease_factor, \
               interval_seconds, streak, due_at) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);";
    let state = &record.state;
    tx.execute(
        sql,
        (
            session_id,
            record.card_id,
            record.recorded_at,
            record.grade,
            record.time_spent.num_milliseconds(),
            record.hints_used,
            state.review_count,
            state.correct_count,
            state.incorrect_count,
            state.ease_factor,
            state.interval.num_seconds(),
            state.streak,
            state.next_review_at.unwrap_or(record.recorded_at),
        ),
    )?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;
    use crate::types::grade::Grade;

    fn open(dir: &std::path::Path) -> Fallible<Database> {
        let path = dir.join("cadence.db");
        Database::new(path.to_str().unwrap())
    }

    fn day(n: i64) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()) + Duration::days(n)
    }

    fn card() -> Card {
        Card::new("deck".to_string(), "q".to_string(), "a".to_string())
    }

    #[test]
    fn test_add_and_list_cards() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(dir.path())?;
        assert!(db.card_ids()?.is_empty());
        let card = card();
        db.add_card(&card)?;
        assert!(db.card_ids()?.contains(&card.id()));
        assert_eq!(db.card_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_unreviewed_card_has_no_state() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(dir.path())?;
        db.add_card(&card())?;
        assert!(db.latest_states()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_session_round_trip() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(dir.path())?;
        let card = card();
        db.add_card(&card)?;

        let state = LearningState {
            review_count: 1,
            correct_count: 1,
            incorrect_count: 0,
            last_reviewed_at: Some(day(0)),
            next_review_at: Some(day(1)),
            ease_factor: 2.5,
            interval: Duration::days(1),
            streak: 1,
        };
        let record = ReviewRecord {
            card_id: card.id(),
            grade: Grade::Good,
            state: state.clone(),
            time_spent: Duration::seconds(7),
            hints_used: 0,
            recorded_at: day(0),
        };
        db.save_session(day(0), day(0), &[record])?;

        let states = db.latest_states()?;
        assert_eq!(states.len(), 1);
        assert_eq!(states[&card.id()], state);
        Ok(())
    }

    #[test]
    fn test_latest_review_wins() -> Fallible<()> {
        let dir = tempdir()?;
        let db = open(dir.path())?;
        let card = card();
        db.add_card(&card)?;

        let mut first = LearningState::new();
        first.review_count = 1;
        first.correct_count = 1;
        first.last_reviewed_at = Some(day(0));
        first.next_review_at = Some(day(1));
        first.interval = Duration::days(1);
        first.streak = 1;
        let mut second = first.clone();
        second.review_count = 2;
        second.correct_count = 2;
        second.last_reviewed_at = Some(day(1));
        second.next_review_at = Some(day(7));
        second.interval = Duration::days(6);
        second.streak = 2;

        let records = [
            ReviewRecord {
                card_id: card.id(),
                grade: Grade::Good,
                state: first,
                time_spent: Duration::seconds(5),
                hints_used: 0,
                recorded_at: day(0),
            },
            ReviewRecord {
                card_id: card.id(),
                grade: Grade::Good,
                state: second.clone(),
                time_spent: Duration::seconds(3),
                hints_used: 1,
                recorded_at: day(1),
            },
        ];
        db.save_session(day(0), day(1), &records)?;

        let states = db.latest_states()?;
        assert_eq!(states[&card.id()], second);
        assert_eq!(db.review_count_since(day(1))?, 1);
        assert_eq!(db.review_count_since(day(0))?, 2);
        Ok(())
    }
}
