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
use std::io::stdin;
use std::time::Instant;

use chrono::Duration;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::Session;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::grade::Grade;
use crate::types::timestamp::Timestamp;

enum Input {
    Graded(Grade),
    Pause,
    End,
}

/// Drill the cards due right now in the terminal.
pub fn drill(directory: Option<String>) -> Fallible<()> {
    let collection = Collection::open(directory)?;
    println!("Drilling in {:?}.", collection.directory);
    let states = collection.states()?;
    let session_started_at = Timestamp::now();
    let mut session = Session::plan(
        &states,
        collection.config.policy(),
        collection.config.session_size,
        session_started_at,
    );
    if session.is_complete() {
        println!("No cards due.");
        return Ok(());
    }
    println!("{} cards due.", session.queue().len());

    let by_id: HashMap<CardId, &Card> = collection
        .cards
        .iter()
        .map(|card| (card.id(), card))
        .collect();
    'session: while let Some(card_id) = session.current_card() {
        let card = match by_id.get(&card_id) {
            Some(card) => card,
            None => break,
        };
        println!();
        println!(
            "[{}/{}] [{}] Q: {}",
            session.position() + 1,
            session.queue().len(),
            card.deck_name(),
            card.front()
        );
        println!("[press enter to reveal, q to end the session]");
        let shown_at = Instant::now();
        let mut paused_for = std::time::Duration::ZERO;
        if !read_reveal()? {
            break;
        }
        println!("A: {}", card.back());
        let grade = loop {
            match read_grade()? {
                Input::Graded(grade) => break grade,
                Input::End => break 'session,
                Input::Pause => {
                    // Time spent paused is not charged to the card.
                    session.pause();
                    println!("Paused. [press enter to resume]");
                    let pause_started = Instant::now();
                    let mut input = String::new();
                    stdin().read_line(&mut input)?;
                    session.resume();
                    paused_for += pause_started.elapsed();
                }
            }
        };
        let spent = shown_at.elapsed().saturating_sub(paused_for);
        let time_spent = Duration::milliseconds(spent.as_millis() as i64);
        session.advance(grade, time_spent, 0, Timestamp::now())?;
        if let Some(record) = session.records().last() {
            log::debug!(
                "{} {} ef={:.2} ivl={}s streak={}",
                &card_id.to_hex()[..8],
                record.grade.as_str(),
                record.state.ease_factor,
                record.state.interval.num_seconds(),
                record.state.streak
            );
        }
    }

    if !session.records().is_empty() {
        log::debug!("Session completed");
        collection
            .db
            .save_session(session_started_at, Timestamp::now(), session.records())?;
    }
    println!();
    println!("Session complete: {} reviews.", session.records().len());
    Ok(())
}

/// Returns false if the user ended the session instead of revealing.
fn read_reveal() -> Fallible<bool> {
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(input.trim() != "q")
}

fn read_grade() -> Fallible<Input> {
    loop {
        println!("Grade: (1 = Again, 2 = Hard, 3 = Good, 4 = Easy, p = pause, q = end session)");
        let mut input = String::new();
        stdin().read_line(&mut input)?;
        match input.trim() {
            "1" => return Ok(Input::Graded(Grade::Again)),
            "2" => return Ok(Input::Graded(Grade::Hard)),
            "3" => return Ok(Input::Graded(Grade::Good)),
            "4" => return Ok(Input::Graded(Grade::Easy)),
            "p" => return Ok(Input::Pause),
            "q" => return Ok(Input::End),
            _ => println!("Invalid input. Please enter a number between 1 and 4."),
        }
    }
}
