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

use std::fs::read_to_string;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;

/// Parse every `.cards` file under the collection directory. Files are
/// visited in name order, so collection order is stable across runs.
pub fn parse_deck(directory: &Path) -> Fallible<Vec<Card>> {
    let mut cards = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "cards") {
            let deck_name = match path.file_stem() {
                Some(stem) => stem.to_string_lossy().to_string(),
                None => continue,
            };
            let contents = read_to_string(path)?;
            parse_file(&deck_name, path, &contents, &mut cards)?;
        }
    }
    Ok(cards)
}

/// A deck file is a sequence of `Q:`/`A:` line pairs. Blank lines and lines
/// starting with `#` are skipped.
fn parse_file(
    deck_name: &str,
    path: &Path,
    contents: &str,
    cards: &mut Vec<Card>,
) -> Fallible<()> {
    let mut question: Option<String> = None;
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("Q:") {
            if question.is_some() {
                return fail(format!(
                    "{}:{}: 'Q:' line without a matching 'A:'",
                    path.display(),
                    number + 1
                ));
            }
            question = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("A:") {
            match question.take() {
                Some(front) => {
                    cards.push(Card::new(
                        deck_name.to_string(),
                        front,
                        rest.trim().to_string(),
                    ));
                }
                None => {
                    return fail(format!(
                        "{}:{}: 'A:' line without a preceding 'Q:'",
                        path.display(),
                        number + 1
                    ));
                }
            }
        } else {
            return fail(format!(
                "{}:{}: expected a 'Q:' or 'A:' line",
                path.display(),
                number + 1
            ));
        }
    }
    if question.is_some() {
        return fail(format!(
            "{}: file ends with a 'Q:' line without an 'A:'",
            path.display()
        ));
    }
    Ok(())
}
