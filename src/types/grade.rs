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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;

use crate::error::ErrorReport;
use crate::error::fail;

/// The outcome of a single review.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Grade {
    /// The card was not recalled at all.
    Again,
    /// The card was recalled with serious difficulty.
    Hard,
    /// The card was recalled correctly.
    Good,
    /// The card was recalled effortlessly.
    Easy,
}

impl Grade {
    /// The scoring weight used to scale interval growth.
    pub fn score(self) -> f64 {
        match self {
            Grade::Again => 0.0,
            Grade::Hard => 0.5,
            Grade::Good => 1.0,
            Grade::Easy => 1.5,
        }
    }

    /// Whether this grade counts as a successful recall.
    pub fn is_success(self) -> bool {
        self != Grade::Again
    }

    pub fn as_str(&self) -> &str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl TryFrom<String> for Grade {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            _ => fail(format!("Invalid grade: {}", value)),
        }
    }
}

impl ToSql for Grade {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Grade {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Grade::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores() {
        assert_eq!(Grade::Again.score(), 0.0);
        assert_eq!(Grade::Hard.score(), 0.5);
        assert_eq!(Grade::Good.score(), 1.0);
        assert_eq!(Grade::Easy.score(), 1.5);
    }

    #[test]
    fn test_success() {
        assert!(!Grade::Again.is_success());
        assert!(Grade::Hard.is_success());
        assert!(Grade::Good.is_success());
        assert!(Grade::Easy.is_success());
    }

    #[test]
    fn test_round_trip() -> crate::error::Fallible<()> {
        for grade in [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy] {
            assert_eq!(Grade::try_from(grade.as_str().to_string())?, grade);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_grade() {
        assert!(Grade::try_from("meh".to_string()).is_err());
    }
}
