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

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::leitner::LeitnerConfig;
use crate::policy::Policy;
use crate::sm2::Sm2Config;

/// Collection-level configuration, read from `collection.toml` in the deck
/// directory. A missing file, or any missing field, falls back to defaults.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CollectionConfig {
    /// Which scheduling policy governs this collection.
    pub policy: PolicyKind,
    /// The maximum number of cards in one session.
    pub session_size: usize,
    pub sm2: Sm2Config,
    pub leitner: LeitnerConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    SpacedRepetition,
    Leitner,
    Sequential,
    Shuffle,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            session_size: 20,
            sm2: Sm2Config::default(),
            leitner: LeitnerConfig::default(),
        }
    }
}

impl CollectionConfig {
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join("collection.toml");
        let config = if path.exists() {
            Self::parse(&read_to_string(&path)?)?
        } else {
            Self::default()
        };
        Ok(config)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: CollectionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Fallible<()> {
        if self.session_size == 0 {
            return fail("collection.toml: session-size must be positive");
        }
        if self.leitner.box_days.is_empty() {
            return fail("collection.toml: leitner box-days must not be empty");
        }
        if let Some(days) = self.leitner.box_days.iter().find(|days| **days <= 0) {
            return fail(format!(
                "collection.toml: leitner box interval must be positive, got {}",
                days
            ));
        }
        Ok(())
    }

    /// Instantiate the configured policy.
    pub fn policy(&self) -> Policy {
        match self.policy {
            PolicyKind::SpacedRepetition => Policy::SpacedRepetition(self.sm2.clone()),
            PolicyKind::Leitner => Policy::Leitner(self.leitner.clone()),
            PolicyKind::Sequential => Policy::Sequential,
            PolicyKind::Shuffle => Policy::Shuffle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_gives_defaults() -> Fallible<()> {
        let config = CollectionConfig::parse("")?;
        assert_eq!(config, CollectionConfig::default());
        assert_eq!(config.policy, PolicyKind::SpacedRepetition);
        assert_eq!(config.session_size, 20);
        Ok(())
    }

    #[test]
    fn test_policy_selection() -> Fallible<()> {
        let config = CollectionConfig::parse("policy = \"leitner\"")?;
        assert_eq!(config.policy, PolicyKind::Leitner);
        let config = CollectionConfig::parse("policy = \"shuffle\"")?;
        assert_eq!(config.policy, PolicyKind::Shuffle);
        Ok(())
    }

    #[test]
    fn test_constant_overrides() -> Fallible<()> {
        let content = r#"
policy = "spaced-repetition"
session-size = 50

[sm2]
min-ease = 1.5
relearn-minutes = 20

[leitner]
box-days = [1, 3, 9]
"#;
        let config = CollectionConfig::parse(content)?;
        assert_eq!(config.session_size, 50);
        assert_eq!(config.sm2.min_ease, 1.5);
        assert_eq!(config.sm2.relearn_minutes, 20);
        // Unspecified constants keep their defaults.
        assert_eq!(config.sm2.first_interval_days, 1);
        assert_eq!(config.leitner.box_days, vec![1, 3, 9]);
        Ok(())
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert!(CollectionConfig::parse("session-size = 0").is_err());
        assert!(CollectionConfig::parse("[leitner]\nbox-days = []").is_err());
        assert!(CollectionConfig::parse("[leitner]\nbox-days = [1, -2]").is_err());
        assert!(CollectionConfig::parse("policy = \"telepathy\"").is_err());
    }
}
