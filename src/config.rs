//! Dashboard configuration: series sources, currency style and goal cards
//!
//! Read from a JSON file. Every goal names one of the declared sources; the
//! projection mode and pacing strategy of each goal must be spelled out.

use crate::error::ConfigError;
use crate::format::CurrencyStyle;
use crate::projection::GoalConfig;
use crate::series::{SeriesSource, SourceFormat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A goal card bound to a named source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalEntry {
    /// Key into [`DashboardConfig::sources`]
    pub source: String,

    #[serde(flatten)]
    pub goal: GoalConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub currency: CurrencyStyle,

    /// Source name -> table location
    pub sources: BTreeMap<String, SeriesSource>,

    #[serde(default)]
    pub goals: Vec<GoalEntry>,
}

impl DashboardConfig {
    /// Read and validate a config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a config document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();

        for entry in &self.goals {
            let goal = &entry.goal;

            if !names.insert(goal.name.as_str()) {
                return Err(ConfigError::DuplicateGoal(goal.name.clone()));
            }

            if !self.sources.contains_key(&entry.source) {
                return Err(ConfigError::UnknownSource {
                    goal: goal.name.clone(),
                    source_name: entry.source.clone(),
                });
            }

            if let (Some(start), Some(end)) = (goal.period_start, goal.period_end) {
                if start > end {
                    return Err(ConfigError::InvertedPeriod {
                        goal: goal.name.clone(),
                        start,
                        end,
                    });
                }
            }
        }

        Ok(())
    }

    /// Point every SQLite source at `database`; returns how many were changed
    pub fn override_database(&mut self, database: &Path) -> usize {
        let mut changed = 0;
        for source in self.sources.values_mut() {
            if source.format == SourceFormat::Sqlite {
                source.path = database.to_path_buf();
                changed += 1;
            }
        }
        changed
    }

    pub fn source_for(&self, entry: &GoalEntry) -> Option<&SeriesSource> {
        self.sources.get(&entry.source)
    }

    pub fn goal(&self, name: &str) -> Option<&GoalEntry> {
        self.goals.iter().find(|entry| entry.goal.name == name)
    }
}
