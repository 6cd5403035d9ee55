use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};

/// Most owners a league can seat; draft slots are validated against the real count.
pub const MAX_OWNERS: usize = 8;

/// Rounds in a draft, and the cost round for a keeper nobody drafted last year.
pub const DEFAULT_ROUNDS: u32 = 16;

/// Rows shown by the "best available" view.
pub const BEST_AVAILABLE_COUNT: usize = 10;

/// Rows shown by the "last picks" view.
pub const RECENT_PICKS_COUNT: usize = 10;

/// Typed at the keeper prompt to keep nobody.
pub const NO_KEEPER_SENTINEL: &str = "0";

/// Typed at the pick prompt to take the top player in the pool.
pub const AUTO_PICK_SENTINEL: &str = "9";

/// Bumped whenever the checkpoint layout changes shape.
pub const CHECKPOINT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftFormat {
    Snake,
    SalaryCap,
}

impl fmt::Display for DraftFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftFormat::Snake => write!(f, "Snake"),
            DraftFormat::SalaryCap => write!(f, "Salary Cap"),
        }
    }
}

impl FromStr for DraftFormat {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "snake" => Ok(DraftFormat::Snake),
            "salary-cap" | "salary_cap" | "salary cap" | "salarycap" => Ok(DraftFormat::SalaryCap),
            other => Err(DraftError::Config(format!(
                "unknown draft format '{other}' (expected 'snake' or 'salary-cap')"
            ))),
        }
    }
}

/// How a Snake keeper is charged.
///
/// `RoundLost` charges the round before the one the player went in last year.
/// `Waived` records round 0 the way Salary Cap keepers are recorded, so the
/// keeper never occupies a live Snake turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeeperCostRule {
    RoundLost,
    Waived,
}

impl FromStr for KeeperCostRule {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "round-lost" | "round_lost" => Ok(KeeperCostRule::RoundLost),
            "waived" => Ok(KeeperCostRule::Waived),
            other => Err(DraftError::Config(format!(
                "DRAFT_SNAKE_KEEPER_COST must be 'round-lost' or 'waived', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DraftConfig {
    pub format: DraftFormat,
    /// Root holding one directory per draft year (DRAFT_DATA_DIR)
    pub data_dir: PathBuf,
    /// Draft year (DRAFT_YEAR, defaults to the current year)
    pub year: i32,
    /// Number of rounds (DRAFT_ROUNDS)
    pub num_rounds: u32,
    /// Snake keeper bookkeeping (DRAFT_SNAKE_KEEPER_COST)
    pub snake_keeper_cost: KeeperCostRule,
    pub log_level: String,
}

impl DraftConfig {
    /// Builds the config from the format argument and the process environment.
    pub fn from_env(format_arg: Option<&str>) -> Result<Self> {
        Self::from_lookup(format_arg, |key| std::env::var(key).ok())
    }

    /// Same as [`DraftConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(format_arg: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = format_arg
            .ok_or_else(|| DraftError::Config("usage: draft-day <snake|salary-cap>".to_string()))?
            .parse::<DraftFormat>()?;

        let year = match lookup("DRAFT_YEAR") {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| DraftError::Config("DRAFT_YEAR must be a year like 2024".to_string()))?,
            None => chrono::Local::now().year(),
        };

        let num_rounds = match lookup("DRAFT_ROUNDS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| DraftError::Config("DRAFT_ROUNDS must be a positive integer".to_string()))?,
            None => DEFAULT_ROUNDS,
        };

        let snake_keeper_cost = match lookup("DRAFT_SNAKE_KEEPER_COST") {
            Some(raw) => raw.parse()?,
            None => KeeperCostRule::RoundLost,
        };

        Ok(Self {
            format,
            data_dir: PathBuf::from(lookup("DRAFT_DATA_DIR").unwrap_or_else(|| ".".to_string())),
            year,
            num_rounds,
            snake_keeper_cost,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn last_year(&self) -> i32 {
        self.year - 1
    }

    /// Directory for this year's keepers, order, checkpoint and results.
    pub fn year_dir(&self) -> PathBuf {
        self.data_dir.join(self.year.to_string())
    }

    pub fn last_year_dir(&self) -> PathBuf {
        self.data_dir.join(self.last_year().to_string())
    }

    /// Cost round charged to a keeper for the configured format.
    pub fn keeper_cost_round(&self, round_lost: u32) -> u32 {
        match (self.format, self.snake_keeper_cost) {
            (DraftFormat::Snake, KeeperCostRule::RoundLost) => round_lost,
            (DraftFormat::Snake, KeeperCostRule::Waived) => 0,
            (DraftFormat::SalaryCap, _) => 0,
        }
    }
}
