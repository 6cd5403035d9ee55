use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use csv::Reader;
use serde::Deserialize;

use crate::config::DraftConfig;
use crate::depth_chart::DEFAULT_SLOTS;
use crate::error::{DraftError, Result};
use crate::player::{Owner, Player};

/// Where a player went in last year's draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorPick {
    pub round: u32,
    pub owner: Owner,
}

/// Player name -> last year's pick.
pub type PriorYearHistory = HashMap<String, PriorPick>;

/// Everything the draft reads from outside before it starts.
pub trait PlayerPoolSource {
    /// This year's pool, in ranking order.
    fn load_current_pool(&self) -> Result<Vec<Player>>;
    fn load_prior_year_history(&self) -> Result<PriorYearHistory>;
    /// League owners, in the order they appear in last year's results.
    fn list_owners(&self) -> Result<Vec<Owner>>;
    /// Slot names of a blank depth chart.
    fn load_depth_chart_template(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct PoolRecord {
    #[serde(rename = "Player")]
    player: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Bye")]
    bye: Option<u32>,
    #[serde(rename = "ESPN Projection")]
    projection: f64,
    #[serde(rename = "Salary", default)]
    salary: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PriorResultRecord {
    #[serde(rename = "Round")]
    round: u32,
    #[serde(rename = "Player")]
    player: String,
    #[serde(rename = "Owner")]
    owner: String,
}

#[derive(Debug, Deserialize)]
struct TemplateRecord {
    #[serde(rename = "Slot")]
    slot: String,
}

/// Reads the CSV files laid out under the data directory:
///
/// * `<year>/raw_data.csv` - this year's ranked pool
/// * `<year - 1>/draft_results.csv` - last year's league results
/// * `depth_chart_blank.csv` - optional blank depth chart
pub struct CsvPoolSource {
    raw_data: PathBuf,
    last_year_results: PathBuf,
    depth_chart_template: PathBuf,
}

impl CsvPoolSource {
    pub fn new(config: &DraftConfig) -> Self {
        Self {
            raw_data: config.year_dir().join("raw_data.csv"),
            last_year_results: config.last_year_dir().join("draft_results.csv"),
            depth_chart_template: config.data_dir.join("depth_chart_blank.csv"),
        }
    }

    fn prior_records(&self) -> Result<Vec<PriorResultRecord>> {
        read_records(&self.last_year_results)
    }
}

/// Deserializes every row of a CSV file, tagging failures with the file path.
fn read_records<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let mut reader = Reader::from_path(path).map_err(|e| DraftError::source_data(path, e.to_string()))?;
    let mut records = Vec::new();
    for (line, result) in reader.deserialize().enumerate() {
        // Line 1 is the header.
        let record = result.map_err(|e| DraftError::source_data(path, format!("row {}: {}", line + 2, e)))?;
        records.push(record);
    }
    Ok(records)
}

impl PlayerPoolSource for CsvPoolSource {
    fn load_current_pool(&self) -> Result<Vec<Player>> {
        let records: Vec<PoolRecord> = read_records(&self.raw_data)?;
        let mut seen = HashSet::new();
        let mut players = Vec::with_capacity(records.len());
        for record in records {
            let name = record.player.trim().to_string();
            if name.is_empty() {
                continue;
            }
            if !seen.insert(name.clone()) {
                return Err(DraftError::source_data(&self.raw_data, format!("player '{name}' is listed twice")));
            }
            players.push(Player {
                name,
                position: record.position.trim().to_string(),
                bye: record.bye,
                projection: record.projection,
                salary: record.salary,
            });
        }
        if players.is_empty() {
            return Err(DraftError::source_data(&self.raw_data, "the player pool is empty"));
        }
        Ok(players)
    }

    fn load_prior_year_history(&self) -> Result<PriorYearHistory> {
        Ok(self
            .prior_records()?
            .into_iter()
            .map(|r| {
                (
                    r.player.trim().to_string(),
                    PriorPick {
                        round: r.round,
                        owner: r.owner.trim().to_string(),
                    },
                )
            })
            .collect())
    }

    fn list_owners(&self) -> Result<Vec<Owner>> {
        let mut owners: Vec<Owner> = Vec::new();
        for record in self.prior_records()? {
            let owner = record.owner.trim();
            if !owner.is_empty() && !owners.iter().any(|o| o == owner) {
                owners.push(owner.to_string());
            }
        }
        Ok(owners)
    }

    fn load_depth_chart_template(&self) -> Result<Vec<String>> {
        if !self.depth_chart_template.exists() {
            return Ok(DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect());
        }
        let records: Vec<TemplateRecord> = read_records(&self.depth_chart_template)?;
        let slots: Vec<String> = records
            .into_iter()
            .map(|r| r.slot.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if slots.is_empty() {
            return Err(DraftError::source_data(&self.depth_chart_template, "no slots listed"));
        }
        Ok(slots)
    }
}
