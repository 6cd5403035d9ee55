use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;

use crate::config::DraftConfig;
use crate::depth_chart::DepthCharts;
use crate::error::Result;
use crate::ledger::{DraftHistoryEntry, DraftLedger, OwnerHistoryEntry, PickNumber};

/// Receives the draft's human-readable results after every committed pick.
pub trait ResultsSink {
    fn write_league_history(&mut self, ledger: &DraftLedger) -> Result<()>;
    fn write_per_owner_history(&mut self, ledger: &DraftLedger) -> Result<()>;
    fn write_depth_charts(&mut self, charts: &DepthCharts) -> Result<()>;
}

#[derive(Serialize)]
struct LeagueRow<'a> {
    #[serde(rename = "Pick Overall")]
    pick: PickNumber,
    #[serde(rename = "Round")]
    round: u32,
    #[serde(rename = "Salary")]
    salary: Option<f64>,
    #[serde(rename = "Player")]
    player: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Bye")]
    bye: Option<u32>,
    #[serde(rename = "ESPN Projection")]
    projection: f64,
    #[serde(rename = "Owner")]
    owner: &'a str,
}

impl<'a> From<&'a DraftHistoryEntry> for LeagueRow<'a> {
    fn from(e: &'a DraftHistoryEntry) -> Self {
        Self {
            pick: e.pick,
            round: e.round,
            salary: e.salary,
            player: &e.player,
            position: &e.position,
            bye: e.bye,
            projection: e.projection,
            owner: &e.owner,
        }
    }
}

#[derive(Serialize)]
struct OwnerRow<'a> {
    #[serde(rename = "Pick Overall")]
    pick: PickNumber,
    #[serde(rename = "Round")]
    round: u32,
    #[serde(rename = "Salary")]
    salary: Option<f64>,
    #[serde(rename = "Player")]
    player: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Bye")]
    bye: Option<u32>,
    #[serde(rename = "ESPN Projection")]
    projection: f64,
}

impl<'a> From<&'a OwnerHistoryEntry> for OwnerRow<'a> {
    fn from(e: &'a OwnerHistoryEntry) -> Self {
        Self {
            pick: e.pick,
            round: e.round,
            salary: e.salary,
            player: &e.player,
            position: &e.position,
            bye: e.bye,
            projection: e.projection,
        }
    }
}

#[derive(Serialize)]
struct DepthChartRow<'a> {
    #[serde(rename = "Slot")]
    slot: &'a str,
    #[serde(rename = "Player")]
    player: Option<&'a str>,
    #[serde(rename = "Bye")]
    bye: Option<u32>,
    #[serde(rename = "ESPN Projection")]
    projection: Option<f64>,
}

/// Writes the league table, one table per owner and one depth chart per owner
/// as CSV under the year directory. The league file doubles as next year's
/// prior-year results.
pub struct CsvResultsSink {
    league_path: PathBuf,
    owner_dir: PathBuf,
    depth_chart_dir: PathBuf,
}

impl CsvResultsSink {
    pub fn new(config: &DraftConfig) -> Self {
        let year_dir = config.year_dir();
        Self {
            league_path: year_dir.join("draft_results.csv"),
            owner_dir: year_dir.join("indv_draft_results"),
            depth_chart_dir: year_dir.join("indv_depth_charts"),
        }
    }
}

/// Keeps owner names usable as file names.
fn owner_file(dir: &Path, owner: &str) -> PathBuf {
    let safe: String = owner
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    dir.join(format!("{}.csv", safe))
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>, headers: &[&str]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // Headers are written by hand so empty tables still get them.
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

const LEAGUE_HEADERS: &[&str] = &[
    "Pick Overall", "Round", "Salary", "Player", "Position", "Bye", "ESPN Projection", "Owner",
];
const OWNER_HEADERS: &[&str] = &["Pick Overall", "Round", "Salary", "Player", "Position", "Bye", "ESPN Projection"];
const DEPTH_CHART_HEADERS: &[&str] = &["Slot", "Player", "Bye", "ESPN Projection"];

impl ResultsSink for CsvResultsSink {
    fn write_league_history(&mut self, ledger: &DraftLedger) -> Result<()> {
        write_rows(
            &self.league_path,
            ledger.full_history().into_iter().map(LeagueRow::from),
            LEAGUE_HEADERS,
        )
    }

    fn write_per_owner_history(&mut self, ledger: &DraftLedger) -> Result<()> {
        for (owner, table) in ledger.per_owner() {
            write_rows(
                &owner_file(&self.owner_dir, owner),
                table.values().map(OwnerRow::from),
                OWNER_HEADERS,
            )?;
        }
        Ok(())
    }

    fn write_depth_charts(&mut self, charts: &DepthCharts) -> Result<()> {
        for (owner, chart) in charts {
            let rows = chart.slots().iter().map(|slot| DepthChartRow {
                slot: &slot.name,
                player: slot.occupant.as_ref().map(|o| o.player.as_str()),
                bye: slot.occupant.as_ref().and_then(|o| o.bye),
                projection: slot.occupant.as_ref().map(|o| o.projection),
            });
            write_rows(&owner_file(&self.depth_chart_dir, owner), rows, DEPTH_CHART_HEADERS)?;
        }
        Ok(())
    }
}

/// Counts calls instead of writing anything.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CountingSink {
    pub league_writes: usize,
    pub owner_writes: usize,
    pub depth_chart_writes: usize,
    pub last_league_len: usize,
}

#[cfg(test)]
impl ResultsSink for CountingSink {
    fn write_league_history(&mut self, ledger: &DraftLedger) -> Result<()> {
        self.league_writes += 1;
        self.last_league_len = ledger.len();
        Ok(())
    }

    fn write_per_owner_history(&mut self, _ledger: &DraftLedger) -> Result<()> {
        self.owner_writes += 1;
        Ok(())
    }

    fn write_depth_charts(&mut self, _charts: &DepthCharts) -> Result<()> {
        self.depth_chart_writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth_chart::blank_depth_charts;
    use crate::player::test_player;
    use crate::source::{CsvPoolSource, PlayerPoolSource};
    use tempfile::TempDir;

    fn config(dir: &Path, year: &'static str) -> DraftConfig {
        let root = dir.to_string_lossy().to_string();
        DraftConfig::from_lookup(Some("snake"), move |key| match key {
            "DRAFT_YEAR" => Some(year.to_string()),
            "DRAFT_DATA_DIR" => Some(root.clone()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn league_file_is_readable_as_next_years_history() {
        let temp = TempDir::new().unwrap();
        let owners = vec!["Kim".to_string(), "Alex/Sam".to_string()];
        let mut ledger = DraftLedger::new(&owners);
        ledger.record_pick(2, 1, "Alex/Sam", &test_player("Second", "WR"), None).unwrap();
        ledger.record_pick(1, 1, "Kim", &test_player("First", "RB"), None).unwrap();

        let mut sink = CsvResultsSink::new(&config(temp.path(), "2024"));
        sink.write_league_history(&ledger).unwrap();
        sink.write_per_owner_history(&ledger).unwrap();

        let league = fs::read_to_string(temp.path().join("2024/draft_results.csv")).unwrap();
        let lines: Vec<&str> = league.lines().collect();
        assert_eq!(lines[0], "Pick Overall,Round,Salary,Player,Position,Bye,ESPN Projection,Owner");
        assert!(lines[1].starts_with("1,1,,First,RB,9,"));
        assert!(temp.path().join("2024/indv_draft_results/Alex_Sam.csv").exists());

        let next_year = CsvPoolSource::new(&config(temp.path(), "2025"));
        assert_eq!(next_year.list_owners().unwrap(), vec!["Kim".to_string(), "Alex/Sam".to_string()]);
        assert_eq!(next_year.load_prior_year_history().unwrap()["Second"].round, 1);
    }

    #[test]
    fn depth_charts_list_every_slot() {
        let temp = TempDir::new().unwrap();
        let owners = vec!["Kim".to_string()];
        let mut charts = blank_depth_charts(&owners, &["QB", "Bench1"]);
        charts.get_mut("Kim").unwrap().fill_slot(&test_player("Josh Allen", "QB"));

        let mut sink = CsvResultsSink::new(&config(temp.path(), "2024"));
        sink.write_depth_charts(&charts).unwrap();

        let body = fs::read_to_string(temp.path().join("2024/indv_depth_charts/Kim.csv")).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines, vec!["Slot,Player,Bye,ESPN Projection", "QB,Josh Allen,9,200.0", "Bench1,,,"]);
    }
}
