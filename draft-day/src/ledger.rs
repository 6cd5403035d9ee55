use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};
use crate::player::{Owner, Player};

/// Overall pick number. Signed because round-0 keepers land at or below zero.
pub type PickNumber = i32;

/// One completed pick in the league-wide history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftHistoryEntry {
    pub pick: PickNumber,
    pub round: u32,
    /// Listed value of the player, recorded in Salary Cap drafts
    pub salary: Option<f64>,
    pub player: String,
    pub position: String,
    pub bye: Option<u32>,
    pub projection: f64,
    pub owner: Owner,
}

/// The same row as seen from one owner's table, without the owner column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerHistoryEntry {
    pub pick: PickNumber,
    pub round: u32,
    pub salary: Option<f64>,
    pub player: String,
    pub position: String,
    pub bye: Option<u32>,
    pub projection: f64,
}

impl From<&DraftHistoryEntry> for OwnerHistoryEntry {
    fn from(entry: &DraftHistoryEntry) -> Self {
        Self {
            pick: entry.pick,
            round: entry.round,
            salary: entry.salary,
            player: entry.player.clone(),
            position: entry.position.clone(),
            bye: entry.bye,
            projection: entry.projection,
        }
    }
}

/// Every pick made so far, league-wide and per owner.
///
/// Both tables are keyed by overall pick number, so keepers recorded ahead of
/// time and live picks recorded later always read back in pick order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftLedger {
    league: BTreeMap<PickNumber, DraftHistoryEntry>,
    per_owner: BTreeMap<Owner, BTreeMap<PickNumber, OwnerHistoryEntry>>,
}

impl DraftLedger {
    /// Empty ledger with a (still empty) table for each owner.
    pub fn new(owners: &[Owner]) -> Self {
        Self {
            league: BTreeMap::new(),
            per_owner: owners.iter().map(|o| (o.clone(), BTreeMap::new())).collect(),
        }
    }

    pub fn record_pick(
        &mut self,
        pick: PickNumber,
        round: u32,
        owner: &str,
        player: &Player,
        salary: Option<f64>,
    ) -> Result<()> {
        if self.league.contains_key(&pick) {
            return Err(DraftError::DuplicatePick(pick));
        }
        let entry = DraftHistoryEntry {
            pick,
            round,
            salary,
            player: player.name.clone(),
            position: player.position.clone(),
            bye: player.bye,
            projection: player.projection,
            owner: owner.to_string(),
        };
        self.per_owner
            .entry(owner.to_string())
            .or_default()
            .insert(pick, OwnerHistoryEntry::from(&entry));
        self.league.insert(pick, entry);
        Ok(())
    }

    /// The last `count` picks made strictly before `before_pick`, oldest first.
    pub fn recent_picks(&self, before_pick: PickNumber, count: usize) -> Vec<&DraftHistoryEntry> {
        let mut recent: Vec<&DraftHistoryEntry> = self
            .league
            .range(..before_pick)
            .rev()
            .take(count)
            .map(|(_, entry)| entry)
            .collect();
        recent.reverse();
        recent
    }

    pub fn full_history(&self) -> Vec<&DraftHistoryEntry> {
        self.league.values().collect()
    }

    pub fn owner_history(&self, owner: &str) -> Vec<&OwnerHistoryEntry> {
        self.per_owner
            .get(owner)
            .map(|table| table.values().collect())
            .unwrap_or_default()
    }

    pub fn per_owner(&self) -> &BTreeMap<Owner, BTreeMap<PickNumber, OwnerHistoryEntry>> {
        &self.per_owner
    }

    pub fn entry(&self, pick: PickNumber) -> Option<&DraftHistoryEntry> {
        self.league.get(&pick)
    }

    pub fn len(&self) -> usize {
        self.league.len()
    }

    pub fn is_empty(&self) -> bool {
        self.league.is_empty()
    }
}
