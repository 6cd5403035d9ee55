use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::{Owner, Player};

pub const FLEX_SLOT: &str = "FLEX";
pub const BENCH_PREFIX: &str = "Bench";

/// Positions that may fill the FLEX slot.
const FLEX_POSITIONS: &[&str] = &["RB", "WR"];

/// Blank depth chart used when no template file is supplied.
pub const DEFAULT_SLOTS: &[&str] = &[
    "QB", "RB1", "RB2", "WR1", "WR2", "TE", "FLEX", "D/ST", "K",
    "Bench1", "Bench2", "Bench3", "Bench4", "Bench5", "Bench6", "Bench7",
];

pub type DepthCharts = BTreeMap<Owner, DepthChart>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotOccupant {
    pub player: String,
    pub bye: Option<u32>,
    pub projection: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthChartSlot {
    pub name: String,
    pub occupant: Option<SlotOccupant>,
}

impl DepthChartSlot {
    fn is_open(&self) -> bool {
        self.occupant.is_none()
    }

    fn is_bench(&self) -> bool {
        self.name.contains(BENCH_PREFIX)
    }

    /// Whether a player at `position` may take this slot right now.
    fn accepts(&self, position: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        self.name.contains(position)
            || (self.name == FLEX_SLOT && FLEX_POSITIONS.contains(&position))
            || self.is_bench()
    }
}

/// One owner's roster slots, scanned in template order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthChart {
    slots: Vec<DepthChartSlot>,
}

impl DepthChart {
    pub fn from_template<S: AsRef<str>>(slot_names: &[S]) -> Self {
        Self {
            slots: slot_names
                .iter()
                .map(|name| DepthChartSlot {
                    name: name.as_ref().to_string(),
                    occupant: None,
                })
                .collect(),
        }
    }

    pub fn slots(&self) -> &[DepthChartSlot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&DepthChartSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Returns the slot a player at `position` should land in.
    ///
    /// Named slots, FLEX and bench slots are all considered in template order;
    /// the first open one that accepts the position wins. With nothing open, a
    /// new bench slot id one past the last bench slot is returned.
    pub fn open_slot_for(&self, position: &str) -> String {
        if let Some(slot) = self.slots.iter().find(|s| s.accepts(position)) {
            return slot.name.clone();
        }
        next_bench_name(self.slots.iter().rev().find(|s| s.is_bench()).map(|s| s.name.as_str()))
    }

    /// Places a drafted player and returns the slot id used.
    pub fn fill_slot(&mut self, player: &Player) -> String {
        let name = self.open_slot_for(&player.position);
        let occupant = SlotOccupant {
            player: player.name.clone(),
            bye: player.bye,
            projection: player.projection,
        };
        match self.slots.iter_mut().find(|s| s.name == name) {
            Some(slot) => slot.occupant = Some(occupant),
            None => self.slots.push(DepthChartSlot {
                name: name.clone(),
                occupant: Some(occupant),
            }),
        }
        name
    }
}

/// Builds blank charts for every owner.
pub fn blank_depth_charts<S: AsRef<str>>(owners: &[Owner], template: &[S]) -> DepthCharts {
    owners
        .iter()
        .map(|owner| (owner.clone(), DepthChart::from_template(template)))
        .collect()
}

/// `Bench7` -> `Bench8`, `Bench10` -> `Bench11`; no bench at all -> `Bench1`.
fn next_bench_name(last_bench: Option<&str>) -> String {
    let Some(last) = last_bench else {
        return format!("{BENCH_PREFIX}1");
    };
    let prefix = last.trim_end_matches(|c: char| c.is_ascii_digit());
    let number: u32 = last[prefix.len()..].parse().unwrap_or(0);
    format!("{}{}", prefix, number + 1)
}
