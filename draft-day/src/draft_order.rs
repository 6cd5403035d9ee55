use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MAX_OWNERS;
use crate::display::bold;
use crate::error::{DraftError, Result};
use crate::ledger::PickNumber;
use crate::player::Owner;
use crate::prompt::Prompter;

/// Owners seated in draft slots 1..=N; index 0 holds slot 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Owner>", into = "Vec<Owner>")]
pub struct DraftOrder {
    slots: Vec<Owner>,
}

impl DraftOrder {
    pub fn new(slots: Vec<Owner>) -> Result<Self> {
        if slots.is_empty() || slots.len() > MAX_OWNERS {
            return Err(DraftError::Config(format!(
                "a draft order needs between 1 and {MAX_OWNERS} owners, got {}",
                slots.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = slots.iter().find(|o| !seen.insert(o.as_str())) {
            return Err(DraftError::Config(format!("owner '{dup}' holds two draft slots")));
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn owners(&self) -> &[Owner] {
        &self.slots
    }

    /// Owner on the clock at `turn` (0-based) within `round`.
    /// Odd rounds run slot 1..N, even rounds run N..1.
    pub fn owner_for(&self, round: u32, turn: usize) -> &Owner {
        if round % 2 == 1 {
            &self.slots[turn]
        } else {
            &self.slots[self.slots.len() - 1 - turn]
        }
    }

    pub fn round_order(&self, round: u32) -> Vec<&Owner> {
        (0..self.slots.len()).map(|turn| self.owner_for(round, turn)).collect()
    }

    /// 1-based turn of `owner` within `round`.
    pub fn turn_in_round(&self, owner: &str, round: u32) -> Option<usize> {
        let index = self.slots.iter().position(|o| o == owner)?;
        if round % 2 == 1 {
            Some(index + 1)
        } else {
            Some(self.slots.len() - index)
        }
    }

    /// Overall pick number of `owner`'s turn in `round`.
    pub fn pick_number(&self, owner: &str, round: u32) -> Option<PickNumber> {
        let turn = self.turn_in_round(owner, round)? as PickNumber;
        Some((round as PickNumber - 1) * self.slots.len() as PickNumber + turn)
    }
}

impl TryFrom<Vec<Owner>> for DraftOrder {
    type Error = DraftError;

    fn try_from(slots: Vec<Owner>) -> Result<Self> {
        DraftOrder::new(slots)
    }
}

impl From<DraftOrder> for Vec<Owner> {
    fn from(order: DraftOrder) -> Self {
        order.slots
    }
}

/// Why a draft slot answer was turned down. The message doubles as the re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRejection {
    NotANumber,
    OutOfRange { max: usize },
    Taken,
}

impl fmt::Display for SlotRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRejection::NotANumber => write!(f, "\nEnter the draft slot as a number: "),
            SlotRejection::OutOfRange { max } => write!(f, "\nSelect a number between 1 and {max}: "),
            SlotRejection::Taken => write!(f, "\nThat draft slot is already taken. Pick a different one: "),
        }
    }
}

/// Checks one slot answer against the slots handed out so far. Returns the 0-based index.
pub fn validate_slot(input: &str, taken: &[Option<Owner>]) -> std::result::Result<usize, SlotRejection> {
    let slot: i64 = input.trim().parse().map_err(|_| SlotRejection::NotANumber)?;
    if slot < 1 || slot > taken.len() as i64 {
        return Err(SlotRejection::OutOfRange { max: taken.len() });
    }
    let index = (slot - 1) as usize;
    if taken[index].is_some() {
        return Err(SlotRejection::Taken);
    }
    Ok(index)
}

/// Shuffles the owners and lets each one, in shuffled order, claim a draft slot.
pub fn determine_draft_order<P, R>(owners: &[Owner], prompter: &mut P, rng: &mut R) -> Result<DraftOrder>
where
    P: Prompter + ?Sized,
    R: Rng + ?Sized,
{
    let mut shuffled = owners.to_vec();
    shuffled.shuffle(rng);

    let mut slots: Vec<Option<Owner>> = vec![None; owners.len()];
    for owner in &shuffled {
        let mut prompt = format!("\n{}, you're up!\nWhich draft slot would you like? ", bold(owner));
        loop {
            let answer = prompter.ask(&prompt)?;
            match validate_slot(&answer, &slots) {
                Ok(index) => {
                    info!(owner = %owner, slot = index + 1, "Draft slot claimed");
                    slots[index] = Some(owner.clone());
                    break;
                }
                Err(rejection) => {
                    debug!(owner = %owner, answer = %answer, ?rejection, "Draft slot rejected");
                    prompt = rejection.to_string();
                }
            }
        }
    }

    DraftOrder::new(slots.into_iter().flatten().collect())
}
