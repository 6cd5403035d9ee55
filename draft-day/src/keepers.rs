use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{DraftConfig, NO_KEEPER_SENTINEL};
use crate::display::{bold, ordinal, Viewer};
use crate::error::Result;
use crate::player::{Owner, PlayerPool};
use crate::prompt::Prompter;
use crate::source::PriorYearHistory;

/// A player an owner carries over, and the round it costs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperAssignment {
    pub player: String,
    /// 0 when the keeper does not use up a live Snake round
    pub cost_round: u32,
}

/// Keeper choices for every owner; `None` means the owner kept nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperSet {
    assignments: BTreeMap<Owner, Option<KeeperAssignment>>,
}

impl KeeperSet {
    pub fn new(assignments: BTreeMap<Owner, Option<KeeperAssignment>>) -> Self {
        Self { assignments }
    }

    pub fn get(&self, owner: &str) -> Option<&KeeperAssignment> {
        self.assignments.get(owner).and_then(|a| a.as_ref())
    }

    /// Owners that actually kept someone.
    pub fn kept(&self) -> impl Iterator<Item = (&Owner, &KeeperAssignment)> {
        self.assignments
            .iter()
            .filter_map(|(owner, a)| a.as_ref().map(|a| (owner, a)))
    }

    fn kept_by(&self, player: &str) -> Option<&Owner> {
        self.kept().find(|(_, a)| a.player == player).map(|(owner, _)| owner)
    }
}

/// An accepted keeper answer: nobody, or a player with the round they would cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeeperChoice {
    Nobody,
    Keep { player: String, round_lost: u32 },
}

/// Why a keeper answer was turned down. The message doubles as the re-prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeeperRejection {
    FirstRound,
    NotInPool,
    AlreadyKept { owner: Owner },
}

impl fmt::Display for KeeperRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeeperRejection::FirstRound => write!(
                f,
                "\nYou drafted that player in the 1st Round and cannot keep them. Who else would you like to keep? "
            ),
            KeeperRejection::NotInPool => write!(
                f,
                "\nThat player is not in the player pool. Please re-enter the player, making sure you spelled their name correctly: "
            ),
            KeeperRejection::AlreadyKept { owner } => write!(
                f,
                "\nThat player is already kept by {owner}. Who else would you like to keep? "
            ),
        }
    }
}

/// Judges one keeper answer.
///
/// A player drafted in round R last year costs R-1; round 1 picks cannot be
/// kept. Anyone still in the pool who went undrafted costs `max_round`, which
/// is also the highest cost any keeper can have.
pub fn evaluate_keeper(
    input: &str,
    history: &PriorYearHistory,
    pool: &PlayerPool,
    already: &KeeperSet,
    max_round: u32,
) -> std::result::Result<KeeperChoice, KeeperRejection> {
    let player = input.trim();
    if player == NO_KEEPER_SENTINEL {
        return Ok(KeeperChoice::Nobody);
    }
    if !pool.contains(player) {
        return Err(KeeperRejection::NotInPool);
    }
    if let Some(owner) = already.kept_by(player) {
        return Err(KeeperRejection::AlreadyKept { owner: owner.clone() });
    }
    let round_lost = match history.get(player) {
        // Capped so a shorter draft than last year's still gives the keeper a turn.
        Some(prior) if prior.round > 1 => (prior.round - 1).min(max_round),
        Some(_) => return Err(KeeperRejection::FirstRound),
        None => max_round,
    };
    Ok(KeeperChoice::Keep {
        player: player.to_string(),
        round_lost,
    })
}

/// Asks every owner for a keeper until each gives an acceptable answer.
pub fn determine_keepers<P, V>(
    config: &DraftConfig,
    owners: &[Owner],
    history: &PriorYearHistory,
    pool: &PlayerPool,
    prompter: &mut P,
    viewer: &mut V,
) -> Result<KeeperSet>
where
    P: Prompter + ?Sized,
    V: Viewer + ?Sized,
{
    let mut keepers = KeeperSet::default();
    for owner in owners {
        let mut prompt = format!("{}, who would you like to keep? ", bold(owner));
        let choice = loop {
            let answer = prompter.ask(&prompt)?;
            match evaluate_keeper(&answer, history, pool, &keepers, config.num_rounds) {
                Ok(choice) => break choice,
                Err(rejection) => {
                    debug!(owner = %owner, answer = %answer, ?rejection, "Keeper rejected");
                    prompt = rejection.to_string();
                }
            }
        };

        let assignment = match choice {
            KeeperChoice::Nobody => None,
            KeeperChoice::Keep { player, round_lost } => {
                let cost_round = config.keeper_cost_round(round_lost);
                if cost_round > 0 {
                    viewer.notice(&format!(
                        "{} will count as your {} pick.\n",
                        bold(&player),
                        bold(&format!("{} Round", ordinal(cost_round as i32)))
                    ));
                } else {
                    viewer.notice(&format!("You have elected to keep {}.\n", bold(&player)));
                }
                info!(owner = %owner, player = %player, cost_round, "Keeper chosen");
                Some(KeeperAssignment { player, cost_round })
            }
        };
        keepers.assignments.insert(owner.clone(), assignment);
    }
    Ok(keepers)
}
