use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::checkpoint::CheckpointStore;
use crate::config::{
    DraftConfig, DraftFormat, KeeperCostRule, AUTO_PICK_SENTINEL, BEST_AVAILABLE_COUNT, MAX_OWNERS,
    RECENT_PICKS_COUNT,
};
use crate::depth_chart::{blank_depth_charts, DepthChart, DepthCharts};
use crate::display::{
    bold, depth_chart_table, history_table, ordinal, owner_history_table, pool_table, Viewer,
};
use crate::draft_order::{determine_draft_order, DraftOrder};
use crate::error::{DraftError, Result};
use crate::keepers::{determine_keepers, KeeperSet};
use crate::ledger::{DraftLedger, PickNumber};
use crate::player::{Owner, Player, PlayerPool};
use crate::prompt::{menu_text, MenuChoice, Prompter};
use crate::results::ResultsSink;
use crate::source::{PlayerPoolSource, PriorYearHistory};

const NOT_IN_POOL_PROMPT: &str =
    "\nThat player is not in the player pool. Please re-enter the player, making sure you spelled their name correctly: ";
const PLAYER_VALUE_PROMPT: &str = "Enter the player you would like to check the salary of: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    PreDraft,
    KeepersApplied,
    LivePickLoop,
    Complete,
}

/// Everything a pick mutates, plus the pointers to the next turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    pub next_pick: PickNumber,
    /// 0-based turn within the current round
    pub owner_index: usize,
    pub round: u32,
    pub pool: PlayerPool,
    pub ledger: DraftLedger,
    pub depth_charts: DepthCharts,
}

impl DraftState {
    pub fn initial<S: AsRef<str>>(pool: PlayerPool, owners: &[Owner], template: &[S]) -> Self {
        Self {
            next_pick: 1,
            owner_index: 0,
            round: 1,
            pool,
            ledger: DraftLedger::new(owners),
            depth_charts: blank_depth_charts(owners, template),
        }
    }
}

/// Player selection made at the pick prompt.
enum Selection {
    Top,
    Named(String),
}

/// Runs one draft from keeper selection to the last pick of the last round.
///
/// Every pick is staged on a copy of [`DraftState`] and only becomes the live
/// state once its checkpoint has been written.
pub struct DraftEngine<P, V, S> {
    config: DraftConfig,
    owners: Vec<Owner>,
    history: PriorYearHistory,
    template: Vec<String>,
    keepers: Option<KeeperSet>,
    order: Option<DraftOrder>,
    state: DraftState,
    phase: DraftPhase,
    store: CheckpointStore,
    prompter: P,
    viewer: V,
    sink: S,
}

impl<P, V, S> DraftEngine<P, V, S>
where
    P: Prompter,
    V: Viewer,
    S: ResultsSink,
{
    /// Loads the sources and any state persisted for this year.
    pub fn new<Src>(
        config: DraftConfig,
        source: &Src,
        store: CheckpointStore,
        prompter: P,
        viewer: V,
        sink: S,
    ) -> Result<Self>
    where
        Src: PlayerPoolSource + ?Sized,
    {
        let owners = source.list_owners()?;
        if owners.is_empty() || owners.len() > MAX_OWNERS {
            return Err(DraftError::source_data(
                config.last_year_dir(),
                format!("expected 1 to {MAX_OWNERS} owners in last year's results, found {}", owners.len()),
            ));
        }
        let history = source.load_prior_year_history()?;
        let pool = PlayerPool::new(source.load_current_pool()?);
        let template = source.load_depth_chart_template()?;
        info!(
            owners = owners.len(),
            players = pool.len(),
            prior_picks = history.len(),
            format = %config.format,
            year = config.year,
            "Sources loaded"
        );
        if config.format == DraftFormat::Snake && config.snake_keeper_cost == KeeperCostRule::Waived {
            warn!("Snake keepers are waived: they are recorded at round 0 and never take a live turn");
        }

        let keepers = store.load_keepers()?;
        let order = store.load_draft_order()?;
        let state = match store.load_checkpoint()? {
            Some(checkpoint) => {
                info!(
                    next_pick = checkpoint.state.next_pick,
                    round = checkpoint.state.round,
                    owner_index = checkpoint.state.owner_index,
                    "Resuming draft from checkpoint"
                );
                checkpoint.state
            }
            None => DraftState::initial(pool, &owners, &template),
        };

        Ok(Self {
            config,
            owners,
            history,
            template,
            keepers,
            order,
            state,
            phase: DraftPhase::PreDraft,
            store,
            prompter,
            viewer,
            sink,
        })
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn keepers(&self) -> Option<&KeeperSet> {
        self.keepers.as_ref()
    }

    pub fn draft_order(&self) -> Option<&DraftOrder> {
        self.order.as_ref()
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Drives every phase through to the end of the draft.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.pre_draft(rng)?;
        self.apply_keepers()?;
        self.live_draft()
    }

    /// Settles keepers and draft order, each only if not already on disk.
    pub fn pre_draft<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.phase = DraftPhase::PreDraft;

        if self.keepers.is_some() {
            info!("Keepers restored from disk");
        } else {
            let keepers = determine_keepers(
                &self.config,
                &self.owners,
                &self.history,
                &self.state.pool,
                &mut self.prompter,
                &mut self.viewer,
            )?;
            self.store.save_keepers(&keepers)?;
            info!(kept = keepers.kept().count(), "Keepers determined");
            self.keepers = Some(keepers);
        }

        match &self.order {
            Some(order) => {
                let on_disk: BTreeSet<&Owner> = order.owners().iter().collect();
                let league: BTreeSet<&Owner> = self.owners.iter().collect();
                if on_disk != league {
                    return Err(DraftError::Config(
                        "the saved draft order does not match last year's owners".to_string(),
                    ));
                }
                info!("Draft order restored from disk");
            }
            None => {
                let order = determine_draft_order(&self.owners, &mut self.prompter, rng)?;
                self.store.save_draft_order(&order)?;
                info!(order = ?order.owners(), "Draft order determined");
                self.order = Some(order);
            }
        }
        Ok(())
    }

    /// Records every keeper once, before the first live pick.
    ///
    /// All keepers land in one commit, so the checkpoint either holds every
    /// keeper or none. Skipped entirely when a checkpoint already exists.
    pub fn apply_keepers(&mut self) -> Result<()> {
        if self.store.has_checkpoint() {
            debug!("Checkpoint present, keepers already applied");
            self.phase = DraftPhase::KeepersApplied;
            return Ok(());
        }
        let order = self.require_order()?.clone();
        let keepers = self
            .keepers
            .clone()
            .ok_or_else(|| DraftError::Config("keepers have not been determined".to_string()))?;

        let mut staged = self.state.clone();
        for (owner, keeper) in keepers.kept() {
            let pick = order.pick_number(owner, keeper.cost_round).ok_or_else(|| {
                DraftError::Config(format!("keeper owner '{owner}' has no draft slot"))
            })?;
            let (_player, slot) = self.apply_pick(&mut staged, pick, keeper.cost_round, owner, &keeper.player)?;
            debug!(owner = %owner, player = %keeper.player, pick, round = keeper.cost_round, slot = %slot, "Keeper staged");
        }
        // Written even with no keepers so a restart skips this pass.
        self.commit(staged)?;
        info!(kept = keepers.kept().count(), "Keepers applied");

        self.phase = DraftPhase::KeepersApplied;
        Ok(())
    }

    /// Runs the turn loop from wherever the state points to the last round.
    pub fn live_draft(&mut self) -> Result<()> {
        let order = self.require_order()?.clone();
        self.phase = DraftPhase::LivePickLoop;

        while self.state.round <= self.config.num_rounds {
            debug!(round = self.state.round, order = ?order.round_order(self.state.round), "Round started");
            self.viewer.notice(&format!("\n\n\n\n{}", bold(&format!("ROUND {}", self.state.round))));
            while self.state.owner_index < order.len() {
                let owner = order.owner_for(self.state.round, self.state.owner_index).clone();
                self.take_turn(&owner)?;
            }
            self.state.round += 1;
            self.state.owner_index = 0;
        }

        self.phase = DraftPhase::Complete;
        info!(picks = self.state.ledger.len(), "Draft complete");
        self.viewer.notice("\nThe draft is complete!");
        Ok(())
    }

    fn require_order(&self) -> Result<&DraftOrder> {
        self.order
            .as_ref()
            .ok_or_else(|| DraftError::Config("the draft order has not been determined".to_string()))
    }

    /// One owner's turn: a keeper notice in Snake, otherwise the menu loop.
    fn take_turn(&mut self, owner: &str) -> Result<()> {
        match self.config.format {
            DraftFormat::Snake => self.viewer.notice(&format!("\n\n{}, you're on the clock!", bold(owner))),
            DraftFormat::SalaryCap => self.viewer.notice(&format!("\n\n{}, you're up to nominate!", bold(owner))),
        }

        if self.config.format == DraftFormat::Snake {
            let kept_now = self
                .keepers
                .as_ref()
                .and_then(|k| k.get(owner))
                .filter(|k| k.cost_round == self.state.round)
                .map(|k| k.player.clone());
            if let Some(player) = kept_now {
                return self.keeper_turn(owner, &player);
            }
        }

        loop {
            let answer = self.prompter.ask(menu_text(self.config.format))?;
            let selection = match MenuChoice::parse(answer.trim(), self.config.format) {
                MenuChoice::AutoPick => Selection::Top,
                MenuChoice::Player(name) => Selection::Named(name),
                view => {
                    self.show_view(&view, owner)?;
                    continue;
                }
            };
            if let Some(player) = self.select_player(selection)? {
                return self.commit_pick(owner, &player);
            }
        }
    }

    /// The keeper was recorded before the draft; this turn only moves the pointers.
    fn keeper_turn(&mut self, owner: &str, player: &str) -> Result<()> {
        self.viewer.notice(&format!(
            "\n{} Kept {} with the {} Overall Pick",
            bold(owner),
            bold(player),
            bold(&ordinal(self.state.next_pick))
        ));
        let mut staged = self.state.clone();
        staged.next_pick += 1;
        staged.owner_index += 1;
        self.commit(staged)
    }

    /// Resolves a selection to a player still in the pool, re-prompting on
    /// names that are not. `None` means the pool is empty.
    fn select_player(&mut self, mut selection: Selection) -> Result<Option<String>> {
        loop {
            match selection {
                Selection::Top => match self.state.pool.top() {
                    Some(player) => return Ok(Some(player.name.clone())),
                    None => {
                        self.viewer.notice("\nThe player pool is empty.");
                        return Ok(None);
                    }
                },
                Selection::Named(name) if self.state.pool.contains(&name) => return Ok(Some(name)),
                Selection::Named(name) => {
                    debug!(player = %name, "Selected player is not in the pool");
                    let answer = self.prompter.ask(NOT_IN_POOL_PROMPT)?;
                    let answer = answer.trim();
                    selection = if answer == AUTO_PICK_SENTINEL {
                        Selection::Top
                    } else {
                        Selection::Named(answer.to_string())
                    };
                }
            }
        }
    }

    fn commit_pick(&mut self, owner: &str, player: &str) -> Result<()> {
        let pick = self.state.next_pick;
        let round = self.state.round;
        let mut staged = self.state.clone();
        let (player, slot) = self.apply_pick(&mut staged, pick, round, owner, player)?;
        staged.next_pick += 1;
        staged.owner_index += 1;
        self.commit(staged)?;

        info!(owner = %owner, player = %player.name, pick, round, slot = %slot, "Pick committed");
        self.viewer.notice(&format!(
            "\n{} Took {} with the {} Overall Pick",
            bold(owner),
            bold(&player.name),
            bold(&ordinal(pick))
        ));
        Ok(())
    }

    /// Applies a pick to a staged state: pool removal, ledger row, depth chart slot.
    fn apply_pick(
        &self,
        staged: &mut DraftState,
        pick: PickNumber,
        round: u32,
        owner: &str,
        player: &str,
    ) -> Result<(Player, String)> {
        let player = staged.pool.remove(player)?;
        let salary = match self.config.format {
            DraftFormat::Snake => None,
            DraftFormat::SalaryCap => player.salary,
        };
        staged.ledger.record_pick(pick, round, owner, &player, salary)?;
        let slot = staged
            .depth_charts
            .entry(owner.to_string())
            .or_insert_with(|| DepthChart::from_template(&self.template))
            .fill_slot(&player);
        Ok((player, slot))
    }

    /// Makes a staged state durable, then live, then publishes the results.
    fn commit(&mut self, staged: DraftState) -> Result<()> {
        self.store.save_checkpoint(&staged)?;
        self.state = staged;

        self.sink.write_league_history(&self.state.ledger)?;
        self.sink.write_per_owner_history(&self.state.ledger)?;
        self.sink.write_depth_charts(&self.state.depth_charts)?;
        Ok(())
    }

    fn show_view(&mut self, view: &MenuChoice, owner: &str) -> Result<()> {
        let format = self.config.format;
        let everyone: Vec<Owner> = match (&self.order, format) {
            (Some(order), DraftFormat::SalaryCap) => order.owners().to_vec(),
            _ => vec![owner.to_string()],
        };

        match view {
            MenuChoice::OwnerPicks => {
                for o in &everyone {
                    let table = owner_history_table(o, &self.state.ledger.owner_history(o), format);
                    self.viewer.show(&table);
                }
            }
            MenuChoice::DepthCharts => {
                for o in &everyone {
                    match self.state.depth_charts.get(o) {
                        Some(chart) => {
                            let table = depth_chart_table(o, chart);
                            self.viewer.show(&table);
                        }
                        None => warn!(owner = %o, "No depth chart for owner"),
                    }
                }
            }
            MenuChoice::BestAvailable => {
                let table = pool_table(
                    "Best Players Available",
                    self.state.pool.top_n(BEST_AVAILABLE_COUNT),
                    format,
                );
                self.viewer.show(&table);
            }
            MenuChoice::RecentPicks => {
                let recent = self.state.ledger.recent_picks(self.state.next_pick, RECENT_PICKS_COUNT);
                let table = history_table(&format!("Last {RECENT_PICKS_COUNT} Picks"), &recent, format);
                self.viewer.show(&table);
            }
            MenuChoice::FullHistory => {
                let table = history_table("Full Draft History", &self.state.ledger.full_history(), format);
                self.viewer.show(&table);
            }
            MenuChoice::PlayerValue => {
                let name = self.prompter.ask(PLAYER_VALUE_PROMPT)?;
                match self.state.pool.lookup(name.trim()) {
                    Ok(player) => {
                        let table = pool_table("Player Value", std::slice::from_ref(player), format);
                        self.viewer.show(&table);
                    }
                    Err(_) => self.viewer.notice("\nThat player is not in the player pool."),
                }
            }
            MenuChoice::AutoPick | MenuChoice::Player(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingViewer;
    use crate::keepers::KeeperAssignment;
    use crate::player::test_player;
    use crate::prompt::ScriptedPrompter;
    use crate::results::CountingSink;
    use crate::source::PriorPick;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct StaticSource {
        owners: Vec<Owner>,
        pool: Vec<Player>,
        history: PriorYearHistory,
    }

    impl PlayerPoolSource for StaticSource {
        fn load_current_pool(&self) -> Result<Vec<Player>> {
            Ok(self.pool.clone())
        }

        fn load_prior_year_history(&self) -> Result<PriorYearHistory> {
            Ok(self.history.clone())
        }

        fn list_owners(&self) -> Result<Vec<Owner>> {
            Ok(self.owners.clone())
        }

        fn load_depth_chart_template(&self) -> Result<Vec<String>> {
            Ok(["QB", "RB1", "RB2", "WR1", "WR2", "TE", "FLEX", "Bench1"]
                .iter()
                .map(|s| s.to_string())
                .collect())
        }
    }

    fn source() -> StaticSource {
        let positions = ["RB", "WR", "QB", "TE"];
        let mut pool: Vec<Player> = (1..=20)
            .map(|i| {
                let mut p = test_player(&format!("P{i:02}"), positions[i % positions.len()]);
                p.salary = Some(60.0 - i as f64);
                p
            })
            .collect();
        pool.push(test_player("X", "WR"));
        pool.push(test_player("Y", "RB"));

        let mut history = PriorYearHistory::new();
        history.insert("X".to_string(), PriorPick { round: 3, owner: "A".to_string() });

        StaticSource {
            owners: ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
            pool,
            history,
        }
    }

    fn config(dir: &Path, format: &str, rounds: u32) -> DraftConfig {
        let root = dir.to_string_lossy().to_string();
        DraftConfig::from_lookup(Some(format), move |key| match key {
            "DRAFT_YEAR" => Some("2024".to_string()),
            "DRAFT_DATA_DIR" => Some(root.clone()),
            "DRAFT_ROUNDS" => Some(rounds.to_string()),
            _ => None,
        })
        .unwrap()
    }

    /// Seeds keepers and the B, D, A, C order so no pre-draft prompts are needed.
    fn seed(config: &DraftConfig, keepers: &[(&str, &str, u32)]) {
        let store = CheckpointStore::new(config);
        let mut kept = BTreeMap::new();
        for owner in ["A", "B", "C", "D"] {
            kept.insert(owner.to_string(), None);
        }
        for &(owner, player, cost_round) in keepers {
            kept.insert(
                owner.to_string(),
                Some(KeeperAssignment { player: player.to_string(), cost_round }),
            );
        }
        store.save_keepers(&KeeperSet::new(kept)).unwrap();
        let order = ["B", "D", "A", "C"].iter().map(|s| s.to_string()).collect();
        store.save_draft_order(&DraftOrder::new(order).unwrap()).unwrap();
    }

    type TestEngine = DraftEngine<ScriptedPrompter, RecordingViewer, CountingSink>;

    fn engine(config: DraftConfig, answers: &[&str]) -> TestEngine {
        let store = CheckpointStore::new(&config);
        DraftEngine::new(
            config,
            &source(),
            store,
            ScriptedPrompter::new(answers.iter().copied()),
            RecordingViewer::default(),
            CountingSink::default(),
        )
        .unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn picks(state: &DraftState) -> Vec<PickNumber> {
        state.ledger.full_history().iter().map(|e| e.pick).collect()
    }

    #[test]
    fn snake_draft_with_a_keeper_runs_to_completion() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 2);
        seed(&cfg, &[("A", "X", 2)]);

        // Seven live turns; A's round-2 turn is the keeper.
        let mut engine = engine(cfg, &["9"; 7]);
        engine.run(&mut rng()).unwrap();

        let state = engine.state();
        assert_eq!(engine.phase(), DraftPhase::Complete);
        assert_eq!(picks(state), (1..=8).collect::<Vec<_>>());

        let owners_by_pick: Vec<&str> = state.ledger.full_history().iter().map(|e| e.owner.as_str()).collect();
        assert_eq!(owners_by_pick, vec!["B", "D", "A", "C", "C", "A", "D", "B"]);

        let keeper = state.ledger.entry(6).unwrap();
        assert_eq!(keeper.player, "X");
        assert_eq!(keeper.round, 2);
        assert_eq!(state.ledger.entry(1).unwrap().player, "P01");
        assert_eq!(state.pool.len(), 22 - 8);
        assert!(!state.pool.contains("X"));
        assert_eq!(state.next_pick, 9);
        assert!(engine.viewer().notices.iter().any(|n| n.contains("Kept")));
    }

    #[test]
    fn live_pick_updates_pool_ledger_and_depth_chart() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 1);
        seed(&cfg, &[]);

        let mut engine = engine(cfg, &["1", "3", "Nobody Special", "Y", "9", "9", "9"]);
        engine.run(&mut rng()).unwrap();

        let state = engine.state();
        let first = state.ledger.entry(1).unwrap();
        assert_eq!((first.player.as_str(), first.owner.as_str(), first.round), ("Y", "B", 1));
        assert_eq!(first.position, "RB");
        assert!(!state.pool.contains("Y"));
        let chart = &state.depth_charts["B"];
        assert_eq!(chart.slot("RB1").unwrap().occupant.as_ref().unwrap().player, "Y");

        let viewer = engine.viewer();
        assert_eq!(viewer.tables[0].title, "B Draft History");
        assert_eq!(viewer.tables[1].title, "Best Players Available");
        assert_eq!(viewer.tables[1].rows.len(), BEST_AVAILABLE_COUNT);
        let sink = engine.sink();
        assert_eq!(sink.league_writes, 1 + 4);
        assert_eq!((sink.owner_writes, sink.depth_chart_writes), (5, 5));
        assert_eq!(sink.last_league_len, 4);
    }

    #[test]
    fn drafted_player_cannot_be_taken_again() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 1);
        seed(&cfg, &[]);

        let mut engine = engine(cfg, &["Y", "Y", "P05", "9", "9"]);
        engine.run(&mut rng()).unwrap();

        let state = engine.state();
        assert_eq!(state.ledger.entry(1).unwrap().player, "Y");
        assert_eq!(state.ledger.entry(2).unwrap().player, "P05");
        assert_eq!(state.ledger.len(), 4);
    }

    #[test]
    fn interrupted_draft_resumes_at_the_next_pick() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 2);
        seed(&cfg, &[("A", "X", 2)]);

        // Input runs out after three live picks.
        let mut first = engine(cfg.clone(), &["9", "9", "9"]);
        assert!(matches!(first.run(&mut rng()), Err(DraftError::InputClosed)));
        assert_eq!(first.state().next_pick, 4);
        assert_eq!(first.state().owner_index, 3);

        let mut resumed = engine(cfg, &["9"; 4]);
        assert_eq!(resumed.state().next_pick, 4);
        assert_eq!(resumed.state().ledger.len(), 4);
        resumed.run(&mut rng()).unwrap();

        let state = resumed.state();
        assert_eq!(picks(state), (1..=8).collect::<Vec<_>>());
        assert_eq!(state.ledger.entry(4).unwrap().owner, "C");
        assert_eq!(state.ledger.entry(6).unwrap().player, "X");
        assert_eq!(resumed.phase(), DraftPhase::Complete);
    }

    #[test]
    fn checkpoint_stores_the_turn_after_the_last_commit() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 1);
        seed(&cfg, &[]);

        let mut engine = engine(cfg.clone(), &["9", "9"]);
        assert!(engine.run(&mut rng()).is_err());

        let saved = CheckpointStore::new(&cfg).load_checkpoint().unwrap().unwrap();
        assert_eq!(saved.state, *engine.state());
        assert_eq!((saved.state.next_pick, saved.state.owner_index, saved.state.round), (3, 2, 1));
    }

    #[test]
    fn salary_cap_keepers_sort_ahead_of_live_picks() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "salary-cap", 1);
        seed(&cfg, &[("C", "X", 0)]);

        // C is never skipped in Salary Cap; "6" looks up a listed value first.
        let mut engine = engine(cfg, &["6", "P03", "9", "2", "9", "9", "9"]);
        engine.run(&mut rng()).unwrap();

        let state = engine.state();
        // C sits in slot 4 of 4: (0 - 1) * 4 + (4 - 3) = -3
        assert_eq!(picks(state), vec![-3, 1, 2, 3, 4]);
        assert_eq!(state.ledger.entry(-3).unwrap().player, "X");
        assert_eq!(state.ledger.entry(4).unwrap().owner, "C");
        assert_eq!(state.ledger.entry(1).unwrap().salary, Some(59.0));

        let viewer = engine.viewer();
        assert_eq!(viewer.tables[0].title, "Player Value");
        assert_eq!(viewer.tables[0].rows[0][0], "P03");
        // Every owner's depth chart is shown in Salary Cap.
        assert_eq!(viewer.tables.len(), 1 + 4);
    }

    #[test]
    fn failed_checkpoint_write_halts_without_applying_the_pick() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 1);
        seed(&cfg, &[("A", "X", 2)]);
        // A directory squatting on the temp file path makes the write fail.
        fs::create_dir_all(temp.path().join("2024/draft_params.json.tmp")).unwrap();

        let mut engine = engine(cfg, &[]);
        let err = engine.run(&mut rng());

        assert!(matches!(err, Err(DraftError::Persistence { .. })));
        assert!(engine.state().pool.contains("X"));
        assert!(engine.state().ledger.is_empty());
        assert_eq!(engine.sink().league_writes, 0);
    }

    #[test]
    fn pre_draft_prompts_once_and_is_skipped_after() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 1);

        let answers = ["X", "0", "0", "0", "1", "2", "3", "4"];
        let mut first = engine(cfg.clone(), &answers);
        first.pre_draft(&mut rng()).unwrap();

        assert_eq!(first.keepers().unwrap().get("A").unwrap().cost_round, 2);
        let order = first.draft_order().unwrap();
        assert_eq!(order.len(), 4);

        let mut second = engine(cfg, &[]);
        second.pre_draft(&mut rng()).unwrap();
        assert_eq!(second.draft_order(), Some(order));
        assert_eq!(second.keepers(), first.keepers());
    }

    #[test]
    fn keepers_are_applied_only_once() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 2);
        seed(&cfg, &[("A", "X", 2)]);

        let mut first = engine(cfg.clone(), &[]);
        first.pre_draft(&mut rng()).unwrap();
        first.apply_keepers().unwrap();
        assert_eq!(first.phase(), DraftPhase::KeepersApplied);
        assert_eq!(first.state().ledger.len(), 1);
        assert_eq!((first.state().next_pick, first.state().owner_index, first.state().round), (1, 0, 1));

        let mut second = engine(cfg, &[]);
        second.pre_draft(&mut rng()).unwrap();
        second.apply_keepers().unwrap();
        assert_eq!(second.state().ledger.len(), 1);
        assert!(!second.state().pool.contains("X"));
    }

    #[test]
    fn interrupted_keeper_pass_is_redone_in_full() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 2);
        seed(&cfg, &[("A", "X", 2), ("B", "Y", 1)]);
        let blocker = temp.path().join("2024/draft_params.json.tmp");
        fs::create_dir_all(&blocker).unwrap();

        let mut first = engine(cfg.clone(), &[]);
        assert!(matches!(first.run(&mut rng()), Err(DraftError::Persistence { .. })));
        assert!(!CheckpointStore::new(&cfg).has_checkpoint());
        fs::remove_dir(&blocker).unwrap();

        // B's keeper is pick 1 and A's is pick 6; the other six turns auto-pick.
        let mut resumed = engine(cfg, &["9"; 6]);
        resumed.run(&mut rng()).unwrap();

        let state = resumed.state();
        assert_eq!(picks(state), (1..=8).collect::<Vec<_>>());
        let first_pick = state.ledger.entry(1).unwrap();
        assert_eq!((first_pick.owner.as_str(), first_pick.player.as_str()), ("B", "Y"));
        let sixth = state.ledger.entry(6).unwrap();
        assert_eq!((sixth.owner.as_str(), sixth.player.as_str()), ("A", "X"));
        assert!(!state.pool.contains("Y"));
        assert_eq!(state.ledger.full_history().iter().filter(|e| e.player == "Y").count(), 1);
        assert_eq!(resumed.viewer().notices.iter().filter(|n| n.contains("Kept")).count(), 2);
    }

    #[test]
    fn keeper_pass_needs_keepers_to_be_determined() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path(), "snake", 1);
        let store = CheckpointStore::new(&cfg);
        let order = ["B", "D", "A", "C"].iter().map(|s| s.to_string()).collect();
        store.save_draft_order(&DraftOrder::new(order).unwrap()).unwrap();

        let mut engine = engine(cfg, &[]);
        assert!(matches!(engine.apply_keepers(), Err(DraftError::Config(_))));
        assert!(!store.has_checkpoint());
        assert!(engine.state().ledger.is_empty());
    }
}
