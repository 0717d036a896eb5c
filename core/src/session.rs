use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Active,
    Won,
    Lost,
}

impl SessionState {
    /// Only a dead player stops the game. A won board stays playable.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpOutcome {
    Leveled,
    NotEnoughExperience,
    /// A transition is still pending somewhere on the board.
    Busy,
}

/// Everything that lives for one board: the grid plus the player-side state
/// that is reset whenever a new board is loaded.
#[derive(Clone, Debug)]
pub struct GameSession<R = SmallRng> {
    pub(crate) config: GameConfig,
    pub(crate) rules: TagRules,
    pub(crate) board: BoardState,
    pub(crate) player: PlayerStats,
    pub(crate) inventory: Inventory,
    pub(crate) crystals: CrystalSequenceTracker,
    pub(crate) spyglasses: SpyglassLedger,
    /// Cells revealed by a fight click whose fight phase has not run yet.
    pub(crate) pending: BTreeSet<Coord2>,
    pub(crate) tally: EntityTally,
    /// Kept across boards.
    pub(crate) fireflies_killed: u32,
    pub(crate) annotations: BTreeMap<Coord2, String>,
    pub(crate) state: SessionState,
    pub(crate) theme: Option<String>,
    pub(crate) rng: R,
}

impl GameSession<SmallRng> {
    pub fn with_seed(config: GameConfig, initial: &Array2<EntityId>, seed: u64) -> Self {
        Self::new(config, initial, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn new(config: GameConfig, initial: &Array2<EntityId>, rng: R) -> Self {
        let rules = config.settings.rules();
        let board = BoardState::new(config.catalog.clone(), initial);
        let tally = EntityTally::from_board(&board, &rules);
        let mut session = Self {
            player: PlayerStats::new(&config.settings.player),
            theme: config.settings.default_theme.clone(),
            config,
            rules,
            board,
            inventory: Inventory::new(),
            crystals: CrystalSequenceTracker::new(),
            spyglasses: SpyglassLedger::new(),
            pending: BTreeSet::new(),
            tally,
            fireflies_killed: 0,
            annotations: BTreeMap::new(),
            state: SessionState::Active,
            rng,
        };
        session.opening_reveal();
        session
    }

    /// Replaces the board and resets all per-board state. Returns the
    /// spyglass uncovered as an opening hint, if any.
    pub fn load_board(&mut self, initial: &Array2<EntityId>) -> Option<Coord2> {
        self.board = BoardState::new(self.config.catalog.clone(), initial);
        self.tally = EntityTally::from_board(&self.board, &self.rules);
        self.player = PlayerStats::new(&self.config.settings.player);
        self.inventory = Inventory::new();
        self.crystals = CrystalSequenceTracker::new();
        self.spyglasses = SpyglassLedger::new();
        self.pending.clear();
        self.annotations.clear();
        self.state = SessionState::Active;
        self.opening_reveal()
    }

    fn opening_reveal(&mut self) -> Option<Coord2> {
        let (rows, cols) = self.board.size();
        log::info!("Loaded {rows}x{cols} board");
        reveal_random_spyglass(&mut self.board, &self.rules, &mut self.rng)
    }

    pub(crate) fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    pub fn level_up(&mut self) -> Result<LevelUpOutcome> {
        self.check_not_finished()?;
        if self.board.any_locked() {
            return Ok(LevelUpOutcome::Busy);
        }
        Ok(if self.player.level_up(&self.config.settings.player) {
            LevelUpOutcome::Leveled
        } else {
            LevelUpOutcome::NotEnoughExperience
        })
    }

    /// Stores or clears a note on a hidden cell.
    pub fn annotate(&mut self, coords: Coord2, note: Option<String>) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.board.validate_coords(coords)?;
        if !self.board.visibility(coords).is_hidden() {
            return Ok(NoChange);
        }
        Ok(match note.filter(|note| !note.trim().is_empty()) {
            Some(note) if self.annotations.get(&coords) == Some(&note) => NoChange,
            Some(note) => {
                self.annotations.insert(coords, note);
                Changed
            }
            None => match self.annotations.remove(&coords) {
                Some(_) => Changed,
                None => NoChange,
            },
        })
    }

    pub fn annotation(&self, coords: Coord2) -> Option<&str> {
        self.annotations.get(&coords).map(String::as_str)
    }

    pub fn annotations(&self) -> &BTreeMap<Coord2, String> {
        &self.annotations
    }

    /// Unknown themes leave the active one in place.
    pub fn switch_theme(&mut self, name: &str) -> bool {
        if !self.config.settings.has_theme(name) {
            log::warn!("Theme '{name}' not found, keeping {:?}", self.theme);
            return false;
        }
        self.theme = Some(name.to_owned());
        true
    }

    pub fn reveal_all(&mut self) {
        self.board.reveal_all();
    }

    pub fn hide_all(&mut self) {
        self.board.hide_all();
    }

    pub fn neighbor_threat(&self, coords: Coord2) -> Result<u32> {
        let coords = self.board.validate_coords(coords)?;
        Ok(neighbor_threat(&self.board, &self.rules, self.theme(), coords))
    }

    pub fn ooze_tint(&self, coords: Coord2) -> Result<Option<CrystalColor>> {
        let coords = self.board.validate_coords(coords)?;
        if !self.rules.is_ooze(self.board.current_entity(coords)) {
            return Ok(None);
        }
        Ok(ooze_tint(&self.board, &self.rules, coords))
    }

    /// The entity on a cell as the active theme presents it.
    pub fn entity_at(&self, coords: Coord2) -> Result<Cow<'_, EntityDefinition>> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.board.current_entity(coords).with_theme(self.theme()))
    }
}

impl<R> GameSession<R> {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &TagRules {
        &self.rules
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn player(&self) -> &PlayerStats {
        &self.player
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn crystals(&self) -> &CrystalSequenceTracker {
        &self.crystals
    }

    pub fn spyglasses(&self) -> &SpyglassLedger {
        &self.spyglasses
    }

    pub fn tally(&self) -> &EntityTally {
        &self.tally
    }

    pub fn is_full_clear(&self) -> bool {
        self.tally.is_full_clear()
    }

    pub fn fireflies_killed(&self) -> u32 {
        self.fireflies_killed
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn is_pending(&self, coords: Coord2) -> bool {
        self.pending.contains(&coords)
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }
}
