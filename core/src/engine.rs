use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Transition trigger fired when a cell's occupant reaches a terminal state.
pub const ON_CLEARED: &str = "on_cleared";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    NoChange,
    /// Modifier click on a hidden cell. The caller may ask for a note.
    AnnotationRequested,
    Revealed,
    /// Revealed and locked. Call `advance` to run the fight.
    FightPending,
    /// Mimic showed its true face and is locked until `advance`.
    MimicRevealed,
    Resolved,
    Died,
    Won,
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        use ClickOutcome::*;
        match self {
            NoChange => false,
            AnnotationRequested => false,
            Revealed => true,
            FightPending => true,
            MimicRevealed => true,
            Resolved => true,
            Died => true,
            Won => true,
        }
    }

    pub const fn needs_advance(self) -> bool {
        matches!(self, Self::FightPending | Self::MimicRevealed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickReport {
    pub outcome: ClickOutcome,
    pub events: Vec<GameEvent>,
}

impl ClickReport {
    pub const fn no_change() -> Self {
        Self {
            outcome: ClickOutcome::NoChange,
            events: Vec::new(),
        }
    }

    pub const fn has_update(&self) -> bool {
        self.outcome.has_update()
    }
}

impl<R: Rng> GameSession<R> {
    /// Primary entry point. `modifier` is the shift or right click used for
    /// annotations.
    pub fn handle_click(&mut self, coords: Coord2, modifier: bool) -> Result<ClickReport> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let hidden = self.board.visibility(coords).is_hidden();
        if hidden && modifier {
            return Ok(ClickReport {
                outcome: ClickOutcome::AnnotationRequested,
                events: Vec::new(),
            });
        }
        if self.board.is_processed(coords) {
            log::debug!("Cell {coords:?} already processed");
            return Ok(ClickReport::no_change());
        }
        if self.board.is_locked(coords) {
            log::debug!("Cell {coords:?} is locked");
            return Ok(ClickReport::no_change());
        }

        let mut events = Vec::new();
        let outcome = if hidden {
            self.hidden_click(coords, &mut events)
        } else {
            self.revealed_click(coords, &mut events)
        };
        Ok(ClickReport { outcome, events })
    }

    /// Runs the fight phase of a pending cell and unlocks it. Cells without a
    /// pending phase are left alone.
    pub fn advance(&mut self, coords: Coord2) -> Result<ClickReport> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.pending.remove(&coords) {
            return Ok(ClickReport::no_change());
        }
        let mut events = Vec::new();
        let outcome = self.fight(coords, &mut events);
        self.board.unlock(coords);
        Ok(ClickReport { outcome, events })
    }

    fn hidden_click(&mut self, coords: Coord2, events: &mut Vec<GameEvent>) -> ClickOutcome {
        let entity = self.board.current_entity(coords);
        let behavior = self.rules.hidden_click_behavior(entity);
        let natural_empty = entity.is_natural_empty();
        log::debug!("Hidden click on {coords:?}: {}, {behavior:?}", entity.name);

        self.reveal_cell(coords, events);
        match behavior {
            HiddenClickBehavior::Fight => {
                self.board.lock(coords);
                self.pending.insert(coords);
                ClickOutcome::FightPending
            }
            HiddenClickBehavior::Reveal => {
                if natural_empty {
                    self.set_content(coords, Content::Empty, events);
                }
                ClickOutcome::Revealed
            }
        }
    }

    fn revealed_click(&mut self, coords: Coord2, events: &mut Vec<GameEvent>) -> ClickOutcome {
        let entity = self.board.current_entity(coords).clone();
        let behavior = self.rules.revealed_click_behavior(&entity);
        log::debug!("Revealed click on {coords:?}: {}, {behavior:?}", entity.name);

        if behavior != RevealedClickBehavior::None && self.board.content(coords) != Content::Alive {
            log::debug!("Cell {coords:?} has nothing alive to interact with");
            return ClickOutcome::NoChange;
        }

        match behavior {
            RevealedClickBehavior::Fight if self.rules.is_mimic(&entity) => {
                self.board.lock(coords);
                self.pending.insert(coords);
                ClickOutcome::MimicRevealed
            }
            RevealedClickBehavior::Fight => self.fight(coords, events),
            RevealedClickBehavior::Claim => self.claim(coords, &entity, events),
            RevealedClickBehavior::Trigger => self.trigger(coords, &entity, events),
            RevealedClickBehavior::None => ClickOutcome::NoChange,
        }
    }

    fn fight(&mut self, coords: Coord2, events: &mut Vec<GameEvent>) -> ClickOutcome {
        let entity = self.board.current_entity(coords).clone();
        self.set_content(coords, Content::Dying, events);

        let result = resolve_fight(&self.rules, &entity, self.theme.as_deref());
        let died = self.player.take_damage(result.damage);
        self.player.add_experience(result.experience);
        events.push(GameEvent::CombatResolved {
            coords,
            entity: entity.id,
            damage: result.damage,
            experience: result.experience,
        });
        log::debug!(
            "{} defeated at {coords:?}, took {} damage",
            entity.name,
            result.damage
        );

        if self.rules.is_firefly(&entity) {
            self.fireflies_killed += 1;
        }
        self.tally.record_cleared(&entity);
        self.set_content(coords, Content::Dead, events);
        self.finish(coords, &entity, died, true, events)
    }

    fn claim(
        &mut self,
        coords: Coord2,
        entity: &EntityDefinition,
        events: &mut Vec<GameEvent>,
    ) -> ClickOutcome {
        self.set_content(coords, Content::Claimed, events);

        let outcome = resolve_claim(
            &self.rules,
            entity,
            coords,
            ClaimContext {
                player: &mut self.player,
                inventory: &mut self.inventory,
                crystals: &mut self.crystals,
                board_size: self.board.size(),
                heal_amount: self.config.settings.treasure_heal_amount,
                rng: &mut self.rng,
            },
        );
        events.push(GameEvent::Claimed {
            coords,
            entity: entity.id,
            kind: outcome.kind,
            experience: outcome.experience,
        });

        match outcome.kind {
            ClaimKind::Crystal { color, outcome } => {
                events.push(GameEvent::CrystalCollected {
                    coords,
                    color,
                    outcome,
                });
            }
            ClaimKind::Item {
                slot: Some(slot),
                tome_opened,
            } => {
                events.push(GameEvent::ItemStored {
                    entity: entity.id,
                    slot,
                });
                if let Some(secret_order) = self.crystals.secret_order().filter(|_| tome_opened) {
                    events.push(GameEvent::CrystalTomeOpened {
                        secret_order,
                        progress: self.crystals.progress(),
                    });
                }
            }
            ClaimKind::Item { slot: None, .. } => {
                events.push(GameEvent::ItemDropped { entity: entity.id });
            }
            ClaimKind::Chest | ClaimKind::Healed { .. } => {}
        }

        if outcome.sequence_completed {
            let spectral_monoliths = make_monoliths_spectral(&mut self.board, &self.rules);
            events.push(GameEvent::CrystalSequenceCompleted {
                spectral_monoliths,
                bonus_experience: SEQUENCE_COMPLETE_BONUS,
            });
        }

        if self.rules.reveals_all_rats(entity) {
            let revealed = reveal_all_rats(&mut self.board, &self.rules);
            events.push(GameEvent::RatsRevealed { revealed });
        } else if self.rules.weakens_mines(entity) {
            let cells = weaken_all_mines(&mut self.board, &self.rules);
            events.push(GameEvent::MinesWeakened { cells });
        }

        self.tally.record_cleared(entity);
        self.finish(coords, entity, false, true, events)
    }

    fn trigger(
        &mut self,
        coords: Coord2,
        entity: &EntityDefinition,
        events: &mut Vec<GameEvent>,
    ) -> ClickOutcome {
        if self.rules.is_spyglass(entity) {
            let (area, revealed) =
                reveal_spyglass_area(&mut self.board, &mut self.spyglasses, &mut self.rng);
            events.push(GameEvent::AreaRevealed { area, revealed });
        } else if self.rules.reveals_random_single(entity) {
            if let Some(pos) = reveal_random_hidden(&mut self.board, &mut self.rng) {
                events.push(GameEvent::CellRevealed { coords: pos });
            }
        }

        self.set_content(coords, Content::Triggered, events);
        let damage = resolve_trigger(&self.rules, entity, self.theme.as_deref());
        let died = self.player.take_damage(damage);
        events.push(GameEvent::TrapTriggered {
            coords,
            entity: entity.id,
            damage,
        });

        self.tally.record_cleared(entity);
        self.finish(coords, entity, died, false, events)
    }

    /// Common tail of every terminal transition. Death wins over victory, and
    /// only kills and claims can win.
    fn finish(
        &mut self,
        coords: Coord2,
        entity: &EntityDefinition,
        died: bool,
        can_win: bool,
        events: &mut Vec<GameEvent>,
    ) -> ClickOutcome {
        self.handle_entity_transition(coords, ON_CLEARED, events);

        if died {
            log::info!("Player killed by {}", entity.name);
            self.state = SessionState::Lost;
            events.push(GameEvent::PlayerDied { killer: entity.id });
            ClickOutcome::Died
        } else if can_win && self.rules.triggers_win(entity) {
            log::info!("Victory! {} cleared", entity.name);
            self.state = SessionState::Won;
            events.push(GameEvent::Victory { entity: entity.id });
            ClickOutcome::Won
        } else {
            ClickOutcome::Resolved
        }
    }

    /// Applies the entity's transition for `trigger`, if it has one. Returns
    /// whether the cell was rebound.
    pub fn handle_entity_transition(
        &mut self,
        coords: Coord2,
        trigger: &str,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let entity = self.board.current_entity(coords);
        let target = match entity.transition(trigger) {
            None => {
                log::debug!("No {trigger} transition for {}", entity.name);
                return false;
            }
            Some(TransitionSpec::Direct(target)) => target.clone(),
            Some(TransitionSpec::RandomChoice(choices)) => {
                match pick_weighted(choices, &mut self.rng) {
                    Some(choice) => choice.target.clone(),
                    None => return false,
                }
            }
        };

        let from = self.board.entity_id(coords);
        let before = self.board.content(coords);
        let after = self.board.rebind(coords, target.entity_id);
        let to = self.board.entity_id(coords);

        let spawned = self.board.current_entity(coords);
        log::debug!("Cell {coords:?} now holds {}", spawned.name);
        if after == Content::Alive {
            self.tally.record_spawned(spawned, &self.rules);
        }

        events.push(GameEvent::EntityTransformed {
            coords,
            from,
            to,
            cue: Cue::from_target(&target),
        });
        if before != after {
            events.push(GameEvent::ContentChanged {
                coords,
                from: before,
                to: after,
            });
        }
        true
    }

    fn reveal_cell(&mut self, coords: Coord2, events: &mut Vec<GameEvent>) {
        if self.board.reveal(coords) {
            events.push(GameEvent::CellRevealed { coords });
        }
    }

    fn set_content(&mut self, coords: Coord2, to: Content, events: &mut Vec<GameEvent>) {
        let from = self.board.content(coords);
        if from != to {
            self.board.set_content(coords, to);
            events.push(GameEvent::ContentChanged { coords, from, to });
        }
    }
}
