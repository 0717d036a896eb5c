use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Damage dealt by any trap that is not exempt.
pub const TRAP_DAMAGE: u32 = 2;

/// Flat bonus granted once when the crystal sequence is completed.
pub const SEQUENCE_COMPLETE_BONUS: u32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightResult {
    pub damage: u32,
    pub experience: u32,
}

pub fn resolve_fight(rules: &TagRules, entity: &EntityDefinition, theme: Option<&str>) -> FightResult {
    let level = entity.themed_level(theme);
    FightResult {
        damage: level,
        experience: if rules.has_no_experience(entity) { 0 } else { level },
    }
}

/// Spyglasses and level 0 entities are harmless; every other trigger hurts.
pub fn resolve_trigger(rules: &TagRules, entity: &EntityDefinition, theme: Option<&str>) -> u32 {
    if rules.is_spyglass(entity) || entity.themed_level(theme) == 0 {
        0
    } else {
        TRAP_DAMAGE
    }
}

/// Which claim branch fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimKind {
    Crystal {
        color: CrystalColor,
        outcome: CollectionOutcome,
    },
    /// Chests only drop their loot through their transition.
    Chest,
    Healed {
        amount: u32,
    },
    Item {
        slot: Option<usize>,
        tome_opened: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub kind: ClaimKind,
    /// Everything granted by this claim, reward tags and completion bonus included.
    pub experience: u32,
    pub sequence_completed: bool,
}

/// Player-side state a claim may touch.
pub struct ClaimContext<'a, R: Rng + ?Sized> {
    pub player: &'a mut PlayerStats,
    pub inventory: &'a mut Inventory,
    pub crystals: &'a mut CrystalSequenceTracker,
    pub board_size: Coord2,
    pub heal_amount: u32,
    pub rng: &'a mut R,
}

pub fn resolve_claim<R: Rng + ?Sized>(
    rules: &TagRules,
    entity: &EntityDefinition,
    coords: Coord2,
    ctx: ClaimContext<'_, R>,
) -> ClaimOutcome {
    let mut experience = 0;
    let mut sequence_completed = false;

    let kind = if rules.is_crystal(entity) {
        let color = quadrant_color(ctx.board_size, coords);
        let outcome = ctx.crystals.process_collection(color);
        experience += outcome.experience();
        if outcome == CollectionOutcome::SequenceComplete {
            experience += SEQUENCE_COMPLETE_BONUS;
            sequence_completed = true;
        }
        log::debug!("Claimed {color:?} crystal at {coords:?}: {outcome:?}");
        ClaimKind::Crystal { color, outcome }
    } else if rules.is_chest(entity) {
        ClaimKind::Chest
    } else if rules.is_item(entity) && !rules.is_healing_elixir(entity) {
        let slot = ctx.inventory.add(entity.id);
        let tome_opened = slot.is_some() && rules.is_crystal_tome(entity);
        if tome_opened {
            ctx.crystals.ensure_sequence(ctx.rng);
        }
        ClaimKind::Item { slot, tome_opened }
    } else {
        ClaimKind::Healed {
            amount: ctx.player.heal(ctx.heal_amount),
        }
    };

    experience += rules.reward_experience(entity);
    ctx.player.add_experience(experience);

    ClaimOutcome {
        kind,
        experience,
        sequence_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    struct Fixture {
        config: GameConfig,
        player: PlayerStats,
        inventory: Inventory,
        crystals: CrystalSequenceTracker,
        rng: SmallRng,
    }

    impl Fixture {
        fn new() -> Self {
            let config = config();
            let player = PlayerStats::new(&config.settings.player);
            Self {
                config,
                player,
                inventory: Inventory::new(),
                crystals: CrystalSequenceTracker::new(),
                rng: SmallRng::seed_from_u64(42),
            }
        }

        fn claim(&mut self, id: EntityId, coords: Coord2) -> ClaimOutcome {
            let rules = self.config.settings.rules();
            let entity = self.config.catalog.get(id).clone();
            resolve_claim(
                &rules,
                &entity,
                coords,
                ClaimContext {
                    player: &mut self.player,
                    inventory: &mut self.inventory,
                    crystals: &mut self.crystals,
                    board_size: (4, 4),
                    heal_amount: self.config.settings.treasure_heal_amount,
                    rng: &mut self.rng,
                },
            )
        }
    }

    #[test]
    fn fight_uses_themed_level() {
        let config = config();
        let rules = config.settings.rules();

        let ogre = config.catalog.get(OGRE);
        assert_eq!(
            resolve_fight(&rules, ogre, None),
            FightResult { damage: 3, experience: 3 }
        );
        assert_eq!(
            resolve_fight(&rules, ogre, Some("dogs")),
            FightResult { damage: 4, experience: 4 }
        );
    }

    #[test]
    fn no_experience_tag_still_hurts() {
        let config = config();
        let rules = config.settings.rules();

        assert_eq!(
            resolve_fight(&rules, config.catalog.get(GHOST), None),
            FightResult { damage: 2, experience: 0 }
        );
    }

    #[test]
    fn trigger_damage_exemptions() {
        let config = config();
        let rules = config.settings.rules();

        assert_eq!(resolve_trigger(&rules, config.catalog.get(VINE_TRAP), None), TRAP_DAMAGE);
        assert_eq!(resolve_trigger(&rules, config.catalog.get(ESSENCE), None), 0);
        assert_eq!(resolve_trigger(&rules, config.catalog.get(SPYGLASS), None), 0);
    }

    #[test]
    fn treasure_heals_and_rewards() {
        let mut fx = Fixture::new();
        fx.player.take_damage(6);

        let outcome = fx.claim(GEM, (0, 0));

        assert_eq!(outcome.kind, ClaimKind::Healed { amount: 6 });
        assert_eq!(outcome.experience, 5);
        assert_eq!(fx.player.health, fx.player.max_health);
        assert_eq!(fx.player.experience, 5);
    }

    #[test]
    fn chest_does_not_heal() {
        let mut fx = Fixture::new();
        fx.player.take_damage(6);

        let outcome = fx.claim(CHEST, (0, 0));

        assert_eq!(outcome.kind, ClaimKind::Chest);
        assert_eq!(fx.player.health, 4);
    }

    #[test]
    fn tome_opens_sequence_lazily() {
        let mut fx = Fixture::new();

        let outcome = fx.claim(TOME, (0, 0));

        assert_eq!(
            outcome.kind,
            ClaimKind::Item {
                slot: Some(0),
                tome_opened: true
            }
        );
        assert!(fx.crystals.secret_order().is_some());
    }

    #[test]
    fn tome_with_full_inventory_changes_nothing() {
        let mut fx = Fixture::new();
        for item in [RAT_SCROLL, MYSTERY_SCROLL, RAT_SCROLL, MYSTERY_SCROLL] {
            fx.inventory.add(item);
        }
        let before = fx.player;

        let outcome = fx.claim(TOME, (0, 0));

        assert_eq!(
            outcome.kind,
            ClaimKind::Item {
                slot: None,
                tome_opened: false
            }
        );
        assert_eq!(fx.player, before);
        assert_eq!(fx.crystals, CrystalSequenceTracker::new());
    }

    #[test]
    fn completing_sequence_grants_both_bonuses() {
        let mut fx = Fixture::new();
        let order = fx.crystals.ensure_sequence(&mut fx.rng);
        let cell_of = |color| match color {
            CrystalColor::Red => (0, 0),
            CrystalColor::Blue => (0, 3),
            CrystalColor::Yellow => (3, 0),
            CrystalColor::Green => (3, 3),
        };

        let outcomes: Vec<_> = order.iter().map(|&c| fx.claim(CRYSTAL, cell_of(c))).collect();

        assert_eq!(
            outcomes.iter().map(|o| o.experience).collect::<Vec<_>>(),
            vec![2, 2, 2, 13]
        );
        assert!(outcomes[3].sequence_completed);
        assert_eq!(fx.player.experience, 19);
    }

    #[test]
    fn crystal_before_tome_is_worth_one() {
        let mut fx = Fixture::new();

        let outcome = fx.claim(CRYSTAL, (3, 3));

        assert_eq!(
            outcome.kind,
            ClaimKind::Crystal {
                color: CrystalColor::Green,
                outcome: CollectionOutcome::Normal
            }
        );
        assert_eq!(outcome.experience, 1);
    }
}
