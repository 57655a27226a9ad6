//! Area-of-effect item components.

use combat_core::{
    BoardOracle, Capability, ComponentBehavior, ComponentDefinition, ComponentInstance,
    ComponentLibrary, ComponentTag, ComponentValue, ConfigShape, HandlerError, HookContext,
    HookResult, PendingAction, Phase, PhaseSet, PlaybackEvent, Position, Probe, RegistrationError,
    UnitId, manhattan_sphere,
};

/// Units standing within `radius` (Manhattan) of `center`, on the board.
fn occupants(board: &dyn BoardOracle, center: Position, radius: i64) -> Vec<UnitId> {
    if radius < 0 {
        return Vec::new();
    }
    let dimensions = board.dimensions();
    let cap = i64::from(dimensions.width) + i64::from(dimensions.height);
    let radius = u32::try_from(radius.min(cap)).unwrap_or(0);

    manhattan_sphere(center, 0..=radius)
        .into_iter()
        .filter(|&tile| board.check_bounds(tile))
        .filter_map(|tile| board.unit_at(tile))
        .collect()
}

/// Blast that only reaches the caster's allies, never the caster.
///
/// Radius is the evaluated value plus the unit's `empower_splash`.
pub struct AllyBlastAoeExceptUnit;

impl ComponentBehavior for AllyBlastAoeExceptUnit {
    fn splash(
        &self,
        instance: &ComponentInstance,
        probe: &Probe<'_>,
        center: Position,
        empower: i64,
    ) -> Option<Vec<Position>> {
        let expression = instance.value().as_text()?;
        let (Ok(board), Ok(units)) = (probe.env.board(), probe.env.units()) else {
            tracing::warn!(component = %instance.id(), "board or units unavailable; empty splash");
            return Some(Vec::new());
        };
        let radius = probe
            .env
            .evaluate_or(instance.id(), expression, &probe.bindings(), 0)
            .saturating_add(empower);

        Some(
            occupants(board, center, radius)
                .into_iter()
                .filter(|&other| other != probe.unit && units.check_ally(probe.unit, other))
                .filter_map(|other| units.position(other))
                .collect(),
        )
    }
}

/// Damage half of the post-combat splash pair. Holds the damage expression;
/// does nothing on its own.
pub struct PostCombatSplashDamage;

impl ComponentBehavior for PostCombatSplashDamage {
    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::SplashDamage]
    }
}

/// Area half of the post-combat splash pair. After combat, every unit hostile
/// to the wielder within the radius around the target, other than the target
/// itself, takes the damage of the paired [`PostCombatSplashDamage`].
pub struct PostCombatSplashAoe;

impl ComponentBehavior for PostCombatSplashAoe {
    fn phases(&self) -> PhaseSet {
        PhaseSet::END_COMBAT
    }

    fn handle(
        &self,
        _: Phase,
        instance: &mut ComponentInstance,
        ctx: &mut HookContext<'_>,
    ) -> HookResult {
        let Some(target) = ctx.target() else {
            return Ok(());
        };
        let Some(paired) = ctx.siblings().find_capability(Capability::SplashDamage) else {
            tracing::debug!(entity = %ctx.entity(), "no splash damage component; nothing to deal");
            return Ok(());
        };
        let damage = paired
            .value()
            .as_text()
            .map_or(0, |expression| ctx.evaluate_or(paired.id(), expression, 0));
        if damage <= 0 {
            return Ok(());
        }
        let radius = instance
            .value()
            .as_text()
            .map_or(0, |expression| ctx.evaluate_or(instance.id(), expression, 0));

        let env = ctx.env();
        let board = env.board()?;
        let units = env.units()?;
        let unit = ctx.unit();
        let center = units
            .position(target)
            .ok_or(HandlerError::UnknownUnit(target))?;

        let shown = u32::try_from(damage).unwrap_or(u32::MAX);
        for victim in occupants(board, center, radius) {
            if victim == target || !units.check_enemy(unit, victim) {
                continue;
            }
            ctx.queue(PendingAction::ChangeHp {
                unit: victim,
                delta: -damage,
            });
            ctx.play(PlaybackEvent::DamageHit {
                attacker: unit,
                defender: victim,
                damage: shown,
            });
        }
        Ok(())
    }
}

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    library.register(
        ComponentDefinition::new("ally_blast_aoe_except_unit", ComponentTag::Aoe)
            .with_value(ConfigShape::Equation, ComponentValue::Text("0".to_owned()))
            .describe("Blast AOE that only hits allies except self"),
        AllyBlastAoeExceptUnit,
    )?;
    library.register(
        ComponentDefinition::new("post_combat_splash_damage", ComponentTag::Aoe)
            .with_value(ConfigShape::Equation, ComponentValue::Text("0".to_owned()))
            .describe("Damage dealt by the item's post-combat splash"),
        PostCombatSplashDamage,
    )?;
    library.register(
        ComponentDefinition::new("post_combat_splash_aoe", ComponentTag::Aoe)
            .with_value(ConfigShape::Equation, ComponentValue::Text("1".to_owned()))
            .describe("Enemies near the target take splash damage after combat"),
        PostCombatSplashAoe,
    )
}
