//! Skills reacting to strikes and combat results.

use combat_core::{
    ComponentBehavior, ComponentDefinition, ComponentInstance, ComponentLibrary, ComponentTag,
    ComponentValue, ConfigShape, HandlerError, HookContext, HookResult, PendingAction, Phase,
    PhaseSet, PlaybackEvent, Probe, RegistrationError,
};

/// Lethal incoming damage leaves the unit at 1 HP instead. When it saves the
/// unit, the skill's charge is spent and its event fires.
pub struct TrueMiracleEvent;

impl ComponentBehavior for TrueMiracleEvent {
    fn phases(&self) -> PhaseSet {
        PhaseSet::AFTER_TAKE_STRIKE
    }

    fn handle(
        &self,
        _: Phase,
        instance: &mut ComponentInstance,
        ctx: &mut HookContext<'_>,
    ) -> HookResult {
        let unit = ctx.unit();
        let hp = ctx.env().units()?.hp(unit).ok_or(HandlerError::UnknownUnit(unit))?;
        let hp = i64::from(hp);

        let mut saved = 0usize;
        for action in ctx.pending_mut().iter_mut().rev() {
            if let PendingAction::ChangeHp { unit: struck, delta } = action
                && *struck == unit
                && -*delta >= hp
            {
                *delta = 1 - hp;
                saved += 1;
            }
        }
        if saved == 0 {
            return Ok(());
        }

        let source = instance.reference();
        for _ in 0..saved {
            ctx.play(PlaybackEvent::DefenseHitProc {
                unit,
                source: source.clone(),
            });
        }
        let skill = ctx.entity().nid.clone();
        ctx.queue(PendingAction::TriggerCharge { unit, skill });
        if let Some(event) = instance.value().as_text().filter(|e| !e.is_empty()) {
            let target = ctx.target();
            ctx.trigger_event(event, target);
        }
        tracing::debug!(%unit, saved, "miracle held the unit at 1 HP");
        Ok(())
    }
}

/// Inflicts the status named by the value on the target after every strike
/// attempt, then spends the skill's charge.
pub struct GiveStatusAfterStrike;

impl ComponentBehavior for GiveStatusAfterStrike {
    fn phases(&self) -> PhaseSet {
        PhaseSet::AFTER_STRIKE
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
        let skill = instance
            .value()
            .as_text()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HandlerError::InvalidValue {
                component: instance.id().clone(),
                expected: ConfigShape::Skill,
            })?;
        let unit = ctx.unit();
        ctx.queue(PendingAction::AddSkill {
            unit: target,
            skill: skill.to_owned(),
            source: Some(unit),
        });
        let own = ctx.entity().nid.clone();
        ctx.queue(PendingAction::TriggerCharge { unit, skill: own });
        Ok(())
    }
}

/// HP loss after fighting an enemy.
///
/// The lethal variant fires once per combat and may kill: HP is floored at 0
/// and a `Die` is queued when it gets there. The mid-battle variant fires after
/// every exchange and never takes the unit below 1 HP.
pub struct Recoil {
    pub lethal: bool,
}

impl Recoil {
    fn amount(instance: &ComponentInstance, ctx: &HookContext<'_>) -> i64 {
        match instance.value() {
            ComponentValue::Int(amount) => *amount,
            ComponentValue::Text(expression) => ctx.evaluate_or(instance.id(), expression, 0),
            _ => 0,
        }
    }
}

impl ComponentBehavior for Recoil {
    fn phases(&self) -> PhaseSet {
        if self.lethal {
            PhaseSet::END_COMBAT
        } else {
            PhaseSet::END_SUB_COMBAT
        }
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
        let unit = ctx.unit();
        let units = ctx.env().units()?;
        if !units.check_enemy(unit, target) {
            return Ok(());
        }
        let hp = i64::from(units.hp(unit).ok_or(HandlerError::UnknownUnit(unit))?);

        let amount = Self::amount(instance, ctx).max(0);
        let floor = if self.lethal { 0 } else { 1 };
        let loss = amount.min(hp - floor).max(0);
        if loss == 0 {
            return Ok(());
        }

        ctx.queue(PendingAction::ChangeHp { unit, delta: -loss });
        if self.lethal && hp - loss == 0 {
            ctx.queue(PendingAction::Die { unit, killer: None });
        }
        Ok(())
    }
}

/// Flashes the attacker and plays a sting before a critical strike.
pub struct CritFlash;

pub const CRIT_TINT: [u8; 3] = [255, 255, 255];

impl ComponentBehavior for CritFlash {
    fn phases(&self) -> PhaseSet {
        PhaseSet::BEFORE_CRIT
    }

    fn handle(
        &self,
        _: Phase,
        instance: &mut ComponentInstance,
        ctx: &mut HookContext<'_>,
    ) -> HookResult {
        let frames = instance.value().as_int().unwrap_or(0).clamp(0, i64::from(u32::MAX));
        let unit = ctx.unit();
        ctx.play(PlaybackEvent::TintEffect {
            unit,
            color: CRIT_TINT,
            frames: frames as u32,
        });
        ctx.play(PlaybackEvent::SoundCue {
            sound: "Critical Hit".to_owned(),
        });
        Ok(())
    }
}

/// Widens every area effect the unit casts by the value.
pub struct EmpowerSplash;

impl ComponentBehavior for EmpowerSplash {
    fn empower_splash(&self, instance: &ComponentInstance, _: &Probe<'_>) -> Option<i64> {
        instance.value().as_int()
    }
}

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    library.register(
        ComponentDefinition::new("true_miracle_event", ComponentTag::Combat2)
            .with_value(ConfigShape::Event, ComponentValue::Text(String::new()))
            .describe("Unit cannot go beneath 1 HP. An event occurs once this triggers"),
        TrueMiracleEvent,
    )?;
    library.register(
        ComponentDefinition::new("give_status_after_strike", ComponentTag::Combat2)
            .with_value(ConfigShape::Skill, ComponentValue::Text(String::new()))
            .describe("Gives a status to target after any strike attempt"),
        GiveStatusAfterStrike,
    )?;
    library.register(
        ComponentDefinition::new("recoil_after_combat", ComponentTag::Combat2)
            .with_value(ConfigShape::Equation, ComponentValue::Text("0".to_owned()))
            .describe("Unit loses HP after combat with an enemy; may be lethal"),
        Recoil { lethal: true },
    )?;
    library.register(
        ComponentDefinition::new("mid_battle_recoil", ComponentTag::Combat2)
            .with_value(ConfigShape::Equation, ComponentValue::Text("0".to_owned()))
            .describe("Unit loses HP after each exchange with an enemy, down to 1"),
        Recoil { lethal: false },
    )?;
    library.register(
        ComponentDefinition::new("crit_flash", ComponentTag::Aesthetic)
            .with_value(ConfigShape::Int, ComponentValue::Int(20))
            .describe("White flash before critical strikes"),
        CritFlash,
    )?;
    library.register(
        ComponentDefinition::new("empower_splash", ComponentTag::Aoe)
            .with_value(ConfigShape::Int, ComponentValue::Int(1))
            .describe("Increases the radius of the unit's area effects"),
        EmpowerSplash,
    )
}
