//! Pipeline-facing entry point: fire a phase over entities.

use std::str::FromStr;

use super::{ConditionalGate, Phase};
use crate::context::{CombatContext, HookContext, Probe, Siblings};
use crate::entity::{ComponentRef, Entity};
use crate::env::HookEnv;
use crate::error::{HandlerError, HookError};

/// A hook that failed and had its effects discarded.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerFailure {
    pub phase: Phase,
    pub component: ComponentRef,
    pub error: HandlerError,
}

/// What happened while firing one phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchReport {
    /// Hooks that ran and had their effects kept, in firing order.
    pub fired: Vec<ComponentRef>,
    /// Hooks suppressed by the conditional gate.
    pub gated: Vec<ComponentRef>,
    /// Hooks that failed; their effects were discarded.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    pub fn merge(&mut self, other: DispatchReport) {
        self.fired.extend(other.fired);
        self.gated.extend(other.gated);
        self.failures.extend(other.failures);
    }

    /// True if no hook failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Invokes the hooks registered for a phase.
///
/// For each hook, in attachment order: check the [`ConditionalGate`] (skipped
/// for [`Phase::EndCombatUnconditional`]), run the handler, then either keep
/// its effects or, if it returned an error, discard all of them (queued
/// actions, amendments, playback, triggers, instance state) and log the
/// failure once. Dispatch always continues with the next hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatEventDispatcher;

impl CombatEventDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Fires `phase` over one entity.
    pub fn fire(
        &self,
        phase: Phase,
        entity: &mut Entity,
        ctx: &mut CombatContext,
        env: &HookEnv<'_>,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let (reference, registry, components) = entity.parts_mut();
        let holder = reference.unit;

        for entry in registry.lookup(phase) {
            let source = ComponentRef::new(reference.clone(), entry.component.clone());

            if !phase.is_unconditional() {
                let probe = Probe::new(holder, env)
                    .with_target(ctx.opponent_of(holder))
                    .with_item(ctx.item_of(holder));
                if !ConditionalGate::passes(components, entry.slot, &probe) {
                    tracing::debug!(%phase, component = %source, "hook gated");
                    report.gated.push(source);
                    continue;
                }
            }

            if entry.slot >= components.len() {
                continue;
            }
            let (before, rest) = components.split_at_mut(entry.slot);
            let Some((instance, after)) = rest.split_first_mut() else {
                continue;
            };
            let saved = instance.snapshot();
            let checkpoint = ctx.begin();

            let result = {
                let mut hook_ctx = HookContext::new(phase, reference, ctx, env)
                    .with_siblings(Siblings::new(before, after));
                entry.handler.handle(phase, instance, &mut hook_ctx)
            };

            match result {
                Ok(()) => {
                    let fired = ctx.commit(checkpoint);
                    if let Some(sink) = env.events() {
                        for trigger in fired {
                            sink.trigger(trigger);
                        }
                    }
                    tracing::debug!(%phase, component = %source, "hook fired");
                    report.fired.push(source);
                }
                Err(error) => {
                    ctx.rollback(checkpoint);
                    instance.restore(saved);
                    tracing::error!(
                        %phase,
                        component = %entry.component,
                        entity = %reference,
                        code = error.error_code(),
                        %error,
                        "hook failed; its effects were discarded"
                    );
                    report.failures.push(HandlerFailure {
                        phase,
                        component: source,
                        error,
                    });
                }
            }
        }

        report
    }

    /// Fires `phase` over several entities, in iteration order.
    pub fn fire_all<'e>(
        &self,
        phase: Phase,
        entities: impl IntoIterator<Item = &'e mut Entity>,
        ctx: &mut CombatContext,
        env: &HookEnv<'_>,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        for entity in entities {
            report.merge(self.fire(phase, entity, ctx, env));
        }
        report
    }

    /// Fires a phase given by its canonical name (`"after_strike"`, ...).
    ///
    /// # Errors
    ///
    /// Returns the parse error if `name` is not a known phase.
    pub fn fire_named(
        &self,
        name: &str,
        entity: &mut Entity,
        ctx: &mut CombatContext,
        env: &HookEnv<'_>,
    ) -> Result<DispatchReport, strum::ParseError> {
        let phase = Phase::from_str(name)?;
        Ok(self.fire(phase, entity, ctx, env))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::component::{
        ComponentBehavior, ComponentDefinition, ComponentInstance, ComponentLibrary, ComponentTag,
    };
    use crate::context::{PendingAction, PlaybackEvent};
    use crate::entity::{EntityKind, EntityRef};
    use crate::env::{EventSink, EventTrigger};
    use crate::error::HookResult;
    use crate::hook::PhaseSet;
    use crate::types::UnitId;

    const HOLDER: UnitId = UnitId(1);
    const FOE: UnitId = UnitId(2);

    /// Records its label into a shared log and queues one action.
    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ComponentBehavior for Recorder {
        fn phases(&self) -> PhaseSet {
            PhaseSet::AFTER_STRIKE | PhaseSet::END_COMBAT_UNCONDITIONAL
        }

        fn handle(
            &self,
            _phase: Phase,
            _instance: &mut ComponentInstance,
            ctx: &mut HookContext<'_>,
        ) -> HookResult {
            self.log.lock().unwrap().push(self.label);
            ctx.queue(PendingAction::ChangeHp {
                unit: FOE,
                delta: -1,
            });
            Ok(())
        }
    }

    /// Queues, plays, triggers and writes state, then fails.
    struct Faulty;

    impl ComponentBehavior for Faulty {
        fn phases(&self) -> PhaseSet {
            PhaseSet::AFTER_STRIKE
        }

        fn handle(
            &self,
            _phase: Phase,
            instance: &mut ComponentInstance,
            ctx: &mut HookContext<'_>,
        ) -> HookResult {
            ctx.queue(PendingAction::ChangeHp {
                unit: FOE,
                delta: -99,
            });
            ctx.play(PlaybackEvent::SoundCue {
                sound: "Explosion".into(),
            });
            ctx.trigger_event("Boom", None);
            instance.state_mut().set_flag("armed", true);
            Err(HandlerError::Failed("expression blew up".into()))
        }
    }

    struct Closed;

    impl ComponentBehavior for Closed {
        fn condition(&self, _: &ComponentInstance, _: &Probe<'_>) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct Sink(Mutex<Vec<String>>);

    impl EventSink for Sink {
        fn trigger(&self, trigger: &EventTrigger) {
            self.0.lock().unwrap().push(trigger.event.clone());
        }
    }

    struct Announcer;

    impl ComponentBehavior for Announcer {
        fn phases(&self) -> PhaseSet {
            PhaseSet::END_COMBAT
        }

        fn handle(
            &self,
            _phase: Phase,
            _instance: &mut ComponentInstance,
            ctx: &mut HookContext<'_>,
        ) -> HookResult {
            let target = ctx.target();
            ctx.trigger_event("Taunt", target);
            Ok(())
        }
    }

    fn library(log: &Arc<Mutex<Vec<&'static str>>>) -> ComponentLibrary {
        let mut library = ComponentLibrary::new();
        let tag = ComponentTag::Custom;
        for label in ["a", "b", "c"] {
            library
                .register(
                    ComponentDefinition::new(label, tag),
                    Recorder {
                        label,
                        log: Arc::clone(log),
                    },
                )
                .unwrap();
        }
        library.register(ComponentDefinition::new("faulty", tag), Faulty).unwrap();
        library.register(ComponentDefinition::new("closed", tag), Closed).unwrap();
        library.register(ComponentDefinition::new("announcer", tag), Announcer).unwrap();
        library
    }

    fn entity(library: &ComponentLibrary, ids: &[&str]) -> Entity {
        let mut entity = Entity::new(EntityRef::new(HOLDER, EntityKind::Skill, "Test"));
        for id in ids {
            entity.attach(library, id, None).unwrap();
        }
        entity
    }

    #[test]
    fn hooks_fire_in_attachment_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let library = library(&log);
        let mut skill = entity(&library, &["c", "a", "b"]);
        let mut ctx = CombatContext::new(HOLDER, FOE);

        let report = CombatEventDispatcher::new().fire(
            Phase::AfterStrike,
            &mut skill,
            &mut ctx,
            &HookEnv::empty(),
        );

        assert_eq!(*log.lock().unwrap(), ["c", "a", "b"]);
        assert_eq!(report.fired.len(), 3);
        assert_eq!(ctx.pending().len(), 3);
    }

    #[test]
    fn failing_hook_is_isolated() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let library = library(&log);
        let mut skill = entity(&library, &["a", "faulty", "b"]);
        let mut ctx = CombatContext::new(HOLDER, FOE);
        let sink = Sink::default();
        let env = HookEnv::empty().with_events(&sink);

        let report =
            CombatEventDispatcher::new().fire(Phase::AfterStrike, &mut skill, &mut ctx, &env);

        assert_eq!(*log.lock().unwrap(), ["a", "b"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].component.component.as_str(), "faulty");
        assert_eq!(
            ctx.pending(),
            &[
                PendingAction::ChangeHp { unit: FOE, delta: -1 },
                PendingAction::ChangeHp { unit: FOE, delta: -1 },
            ]
        );
        assert!(ctx.playback().is_empty());
        assert!(ctx.triggers().is_empty());
        assert!(sink.0.lock().unwrap().is_empty());
        assert!(skill.component("faulty").unwrap().state().is_empty());
    }

    #[test]
    fn gated_entity_queues_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let library = library(&log);
        let mut skill = entity(&library, &["a", "closed"]);
        let mut ctx = CombatContext::new(HOLDER, FOE);
        let dispatcher = CombatEventDispatcher::new();

        let report = dispatcher.fire(Phase::AfterStrike, &mut skill, &mut ctx, &HookEnv::empty());
        assert!(log.lock().unwrap().is_empty());
        assert!(ctx.pending().is_empty());
        assert_eq!(report.gated.len(), 1);

        let report = dispatcher.fire(
            Phase::EndCombatUnconditional,
            &mut skill,
            &mut ctx,
            &HookEnv::empty(),
        );
        assert_eq!(*log.lock().unwrap(), ["a"]);
        assert!(report.gated.is_empty());
    }

    #[test]
    fn successful_triggers_reach_the_sink() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let library = library(&log);
        let mut skill = entity(&library, &["announcer"]);
        let mut ctx = CombatContext::new(HOLDER, FOE);
        let sink = Sink::default();
        let env = HookEnv::empty().with_events(&sink);

        CombatEventDispatcher::new().fire(Phase::EndCombat, &mut skill, &mut ctx, &env);

        assert_eq!(*sink.0.lock().unwrap(), ["Taunt"]);
        assert_eq!(ctx.triggers()[0].target, Some(FOE));
        assert_eq!(ctx.triggers()[0].params["mode"], "attack");
    }

    #[test]
    fn unknown_phase_names_are_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let library = library(&log);
        let mut skill = entity(&library, &["a"]);
        let mut ctx = CombatContext::new(HOLDER, FOE);
        let dispatcher = CombatEventDispatcher::new();
        let env = HookEnv::empty();

        assert!(dispatcher.fire_named("on_lunch", &mut skill, &mut ctx, &env).is_err());
        let report = dispatcher
            .fire_named("after_strike", &mut skill, &mut ctx, &env)
            .unwrap();
        assert_eq!(report.fired.len(), 1);
    }
}
