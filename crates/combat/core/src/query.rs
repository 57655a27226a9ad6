//! Queries the host asks outside the phase pipeline.
//!
//! Each query walks a set of entities (usually every skill of a unit, or the
//! item being used) in order, skips components the [`ConditionalGate`] closes,
//! and combines the answers of the rest. Components answering `None` have no
//! opinion and are ignored.
//!
//! `cooldown` and `text` are UI readouts of a single entity and ignore the
//! gate, since a charge component is inactive exactly while it has something
//! to report.

use std::collections::{BTreeMap, BTreeSet};

use crate::component::ComponentInstance;
use crate::context::Probe;
use crate::entity::Entity;
use crate::env::ItemInfo;
use crate::hook::ConditionalGate;
use crate::types::Position;

fn active<'e>(
    entities: impl IntoIterator<Item = &'e Entity>,
    probe: &Probe<'_>,
) -> Vec<&'e ComponentInstance> {
    let mut active = Vec::new();
    for entity in entities {
        let components = entity.components();
        for (slot, instance) in components.iter().enumerate() {
            if ConditionalGate::passes(components, slot, probe) {
                active.push(instance);
            }
        }
    }
    active
}

/// Whether `item` may be used. Any component answering `false` forbids it.
pub fn available<'e>(
    entities: impl IntoIterator<Item = &'e Entity>,
    probe: &Probe<'_>,
    item: &ItemInfo,
) -> bool {
    active(entities, probe).into_iter().all(|instance| {
        let verdict = instance.behavior().available(instance, probe, item);
        if verdict == Some(false) {
            tracing::debug!(component = %instance.id(), item = %item.nid, "item forbidden");
        }
        verdict.unwrap_or(true)
    })
}

/// Equation used for outgoing damage. First answer wins.
pub fn damage_formula<'e>(
    entities: impl IntoIterator<Item = &'e Entity>,
    probe: &Probe<'_>,
) -> Option<String> {
    active(entities, probe)
        .into_iter()
        .find_map(|instance| instance.behavior().damage_formula(instance, probe))
}

/// Equation used for damage resistance. First answer wins.
pub fn resist_formula<'e>(
    entities: impl IntoIterator<Item = &'e Entity>,
    probe: &Probe<'_>,
) -> Option<String> {
    active(entities, probe)
        .into_iter()
        .find_map(|instance| instance.behavior().resist_formula(instance, probe))
}

/// Growth modifiers summed per stat.
pub fn growth_changes<'e>(
    entities: impl IntoIterator<Item = &'e Entity>,
    probe: &Probe<'_>,
) -> BTreeMap<String, i64> {
    let mut total = BTreeMap::new();
    for instance in active(entities, probe) {
        for (stat, delta) in instance
            .behavior()
            .growth_change(instance, probe)
            .unwrap_or_default()
        {
            let entry = total.entry(stat).or_insert(0i64);
            *entry = entry.saturating_add(delta);
        }
    }
    total
}

/// Bonus area radius, summed.
pub fn empower_splash<'e>(
    entities: impl IntoIterator<Item = &'e Entity>,
    probe: &Probe<'_>,
) -> i64 {
    active(entities, probe)
        .into_iter()
        .filter_map(|instance| instance.behavior().empower_splash(instance, probe))
        .fold(0i64, i64::saturating_add)
}

/// Tiles hit by area effects centred on `center`; the union of all answers.
///
/// `empower` is usually [`empower_splash`] over the unit's skills.
pub fn splash<'e>(
    entities: impl IntoIterator<Item = &'e Entity>,
    probe: &Probe<'_>,
    center: Position,
    empower: i64,
) -> BTreeSet<Position> {
    active(entities, probe)
        .into_iter()
        .filter_map(|instance| instance.behavior().splash(instance, probe, center, empower))
        .flatten()
        .collect()
}

/// Readiness fraction of the first component reporting one.
pub fn cooldown(entity: &Entity) -> Option<f64> {
    entity
        .components()
        .iter()
        .find_map(|instance| instance.behavior().cooldown(instance))
}

/// Display label of the first component reporting one.
pub fn text(entity: &Entity) -> Option<String> {
    entity
        .components()
        .iter()
        .find_map(|instance| instance.behavior().text(instance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{
        ComponentBehavior, ComponentDefinition, ComponentLibrary, ComponentTag, ComponentValue,
        ConfigShape,
    };
    use crate::entity::{EntityKind, EntityRef};
    use crate::env::HookEnv;
    use crate::types::{ItemUid, UnitId};

    struct Forbid;
    impl ComponentBehavior for Forbid {
        fn available(&self, _: &ComponentInstance, _: &Probe<'_>, item: &ItemInfo) -> Option<bool> {
            Some(!item.has_tag("cursed"))
        }
    }

    struct Growth;
    impl ComponentBehavior for Growth {
        fn growth_change(
            &self,
            instance: &ComponentInstance,
            _: &Probe<'_>,
        ) -> Option<BTreeMap<String, i64>> {
            let amount = instance.value().as_int()?;
            Some(BTreeMap::from([("STR".to_owned(), amount)]))
        }
    }

    struct Formula(&'static str);
    impl ComponentBehavior for Formula {
        fn damage_formula(&self, _: &ComponentInstance, _: &Probe<'_>) -> Option<String> {
            Some(self.0.to_owned())
        }
        fn text(&self, _: &ComponentInstance) -> Option<String> {
            Some(self.0.to_owned())
        }
    }

    struct Off;
    impl ComponentBehavior for Off {
        fn condition(&self, _: &ComponentInstance, _: &Probe<'_>) -> bool {
            false
        }
    }

    fn library() -> ComponentLibrary {
        let mut library = ComponentLibrary::new();
        let tag = ComponentTag::Custom;
        library.register(ComponentDefinition::new("forbid", tag), Forbid).unwrap();
        library
            .register(
                ComponentDefinition::new("growth", tag)
                    .with_value(ConfigShape::Int, ComponentValue::Int(0)),
                Growth,
            )
            .unwrap();
        library.register(ComponentDefinition::new("magic", tag), Formula("MAGIC_DAMAGE")).unwrap();
        library.register(ComponentDefinition::new("steel", tag), Formula("STEEL_DAMAGE")).unwrap();
        library.register(ComponentDefinition::new("off", tag), Off).unwrap();
        library
    }

    fn skill(library: &ComponentLibrary, nid: &str, parts: &[(&str, Option<i64>)]) -> Entity {
        let mut entity = Entity::new(EntityRef::new(UnitId(1), EntityKind::Skill, nid));
        for (id, value) in parts {
            entity.attach(library, id, value.map(ComponentValue::Int)).unwrap();
        }
        entity
    }

    fn item(tags: &[&str]) -> ItemInfo {
        ItemInfo {
            uid: ItemUid(1),
            nid: "Rusty_Sword".into(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            equippable: true,
            accessory: false,
        }
    }

    #[test]
    fn availability_is_all_of() {
        let library = library();
        let skills = [skill(&library, "Purity", &[("forbid", None)])];
        let env = HookEnv::empty();
        let probe = Probe::new(UnitId(1), &env);

        assert!(available(&skills, &probe, &item(&[])));
        assert!(!available(&skills, &probe, &item(&["cursed"])));
    }

    #[test]
    fn inactive_skills_do_not_answer() {
        let library = library();
        let skills = [
            skill(&library, "Dormant", &[("forbid", None), ("off", None)]),
            skill(&library, "Brawn", &[("growth", Some(10))]),
            skill(&library, "More_Brawn", &[("growth", Some(5))]),
        ];
        let env = HookEnv::empty();
        let probe = Probe::new(UnitId(1), &env);

        assert!(available(&skills, &probe, &item(&["cursed"])));
        assert_eq!(growth_changes(&skills, &probe)["STR"], 15);
    }

    #[test]
    fn first_formula_wins() {
        let library = library();
        let skills = [
            skill(&library, "Steel", &[("steel", None)]),
            skill(&library, "Magic", &[("magic", None)]),
        ];
        let env = HookEnv::empty();
        let probe = Probe::new(UnitId(1), &env);

        assert_eq!(damage_formula(&skills, &probe).as_deref(), Some("STEEL_DAMAGE"));
        assert_eq!(resist_formula(&skills, &probe), None);
        assert_eq!(text(&skills[1]).as_deref(), Some("MAGIC_DAMAGE"));
        assert_eq!(cooldown(&skills[0]), None);
    }
}
