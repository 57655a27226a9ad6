//! Availability rules, conditions and stat-driven modifiers.

use std::collections::BTreeMap;

use combat_core::{
    ComponentBehavior, ComponentDefinition, ComponentInstance, ComponentLibrary, ComponentTag,
    ComponentValue, ConfigShape, ItemInfo, Probe, RegistrationError,
};

/// Forbids the one item whose uid matches the value.
pub struct CannotUseSpecificItem;

impl ComponentBehavior for CannotUseSpecificItem {
    fn available(&self, instance: &ComponentInstance, _: &Probe<'_>, item: &ItemInfo) -> Option<bool> {
        let forbidden = instance.value().as_int()?;
        Some(i64::from(item.uid.0) != forbidden)
    }
}

/// Only reach weapons may be equipped. Non-equippable items and accessories
/// are unaffected.
pub struct MustUseReach;

impl ComponentBehavior for MustUseReach {
    fn available(&self, _: &ComponentInstance, _: &Probe<'_>, item: &ItemInfo) -> Option<bool> {
        Some(!item.equippable || item.has_tag("Reach") || item.accessory)
    }
}

/// Gates the whole skill on an expression: active while it evaluates to
/// a non-zero number. Evaluation failures close the gate.
pub struct Condition;

impl ComponentBehavior for Condition {
    fn condition(&self, instance: &ComponentInstance, probe: &Probe<'_>) -> bool {
        let Some(expression) = instance.value().as_text() else {
            return true;
        };
        probe
            .env
            .evaluate_or(instance.id(), expression, &probe.bindings(), 0)
            != 0
    }
}

/// Growth modifiers computed from `(stat, expression)` pairs.
///
/// If any expression fails, every listed stat reports 0.
pub struct ExpressionGrowthChange;

impl ComponentBehavior for ExpressionGrowthChange {
    fn growth_change(
        &self,
        instance: &ComponentInstance,
        probe: &Probe<'_>,
    ) -> Option<BTreeMap<String, i64>> {
        let pairs = instance.value().as_pairs()?;
        let bindings = probe.bindings();

        let evaluated: Result<BTreeMap<_, _>, _> = pairs
            .iter()
            .map(|(stat, expression)| {
                probe
                    .env
                    .try_evaluate(expression, &bindings)
                    .map(|value| (stat.clone(), value))
            })
            .collect();

        match evaluated {
            Ok(changes) => Some(changes),
            Err(error) => {
                tracing::warn!(
                    component = %instance.id(),
                    entity = %instance.owner(),
                    ?pairs,
                    %error,
                    "growth expression failed; reporting zero"
                );
                Some(pairs.iter().map(|(stat, _)| (stat.clone(), 0)).collect())
            }
        }
    }
}

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    library.register(
        ComponentDefinition::new("cannot_use_specific_item", ComponentTag::Base)
            .with_value(ConfigShape::Int, ComponentValue::Int(1))
            .describe("Unit cannot use or equip item with matching UID"),
        CannotUseSpecificItem,
    )?;
    library.register(
        ComponentDefinition::new("must_use_reach", ComponentTag::Base)
            .describe("Unit cannot equip non-reach items"),
        MustUseReach,
    )?;
    library.register(
        ComponentDefinition::new("condition", ComponentTag::Advanced)
            .with_value(ConfigShape::Equation, ComponentValue::Text("1".to_owned()))
            .describe("Skill is active only while the expression holds"),
        Condition,
    )?;
    library.register(
        ComponentDefinition::new("expression_growth_change", ComponentTag::Combat)
            .with_value(ConfigShape::StatExpressions, ComponentValue::Pairs(Vec::new()))
            .describe("Growth modifiers computed from stat expressions"),
        ExpressionGrowthChange,
    )
}
