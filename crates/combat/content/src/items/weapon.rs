//! Weapon formula overrides and inert markers.

use combat_core::{
    ComponentBehavior, ComponentDefinition, ComponentInstance, ComponentLibrary, ComponentTag,
    ComponentValue, ConfigShape, Probe, RegistrationError,
};

pub const MAGIC_DAMAGE: &str = "MAGIC_DAMAGE";
pub const MAGIC_DEFENSE: &str = "MAGIC_DEFENSE";

pub struct DoNothing;

impl ComponentBehavior for DoNothing {}

/// Uses the magic damage and resistance formulas without making the weapon
/// a magic weapon in any other respect.
pub struct KindaMagic;

impl ComponentBehavior for KindaMagic {
    fn damage_formula(&self, _: &ComponentInstance, _: &Probe<'_>) -> Option<String> {
        Some(MAGIC_DAMAGE.to_owned())
    }

    fn resist_formula(&self, _: &ComponentInstance, _: &Probe<'_>) -> Option<String> {
        Some(MAGIC_DEFENSE.to_owned())
    }
}

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    library.register(
        ComponentDefinition::new("do_nothing", ComponentTag::Custom)
            .with_value(ConfigShape::Int, ComponentValue::Int(1))
            .describe("Does nothing"),
        DoNothing,
    )?;
    library.register(
        ComponentDefinition::new("kinda_magic", ComponentTag::Weapon)
            .describe("Item uses the magic damage formula but not magic animations"),
        KindaMagic,
    )
}
