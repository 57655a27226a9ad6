//! Marker components. They carry no behavior; hosts and other components look
//! for them by id.

use combat_core::{
    ComponentBehavior, ComponentDefinition, ComponentLibrary, ComponentTag, ComponentValue,
    ConfigShape, RegistrationError,
};

pub struct Marker;

impl ComponentBehavior for Marker {}

const MARKERS: [(&str, &str); 4] = [
    ("learned_skill", "Personal skill learned by the unit"),
    ("rune_skill", "Granted by a rune; removed with it"),
    ("vehicle_skill", "Skill of a unit acting as a vehicle"),
    ("passenger_skill", "Skill of a unit riding a vehicle"),
];

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    library.register(
        ComponentDefinition::new("do_nothing", ComponentTag::Custom)
            .with_value(ConfigShape::Int, ComponentValue::Int(1))
            .describe("Does nothing"),
        Marker,
    )?;
    for (id, description) in MARKERS {
        library.register(
            ComponentDefinition::new(id, ComponentTag::Attribute).describe(description),
            Marker,
        )?;
    }
    Ok(())
}
