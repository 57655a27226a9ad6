//! Item components.

pub mod aoe;
pub mod weapon;

use combat_core::{ComponentLibrary, RegistrationError};

/// Registers every item component into `library`.
pub fn register_item_components(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    weapon::register(library)?;
    aoe::register(library)
}

/// A library holding every item component.
pub fn item_library() -> Result<ComponentLibrary, RegistrationError> {
    let mut library = ComponentLibrary::new();
    register_item_components(&mut library)?;
    Ok(library)
}
