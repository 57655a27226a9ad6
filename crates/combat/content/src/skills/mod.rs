//! Skill components.
//!
//! | Module | Components |
//! |---|---|
//! | `attribute` | `do_nothing`, `learned_skill`, `rune_skill`, `vehicle_skill`, `passenger_skill` |
//! | `status` | `immune_new_status`, `immune_propaganda` |
//! | `events` | `event_before_combat`, `event_after_combat`, `event_after_combat_when_hit`, `event_when_hit`, `event_when_dodging`, `event_on_upkeep` |
//! | `base` | `cannot_use_specific_item`, `must_use_reach`, `condition`, `expression_growth_change` |
//! | `combat` | `true_miracle_event`, `give_status_after_strike`, `recoil_after_combat`, `mid_battle_recoil`, `crit_flash`, `empower_splash` |
//! | `charge` | `build_charge_start_charged` |

pub mod attribute;
pub mod base;
pub mod charge;
pub mod combat;
pub mod events;
pub mod status;

use combat_core::{ComponentLibrary, RegistrationError};

/// Registers every skill component into `library`.
pub fn register_skill_components(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    attribute::register(library)?;
    status::register(library)?;
    events::register(library)?;
    base::register(library)?;
    combat::register(library)?;
    charge::register(library)
}

/// A library holding every skill component.
pub fn skill_library() -> Result<ComponentLibrary, RegistrationError> {
    let mut library = ComponentLibrary::new();
    register_skill_components(&mut library)?;
    Ok(library)
}
