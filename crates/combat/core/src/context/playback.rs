//! Observational records for the presentation layer.

use crate::entity::ComponentRef;
use crate::types::UnitId;

/// Visual or audio cue emitted during resolution.
///
/// Playback is write-only from the framework's side: nothing in the hook
/// pipeline reads it back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackEvent {
    DamageHit {
        attacker: UnitId,
        defender: UnitId,
        damage: u32,
    },
    DamageCrit {
        attacker: UnitId,
        defender: UnitId,
        damage: u32,
    },
    /// A status-like component proc'd on `unit`.
    StatusProc { unit: UnitId, source: ComponentRef },
    /// A defensive component altered an incoming hit on `unit`.
    DefenseHitProc { unit: UnitId, source: ComponentRef },
    TintEffect {
        unit: UnitId,
        color: [u8; 3],
        frames: u32,
    },
    SoundCue { sound: String },
    PoseOverride { unit: UnitId, pose: String },
}
