//! Pipeline phases and phase sets.

use strum::IntoEnumIterator;

/// Named point in the host's resolution pipeline where hooks are invoked.
///
/// Declaration order is the order the pipeline fires them in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Start of the unit's turn.
    OnUpkeep,
    /// Once per combat, before any strike.
    #[strum(to_string = "before_combat", serialize = "start_combat")]
    BeforeCombat,
    /// Attacker side, before each strike.
    BeforeStrike,
    /// Attacker side, critical strikes only. Fires after `BeforeStrike` and
    /// before the strike's damage is queued, so ahead of `AfterStrike` and
    /// `AfterTakeStrike`.
    BeforeCrit,
    /// Attacker side, after each strike attempt.
    AfterStrike,
    /// Defender side, after being struck at (hit or not).
    AfterTakeStrike,
    /// After each exchange of blows.
    EndSubCombat,
    /// Once per combat, after the last strike. Subject to the conditional gate.
    EndCombat,
    /// Once per combat, after `EndCombat`. Never gated; used for state resets.
    EndCombatUnconditional,
    /// On the skill being gained.
    OnGainSkill,
    /// On every other skill of a unit that just gained a skill.
    AfterGainSkill,
    /// End of chapter.
    OnEndChapter,
    /// The pipeline committed a `TriggerCharge` for the owning skill.
    OnTriggerCharge,
}

impl Phase {
    /// Phases fired during one combat, in pipeline order.
    pub const COMBAT: [Phase; 8] = [
        Phase::BeforeCombat,
        Phase::BeforeStrike,
        Phase::BeforeCrit,
        Phase::AfterStrike,
        Phase::AfterTakeStrike,
        Phase::EndSubCombat,
        Phase::EndCombat,
        Phase::EndCombatUnconditional,
    ];

    /// Returns true if hooks for this phase bypass the conditional gate.
    pub const fn is_unconditional(self) -> bool {
        matches!(self, Phase::EndCombatUnconditional)
    }

    /// The single-bit set containing this phase.
    pub const fn flag(self) -> PhaseSet {
        match self {
            Phase::OnUpkeep => PhaseSet::ON_UPKEEP,
            Phase::BeforeCombat => PhaseSet::BEFORE_COMBAT,
            Phase::BeforeStrike => PhaseSet::BEFORE_STRIKE,
            Phase::AfterStrike => PhaseSet::AFTER_STRIKE,
            Phase::AfterTakeStrike => PhaseSet::AFTER_TAKE_STRIKE,
            Phase::BeforeCrit => PhaseSet::BEFORE_CRIT,
            Phase::EndSubCombat => PhaseSet::END_SUB_COMBAT,
            Phase::EndCombat => PhaseSet::END_COMBAT,
            Phase::EndCombatUnconditional => PhaseSet::END_COMBAT_UNCONDITIONAL,
            Phase::OnGainSkill => PhaseSet::ON_GAIN_SKILL,
            Phase::AfterGainSkill => PhaseSet::AFTER_GAIN_SKILL,
            Phase::OnEndChapter => PhaseSet::ON_END_CHAPTER,
            Phase::OnTriggerCharge => PhaseSet::ON_TRIGGER_CHARGE,
        }
    }
}

bitflags::bitflags! {
    /// Set of phases a component hooks into.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PhaseSet: u16 {
        const ON_UPKEEP = 1 << 0;
        const BEFORE_COMBAT = 1 << 1;
        const BEFORE_STRIKE = 1 << 2;
        const AFTER_STRIKE = 1 << 3;
        const AFTER_TAKE_STRIKE = 1 << 4;
        const BEFORE_CRIT = 1 << 5;
        const END_SUB_COMBAT = 1 << 6;
        const END_COMBAT = 1 << 7;
        const END_COMBAT_UNCONDITIONAL = 1 << 8;
        const ON_GAIN_SKILL = 1 << 9;
        const AFTER_GAIN_SKILL = 1 << 10;
        const ON_END_CHAPTER = 1 << 11;
        const ON_TRIGGER_CHARGE = 1 << 12;
    }
}

impl PhaseSet {
    /// Phases in this set, in pipeline order.
    pub fn phases(self) -> impl Iterator<Item = Phase> {
        Phase::iter().filter(move |phase| self.contains(phase.flag()))
    }
}

impl From<Phase> for PhaseSet {
    fn from(phase: Phase) -> Self {
        phase.flag()
    }
}
