//! Component categories.

/// Category a component is filed under in the editor and in content catalogs.
///
/// Tags are descriptive only: dispatch never reorders or filters by tag.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ComponentTag {
    Base,
    Attribute,
    Status,
    Combat,
    Combat2,
    Advanced,
    Time,
    Charge,
    Weapon,
    Aoe,
    Aesthetic,
    Custom,
}
