//! Per-unit skills and equipped items.

use std::collections::BTreeMap;

use combat_core::{ComponentInstance, ComponentRef, Entity, EntityKind, ItemUid};

/// Everything one unit carries. Skills fire in acquisition order; the item a
/// unit fights with fires after its skills.
#[derive(Clone, Debug, Default)]
pub struct Loadout {
    pub skills: Vec<Entity>,
    pub items: BTreeMap<ItemUid, Entity>,
}

impl Loadout {
    pub fn skill(&self, nid: &str) -> Option<&Entity> {
        self.skills.iter().find(|skill| skill.nid() == nid)
    }

    pub fn skill_mut(&mut self, nid: &str) -> Option<&mut Entity> {
        self.skills.iter_mut().find(|skill| skill.nid() == nid)
    }

    pub fn has_skill(&self, nid: &str) -> bool {
        self.skill(nid).is_some()
    }

    pub fn skill_nids(&self) -> Vec<String> {
        self.skills.iter().map(|skill| skill.nid().to_owned()).collect()
    }

    /// Removes the first skill named `nid`.
    pub fn remove_skill(&mut self, nid: &str) -> Option<Entity> {
        let index = self.skills.iter().position(|skill| skill.nid() == nid)?;
        Some(self.skills.remove(index))
    }

    pub fn item(&self, uid: ItemUid) -> Option<&Entity> {
        self.items.get(&uid)
    }

    /// The instance a [`ComponentRef`] points at. Item references resolve by
    /// uid and must name the item's template.
    pub fn component_mut(&mut self, target: &ComponentRef) -> Option<&mut ComponentInstance> {
        let nid = target.entity.nid.as_str();
        let entity = match target.entity.kind {
            EntityKind::Skill => self.skill_mut(nid),
            EntityKind::Item => self
                .items
                .get_mut(&target.entity.item?)
                .filter(|item| item.nid() == nid),
        }?;
        entity.component_mut(target.component.as_str())
    }
}
