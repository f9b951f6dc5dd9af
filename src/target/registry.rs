//! Registry of paint targets addressed by [`TargetId`].

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::PaintTarget;
use crate::error::PainterError;

/// Stable handle to a [`PaintTarget`] in a [`PaintTargets`] registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// All paint targets known to the painter.
#[derive(Resource, Clone, Debug, Default)]
pub struct PaintTargets {
    targets: BTreeMap<TargetId, PaintTarget>,
    next_id: u32,
}

impl PaintTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: PaintTarget) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, target);
        id
    }

    pub fn remove(&mut self, id: TargetId) -> Option<PaintTarget> {
        self.targets.remove(&id)
    }

    pub fn get(&self, id: TargetId) -> Option<&PaintTarget> {
        self.targets.get(&id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut PaintTarget> {
        self.targets.get_mut(&id)
    }

    /// Like [`get`](Self::get) but reports unknown ids as an error.
    pub fn try_get(&self, id: TargetId) -> Result<&PaintTarget, PainterError> {
        self.get(id).ok_or(PainterError::UnknownTarget(id))
    }

    pub fn try_get_mut(&mut self, id: TargetId) -> Result<&mut PaintTarget, PainterError> {
        self.get_mut(id).ok_or(PainterError::UnknownTarget(id))
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterates targets in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &PaintTarget)> {
        self.targets.iter().map(|(&id, target)| (id, target))
    }

    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.targets.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_not_reused() {
        let mut targets = PaintTargets::new();
        let a = targets.insert(PaintTarget::new(vec![Vec3::ZERO]));
        let b = targets.insert(PaintTarget::new(vec![Vec3::ONE]));
        assert_ne!(a, b);

        targets.remove(a);
        let c = targets.insert(PaintTarget::new(vec![Vec3::X]));
        assert_ne!(a, c);
        assert_eq!(targets.ids().collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn test_try_get_unknown() {
        let targets = PaintTargets::new();
        assert!(matches!(
            targets.try_get(TargetId(9)),
            Err(PainterError::UnknownTarget(TargetId(9)))
        ));
    }
}
