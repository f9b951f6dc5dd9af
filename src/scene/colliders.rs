use std::ops::{Deref, DerefMut};

use bevy::log::debug;

use super::PaintScene;
use crate::target::{PaintTargets, TargetId};

/// Scoped colliders for targets that lack one.
///
/// Baking needs every target to block rays. On acquire, a collider is added
/// for each listed target the scene does not already know; dropping the guard
/// removes exactly those again, on every exit path.
pub struct TemporaryColliders<'a, S: PaintScene + ?Sized> {
    scene: &'a mut S,
    added: Vec<TargetId>,
}

impl<'a, S: PaintScene + ?Sized> TemporaryColliders<'a, S> {
    /// Unknown ids are skipped.
    pub fn acquire(scene: &'a mut S, targets: &PaintTargets, ids: &[TargetId]) -> Self {
        let mut added = Vec::new();
        for &id in ids {
            let Some(target) = targets.get(id) else {
                continue;
            };
            if !scene.has_collider(id) && !added.contains(&id) {
                scene.insert_collider(id, target);
                added.push(id);
            }
        }
        if !added.is_empty() {
            debug!("Added {} temporary colliders", added.len());
        }
        Self { scene, added }
    }

    /// Targets that received a temporary collider.
    pub fn added(&self) -> &[TargetId] {
        &self.added
    }
}

impl<S: PaintScene + ?Sized> Deref for TemporaryColliders<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: PaintScene + ?Sized> DerefMut for TemporaryColliders<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

impl<S: PaintScene + ?Sized> Drop for TemporaryColliders<'_, S> {
    fn drop(&mut self) {
        for id in self.added.drain(..) {
            self.scene.remove_collider(id);
        }
    }
}
