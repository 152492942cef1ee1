//! Stacking order: send-to-back, bring-to-front, and manual layer reordering.
//!
//! Every operation leaves z-orders strictly increasing along the store's
//! canonical order, so export and print (which walk that order) always match
//! what is drawn. Immovable elements are never targets, but they shift with
//! everything else when room has to be made.

#[cfg(test)]
#[path = "zorder_test.rs"]
mod zorder_test;

use std::collections::HashSet;

use crate::doc::{ElementId, PlanStore};

/// Drop position relative to the neighbor in a layer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Strictly above (rendered over) the neighbor.
    Above,
    /// Strictly below the neighbor.
    Below,
}

/// One row of a host layer panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEntry {
    pub id: ElementId,
    pub kind: &'static str,
    pub z_order: i64,
    pub movable: bool,
    /// Label text, if the element carries a label.
    pub caption: Option<String>,
}

/// Movable members of `ids` that exist, in canonical (bottom-first) order.
fn movable_targets(store: &PlanStore, ids: &[ElementId]) -> Vec<ElementId> {
    let wanted: HashSet<&ElementId> = ids.iter().collect();
    store
        .sorted()
        .filter(|el| el.movable && wanted.contains(&el.id))
        .map(|el| el.id)
        .collect()
}

fn set_z(store: &mut PlanStore, id: &ElementId, z: i64) {
    if let Some(el) = store.get_mut(id) {
        el.z_order = z;
    }
}

/// Resort, then bump any element whose z-order does not exceed its predecessor's.
fn enforce_strict(store: &mut PlanStore) {
    store.resort();
    let mut prev: Option<i64> = None;
    for id in store.ids() {
        let Some(el) = store.get_mut(&id) else {
            continue;
        };
        if let Some(p) = prev {
            if el.z_order <= p {
                el.z_order = p + 1;
            }
        }
        prev = Some(el.z_order);
    }
    store.resort();
}

/// Put the movable elements of `ids` beneath everything else.
///
/// Targets take z-orders `0..k` in their current relative order; every other
/// element shifts up by `k` (more if negative z-orders exist), so relative
/// order among the rest is preserved. Returns the ids that were sent back.
pub fn send_to_back(store: &mut PlanStore, ids: &[ElementId]) -> Vec<ElementId> {
    let targets = movable_targets(store, ids);
    if targets.is_empty() {
        return targets;
    }
    let target_set: HashSet<ElementId> = targets.iter().copied().collect();
    let others: Vec<ElementId> = store.ids().into_iter().filter(|id| !target_set.contains(id)).collect();

    let k = i64::try_from(targets.len()).unwrap_or(i64::MAX);
    let min_other = others
        .iter()
        .filter_map(|id| store.get(id).map(|el| el.z_order))
        .min()
        .unwrap_or(0);
    let shift = k + (-min_other).max(0);

    for id in &others {
        if let Some(el) = store.get_mut(id) {
            el.z_order += shift;
        }
    }
    for (z, id) in (0_i64..).zip(&targets) {
        set_z(store, id, z);
    }
    enforce_strict(store);
    targets
}

/// Put the movable elements of `ids` above everything else.
///
/// Each target gets a z-order above the current maximum among non-targets,
/// keeping the targets' relative order. Returns the ids that were raised.
pub fn bring_to_front(store: &mut PlanStore, ids: &[ElementId]) -> Vec<ElementId> {
    let targets = movable_targets(store, ids);
    if targets.is_empty() {
        return targets;
    }
    let target_set: HashSet<ElementId> = targets.iter().copied().collect();
    let max_other = store
        .sorted()
        .filter(|el| !target_set.contains(&el.id))
        .map(|el| el.z_order)
        .max()
        .unwrap_or(-1);

    for (offset, id) in (1_i64..).zip(&targets) {
        set_z(store, id, max_other + offset);
    }
    enforce_strict(store);
    targets
}

/// Move `moving` directly above or below `neighbor`.
///
/// Ties are resolved by bumping the neighbor (and anything stacked above it)
/// rather than allowing duplicate z-orders. Returns false when either id is
/// missing, `moving` is immovable, or both ids are the same.
pub fn move_layer(store: &mut PlanStore, moving: ElementId, neighbor: ElementId, placement: Placement) -> bool {
    if moving == neighbor {
        return false;
    }
    let Some(neighbor_z) = store.get(&neighbor).map(|el| el.z_order) else {
        return false;
    };
    if !store.get(&moving).is_some_and(|el| el.movable) {
        return false;
    }

    let target = match placement {
        Placement::Above => neighbor_z + 1,
        Placement::Below => neighbor_z,
    };
    set_z(store, &moving, target);

    // Cascade upward through everything at or above the target slot.
    let mut prev = target;
    for id in store.ids() {
        if id == moving {
            continue;
        }
        let Some(el) = store.get_mut(&id) else {
            continue;
        };
        if el.z_order < target {
            continue;
        }
        if el.z_order <= prev {
            el.z_order = prev + 1;
        }
        prev = el.z_order;
    }
    enforce_strict(store);
    true
}

/// Layer-panel rows for `page`, top-most first.
#[must_use]
pub fn layer_list(store: &PlanStore, page: u32) -> Vec<LayerEntry> {
    store
        .on_page(page)
        .rev()
        .map(|el| LayerEntry {
            id: el.id,
            kind: el.kind.name(),
            z_order: el.z_order,
            movable: el.movable,
            caption: el.label.as_ref().map(|l| l.address_text.clone()),
        })
        .collect()
}
