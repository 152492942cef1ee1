//! Schema sync: keep symbol elements consistent with the external schema.
//!
//! Runs at the start of every redraw, before any projection, so dead symbol
//! references never reach the render surface. Removal collects ids in a
//! read-only pass and deletes afterwards.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use tracing::debug;

use crate::doc::{ElementId, PlanStore};
use crate::host::SchemaSource;
use crate::label::AddressType;

/// Remove symbol elements whose reference no longer resolves, and refresh the
/// text of auto labels on the ones that do.
///
/// Returns the ids of removed elements.
pub fn sync(store: &mut PlanStore, schema: &dyn SchemaSource) -> Vec<ElementId> {
    let mut dead = Vec::new();
    let mut addresses = Vec::new();
    for el in store.sorted() {
        let Some(symbol_id) = el.kind.symbol_id() else {
            continue;
        };
        match schema.resolve_symbol(symbol_id) {
            Some(handle) => addresses.push((el.id, handle.address)),
            None => dead.push(el.id),
        }
    }

    for id in &dead {
        debug!(%id, "pruning element with unresolved symbol");
    }
    store.remove_all(&dead);

    for (id, address) in addresses {
        let Some(el) = store.get_mut(&id) else {
            continue;
        };
        if let Some(label) = el.label.as_mut() {
            if label.address_type == AddressType::Auto && label.address_text != address {
                label.address_text = address;
                el.needs_view_update = true;
            }
        }
    }
    dead
}

/// Remove every element referencing `symbol_id`. Returns the removed ids.
pub fn prune_symbol(store: &mut PlanStore, symbol_id: &str) -> Vec<ElementId> {
    let dead: Vec<ElementId> = store
        .sorted()
        .filter(|el| el.kind.symbol_id() == Some(symbol_id))
        .map(|el| el.id)
        .collect();
    for id in &dead {
        debug!(%id, symbol_id, "pruning element for removed symbol");
    }
    store.remove_all(&dead);
    dead
}
