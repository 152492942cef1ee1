#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::host::NoopUndo;
use crate::label::LabelLocation;

fn wall_at(x: f64, y: f64, z: i64) -> Element {
    let mut el = Element::wall(Footprint::new(x, y, 100.0, 50.0, 1), WallType::Inner);
    el.z_order = z;
    el
}

// =============================================================
// Element construction
// =============================================================

#[test]
fn footprint_owner_mirrors_center_and_size() {
    let el = Element::door(Footprint::new(10.0, 20.0, 40.0, 60.0, 2));
    assert_eq!((el.posx, el.posy), (30.0, 50.0));
    assert_eq!((el.sizex, el.sizey), (40.0, 60.0));
    assert_eq!(el.page, 2);
    assert_eq!(el.scale, 1.0);
    assert!(el.movable);
    assert!(el.needs_view_update);
}

#[test]
fn symbol_display_size_applies_scale() {
    let el = Element::symbol("S1", 1, Point::new(0.0, 0.0), Size::new(20.0, 10.0)).with_scale(2.0);
    assert_eq!(el.display_size(), Size::new(40.0, 20.0));
    assert_eq!(el.bounds(), Rect::new(-20.0, -10.0, 20.0, 10.0));
    assert!(!el.has_footprint());
}

#[test]
fn footprint_owner_ignores_scale() {
    let el = Element::window(Footprint::new(0.0, 0.0, 40.0, 10.0, 1)).with_scale(3.0);
    assert_eq!(el.scale, 1.0);
    assert_eq!(el.display_size(), Size::new(40.0, 10.0));
}

#[test]
fn rotated_bounds_swap_axes_at_quarter_turn() {
    let mut el = Element::wall(Footprint::new(0.0, 0.0, 100.0, 20.0, 1), WallType::Outer);
    el.set_rotation(90.0);
    let r = el.rotated_bounds();
    assert!((r.width() - 20.0).abs() < 1e-9);
    assert!((r.height() - 100.0).abs() < 1e-9);
}

// =============================================================
// Mutators
// =============================================================

#[test]
fn translate_moves_footprint_with_center() {
    let mut el = Element::wall(Footprint::new(0.0, 0.0, 100.0, 50.0, 1), WallType::Inner);
    el.translate(Point::new(5.0, -5.0));
    let f = el.footprint().unwrap();
    assert_eq!((f.x, f.y), (5.0, -5.0));
    assert_eq!(el.center(), Point::new(55.0, 20.0));
}

#[test]
fn set_rotation_normalizes_into_range() {
    let mut el = Element::door(Footprint::new(0.0, 0.0, 40.0, 40.0, 1));
    el.set_rotation(-90.0);
    assert_eq!(el.rotate, 270.0);
    assert_eq!(el.footprint().unwrap().rotate, 270.0);
    el.set_rotation(720.0);
    assert_eq!(el.rotate, 0.0);
}

#[test]
fn set_size_floors_footprint_around_center() {
    let mut el = Element::wall(Footprint::new(0.0, 0.0, 100.0, 50.0, 1), WallType::Inner);
    el.set_size(2.0, 30.0);
    let f = el.footprint().unwrap();
    assert_eq!((f.width, f.height), (10.0, 30.0));
    assert_eq!(el.center(), Point::new(50.0, 25.0));
}

#[test]
fn set_page_keeps_footprint_in_step() {
    let mut el = Element::door(Footprint::new(0.0, 0.0, 40.0, 40.0, 1));
    el.set_page(3);
    assert_eq!(el.page, 3);
    assert_eq!(el.footprint().unwrap().page, 3);
}

#[test]
fn duplicate_gets_fresh_id_and_offset() {
    let el = Element::symbol("S1", 1, Point::new(100.0, 100.0), Size::new(20.0, 20.0))
        .with_label(Label::manual("X", 12.0));
    let copy = el.duplicate(Point::new(20.0, 20.0));
    assert_ne!(copy.id, el.id);
    assert_eq!(copy.center(), Point::new(120.0, 120.0));
    assert_eq!(copy.label, el.label);
    assert_eq!(copy.kind, el.kind);
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn kind_tag_names() {
    let cases = [
        (Element::wall(Footprint::new(0.0, 0.0, 10.0, 10.0, 1), WallType::Inner), "wall"),
        (Element::window(Footprint::new(0.0, 0.0, 10.0, 10.0, 1)), "window"),
        (Element::door(Footprint::new(0.0, 0.0, 10.0, 10.0, 1)), "door"),
        (Element::shape(Footprint::new(0.0, 0.0, 10.0, 10.0, 1), ShapeType::Gray), "freeformShape"),
        (Element::symbol("S1", 1, Point::new(0.0, 0.0), Size::new(10.0, 10.0)), "schemaSymbol"),
        (Element::image("a.png", 1, Point::new(0.0, 0.0), Size::new(10.0, 10.0)), "image"),
    ];
    for (el, tag) in cases {
        let value = el.to_json().unwrap();
        assert_eq!(value["kind"]["type"], tag);
        assert_eq!(el.kind.name(), tag);
        let back = Element::from_json(value).unwrap();
        assert_eq!(back.kind, el.kind);
        assert_eq!(back.id, el.id);
    }
}

#[test]
fn json_uses_camel_case_and_skips_dirty_flag() {
    let el = Element::symbol("S7", 1, Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    let value = el.to_json().unwrap();
    assert_eq!(value["kind"]["symbolId"], "S7");
    assert!(value.get("zOrder").is_some());
    assert!(value.get("needsViewUpdate").is_none());
    assert!(value.get("label").is_none());
}

#[test]
fn from_json_normalizes_and_rederives_center() {
    let value = json!({
        "id": "6f1c2b7e-4d2a-4a8e-9c1e-0b7f1a2c3d4e",
        "page": 1,
        "posx": 999.0,
        "posy": 999.0,
        "sizex": 1.0,
        "sizey": 1.0,
        "scale": 1.0,
        "rotate": -90.0,
        "movable": true,
        "zOrder": 4,
        "kind": {
            "type": "wall",
            "footprint": { "x": 0.0, "y": 0.0, "width": 100.0, "height": 50.0, "page": 1, "rotate": 450.0 },
            "wallType": "outer"
        }
    });
    let el = Element::from_json(value).unwrap();
    assert_eq!(el.center(), Point::new(50.0, 25.0));
    assert_eq!(el.rotate, 90.0);
    assert_eq!((el.sizex, el.sizey), (100.0, 50.0));
    assert!(el.needs_view_update);
}

#[test]
fn from_json_rejects_unknown_kind() {
    let mut value = Element::door(Footprint::new(0.0, 0.0, 10.0, 10.0, 1)).to_json().unwrap();
    value["kind"]["type"] = json!("sofa");
    assert!(matches!(Element::from_json(value), Err(EngineError::Serialization(_))));
}

#[test]
fn label_round_trips_through_json() {
    let el = Element::door(Footprint::new(0.0, 0.0, 10.0, 10.0, 1))
        .with_label(Label::manual("-Q1", 14.0).at(LabelLocation::Left));
    let back = Element::from_json(el.to_json().unwrap()).unwrap();
    assert_eq!(back.label, el.label);
}

#[test]
fn situation_plan_rejects_elements_off_range() {
    let el = Element::door(Footprint::new(0.0, 0.0, 10.0, 10.0, 3));
    let value = json!({ "numPages": 2, "activePage": 1, "elements": [el.to_json().unwrap()] });
    assert!(matches!(SituationPlan::from_json(value), Err(EngineError::InvalidPage { page: 3, num_pages: 2 })));
}

#[test]
fn situation_plan_rejects_bad_active_page() {
    let value = json!({ "numPages": 2, "activePage": 3, "elements": [] });
    assert!(matches!(SituationPlan::from_json(value), Err(EngineError::InvalidPage { .. })));
}

// =============================================================
// PlanStore
// =============================================================

#[test]
fn store_keeps_canonical_z_order() {
    let mut store = PlanStore::new();
    let top = wall_at(0.0, 0.0, 5);
    let bottom = wall_at(0.0, 0.0, 1);
    let (top_id, bottom_id) = (top.id, bottom.id);
    store.insert(top);
    store.insert(bottom);
    assert_eq!(store.ids(), vec![bottom_id, top_id]);
    assert_eq!(store.max_z(), Some(5));
}

#[test]
fn resort_is_stable_for_ties() {
    let mut store = PlanStore::new();
    let a = wall_at(0.0, 0.0, 1);
    let b = wall_at(0.0, 0.0, 1);
    let (a_id, b_id) = (a.id, b.id);
    store.insert(a);
    store.insert(b);
    store.resort();
    assert_eq!(store.ids(), vec![a_id, b_id]);
}

#[test]
fn on_page_filters_by_page() {
    let mut store = PlanStore::new();
    store.insert(wall_at(0.0, 0.0, 0));
    let other = Element::door(Footprint::new(0.0, 0.0, 10.0, 10.0, 2));
    let other_id = other.id;
    store.insert(other);
    let on_two: Vec<ElementId> = store.on_page(2).map(|el| el.id).collect();
    assert_eq!(on_two, vec![other_id]);
}

#[test]
fn remove_all_counts_present_ids() {
    let mut store = PlanStore::new();
    let el = wall_at(0.0, 0.0, 0);
    let id = el.id;
    store.insert(el);
    assert_eq!(store.remove_all(&[id, Uuid::new_v4()]), 1);
    assert!(store.is_empty());
}

#[test]
fn apply_patch_updates_fields_and_dirty_flag() {
    let mut store = PlanStore::new();
    let el = wall_at(0.0, 0.0, 0);
    let id = el.id;
    store.insert(el);
    store.get_mut(&id).unwrap().needs_view_update = false;

    let moved = ElementPatch { posx: Some(200.0), ..Default::default() };
    assert!(store.apply_patch(&id, &moved));
    let el = store.get(&id).unwrap();
    assert_eq!(el.center(), Point::new(200.0, 25.0));
    assert!(!el.needs_view_update);

    let retyped = ElementPatch { wall_type: Some(WallType::Outer), shape_type: Some(ShapeType::Gray), ..Default::default() };
    assert!(store.apply_patch(&id, &retyped));
    let el = store.get(&id).unwrap();
    assert!(matches!(el.kind, ElementKind::Wall(w) if w.wall_type == WallType::Outer));
    assert!(el.needs_view_update);
}

#[test]
fn apply_patch_can_remove_label() {
    let mut store = PlanStore::new();
    let el = wall_at(0.0, 0.0, 0).with_label(Label::manual("A", 12.0));
    let id = el.id;
    store.insert(el);
    store.apply_patch(&id, &ElementPatch { label: Some(None), ..Default::default() });
    assert!(store.get(&id).unwrap().label.is_none());
}

#[test]
fn apply_patch_missing_element_returns_false() {
    let mut store = PlanStore::new();
    assert!(!store.apply_patch(&Uuid::new_v4(), &ElementPatch::default()));
}

// =============================================================
// Document
// =============================================================

#[test]
fn snapshot_restore_round_trip() {
    let mut doc = Document::new(Box::new(NoopUndo));
    doc.elements.insert(wall_at(0.0, 0.0, 2));
    doc.elements.insert(wall_at(50.0, 0.0, 1));
    let plan = doc.snapshot();
    assert_eq!(plan.elements[0].z_order, 1);

    let mut other = Document::new(Box::new(NoopUndo));
    other.restore(plan.clone()).unwrap();

    assert_eq!(other.snapshot(), plan);
}

#[test]
fn restore_rejects_inconsistent_pages() {
    let mut doc = Document::new(Box::new(NoopUndo));
    let plan = SituationPlan { num_pages: 1, active_page: 2, elements: Vec::new() };
    assert!(doc.restore(plan).is_err());
}
