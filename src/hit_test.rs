use super::*;
use crate::geometry::{Footprint, WallType};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn wall(x: f64, y: f64, w: f64, h: f64) -> Element {
    Element::wall(Footprint::new(x, y, w, h, 1), WallType::Inner)
}

fn store_of(elements: Vec<Element>) -> PlanStore {
    let mut store = PlanStore::new();
    store.load(elements);
    store
}

// =============================================================
// ResizeAnchor
// =============================================================

#[test]
fn resize_anchor_all_variants_distinct() {
    for (i, a) in ResizeAnchor::ALL.iter().enumerate() {
        for (j, b) in ResizeAnchor::ALL.iter().enumerate() {
            if i == j {
                assert_eq!(a, b);
            } else {
                assert_ne!(a, b);
            }
        }
    }
}

#[test]
fn resize_anchor_cursors() {
    assert_eq!(ResizeAnchor::N.cursor(), "ns-resize");
    assert_eq!(ResizeAnchor::W.cursor(), "ew-resize");
    assert_eq!(ResizeAnchor::Se.cursor(), "nwse-resize");
    assert_eq!(ResizeAnchor::Sw.cursor(), "nesw-resize");
}

// =============================================================
// Handle geometry
// =============================================================

#[test]
fn handle_positions_unrotated() {
    let el = wall(0.0, 0.0, 100.0, 50.0);
    let h = resize_handle_positions(&el);
    assert_eq!(h[0], Point::new(50.0, 0.0));
    assert_eq!(h[3], Point::new(100.0, 50.0));
    assert_eq!(h[7], Point::new(0.0, 0.0));
}

#[test]
fn handle_positions_follow_rotation() {
    let mut el = wall(0.0, 0.0, 100.0, 50.0);
    el.set_rotation(90.0);
    let n = resize_handle_positions(&el)[0];
    // N handle swings to the east side of the center (50, 25).
    assert!(approx_eq(n.x, 75.0));
    assert!(approx_eq(n.y, 25.0));
}

#[test]
fn rotate_handle_offset_is_screen_constant() {
    let el = wall(0.0, 0.0, 100.0, 50.0);
    let at_1 = rotate_handle_position(&el, 1.0);
    let at_2 = rotate_handle_position(&el, 2.0);
    assert!(approx_eq(at_1.y, -ROTATE_HANDLE_OFFSET_PX));
    assert!(approx_eq(at_2.y, -ROTATE_HANDLE_OFFSET_PX / 2.0));
}

// =============================================================
// contains_point
// =============================================================

#[test]
fn contains_point_respects_rotation() {
    let mut el = wall(0.0, 40.0, 100.0, 20.0);
    // Center (50, 50); a point above the unrotated bar.
    let p = Point::new(50.0, 10.0);
    assert!(!contains_point(&el, p));
    el.set_rotation(90.0);
    assert!(contains_point(&el, p));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_empty_space_is_none() {
    let store = store_of(vec![wall(0.0, 0.0, 10.0, 10.0)]);
    assert!(hit_test(Point::new(500.0, 500.0), &store, 1, 1.0, None).is_none());
}

#[test]
fn hit_picks_topmost_body() {
    let mut low = wall(0.0, 0.0, 100.0, 100.0);
    let mut high = wall(50.0, 50.0, 100.0, 100.0);
    low.z_order = 0;
    high.z_order = 1;
    let high_id = high.id;
    let store = store_of(vec![low, high]);

    let hit = hit_test(Point::new(75.0, 75.0), &store, 1, 1.0, None).unwrap();
    assert_eq!(hit, Hit { element_id: high_id, part: HitPart::Body });
}

#[test]
fn hit_ignores_other_pages() {
    let el = Element::wall(Footprint::new(0.0, 0.0, 100.0, 100.0, 2), WallType::Inner);
    let store = store_of(vec![el]);
    assert!(hit_test(Point::new(50.0, 50.0), &store, 1, 1.0, None).is_none());
}

#[test]
fn hit_resize_handle_before_body() {
    let el = wall(0.0, 0.0, 100.0, 50.0);
    let id = el.id;
    let store = store_of(vec![el]);
    let hit = hit_test(Point::new(98.0, 48.0), &store, 1, 1.0, Some(id)).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeAnchor::Se));
}

#[test]
fn hit_rotate_handle() {
    let el = wall(0.0, 0.0, 100.0, 50.0);
    let id = el.id;
    let store = store_of(vec![el]);
    let hit = hit_test(Point::new(50.0, -ROTATE_HANDLE_OFFSET_PX), &store, 1, 1.0, Some(id)).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn handle_radius_shrinks_in_document_space_when_zoomed_in() {
    let el = wall(0.0, 0.0, 100.0, 50.0);
    let id = el.id;
    let store = store_of(vec![el]);
    // 6 units outside the SE corner: inside the radius at zoom 1, outside at zoom 4.
    let p = Point::new(106.0, 50.0);
    assert!(hit_test(p, &store, 1, 1.0, Some(id)).is_some());
    assert!(hit_test(p, &store, 1, 4.0, Some(id)).is_none());
}

#[test]
fn no_handles_for_immovable_or_symbol() {
    let fixed = wall(0.0, 0.0, 100.0, 50.0).immovable();
    let fixed_id = fixed.id;
    let store = store_of(vec![fixed]);
    let hit = hit_test(Point::new(99.0, 49.0), &store, 1, 1.0, Some(fixed_id)).unwrap();
    assert_eq!(hit.part, HitPart::Body);

    let sym = Element::symbol("S", 1, Point::new(50.0, 50.0), crate::geometry::Size::new(20.0, 20.0));
    let sym_id = sym.id;
    let store = store_of(vec![sym]);
    assert!(hit_test(Point::new(50.0, 40.0 - ROTATE_HANDLE_OFFSET_PX), &store, 1, 1.0, Some(sym_id)).is_none());
}
