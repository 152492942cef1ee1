#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::Element;
use crate::geometry::WallType;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn fp(x: f64, y: f64, w: f64, h: f64) -> Footprint {
    Footprint::new(x, y, w, h, 1)
}

const ALL_ANCHORS: [ResizeAnchor; 8] = [
    ResizeAnchor::N,
    ResizeAnchor::Ne,
    ResizeAnchor::E,
    ResizeAnchor::Se,
    ResizeAnchor::S,
    ResizeAnchor::Sw,
    ResizeAnchor::W,
    ResizeAnchor::Nw,
];

// =============================================================
// resize_footprint: per-anchor rules
// =============================================================

#[test]
fn east_grows_width_only() {
    let out = resize_footprint(ResizeAnchor::E, &fp(10.0, 10.0, 100.0, 50.0), 20.0, 99.0);
    assert_eq!(out, fp(10.0, 10.0, 120.0, 50.0));
}

#[test]
fn west_moves_origin_and_shrinks_width() {
    let out = resize_footprint(ResizeAnchor::W, &fp(10.0, 10.0, 100.0, 50.0), 20.0, 0.0);
    assert_eq!(out, fp(30.0, 10.0, 80.0, 50.0));
}

#[test]
fn north_moves_origin_and_shrinks_height() {
    let out = resize_footprint(ResizeAnchor::N, &fp(10.0, 10.0, 100.0, 50.0), 5.0, -10.0);
    assert_eq!(out, fp(10.0, 0.0, 100.0, 60.0));
}

#[test]
fn south_grows_height_only() {
    let out = resize_footprint(ResizeAnchor::S, &fp(10.0, 10.0, 100.0, 50.0), 5.0, 10.0);
    assert_eq!(out, fp(10.0, 10.0, 100.0, 60.0));
}

#[test]
fn corners_combine_both_axes() {
    let orig = fp(10.0, 10.0, 100.0, 50.0);
    assert_eq!(resize_footprint(ResizeAnchor::Se, &orig, 10.0, 10.0), fp(10.0, 10.0, 110.0, 60.0));
    assert_eq!(resize_footprint(ResizeAnchor::Nw, &orig, 10.0, 10.0), fp(20.0, 20.0, 90.0, 40.0));
    assert_eq!(resize_footprint(ResizeAnchor::Ne, &orig, 10.0, 10.0), fp(10.0, 20.0, 110.0, 40.0));
    assert_eq!(resize_footprint(ResizeAnchor::Sw, &orig, 10.0, 10.0), fp(20.0, 10.0, 90.0, 60.0));
}

// =============================================================
// resize_footprint: minimum-size floor
// =============================================================

#[test]
fn se_shrink_past_floor_keeps_origin() {
    let out = resize_footprint(ResizeAnchor::Se, &fp(10.0, 10.0, 100.0, 50.0), -95.0, 0.0);
    assert_eq!(out.width, 10.0);
    assert_eq!(out.height, 50.0);
    assert_eq!(out.x, 10.0);
}

#[test]
fn west_floor_skips_origin_adjustment() {
    let out = resize_footprint(ResizeAnchor::W, &fp(10.0, 10.0, 100.0, 50.0), 500.0, 0.0);
    assert_eq!(out.width, 10.0);
    assert_eq!(out.x, 10.0);
}

#[test]
fn north_floor_skips_origin_adjustment() {
    let out = resize_footprint(ResizeAnchor::Nw, &fp(10.0, 10.0, 100.0, 50.0), 0.0, 300.0);
    assert_eq!(out.height, 10.0);
    assert_eq!(out.y, 10.0);
}

#[test]
fn every_anchor_respects_floor_for_any_delta() {
    let orig = fp(0.0, 0.0, 40.0, 40.0);
    let deltas = [-1000.0, -45.0, -1.0, 0.0, 1.0, 45.0, 1000.0];
    for anchor in ALL_ANCHORS {
        for &dx in &deltas {
            for &dy in &deltas {
                let out = resize_footprint(anchor, &orig, dx, dy);
                assert!(out.width >= MIN_ELEMENT_SIZE, "{anchor:?} {dx} {dy}");
                assert!(out.height >= MIN_ELEMENT_SIZE, "{anchor:?} {dx} {dy}");
            }
        }
    }
}

#[test]
fn nan_delta_floors_instead_of_propagating() {
    let out = resize_footprint(ResizeAnchor::E, &fp(0.0, 0.0, 40.0, 40.0), f64::NAN, 0.0);
    assert_eq!(out.width, MIN_ELEMENT_SIZE);
}

// =============================================================
// ResizeSession
// =============================================================

#[test]
fn resize_session_recomputes_center() {
    let mut store = PlanStore::new();
    let el = Element::wall(fp(10.0, 10.0, 100.0, 50.0), WallType::Outer);
    let id = el.id;
    store.insert(el);

    let session = ResizeSession::begin(&store, id, ResizeAnchor::Se, Point::new(110.0, 60.0)).unwrap();
    assert!(session.update(&mut store, Point::new(130.0, 80.0)));

    let el = store.get(&id).unwrap();
    assert_eq!(el.center(), Point::new(70.0, 45.0));
    assert_eq!(el.sizex, 120.0);
    assert!(session.changed(&store));
}

#[test]
fn resize_session_uses_total_travel_not_increments() {
    let mut store = PlanStore::new();
    let el = Element::wall(fp(0.0, 0.0, 100.0, 50.0), WallType::Inner);
    let id = el.id;
    store.insert(el);

    let session = ResizeSession::begin(&store, id, ResizeAnchor::E, Point::new(100.0, 25.0)).unwrap();
    session.update(&mut store, Point::new(0.0, 25.0));
    session.update(&mut store, Point::new(120.0, 25.0));
    assert_eq!(store.get(&id).unwrap().footprint().unwrap().width, 120.0);
}

#[test]
fn resize_session_rejects_symbols_and_immovables() {
    let mut store = PlanStore::new();
    let sym = Element::symbol("S1", 1, Point::new(0.0, 0.0), crate::geometry::Size::new(10.0, 10.0));
    let fixed = Element::wall(fp(0.0, 0.0, 20.0, 20.0), WallType::Inner).immovable();
    let (sym_id, fixed_id) = (sym.id, fixed.id);
    store.insert(sym);
    store.insert(fixed);
    assert!(ResizeSession::begin(&store, sym_id, ResizeAnchor::E, Point::default()).is_none());
    assert!(ResizeSession::begin(&store, fixed_id, ResizeAnchor::E, Point::default()).is_none());
}

// =============================================================
// RotateSession
// =============================================================

#[test]
fn pointer_angle_is_screen_oriented() {
    let c = Point::new(0.0, 0.0);
    assert!(approx_eq(pointer_angle(c, Point::new(1.0, 0.0)), 0.0));
    assert!(approx_eq(pointer_angle(c, Point::new(0.0, 1.0)), 90.0));
    assert!(approx_eq(pointer_angle(c, Point::new(0.0, -1.0)), -90.0));
}

#[test]
fn rotate_quarter_turn_clockwise() {
    let mut store = PlanStore::new();
    let el = Element::wall(fp(0.0, 0.0, 100.0, 20.0), WallType::Inner);
    let id = el.id;
    store.insert(el);

    // Center (50, 10); start due north, end due east.
    let session = RotateSession::begin(&store, id, Point::new(50.0, -40.0)).unwrap();
    session.update(&mut store, Point::new(100.0, 10.0));
    let el = store.get(&id).unwrap();
    assert!(approx_eq(el.rotate, 90.0));
    assert!(approx_eq(el.footprint().unwrap().rotate, 90.0));
    assert!(session.changed(&store));
}

#[test]
fn rotate_wraps_into_range() {
    let mut store = PlanStore::new();
    let mut el = Element::wall(fp(0.0, 0.0, 100.0, 20.0), WallType::Inner);
    el.set_rotation(350.0);
    let id = el.id;
    store.insert(el);

    let session = RotateSession::begin(&store, id, Point::new(150.0, 10.0)).unwrap();
    // +30 degrees from 350 wraps to 20.
    let p = Point::new(50.0 + 100.0 * 30_f64.to_radians().cos(), 10.0 + 100.0 * 30_f64.to_radians().sin());
    session.update(&mut store, p);
    let rot = store.get(&id).unwrap().rotate;
    assert!((rot - 20.0).abs() < 1e-6);
    assert!((0.0..360.0).contains(&rot));
}

#[test]
fn rotate_back_to_start_is_unchanged() {
    let mut store = PlanStore::new();
    let el = Element::door(fp(0.0, 0.0, 40.0, 40.0));
    let id = el.id;
    store.insert(el);

    let session = RotateSession::begin(&store, id, Point::new(40.0, 20.0)).unwrap();
    session.update(&mut store, Point::new(20.0, 40.0));
    session.update(&mut store, Point::new(40.0, 20.0));
    assert!(!session.changed(&store));
}
