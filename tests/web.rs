//! Browser smoke tests for the JavaScript-facing engine
#![cfg(target_arch = "wasm32")]

use holiday_tree::{Group, HolidayTree};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SMALL: &str = "
seed: 7
initial_state: chaos
counts:
  foliage: 200
  gems: 20
  pearls: 30
  lights: 10
  fairy_dust: 8
";

#[wasm_bindgen_test]
fn test_views_have_expected_lengths() {
    let tree = HolidayTree::from_yaml(SMALL).unwrap();
    assert_eq!(tree.positions(Group::Foliage).length(), 600);
    assert_eq!(tree.matrices(Group::Gems).length(), 20 * 16);
    assert_eq!(tree.colors(Group::Pearls).length(), 30 * 3);
    assert_eq!(tree.colors(Group::Foliage).length(), 0);
    assert_eq!(tree.foliage_sizes().length(), 200);
    assert_eq!(tree.meteor_opacities().length(), 5);
}

#[wasm_bindgen_test]
fn test_view_reflects_render() {
    let mut tree = HolidayTree::from_yaml(SMALL).unwrap();
    let before = tree.positions(Group::Foliage).to_vec();
    tree.set_formed(true);
    tree.render(1.0 / 60.0, 1.0 / 60.0);
    let after = tree.positions(Group::Foliage).to_vec();
    assert_ne!(before, after);
    assert!(tree.take_dirty(Group::Foliage));
}

#[wasm_bindgen_test]
fn test_bad_color_is_reported() {
    let result = HolidayTree::from_yaml("palette:\n  foliage: \"#zzzzzz\"\n");
    let err = match result {
        Ok(_) => panic!("bad color accepted"),
        Err(e) => e,
    };
    let message = err.as_string().unwrap_or_default();
    assert!(message.contains("foliage"));
}

#[wasm_bindgen_test]
fn test_toggle_round_trip() {
    let mut tree = HolidayTree::new();
    assert!(tree.is_formed());
    assert!(!tree.toggle());
    assert!(tree.toggle());
}
