#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Reflect};
use list_life::api::LifeWorld;
use list_life::wasm_ready;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::wasm_bindgen_test;

fn get_f64(value: &JsValue, key: &str) -> f64 {
    Reflect::get(value, &JsValue::from_str(key))
        .unwrap()
        .as_f64()
        .unwrap()
}

#[wasm_bindgen_test]
fn ready_probe_answers() {
    assert!(wasm_ready());
}

#[wasm_bindgen_test]
fn blinker_steps_through_the_facade() {
    let mut world = LifeWorld::new(10, 10);
    for x in 1..=3 {
        world.add_cell(x, 1, false).unwrap();
    }

    let generation = world.step().unwrap();
    assert_eq!(get_f64(&generation, "alive"), 3.0);
    assert_eq!(get_f64(&generation, "undead"), 0.0);

    let changes = Array::from(&Reflect::get(&generation, &"changes".into()).unwrap());
    assert_eq!(changes.length(), 5);
    let first = changes.get(0);
    assert_eq!(get_f64(&first, "x"), 1.0);
    assert_eq!(get_f64(&first, "y"), 1.0);
    assert_eq!(get_f64(&first, "state"), 0.0);

    assert!(world.is_occupied(2, 0));
    assert!(!world.is_occupied(1, 1));
}

#[wasm_bindgen_test]
fn state_snapshot_and_errors_cross_the_boundary() {
    let mut world = LifeWorld::new(10, 10);
    assert_eq!(world.switch_cell(4, 4, true).unwrap(), 2);

    let state = world.state().unwrap();
    assert_eq!(get_f64(&state, "undead"), 1.0);
    assert_eq!(get_f64(&state, "columns"), 10.0);

    let err = world.switch_cell(10, 0, false).unwrap_err();
    assert!(err.as_string().unwrap().contains("outside the board"));

    world.reset();
    assert!(!world.is_occupied(4, 4));
}

#[wasm_bindgen_test]
fn patterns_are_listed_and_stamped() {
    let mut world = LifeWorld::new(20, 20);
    assert!(world.pattern_names().contains(&"Glider".to_string()));
    assert_eq!(world.place_pattern("Glider", 3, 3).unwrap(), 5);
    assert!(world.is_occupied(4, 3));
}
