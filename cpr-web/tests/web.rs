//! Browser smoke tests for the JS bridge
//!
//! Run with `wasm-pack test --headless --chrome cpr-web`.

#![cfg(target_arch = "wasm32")]

use cpr_web::CprSession;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const DT: f32 = 1.0 / 60.0;

fn box_zone() -> JsValue {
    let zone = Object::new();
    let center: Array = [0.0, 1.0, 0.0].iter().map(|v| JsValue::from_f64(*v)).collect();
    let size: Array = [0.4, 0.3, 0.4].iter().map(|v| JsValue::from_f64(*v)).collect();
    Reflect::set(&zone, &"kind".into(), &"box".into()).unwrap();
    Reflect::set(&zone, &"center".into(), &center).unwrap();
    Reflect::set(&zone, &"size".into(), &size).unwrap();
    zone.into()
}

fn press(session: &mut CprSession) -> bool {
    for i in 0..=10 {
        let y = 1.1 - 0.005 * i as f32;
        session.frame(&[0.0, y, 0.0], &[0.02, y, 0.0], DT);
        session.advance_physics(DT);
    }
    session.frame(&[-0.5, 1.1, 0.0], &[0.5, 1.1, 0.0], DT)
}

#[wasm_bindgen_test]
fn session_counts_a_press() {
    let mut session = CprSession::new(box_zone(), JsValue::UNDEFINED).unwrap();
    assert!(press(&mut session));
    assert!(session.compression_just_completed());
    assert_eq!(session.compression_count(), 1);
    assert!(!session.last_pulse().is_null());
}

#[wasm_bindgen_test]
fn partial_config_overrides_defaults() {
    let config = Object::new();
    let session_section = Object::new();
    Reflect::set(&session_section, &"warmup_compressions".into(), &JsValue::from_f64(5.0)).unwrap();
    Reflect::set(&config, &"session".into(), &session_section).unwrap();

    assert!(CprSession::new(box_zone(), config.into()).is_ok());
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    let config = Object::new();
    let spring = Object::new();
    Reflect::set(&spring, &"stiffness".into(), &JsValue::from_f64(-1.0)).unwrap();
    Reflect::set(&config, &"spring".into(), &spring).unwrap();

    assert!(CprSession::new(box_zone(), config.into()).is_err());
}

#[wasm_bindgen_test]
fn bad_hand_arrays_skip_the_frame() {
    let mut session = CprSession::new(box_zone(), JsValue::NULL).unwrap();
    assert!(!session.frame(&[0.0, 1.0], &[0.0, 1.0, 0.0], DT));
    assert_eq!(session.compression_count(), 0);
}

#[wasm_bindgen_test]
fn end_session_returns_results_once() {
    let mut session = CprSession::new(box_zone(), JsValue::UNDEFINED).unwrap();
    press(&mut session);

    let results = session.end_session();
    assert!(!results.is_null());
    let count = Reflect::get(&results, &"compressions".into()).unwrap();
    assert_eq!(count.as_f64(), Some(1.0));
    assert!(session.end_session().is_null());
}

#[wasm_bindgen_test]
fn feedback_carries_display_colors() {
    let mut session = CprSession::new(box_zone(), JsValue::UNDEFINED).unwrap();
    press(&mut session);

    let feedback = session.feedback();
    let color = Reflect::get(&feedback, &"rateTierColor".into()).unwrap();
    assert!(Array::is_array(&color));
    assert_eq!(Array::from(&color).length(), 4);
}
