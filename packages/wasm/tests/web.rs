//! Tests for the JS-facing API. Run with `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use algoviz_wasm::AlgoVizWasm;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn test_start_and_tick_through_facade() {
    let mut viz = AlgoVizWasm::new();
    viz.start_json(r#"{"family":"sorting","algorithm":"bubble","values":[5,3,8,1]}"#)
        .unwrap();
    assert_eq!(viz.state(), "running");
    assert_eq!(viz.cursor(), 0);

    viz.set_speed(50);
    viz.tick(1_000_000.0);
    assert_eq!(viz.state(), "finished");
    assert_eq!(viz.cursor() + 1, viz.total());

    let frame = viz.frame().unwrap();
    assert!(frame.is_object());
}

#[wasm_bindgen_test]
fn test_errors_become_strings() {
    let mut viz = AlgoVizWasm::new();
    let err = viz
        .start_json(r#"{"family":"binarySearch","values":[3,1],"target":1}"#)
        .unwrap_err();
    assert!(err.as_string().unwrap().starts_with("invalid input"));

    let err = viz.pause().unwrap_err();
    assert_eq!(err.as_string().unwrap(), "cannot pause while idle");
}

#[wasm_bindgen_test]
fn test_start_from_object() {
    let mut viz = AlgoVizWasm::new();
    let request = js_sys::JSON::parse(r#"{"family":"matrix","rows":[[1,2],[3,4]]}"#).unwrap();
    viz.start(request).unwrap();
    let values = viz.current_values().unwrap();
    assert_ne!(values, JsValue::UNDEFINED);
}

#[wasm_bindgen_test]
fn test_graph_positions() {
    let viz = AlgoVizWasm::new();
    let positions = viz.graph_positions(r#"{"sample":"undirectedWeighted"}"#).unwrap();
    assert_eq!(positions.length(), 14);
}
