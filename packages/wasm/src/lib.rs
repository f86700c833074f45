//! AlgoViz - WASM Module
//!
//! This module provides the step-generating algorithm simulators and the
//! playback driver behind the AlgoViz visualizer. It is compiled to
//! WebAssembly and exposes a JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `step`: The step model and effect replay
//! - `steppers`: Pure `(input, parameters) -> steps` simulators
//! - `graph`: Weighted graphs on petgraph's StableGraph, plus traversals
//! - `layout`: Circular node placement (also feeds the A* heuristic)
//! - `playback`: Timer-driven state machine over one run
//! - `config` / `input` / `error`: Settings, validation and errors

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod layout;
pub mod playback;
pub mod step;
pub mod steppers;

use config::VisualizerConfig;
use error::{VizError, VizResult};
use playback::{Frame, PlaybackDriver};
use steppers::{AlgorithmSpec, GraphSource};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert an error for JS, echoing visible ones to the browser console.
fn to_js(err: VizError) -> JsValue {
    let message = err.to_string();
    if err.is_user_visible() {
        web_sys::console::warn_1(&JsValue::from_str(&message));
    }
    JsValue::from_str(&message)
}

fn to_js_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Main entry point for the visualizer.
///
/// This struct wraps the internal PlaybackDriver and provides the public
/// API exposed to JavaScript. The host calls `tick` from its animation
/// loop and renders `frame()` afterwards.
#[wasm_bindgen]
pub struct AlgoVizWasm {
    driver: PlaybackDriver,
}

#[wasm_bindgen]
impl AlgoVizWasm {
    /// Create a visualizer with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            driver: PlaybackDriver::default(),
        }
    }

    /// Create a visualizer from persisted settings.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<AlgoVizWasm, JsValue> {
        Self::from_config_json(json).map_err(to_js)
    }

    /// Settings as JSON, for persistence by the host.
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.current_config().to_json().map_err(to_js)
    }

    // =========================================================================
    // Runs
    // =========================================================================

    /// Generate and start a run described by an `AlgorithmSpec` object.
    pub fn start(&mut self, spec: JsValue) -> Result<(), JsValue> {
        let spec: AlgorithmSpec = serde_wasm_bindgen::from_value(spec)
            .map_err(|e| to_js(VizError::invalid_input(e.to_string())))?;
        self.driver.start(spec).map_err(to_js)
    }

    /// Like `start`, with the spec as a JSON string.
    #[wasm_bindgen(js_name = startJson)]
    pub fn start_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.start_from_json(json).map_err(to_js)
    }

    /// Generate a full step sequence without touching playback.
    #[wasm_bindgen(js_name = generateSteps)]
    pub fn generate_steps(&self, spec: JsValue) -> Result<JsValue, JsValue> {
        let spec: AlgorithmSpec = serde_wasm_bindgen::from_value(spec)
            .map_err(|e| to_js(VizError::invalid_input(e.to_string())))?;
        let steps = steppers::generate(&spec, &self.driver.config().limits).map_err(to_js)?;
        to_js_value(&steps)
    }

    // =========================================================================
    // Playback Control
    // =========================================================================

    pub fn pause(&mut self) -> Result<(), JsValue> {
        self.driver.pause().map_err(to_js)
    }

    pub fn resume(&mut self) -> Result<(), JsValue> {
        self.driver.resume().map_err(to_js)
    }

    #[wasm_bindgen(js_name = stepForward)]
    pub fn step_forward(&mut self) -> Result<(), JsValue> {
        self.driver.step_forward().map_err(to_js)
    }

    #[wasm_bindgen(js_name = stepBackward)]
    pub fn step_backward(&mut self) -> Result<(), JsValue> {
        self.driver.step_backward().map_err(to_js)
    }

    pub fn reset(&mut self) {
        self.driver.reset();
    }

    pub fn cancel(&mut self) -> Result<(), JsValue> {
        self.driver.cancel().map_err(to_js)
    }

    /// Tell the driver the input was edited. Returns true if a run was
    /// cancelled.
    #[wasm_bindgen(js_name = inputChanged)]
    pub fn input_changed(&mut self) -> bool {
        self.driver.input_changed()
    }

    /// Report elapsed milliseconds. Returns the number of steps advanced.
    pub fn tick(&mut self, elapsed_ms: f64) -> u32 {
        self.driver.tick(elapsed_ms) as u32
    }

    /// Set the playback interval. Returns the clamped value in effect.
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, speed_ms: u32) -> u32 {
        self.driver.set_speed(speed_ms)
    }

    // =========================================================================
    // Frame Access
    // =========================================================================

    /// Get the driver state (`"idle"`, `"running"`, ...).
    pub fn state(&self) -> String {
        self.driver.state().to_string()
    }

    pub fn cursor(&self) -> u32 {
        self.driver.cursor() as u32
    }

    pub fn total(&self) -> u32 {
        self.driver.total() as u32
    }

    #[wasm_bindgen(js_name = speedMs)]
    pub fn speed_ms(&self) -> u32 {
        self.driver.speed_ms()
    }

    /// Current step, cursor, total and state as an object.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.current_frame())
    }

    /// Array contents after the current step, or `undefined` for families
    /// without array effects.
    #[wasm_bindgen(js_name = currentValues)]
    pub fn current_values(&self) -> Result<JsValue, JsValue> {
        let values = match self.driver.run() {
            Some(run) => run.values_at_cursor().map_err(to_js)?,
            None => None,
        };
        to_js_value(&values)
    }

    // =========================================================================
    // Input Helpers
    // =========================================================================

    /// Parse user text into numbers within the configured limits.
    #[wasm_bindgen(js_name = parseValues)]
    pub fn parse_values(&self, text: &str) -> Result<JsValue, JsValue> {
        let values = input::parse_values(text, &self.driver.config().limits).map_err(to_js)?;
        to_js_value(&values)
    }

    /// Node positions `[x0, y0, x1, y1, ...]` for a graph source given as
    /// JSON (`{"sample":"directedWeighted"}` or `{"custom":{...}}`).
    #[wasm_bindgen(js_name = graphPositions)]
    pub fn graph_positions(&self, json: &str) -> Result<Float64Array, JsValue> {
        let positions = self.graph_layout(json).map_err(to_js)?;
        Ok(Float64Array::from(&positions[..]))
    }
}

impl Default for AlgoVizWasm {
    fn default() -> Self {
        Self::new()
    }
}

// Host-independent halves of the exported methods.
impl AlgoVizWasm {
    /// Build from a persisted configuration.
    ///
    /// # Errors
    ///
    /// Returns `Json` or `Config` errors from [`VisualizerConfig::from_json`].
    pub fn from_config_json(json: &str) -> VizResult<Self> {
        let config = VisualizerConfig::from_json(json)?;
        Ok(Self {
            driver: PlaybackDriver::new(config),
        })
    }

    /// Configuration with the live speed folded in.
    pub fn current_config(&self) -> VisualizerConfig {
        VisualizerConfig {
            speed_ms: self.driver.speed_ms(),
            ..self.driver.config().clone()
        }
    }

    /// Parse a JSON `AlgorithmSpec` and start it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for malformed JSON or rejected input, and
    /// `InvalidTransition` while a run is active.
    pub fn start_from_json(&mut self, json: &str) -> VizResult<()> {
        let spec: AlgorithmSpec = serde_json::from_str(json)
            .map_err(|e| VizError::invalid_input(format!("unrecognised algorithm request: {e}")))?;
        self.driver.start(spec)
    }

    /// Interleaved node positions for a JSON graph source.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for malformed JSON or an invalid graph.
    pub fn graph_layout(&self, json: &str) -> VizResult<Vec<f64>> {
        let source: GraphSource = serde_json::from_str(json)
            .map_err(|e| VizError::invalid_input(format!("unrecognised graph: {e}")))?;
        let engine = source.build(&self.driver.config().limits)?;
        Ok(engine.positions_interleaved())
    }

    pub fn current_frame(&self) -> Frame {
        self.driver.frame()
    }

    pub fn driver(&self) -> &PlaybackDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut PlaybackDriver {
        &mut self.driver
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::graph::{GraphEngine, SampleGraph, traversal_steps, GraphAlgorithm};
    use crate::playback::PlaybackState;
    use crate::step::replay::{LinkTable, replay, replay_values};
    use crate::step::{Aux, StepKind};
    use crate::steppers::linked_list::{LinkedList, ListMode, list_steps};

    /// Drive a bubble sort through the facade the way the front end does:
    /// start from JSON, tick until finished, read frames along the way.
    #[test]
    fn test_json_run_plays_to_completion() {
        let mut viz = AlgoVizWasm::new();
        viz.start_from_json(r#"{"family":"sorting","algorithm":"bubble","values":[5,3,8,1]}"#)
            .unwrap();
        viz.set_speed(100);

        let first = viz.current_frame();
        assert_eq!(first.state, PlaybackState::Running);
        assert_eq!(first.step.as_ref().unwrap().kind, StepKind::Compare);

        let mut frames = 1;
        while viz.driver().state() == PlaybackState::Running {
            viz.tick(100.0);
            frames += 1;
            assert!(frames < 1000, "playback never finished");
        }

        let last = viz.current_frame();
        assert_eq!(last.state, PlaybackState::Finished);
        assert_eq!(last.cursor + 1, last.total);
        let run = viz.driver().run().unwrap();
        assert_eq!(run.values_at_cursor().unwrap(), Some(vec![1, 3, 5, 8]));
    }

    #[test]
    fn test_malformed_request_is_invalid_input() {
        let mut viz = AlgoVizWasm::new();
        let err = viz.start_from_json(r#"{"family":"sorting"}"#).unwrap_err();
        assert!(matches!(err, VizError::InvalidInput { .. }));
        assert_eq!(viz.driver().state(), PlaybackState::Idle);
    }

    #[test]
    fn test_config_round_trip_keeps_live_speed() {
        let mut viz = AlgoVizWasm::from_config_json(r#"{"speedMs": 300}"#).unwrap();
        assert_eq!(viz.driver().speed_ms(), 300);
        viz.set_speed(900);
        let json = viz.current_config().to_json().unwrap();
        let restored = AlgoVizWasm::from_config_json(&json).unwrap();
        assert_eq!(restored.driver().speed_ms(), 900);
    }

    #[test]
    fn test_config_limits_apply_to_runs() {
        let mut viz =
            AlgoVizWasm::from_config_json(r#"{"limits": {"maxLen": 3}}"#).unwrap();
        let err = viz
            .start_from_json(r#"{"family":"sorting","algorithm":"merge","values":[4,3,2,1]}"#)
            .unwrap_err();
        assert!(matches!(err, VizError::InvalidInput { .. }));
    }

    #[test]
    fn test_graph_layout_for_sample() {
        let viz = AlgoVizWasm::new();
        let positions = viz.graph_layout(r#"{"sample":"directedWeighted"}"#).unwrap();
        assert_eq!(positions.len(), 14);
        assert!(viz.graph_layout(r#"{"custom":{"nodes":[],"edges":[]}}"#).is_err());
    }

    #[test]
    fn test_heap_run_matches_textbook_build() {
        let mut viz = AlgoVizWasm::new();
        viz.start_from_json(
            r#"{"family":"heap","heap":"min","values":[40,20,60,10,30,50,70],"operation":{"op":"build"}}"#,
        )
        .unwrap();
        let run = viz.driver().run().unwrap();
        let values = replay_values(&[40, 20, 60, 10, 30, 50, 70], run.steps()).unwrap();
        assert_eq!(values, vec![10, 20, 50, 40, 30, 60, 70]);
    }

    #[test]
    fn test_list_reversal_replays_to_reversed_links() {
        let list = LinkedList::new(vec![1, 2, 3, 4]);
        let steps = list_steps(&list, ListMode::Reverse);
        let mut links = list.links();
        replay(&mut links, &steps).unwrap();
        assert_eq!(links, LinkTable(vec![None, Some(0), Some(1), Some(2)]));
    }

    #[test]
    fn test_dijkstra_frames_expose_distances() {
        let engine =
            GraphEngine::from_spec(&SampleGraph::UndirectedWeighted.spec(), &Default::default())
                .unwrap();
        let a = engine.node_by_label("A").unwrap();
        let steps = traversal_steps(&engine, GraphAlgorithm::Dijkstra, a, None);
        let updates = steps
            .iter()
            .filter(|s| s.kind == StepKind::DistanceUpdate)
            .count();
        assert!(updates >= engine.node_count() - 1);
        assert!(steps
            .iter()
            .all(|s| matches!(s.aux, Some(Aux::Pathfinding(_)))));
    }

    #[test]
    fn test_cancelled_run_can_restart_after_reset() {
        let mut viz = AlgoVizWasm::new();
        let request = r#"{"family":"binarySearch","values":[1,2,5,7,9,10],"target":7}"#;
        viz.start_from_json(request).unwrap();
        assert!(viz.input_changed());
        assert!(viz.start_from_json(request).is_err());
        viz.reset();
        viz.start_from_json(request).unwrap();
        assert_eq!(viz.driver().state(), PlaybackState::Running);
    }
}
