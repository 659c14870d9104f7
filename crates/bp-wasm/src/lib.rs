//! WASM bridge for the blueprint canvas. Exposes the Rust engine to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host forwards pointer,
//! wheel and key events, pushes datasets as JSON, and receives commits and
//! selections through registered callbacks.

mod render2d;

use bp_core::{CanvasConfig, Dataset, Node};
use bp_editor::input::{InputEvent, Modifiers, PointerId};
use bp_editor::sync::Incoming;
use bp_editor::{CanvasEngine, HostBridge, Response};
use bp_render::svg::render_svg;
use bp_render::{CanvasTheme, ViewAction};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Host side of the bridge: JS callbacks plus the canvas element that
/// owns pointer capture. Every slot is optional; unset callbacks are skipped.
#[derive(Default)]
struct JsHost {
    canvas: Option<HtmlCanvasElement>,
    on_positions_committed: Option<js_sys::Function>,
    on_node_selected: Option<js_sys::Function>,
    on_canvas_selected: Option<js_sys::Function>,
}

impl JsHost {
    fn call(callback: &js_sys::Function, arg: &JsValue) {
        if let Err(e) = callback.call1(&JsValue::NULL, arg) {
            log::warn!("host callback threw: {e:?}");
        }
    }

    /// Serialize `value` and hand it to `callback` as a JSON string.
    fn call_json<T: serde::Serialize + ?Sized>(callback: Option<&js_sys::Function>, value: &T) {
        let Some(callback) = callback else {
            return;
        };
        match serde_json::to_string(value) {
            Ok(json) => Self::call(callback, &JsValue::from_str(&json)),
            Err(e) => log::warn!("failed to serialize callback payload: {e}"),
        }
    }
}

impl HostBridge for JsHost {
    fn positions_committed(&mut self, nodes: &[Node]) {
        Self::call_json(self.on_positions_committed.as_ref(), nodes);
    }

    fn node_selected(&mut self, node: &Node) {
        Self::call_json(self.on_node_selected.as_ref(), node);
    }

    fn canvas_selected(&mut self) {
        if let Some(callback) = &self.on_canvas_selected {
            Self::call(callback, &JsValue::UNDEFINED);
        }
    }

    fn capture_pointer(&mut self, pointer_id: PointerId) {
        if let Some(canvas) = &self.canvas
            && let Err(e) = canvas.set_pointer_capture(pointer_id)
        {
            log::warn!("setPointerCapture({pointer_id}) failed: {e:?}");
        }
    }

    fn release_pointer(&mut self, pointer_id: PointerId) {
        if let Some(canvas) = &self.canvas
            && let Err(e) = canvas.release_pointer_capture(pointer_id)
        {
            log::debug!("releasePointerCapture({pointer_id}) failed: {e:?}");
        }
    }
}

/// The main WASM-facing canvas controller.
///
/// Wraps the engine and its JS host. All interaction from the page goes
/// through this struct.
#[wasm_bindgen]
pub struct BlueprintCanvas {
    engine: CanvasEngine<JsHost>,
    /// Dark mode flag: `false` = light (default), `true` = dark.
    dark_mode: bool,
}

#[wasm_bindgen]
impl BlueprintCanvas {
    /// Create a new canvas controller with the given dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();

        let mut engine = CanvasEngine::new(CanvasConfig::default(), JsHost::default());
        engine.resize(width, height);
        Self {
            engine,
            dark_mode: false,
        }
    }

    // ─── Host wiring ─────────────────────────────────────────────────────

    /// Attach the `<canvas>` element used for pointer capture.
    pub fn attach_canvas(&mut self, canvas: HtmlCanvasElement) {
        self.engine.host_mut().canvas = Some(canvas);
    }

    /// Register `(nodesJson: string) => void`, fired once per completed drag
    /// with the full node array.
    pub fn on_positions_committed(&mut self, callback: js_sys::Function) {
        self.engine.host_mut().on_positions_committed = Some(callback);
    }

    /// Register `(nodeJson: string) => void`, fired on a node click.
    pub fn on_node_selected(&mut self, callback: js_sys::Function) {
        self.engine.host_mut().on_node_selected = Some(callback);
    }

    /// Register `() => void`, fired on an empty-canvas click.
    pub fn on_canvas_selected(&mut self, callback: js_sys::Function) {
        self.engine.host_mut().on_canvas_selected = Some(callback);
    }

    /// Push a dataset `{"nodes":[...],"edges":[...]}`.
    /// Returns `{"ok":true,"deferred":bool}` or `{"ok":false,"error":"..."}`.
    /// A dataset pushed mid-drag is applied when the drag ends.
    pub fn set_dataset_json(&mut self, json: &str) -> String {
        match Dataset::from_json(json, self.engine.config().node_size) {
            Ok(dataset) => {
                let deferred = matches!(self.engine.set_dataset(dataset), Incoming::Deferred { .. });
                format!(r#"{{"ok":true,"deferred":{deferred}}}"#)
            }
            Err(e) => {
                log::warn!("dataset rejected: {e}");
                error_json(&e)
            }
        }
    }

    /// Apply a (possibly partial) configuration object.
    /// Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn set_config_json(&mut self, json: &str) -> String {
        match CanvasConfig::from_json(json) {
            Ok(config) => {
                self.engine.set_config(config);
                r#"{"ok":true}"#.to_string()
            }
            Err(e) => error_json(&e),
        }
    }

    /// The working node array as JSON.
    pub fn nodes_json(&self) -> String {
        serde_json::to_string(&self.engine.dataset().nodes).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Render the current frame to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = CanvasTheme::from_dark_flag(self.dark_mode);
        render2d::render_frame(ctx, &self.engine.frame(), &theme, self.engine.config().grid_unit);
    }

    /// Export the current view as a standalone SVG document.
    pub fn export_svg(&self) -> String {
        render_svg(&self.engine.frame(), &CanvasTheme::from_dark_flag(self.dark_mode))
    }

    /// The composed draw list as JSON, for hosts with their own renderer.
    pub fn frame_json(&self) -> String {
        match serde_json::to_string(&self.engine.frame()) {
            Ok(json) => json,
            Err(e) => error_json(&format!("Serialization error: {e}")),
        }
    }

    /// Set the canvas theme.
    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    /// Resize the canvas. Returns true if a redraw is needed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.engine.resize(width, height)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if a redraw is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        pointer_id: i32,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.engine
            .handle(&InputEvent::PointerDown {
                pointer_id,
                x,
                y,
                modifiers,
            })
            .redraw
    }

    /// Handle pointer move. Returns true if a redraw is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_move(
        &mut self,
        pointer_id: i32,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.engine
            .handle(&InputEvent::PointerMove {
                pointer_id,
                x,
                y,
                modifiers,
            })
            .redraw
    }

    /// Handle pointer up. Returns true if a redraw is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_up(
        &mut self,
        pointer_id: i32,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.engine
            .handle(&InputEvent::PointerUp {
                pointer_id,
                x,
                y,
                modifiers,
            })
            .redraw
    }

    /// Handle `pointercancel`. Returns true if a redraw is needed.
    pub fn handle_pointer_cancel(&mut self, pointer_id: i32) -> bool {
        self.engine.handle(&InputEvent::PointerCancel { pointer_id }).redraw
    }

    /// Handle `lostpointercapture`. Returns true if a redraw is needed.
    pub fn handle_lost_capture(&mut self, pointer_id: i32) -> bool {
        self.engine.handle(&InputEvent::LostCapture { pointer_id }).redraw
    }

    /// Handle a wheel event. Returns `{"redraw":bool,"consumed":bool}`;
    /// the host should `preventDefault()` only when `consumed` is true.
    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64, ctrl: bool, meta: bool) -> String {
        let modifiers = modifiers(false, ctrl, false, meta);
        response_json(self.engine.handle(&InputEvent::Wheel {
            x,
            y,
            delta_y,
            modifiers,
        }))
    }

    /// Handle a keydown event. Returns `{"redraw":bool,"consumed":bool}`.
    pub fn handle_key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        response_json(self.engine.handle(&InputEvent::Key {
            key: key.to_string(),
            modifiers: modifiers(shift, ctrl, alt, meta),
        }))
    }

    // ─── View actions ────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> bool {
        self.engine.invoke(ViewAction::ZoomIn)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.engine.invoke(ViewAction::ZoomOut)
    }

    pub fn fit_to_view(&mut self) -> bool {
        self.engine.invoke(ViewAction::FitToView)
    }

    /// Invoke a view action by name (`"zoomIn"`, `"zoom-out"`, `"fit"`, ...).
    /// Unknown names are ignored.
    pub fn invoke_action(&mut self, name: &str) -> bool {
        ViewAction::from_name(name).is_some_and(|action| self.engine.invoke(action))
    }

    /// Current zoom factor (1.0 = 100%).
    pub fn scale(&self) -> f64 {
        self.engine.transform().scale
    }

    /// Id of the selected node, if any.
    pub fn selected_id(&self) -> Option<String> {
        self.engine.selection().map(|id| id.as_str().to_string())
    }

    /// Whether a drag or pan is in progress.
    pub fn is_interacting(&self) -> bool {
        !self.engine.interaction().is_idle()
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn response_json(response: Response) -> String {
    format!(
        r#"{{"redraw":{},"consumed":{}}}"#,
        response.redraw, response.consumed
    )
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

/// Set up better panic messages in the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Blueprint WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate a dataset without constructing a canvas.
/// Returns `{"ok":true,"nodes":N,"edges":N,"danglingEdges":N}` or an error.
#[wasm_bindgen]
pub fn validate_dataset(json: &str) -> String {
    match Dataset::from_json(json, CanvasConfig::default().node_size) {
        Ok(dataset) => {
            let dangling = dataset.edges.len() - dataset.resolved_edges().count();
            format!(
                r#"{{"ok":true,"nodes":{},"edges":{},"danglingEdges":{dangling}}}"#,
                dataset.nodes.len(),
                dataset.edges.len()
            )
        }
        Err(e) => error_json(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DATASET: &str = r#"{
        "nodes": [
            {"id": "web", "label": "Web", "type": "entry", "position": {"x": 100, "y": 100}},
            {"id": "api", "label": "API \"v2\"", "type": "service", "position": {"x": 500, "y": 100}}
        ],
        "edges": [
            {"from": "web", "to": "api", "label": "REST"},
            {"from": "web", "to": "ghost"}
        ]
    }"#;

    #[test]
    fn validate_counts_dangling_edges() {
        assert_eq!(
            validate_dataset(DATASET),
            r#"{"ok":true,"nodes":2,"edges":2,"danglingEdges":1}"#
        );
    }

    #[test]
    fn malformed_json_reports_an_error() {
        let out = validate_dataset("{\"nodes\": 3}");
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["ok"], false);
        assert!(parsed["error"].as_str().is_some_and(|e| !e.is_empty()), "{out}");
    }

    #[test]
    fn error_json_escapes_quotes() {
        let out = error_json(r#"bad "thing" \ here"#);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], r#"bad "thing" \ here"#);
    }

    #[test]
    fn error_json_escapes_control_characters() {
        let message = "unknown variant `line\nbreak\t`";
        let out = error_json(message);
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], message);
    }

    #[test]
    fn rejected_config_with_control_characters_is_valid_json() {
        let mut canvas = BlueprintCanvas::new(800.0, 600.0);
        let out = canvas.set_config_json("{\"zoomAnchor\": \"side\\nways\"}");
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["ok"], false);
        assert!(parsed["error"].as_str().is_some_and(|e| e.contains("side")));
    }

    #[test]
    fn canvas_drag_round_trip_without_callbacks() {
        let mut canvas = BlueprintCanvas::new(1024.0, 768.0);
        assert_eq!(canvas.set_dataset_json(DATASET), r#"{"ok":true,"deferred":false}"#);

        let frame: serde_json::Value = serde_json::from_str(&canvas.frame_json()).unwrap();
        assert_eq!(frame["cards"].as_array().map(Vec::len), Some(2));
        assert_eq!(frame["connectors"].as_array().map(Vec::len), Some(1));

        // Press the center of "web" and start dragging it.
        let engine = &canvas.engine;
        let center = engine.transform().to_screen(bp_core::Point::new(220.0, 180.0));
        assert!(canvas.handle_pointer_down(1, center.x, center.y, false, false, false, false));
        assert!(canvas.is_interacting());
        assert_eq!(canvas.set_dataset_json(DATASET), r#"{"ok":true,"deferred":true}"#);
        canvas.handle_pointer_move(1, center.x + 100.0, center.y, false, false, false, false);
        canvas.handle_pointer_up(1, center.x + 100.0, center.y, false, false, false, false);
        assert!(!canvas.is_interacting());
    }

    #[test]
    fn wheel_without_modifier_is_not_consumed() {
        let mut canvas = BlueprintCanvas::new(800.0, 600.0);
        canvas.set_dataset_json(DATASET);
        assert_eq!(
            canvas.handle_wheel(10.0, 10.0, -120.0, false, false),
            r#"{"redraw":false,"consumed":false}"#
        );
        assert_eq!(
            canvas.handle_wheel(10.0, 10.0, -120.0, true, false),
            r#"{"redraw":true,"consumed":true}"#
        );
    }

    #[test]
    fn actions_by_name_and_svg_export() {
        let mut canvas = BlueprintCanvas::new(800.0, 600.0);
        canvas.set_dataset_json(DATASET);
        let before = canvas.scale();
        assert!(canvas.invoke_action("zoom-in"));
        assert!(canvas.scale() > before);
        assert!(!canvas.invoke_action("explode"));

        let svg = canvas.export_svg();
        assert!(svg.contains("data-node-id=\"web\""));
        assert!(svg.contains("API &quot;v2&quot;"));
    }

    #[test]
    fn bad_config_is_rejected_and_good_config_applies() {
        let mut canvas = BlueprintCanvas::new(800.0, 600.0);
        assert!(canvas.set_config_json("{\"gridUnit\": \"x\"}").contains("\"ok\":false"));
        assert_eq!(canvas.set_config_json(r#"{"maxScale": 1.5}"#), r#"{"ok":true}"#);
        for _ in 0..20 {
            canvas.zoom_in();
        }
        assert_eq!(canvas.scale(), 1.5);
    }
}
