//! Scribble WASM Build
//!
//! Attaches the sketch canvas to `<canvas id="drawing_canvas">`. Mouse, touch
//! and keyboard events drive the drawing surface; each finished stroke is
//! preprocessed and classified by the CNN in a spawned task, and the label is
//! written to `#prediction-output`.

use scribble_classifier::CnnConfig;
use scribble_config::CanvasConfig;
use tracing::{Level, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

mod app;
mod bridge;
mod input;
mod logging;
mod model;
mod page;
mod view;

pub use app::CanvasApp;

const CANVAS_ID: &str = "drawing_canvas";
const DEFAULT_MODEL_URL: &str = "model/sketch.safetensors";

/// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Set up panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    logging::init(Level::INFO);

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str(&format!("no #{} element", CANVAS_ID)))?
        .dyn_into()?;

    let config = read_config(&canvas);
    let model_url = canvas
        .get_attribute("data-model")
        .unwrap_or_else(|| DEFAULT_MODEL_URL.to_string());

    let app = CanvasApp::with_fallback(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let view = view::CanvasView::attach(&document, canvas, app.config())?;
    let cnn_config = CnnConfig::from(app.config());
    let page = page::Page::new(app, view);

    page.render();
    input::install(&page, &document)?;
    bridge::listen(&page)?;
    model::spawn_load(page, model_url, cnn_config);

    info!("Scribble canvas ready");
    Ok(())
}

/// Optional JSON config in the canvas' `data-config` attribute
fn read_config(canvas: &HtmlCanvasElement) -> CanvasConfig {
    let Some(json) = canvas.get_attribute("data-config") else {
        return CanvasConfig::default();
    };
    match CanvasConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring data-config: {}", e);
            CanvasConfig::default()
        }
    }
}
