//! Canvas element and prediction text

use glam::Vec2;
use painting::{CoordinateMapper, PixelBuffer, RenderSink, render_rgba};
use scribble_config::CanvasConfig;
use tracing::warn;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, ImageData};

const PREDICTION_OUTPUT_ID: &str = "prediction-output";

pub(crate) struct CanvasView {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    output: Option<Element>,
}

impl CanvasView {
    /// Size the canvas backing store to the grid and grab its 2D context
    pub fn attach(
        document: &Document,
        canvas: HtmlCanvasElement,
        config: &CanvasConfig,
    ) -> Result<Self, JsValue> {
        canvas.set_width(config.width);
        canvas.set_height(config.height);

        let context = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into::<CanvasRenderingContext2d>()?;
        context.set_image_smoothing_enabled(false);

        let output = document.get_element_by_id(PREDICTION_OUTPUT_ID);
        if output.is_none() {
            warn!("No #{} element, predictions are only logged", PREDICTION_OUTPUT_ID);
        }

        Ok(Self {
            canvas,
            context,
            output,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Mapping from client coordinates using the canvas' current layout box
    pub fn mapper(&self) -> CoordinateMapper {
        let rect = self.canvas.get_bounding_client_rect();
        CoordinateMapper::new(
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
            self.canvas.width(),
            self.canvas.height(),
        )
    }

    pub fn show_prediction(&self, label: &str) {
        if let Some(output) = &self.output {
            output.set_text_content(Some(&format!("Prediction: {}", label)));
        }
    }
}

impl RenderSink for CanvasView {
    fn present(&mut self, buffer: &PixelBuffer) {
        let rgba = render_rgba(buffer);
        let bytes: &[u8] = bytemuck::cast_slice(&rgba);

        let drawn = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(bytes),
            buffer.width(),
            buffer.height(),
        )
        .and_then(|image| self.context.put_image_data(&image, 0.0, 0.0));

        if let Err(e) = drawn {
            warn!("Failed to draw canvas: {:?}", e);
        }
    }
}
