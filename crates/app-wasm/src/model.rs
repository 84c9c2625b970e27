//! Model weight download

use std::rc::Rc;

use scribble_classifier::{ClassifierError, CnnClassifier, CnnConfig};
use scribble_ipc::CanvasToUi;
use thiserror::Error;
use tracing::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::Response;

use crate::bridge::send_to_ui;
use crate::page::Page;

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("HTTP {0}")]
    Http(u16),

    #[error(transparent)]
    Model(#[from] ClassifierError),
}

impl From<JsValue> for LoadError {
    fn from(value: JsValue) -> Self {
        LoadError::Fetch(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// Fetch and build the classifier in the background
///
/// Strokes drawn before the model arrives are not classified.
pub(crate) fn spawn_load(page: Rc<Page>, url: String, config: CnnConfig) {
    spawn_local(async move {
        match load(&url, config).await {
            Ok(model) => {
                info!("Model loaded from {}", url);
                page.set_model(model);
                send_to_ui(&CanvasToUi::ModelStatus {
                    ready: true,
                    message: None,
                });
            }
            Err(e) => {
                error!("Failed to load model from {}: {}", url, e);
                send_to_ui(&CanvasToUi::ModelStatus {
                    ready: false,
                    message: Some(e.to_string()),
                });
            }
        }
    });
}

async fn load(url: &str, config: CnnConfig) -> Result<CnnClassifier, LoadError> {
    let bytes = fetch_bytes(url).await?;
    Ok(CnnClassifier::from_safetensors(bytes, config)?)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::Fetch("no global window".into()))?;

    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(LoadError::Http(response.status()));
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
