//! JavaScript bridge for page UI messages
//!
//! Messages are passed as JSON in CustomEvents on the window object, so page
//! scripts can drive undo/clear and observe predictions without calling into
//! the module directly.

use std::rc::Rc;

use scribble_ipc::{CANVAS_TO_UI_EVENT, CanvasToUi, UI_TO_CANVAS_EVENT, parse_ui_message, to_json};
use tracing::{error, warn};
use wasm_bindgen::prelude::*;

use crate::page::Page;

/// Listen for UI -> canvas messages
pub(crate) fn listen(page: &Rc<Page>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    let page = Rc::clone(page);

    let closure = Closure::wrap(Box::new(move |event: web_sys::CustomEvent| {
        let Some(detail) = event.detail().as_string() else {
            warn!("UI message without a string detail");
            return;
        };
        match parse_ui_message(&detail) {
            Ok(msg) => page.command(&msg),
            Err(e) => {
                warn!("Failed to parse UI message: {}", e);
                send_to_ui(&CanvasToUi::Error {
                    code: "invalid_message".into(),
                    message: e.to_string(),
                });
            }
        }
    }) as Box<dyn FnMut(_)>);

    window.add_event_listener_with_callback(UI_TO_CANVAS_EVENT, closure.as_ref().unchecked_ref())?;

    // Listener lives as long as the page
    closure.forget();
    Ok(())
}

/// Send a message to the page UI
pub(crate) fn send_to_ui(msg: &CanvasToUi) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let json = match to_json(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize canvas message: {}", e);
            return;
        }
    };

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&json));

    let dispatched = web_sys::CustomEvent::new_with_event_init_dict(CANVAS_TO_UI_EVENT, &init)
        .and_then(|event| window.dispatch_event(&event));
    if let Err(e) = dispatched {
        warn!("Failed to dispatch {}: {:?}", CANVAS_TO_UI_EVENT, e);
    }
}
