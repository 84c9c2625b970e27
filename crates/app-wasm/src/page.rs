//! Shared page state owned by the event listener closures

use std::cell::RefCell;
use std::rc::Rc;

use painting::SurfaceResponse;
use scribble_classifier::{CnnClassifier, Prediction};
use scribble_ipc::{CanvasToUi, KeyboardEvent, PointerEvent, UiToCanvas};
use tracing::info;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;

use crate::app::CanvasApp;
use crate::bridge::send_to_ui;
use crate::view::CanvasView;

pub(crate) struct Page {
    app: RefCell<CanvasApp>,
    view: RefCell<CanvasView>,
    model: RefCell<Option<Rc<CnnClassifier>>>,
}

impl Page {
    pub fn new(app: CanvasApp, view: CanvasView) -> Rc<Self> {
        Rc::new(Self {
            app: RefCell::new(app),
            view: RefCell::new(view),
            model: RefCell::new(None),
        })
    }

    pub fn canvas(&self) -> HtmlCanvasElement {
        self.view.borrow().canvas().clone()
    }

    pub fn pointer(self: &Rc<Self>, event: &PointerEvent) {
        let mapper = self.view.borrow().mapper();
        let response = self.app.borrow_mut().pointer(event, &mapper);
        self.respond(response);
    }

    /// Returns true if the key was handled
    pub fn key(self: &Rc<Self>, event: &KeyboardEvent) -> bool {
        let response = self.app.borrow_mut().key(event);
        match response {
            Some(response) => {
                self.respond(response);
                true
            }
            None => false,
        }
    }

    pub fn command(self: &Rc<Self>, msg: &UiToCanvas) {
        let response = self.app.borrow_mut().command(msg);
        self.respond(response);
    }

    pub fn set_model(&self, model: CnnClassifier) {
        *self.model.borrow_mut() = Some(Rc::new(model));
    }

    /// Redraw the whole canvas
    pub fn render(&self) {
        let app = self.app.borrow();
        app.surface().render_to(&mut *self.view.borrow_mut());
    }

    fn respond(self: &Rc<Self>, response: SurfaceResponse) {
        if response.render {
            self.render();
            notify_history(&self.app, send_to_ui);
        }
        if response.classify {
            self.classify();
        }
    }

    /// Classify the current drawing in a spawned task
    ///
    /// The prediction is shown only if no newer request was issued while the
    /// model was running.
    fn classify(self: &Rc<Self>) {
        let (drawing, dispatcher) = {
            let app = self.app.borrow();
            (app.classifier_input(), app.dispatcher().clone())
        };
        let model = self.model.borrow().clone();
        let page = Rc::clone(self);

        spawn_local(async move {
            let Some(prediction) = dispatcher.classify(&model, &drawing).await else {
                return;
            };
            if dispatcher.apply(&prediction) {
                page.show_prediction(&prediction);
            }
        });
    }

    // UI listeners may call back into the page, so nothing is borrowed while sending
    fn show_prediction(&self, prediction: &Prediction) {
        let update = prediction.to_update(self.app.borrow().config());
        info!("Prediction: {} ({:?})", update.label, update.source);
        self.view.borrow().show_prediction(&update.label);
        send_to_ui(&CanvasToUi::Prediction(update));
    }
}

/// Send the undo level once the app borrow is released
fn notify_history(app: &RefCell<CanvasApp>, send: impl FnOnce(&CanvasToUi)) {
    let msg = app.borrow().history_message();
    send(&msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use painting::CoordinateMapper;
    use scribble_config::CanvasConfig;
    use scribble_ipc::{PointerEvent, PointerPhase};

    #[test]
    fn test_history_listener_can_reenter() {
        let mut app = CanvasApp::new(CanvasConfig::new(32, 32)).unwrap();
        let mapper = CoordinateMapper::identity(32, 32);
        app.pointer(&PointerEvent::at(PointerPhase::Down, 8.0, 8.0), &mapper);
        app.pointer(&PointerEvent::at(PointerPhase::Up, 8.0, 8.0), &mapper);
        let app = RefCell::new(app);

        let mut seen = None;
        notify_history(&app, |msg| {
            seen = Some(msg.clone());
            // A listener pressing "clear" in response
            app.borrow_mut().command(&UiToCanvas::Clear);
        });

        assert!(matches!(seen, Some(CanvasToUi::HistoryChanged { undo_levels: 1 })));
        assert!(app.borrow().surface().buffer().is_blank());
    }
}
