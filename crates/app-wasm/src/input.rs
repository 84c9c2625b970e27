//! DOM event listeners for mouse, touch, keyboard and buttons

use std::rc::Rc;

use scribble_ipc::{KeyboardEvent, Modifiers, PointerEvent, PointerPhase, UiToCanvas};
use wasm_bindgen::prelude::*;
use web_sys::{Document, MouseEvent, TouchEvent};

use crate::page::Page;

const MOUSE_EVENTS: [(&str, PointerPhase); 4] = [
    ("mousedown", PointerPhase::Down),
    ("mousemove", PointerPhase::Move),
    ("mouseup", PointerPhase::Up),
    ("mouseleave", PointerPhase::Leave),
];

const TOUCH_EVENTS: [(&str, PointerPhase); 4] = [
    ("touchstart", PointerPhase::Down),
    ("touchmove", PointerPhase::Move),
    ("touchend", PointerPhase::Up),
    ("touchcancel", PointerPhase::Leave),
];

const BUTTONS: [(&str, UiToCanvas); 2] = [
    ("undo-button", UiToCanvas::Undo),
    ("clear-button", UiToCanvas::Clear),
];

/// Register every listener. Closures are leaked; they live as long as the page.
pub(crate) fn install(page: &Rc<Page>, document: &Document) -> Result<(), JsValue> {
    let canvas = page.canvas();

    for (name, phase) in MOUSE_EVENTS {
        let page = Rc::clone(page);
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            page.pointer(&mouse_event(phase, &event));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    for (name, phase) in TOUCH_EVENTS {
        let page = Rc::clone(page);
        let closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            // Keep the page from scrolling while drawing
            event.prevent_default();
            page.pointer(&touch_event(phase, &event));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let keys = Rc::clone(page);
    let closure = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        if keys.key(&keyboard_event(&event)) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();

    for (id, command) in BUTTONS {
        let Some(button) = document.get_element_by_id(id) else {
            continue;
        };
        let page = Rc::clone(page);
        let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            page.command(&command);
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn mouse_event(phase: PointerPhase, event: &MouseEvent) -> PointerEvent {
    PointerEvent::at(phase, event.client_x() as f32, event.client_y() as f32)
}

/// First active touch; none on touchend/touchcancel
fn touch_event(phase: PointerPhase, event: &TouchEvent) -> PointerEvent {
    let position = event
        .touches()
        .get(0)
        .map(|touch| [touch.client_x() as f32, touch.client_y() as f32]);
    PointerEvent::new(phase, position)
}

fn keyboard_event(event: &web_sys::KeyboardEvent) -> KeyboardEvent {
    KeyboardEvent {
        key: event.key(),
        pressed: true,
        modifiers: Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
    }
}
