//! Page bindings for the web build.
//!
//! The modal and the on-screen d-pad are plain HTML around the canvas. The
//! modal is driven through [`DomModal`]; d-pad presses, the modal's exit
//! button and page-wide key presses are forwarded into the event loop as
//! [`PortfolioEvent`]s.

use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent};

use crate::{
    character::Direction,
    flow::EventSender,
    input::Command,
    modal::{ModalView, ProjectInfo},
    portfolio::PortfolioEvent,
};

const HIDDEN: &str = "hidden";
const PRESSED: &str = "pressed";

fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

fn select(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(Some(element)) => Some(element),
        _ => {
            log::warn!("No {} element in the page.", selector);
            None
        }
    }
}

fn set_class(element: &Element, class: &str, on: bool) {
    let result = if on {
        element.class_list().add_1(class)
    } else {
        element.class_list().remove_1(class)
    };
    if let Err(e) = result {
        log::warn!("Cannot toggle class {}: {:?}", class, e);
    }
}

#[derive(Debug)]
pub struct DomModal {
    modal: Element,
    title: Element,
    description: Element,
    visit: Element,
}

impl DomModal {
    /// `None` (after logging what is missing) unless all modal elements exist.
    pub fn bind() -> Option<Self> {
        let document = document()?;
        Some(Self {
            modal: select(&document, ".modal")?,
            title: select(&document, ".modal-title")?,
            description: select(&document, ".modal-project-description")?,
            visit: select(&document, ".modal-visit-button")?,
        })
    }
}

impl ModalView for DomModal {
    fn present(&mut self, project: &ProjectInfo) {
        self.title.set_text_content(Some(&project.title));
        self.description.set_text_content(Some(&project.content));
        match &project.link {
            Some(link) => {
                if let Err(e) = self.visit.set_attribute("href", link) {
                    log::warn!("Cannot set the visit link: {:?}", e);
                }
                set_class(&self.visit, HIDDEN, false);
            }
            None => set_class(&self.visit, HIDDEN, true),
        }
        set_class(&self.modal, HIDDEN, false);
    }

    fn dismiss(&mut self) {
        set_class(&self.modal, HIDDEN, true);
    }
}

/// Owns the registered listeners. They stop working once this is dropped.
pub struct DomBindings {
    _listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl std::fmt::Debug for DomBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomBindings")
            .field("listeners", &self._listeners.len())
            .finish()
    }
}

fn listen(
    target: &EventTarget,
    events: &[&str],
    listeners: &mut Vec<Closure<dyn FnMut(Event)>>,
    handler: impl FnMut(Event) + Clone + 'static,
) {
    for event in events {
        let closure = Closure::<dyn FnMut(Event)>::new(handler.clone());
        if let Err(e) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("Cannot listen to {}: {:?}", event, e);
            continue;
        }
        listeners.push(closure);
    }
}

/// Wires key presses, the exit button and the d-pad buttons to `sender`.
///
/// Keys are read from the window rather than the canvas, which loses focus
/// as soon as a modal button is clicked.
pub fn bind_controls(sender: EventSender<(), PortfolioEvent>) -> Option<DomBindings> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let mut listeners = Vec::new();

    {
        let sender = sender.clone();
        listen(&window, &["keydown"], &mut listeners, move |event: Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            if let Some(command) = Command::from_key_name(&key) {
                // arrow keys would scroll the page
                event.prevent_default();
                sender.send(PortfolioEvent::Key(command));
            }
        });
    }

    if let Some(exit) = select(&document, ".modal-exit-button") {
        let sender = sender.clone();
        listen(&exit, &["click"], &mut listeners, move |_| {
            sender.send(PortfolioEvent::CloseModal);
        });
    }

    let buttons = match document.query_selector_all(".dpad-btn") {
        Ok(buttons) => buttons,
        Err(e) => {
            log::warn!("Cannot look up the d-pad: {:?}", e);
            return Some(DomBindings {
                _listeners: listeners,
            });
        }
    };
    for index in 0..buttons.length() {
        let Some(button) = buttons
            .get(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let Some(direction) = button
            .dataset()
            .get("direction")
            .as_deref()
            .and_then(Direction::from_dpad)
        else {
            log::warn!("D-pad button without a valid data-direction.");
            continue;
        };

        let pressed = {
            let sender = sender.clone();
            let button: Element = button.clone().into();
            move |event: Event| {
                event.prevent_default();
                set_class(&button, PRESSED, true);
                sender.send(PortfolioEvent::Dpad(direction));
            }
        };
        let released = {
            let button: Element = button.clone().into();
            move |_: Event| set_class(&button, PRESSED, false)
        };
        listen(&button, &["touchstart", "mousedown"], &mut listeners, pressed);
        listen(
            &button,
            &["touchend", "mouseup", "mouseleave"],
            &mut listeners,
            released,
        );
    }

    log::info!("Bound {} page listeners.", listeners.len());
    Some(DomBindings {
        _listeners: listeners,
    })
}
