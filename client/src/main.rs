mod dom_host;
mod logging;
mod platform;
mod probe;
mod settings;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use pion_engine::Engine;
use pion_shared::config::{INIT_DELAY_MS, SECONDARY_DELAY_MS};

use crate::dom_host::DomTree;
use crate::platform::WebPlatform;
use crate::probe::ImageProbe;
use crate::storage::LocalPrefs;

thread_local! {
    static ENGINE: RefCell<Option<Rc<Engine<DomTree>>>> = const { RefCell::new(None) };
    static BOOT_TIMERS: RefCell<Vec<Timeout>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn with_engine(f: impl FnOnce(&Rc<Engine<DomTree>>)) {
    ENGINE.with(|slot| {
        if let Some(engine) = slot.borrow().as_ref() {
            f(engine);
        }
    });
}

fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(host) = DomTree::new(window.clone()) else {
        return;
    };

    let engine = Engine::new(
        host,
        Rc::new(ImageProbe),
        Rc::new(LocalPrefs),
        Rc::new(WebPlatform::new(window)),
    );
    ENGINE.with(|slot| {
        // If main() is re-entered, tear the old engine down so stale
        // timers can't keep mutating the page.
        if let Some(previous) = slot.borrow_mut().take() {
            previous.dispose();
        }
        *slot.borrow_mut() = Some(Rc::clone(&engine));
    });

    // The board keeps building itself well after page load: first pass
    // after a settle delay, then one more forced pass for late arrivals.
    let first = Rc::clone(&engine);
    let initial = Timeout::new(INIT_DELAY_MS, move || {
        first.init();
        first.spawn_pass(true);
    });
    let late = Timeout::new(INIT_DELAY_MS + SECONDARY_DELAY_MS, move || {
        engine.spawn_pass(true);
    });
    BOOT_TIMERS.with(|timers| {
        let mut timers = timers.borrow_mut();
        // Fired timeouts from a previous entry are dead weight; a pending
        // one belongs to the engine we just disposed.
        timers.clear();
        timers.push(initial);
        timers.push(late);
    });
}
