//! Portrait existence probing. The probe itself is injected; the registry
//! makes sure a name that several containers resolve at once costs one
//! network round trip, not one per container.

use std::cell::RefCell;
use std::collections::HashMap;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

/// Checks whether the resource behind a URL exists. `true` means the
/// resource loaded; failures of any kind are `false`, never an error.
pub trait ResourceProbe {
    fn probe(&self, url: &str) -> LocalBoxFuture<'static, bool>;
}

type SharedProbe = Shared<LocalBoxFuture<'static, bool>>;

/// At most one outstanding probe per occupant name. Concurrent resolvers
/// of the same name await clones of the same future.
#[derive(Default)]
pub struct ProbeRegistry {
    in_flight: RefCell<HashMap<String, SharedProbe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared probe future for `name`, starting one if none is pending.
    pub fn resolve(&self, name: &str, url: &str, probe: &dyn ResourceProbe) -> SharedProbe {
        if let Some(pending) = self.in_flight.borrow().get(name) {
            return pending.clone();
        }
        let shared = probe.probe(url).shared();
        self.in_flight
            .borrow_mut()
            .insert(name.to_string(), shared.clone());
        shared
    }

    /// Forget the pending probe for `name` once its result has been cached.
    pub fn complete(&self, name: &str) {
        self.in_flight.borrow_mut().remove(name);
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.borrow().len()
    }

    pub fn clear(&self) {
        self.in_flight.borrow_mut().clear();
    }
}
