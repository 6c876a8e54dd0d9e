//! Devices never hold references to each other.  Cross-device effects are
//! expressed as notifications: a device keeps one `Subscribers` list per
//! notification it emits, and the driver subscribes closures to them.
//!
//! Dispatch is synchronous.  Each handler receives the emitting device
//! mutably, so a handler may call straight back into that device (for
//! example, seizing a processor from its own idle notification) before the
//! emitting operation returns.

use std::fmt;

use crate::utils::errors::SimulationError;

/// A notification handler, invoked with the emitting device and the
/// notification payload.
pub type Handler<D, A> = Box<dyn FnMut(&mut D, A) -> Result<(), SimulationError>>;

/// Identifies one subscription, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Subscribers<D, A> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<D, A>)>,
    detached: Vec<SubscriptionId>,
    dispatch_depth: usize,
}

impl<D, A> Default for Subscribers<D, A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
            detached: Vec::new(),
            dispatch_depth: 0,
        }
    }
}

impl<D, A> fmt::Debug for Subscribers<D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("handlers", &self.handlers.len())
            .field("dispatch_depth", &self.dispatch_depth)
            .finish()
    }
}

impl<D, A: Copy> Subscribers<D, A> {
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut D, A) -> Result<(), SimulationError> + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription.  When called from inside a running dispatch,
    /// the removal takes effect immediately for handlers not yet invoked.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        if self.handlers.len() == before && self.dispatch_depth > 0 {
            self.detached.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke every handler, in subscription order, with `device` and
    /// `payload`.  The handler list is detached from the device for the
    /// duration of the dispatch, which is what allows handlers to borrow the
    /// device mutably.  The first handler error ends the dispatch.
    pub(crate) fn dispatch(
        device: &mut D,
        subscribers: fn(&mut D) -> &mut Self,
        payload: A,
    ) -> Result<(), SimulationError> {
        let mut active = {
            let list = subscribers(device);
            list.dispatch_depth += 1;
            std::mem::take(&mut list.handlers)
        };
        let mut outcome = Ok(());
        for (id, handler) in active.iter_mut() {
            if subscribers(device).detached.contains(id) {
                continue;
            }
            if let Err(error) = handler(device, payload) {
                outcome = Err(error);
                break;
            }
        }
        let list = subscribers(device);
        list.dispatch_depth -= 1;
        active.append(&mut list.handlers);
        if list.dispatch_depth == 0 {
            let detached = std::mem::take(&mut list.detached);
            active.retain(|(id, _)| !detached.contains(id));
        }
        list.handlers = active;
        outcome
    }
}
