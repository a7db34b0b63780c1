//! A small typed event bus the selection model uses to notify observers
//! (a GUI layer, in the intended host) of state changes, without the model
//! needing to know anything about who's listening.

use crate::selection::SelectionState;

/// Events fired by a [`crate::selection::SelectionModel`]. Each variant
/// corresponds to one of the model's observable properties.
#[derive(Debug, Clone)]
pub enum Event {
    State {
        old: SelectionState,
        new: SelectionState,
    },
    Selection,
    Image,
    Progress(u8),
    PendingPaths,
}

/// A registry of listener closures, invoked in subscription order whenever
/// [`Observers::fire`] is called.
#[derive(Default)]
pub struct Observers {
    listeners: Vec<Box<dyn FnMut(&Event)>>,
}

impl Observers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn fire(&mut self, event: Event) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fires_listeners_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();

        let log1 = log.clone();
        observers.subscribe(move |_| log1.borrow_mut().push(1));
        let log2 = log.clone();
        observers.subscribe(move |_| log2.borrow_mut().push(2));

        observers.fire(Event::Image);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }
}
