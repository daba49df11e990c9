//! Payload events and subscriber handles.
//!
//! [`Event`] is the notification channel underneath every primitive in this
//! crate. Handlers are invoked synchronously, in subscription order, on the
//! thread that calls [`Event::emit`].

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<A> = Rc<dyn Fn(&A)>;

struct Slots<A: 'static> {
    next_id: u64,
    handlers: Vec<(u64, Handler<A>)>,
}

/// A synchronous, multi-subscriber notification channel.
///
/// Clones share the same subscriber list.
pub struct Event<A: 'static> {
    slots: Rc<RefCell<Slots<A>>>,
}

impl<A: 'static> Event<A> {
    /// Create an event with no subscribers.
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register a handler. It stays installed until the returned
    /// [`Subscription`] is dropped or explicitly unsubscribed.
    pub fn subscribe(&self, handler: impl Fn(&A) + 'static) -> Subscription {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.handlers.push((id, Rc::new(handler)));
            id
        };

        let weak: Weak<RefCell<Slots<A>>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.borrow_mut().handlers.retain(|(slot, _)| *slot != id);
            }
        })
    }

    /// Invoke every handler with `payload`.
    ///
    /// The handler list is copied before the first call, so handlers may
    /// subscribe, unsubscribe or re-emit. Changes to the list take effect on
    /// the next emission.
    pub fn emit(&self, payload: &A) {
        let handlers: Vec<Handler<A>> = self
            .slots
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            handler(payload);
        }
    }

    /// Number of installed handlers.
    pub fn subscriber_count(&self) -> usize {
        self.slots.borrow().handlers.len()
    }
}

impl<A: 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Clone for Event<A> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<A: 'static> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle to an installed handler.
///
/// Dropping the handle removes the handler. The removal is a no-op if the
/// event itself is already gone.
#[must_use = "dropping a Subscription removes the handler immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Remove the handler now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Whether the handler is still installed through this handle.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn handlers_run_in_subscription_order() {
        let event = Event::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let log = Rc::clone(&log);
            event.subscribe(move |v| log.borrow_mut().push(("first", *v)))
        };
        let second = {
            let log = Rc::clone(&log);
            event.subscribe(move |v| log.borrow_mut().push(("second", *v)))
        };

        event.emit(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
        drop((first, second));
    }

    #[test]
    fn dropping_subscription_removes_handler() {
        let event = Event::<()>::new();
        let count = Rc::new(Cell::new(0));

        let sub = {
            let count = Rc::clone(&count);
            event.subscribe(move |_| count.set(count.get() + 1))
        };
        event.emit(&());
        assert_eq!(event.subscriber_count(), 1);

        drop(sub);
        event.emit(&());
        assert_eq!(count.get(), 1);
        assert_eq!(event.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_is_explicit_release() {
        let event = Event::<()>::new();
        let sub = event.subscribe(|_| {});
        assert!(sub.is_active());
        sub.unsubscribe();
        assert_eq!(event.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outlives_event() {
        let event = Event::<()>::new();
        let sub = event.subscribe(|_| {});
        drop(event);
        // Releasing against a dropped event must not panic.
        drop(sub);
    }

    #[test]
    fn handler_may_reemit() {
        let event = Event::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let _sub = {
            let event = event.clone();
            let seen = Rc::clone(&seen);
            event.clone().subscribe(move |v| {
                seen.borrow_mut().push(*v);
                if *v > 0 {
                    event.emit(&(v - 1));
                }
            })
        };

        event.emit(&2);
        assert_eq!(*seen.borrow(), vec![2, 1, 0]);
    }
}
