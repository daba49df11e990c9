//! Bidirectional binding between two signals.
//!
//! # Invariants
//!
//! 1. An accepted assignment on either side is forwarded to the other side
//!    through its normal `set`, so the target's own validation still applies.
//! 2. While a forward is in progress, the change it causes on the target is
//!    not forwarded back. Each side's other subscribers see the change once.
//! 3. Construction does not synchronize the two values.
//! 4. Disposing (or dropping) the bridge removes both handlers together.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::event::Subscription;
use crate::signal::Signal;

/// Keeps two [`Signal`]s equal after either one changes.
///
/// ```
/// use imagemark_signal::{Signal, SignalBridge};
///
/// let a = Signal::new(0);
/// let b = Signal::new(0);
/// let _bridge = SignalBridge::new(&a, &b);
///
/// a.set(3);
/// assert_eq!(b.get(), 3);
/// b.set(8);
/// assert_eq!(a.get(), 8);
/// ```
pub struct SignalBridge<T: Clone + PartialEq + 'static> {
    subscriptions: Option<(Subscription, Subscription)>,
    forwarding: Rc<Cell<bool>>,
    _marker: PhantomData<T>,
}

impl<T: Clone + PartialEq + 'static> SignalBridge<T> {
    /// Bind `a` and `b`. The bridge is active immediately.
    pub fn new(a: &Signal<T>, b: &Signal<T>) -> Self {
        let forwarding = Rc::new(Cell::new(false));

        let a_to_b = {
            let target = b.clone();
            let forwarding = Rc::clone(&forwarding);
            a.subscribe(move |value| forward(&forwarding, &target, value))
        };
        let b_to_a = {
            let target = a.clone();
            let forwarding = Rc::clone(&forwarding);
            b.subscribe(move |value| forward(&forwarding, &target, value))
        };

        Self {
            subscriptions: Some((a_to_b, b_to_a)),
            forwarding,
            _marker: PhantomData,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Remove both handlers. Later changes are no longer forwarded.
    pub fn dispose(&mut self) {
        if let Some((a_to_b, b_to_a)) = self.subscriptions.take() {
            a_to_b.unsubscribe();
            b_to_a.unsubscribe();
        }
    }
}

impl<T: Clone + PartialEq + 'static> Drop for SignalBridge<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: Clone + PartialEq + 'static> fmt::Debug for SignalBridge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBridge")
            .field("active", &self.is_active())
            .field("forwarding", &self.forwarding.get())
            .finish()
    }
}

/// Clears the forwarding flag on scope exit, including unwinding.
struct ForwardGuard<'a>(&'a Cell<bool>);

impl Drop for ForwardGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn forward<T: Clone + PartialEq + 'static>(forwarding: &Cell<bool>, target: &Signal<T>, value: &T) {
    if forwarding.get() {
        return;
    }
    forwarding.set(true);
    let _guard = ForwardGuard(forwarding);
    log::trace!("SignalBridge: forwarding change");
    target.set(value.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn counter<T: Clone + PartialEq + 'static>(signal: &Signal<T>) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = Rc::clone(&count);
            signal.subscribe(move |_| count.set(count.get() + 1))
        };
        (count, sub)
    }

    #[test]
    fn change_propagates_once_per_side() {
        let a = Signal::new(0);
        let b = Signal::new(0);
        let (a_count, _a_sub) = counter(&a);
        let (b_count, _b_sub) = counter(&b);
        let _bridge = SignalBridge::new(&a, &b);

        a.set(5);
        assert_eq!(b.get(), 5);
        assert_eq!(a_count.get(), 1);
        assert_eq!(b_count.get(), 1);

        b.set(7);
        assert_eq!(a.get(), 7);
        assert_eq!(a_count.get(), 2);
        assert_eq!(b_count.get(), 2);
    }

    #[test]
    fn construction_does_not_sync() {
        let a = Signal::new(String::from("left"));
        let b = Signal::new(String::from("right"));
        let _bridge = SignalBridge::new(&a, &b);
        assert_eq!(a.get(), "left");
        assert_eq!(b.get(), "right");
    }

    #[test]
    fn target_validation_still_applies() {
        let a = Signal::new(0);
        let b = Signal::new(0).with_validator(|_, new| *new >= 0);
        let (b_count, _b_sub) = counter(&b);
        let _bridge = SignalBridge::new(&a, &b);

        a.set(-3);
        assert_eq!(a.get(), -3);
        assert_eq!(b.get(), 0);
        assert_eq!(b_count.get(), 0);
    }

    #[test]
    fn dispose_stops_forwarding() {
        let a = Signal::new(1);
        let b = Signal::new(1);
        let mut bridge = SignalBridge::new(&a, &b);
        assert_eq!(a.subscriber_count(), 1);
        assert!(bridge.is_active());

        bridge.dispose();
        assert!(!bridge.is_active());
        assert_eq!(a.subscriber_count(), 0);
        assert_eq!(b.subscriber_count(), 0);

        a.set(2);
        assert_eq!(b.get(), 1);
    }

    #[test]
    fn drop_releases_both_sides() {
        let a = Signal::new(1);
        let b = Signal::new(1);
        {
            let _bridge = SignalBridge::new(&a, &b);
        }
        assert_eq!(a.subscriber_count(), 0);
        assert_eq!(b.subscriber_count(), 0);
    }

    #[test]
    fn chained_bridges_reach_fixed_point() {
        let a = Signal::new(0);
        let b = Signal::new(0);
        let c = Signal::new(0);
        let _ab = SignalBridge::new(&a, &b);
        let _bc = SignalBridge::new(&b, &c);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            c.subscribe(move |v| seen.borrow_mut().push(*v))
        };

        a.set(4);
        assert_eq!(c.get(), 4);
        assert_eq!(*seen.borrow(), vec![4]);

        c.set(9);
        assert_eq!(a.get(), 9);
        assert_eq!(b.get(), 9);
    }
}
