//! Observable scalar value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::event::{Event, Subscription};
use crate::restore::Restore;

type Validator<T> = Rc<dyn Fn(&T, &T) -> bool>;
type Processor<T> = Rc<dyn Fn(T) -> T>;

struct SignalInner<T: 'static> {
    value: RefCell<T>,
    use_validation: Cell<bool>,
    validator: RefCell<Option<Validator<T>>>,
    processor: RefCell<Option<Processor<T>>>,
    changed: Event<T>,
}

/// A single observable value.
///
/// Assigning through [`Signal::set`] runs the processor, then the validation
/// gate, and only then stores the value and notifies subscribers with it. The
/// default gate accepts a value that differs from the current one, so setting
/// an equal value is a silent no-op.
///
/// ```
/// use imagemark_signal::Signal;
///
/// let zoom = Signal::new(1.0_f32);
/// assert!(zoom.set(2.0));
/// assert!(!zoom.set(2.0));
/// assert_eq!(zoom.get(), 2.0);
/// ```
pub struct Signal<T: 'static> {
    inner: Rc<SignalInner<T>>,
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Create a signal holding `value`. No notification is emitted.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                use_validation: Cell::new(true),
                validator: RefCell::new(None),
                processor: RefCell::new(None),
                changed: Event::new(),
            }),
        }
    }

    /// Replace the equality gate with a custom predicate `(current, new)`.
    pub fn with_validator(self, validator: impl Fn(&T, &T) -> bool + 'static) -> Self {
        *self.inner.validator.borrow_mut() = Some(Rc::new(validator));
        self
    }

    /// Install a preprocessing step applied to every incoming value before it
    /// is validated. The current value is processed once, silently.
    pub fn with_processor(self, processor: impl Fn(T) -> T + 'static) -> Self {
        let processor: Processor<T> = Rc::new(processor);
        let current = self.get();
        *self.inner.value.borrow_mut() = processor(current);
        *self.inner.processor.borrow_mut() = Some(processor);
        self
    }

    /// Builder form of [`Signal::set_use_validation`].
    pub fn with_validation(self, enabled: bool) -> Self {
        self.set_use_validation(enabled);
        self
    }

    /// When disabled, every `set` stores and notifies, even for equal values.
    pub fn set_use_validation(&self, enabled: bool) {
        self.inner.use_validation.set(enabled);
    }

    pub fn use_validation(&self) -> bool {
        self.inner.use_validation.get()
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// `f` must not call `set` on this signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Assign a new value.
    ///
    /// Returns whether the value passed validation and was stored. A rejected
    /// value leaves the signal untouched and notifies nobody.
    pub fn set(&self, value: T) -> bool {
        let value = self.process(value);
        if self.inner.use_validation.get() && !self.validate(&value) {
            return false;
        }

        *self.inner.value.borrow_mut() = value.clone();
        self.inner.changed.emit(&value);
        true
    }

    /// Store `value` without processing, validation or notification.
    pub fn init_value(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
    }

    /// Notify every subscriber with the current value.
    pub fn force_change(&self) {
        let value = self.get();
        self.inner.changed.emit(&value);
    }

    /// Subscribe to accepted assignments and forced changes.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        self.inner.changed.subscribe(handler)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.subscriber_count()
    }

    /// Whether both handles point at the same signal.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn process(&self, value: T) -> T {
        let processor = self.inner.processor.borrow().clone();
        match processor {
            Some(processor) => processor(value),
            None => value,
        }
    }

    fn validate(&self, value: &T) -> bool {
        let validator = self.inner.validator.borrow().clone();
        let current = self.inner.value.borrow();
        match validator {
            Some(validator) => validator(&current, value),
            None => *current != *value,
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.changed.subscriber_count())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Restore for Signal<T> {
    type Snapshot = T;

    fn snapshot(&self) -> T {
        self.get()
    }

    fn restore(&self, snapshot: T) {
        self.init_value(snapshot);
    }
}

/// Serializes the value only.
impl<T: Serialize + 'static> Serialize for Signal<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.value.borrow().serialize(serializer)
    }
}
