//! Observable primitives for the imagemark document model.
//!
//! Every primitive is a cheap, clonable handle around shared single-threaded
//! state (`Rc<RefCell<..>>`). Cloning a handle never copies the data; all
//! clones observe and mutate the same value.
//!
//! - [`Event`]: a payload-carrying notification channel.
//! - [`Subscription`]: RAII handle returned by every `subscribe` call.
//! - [`Signal`]: a single value with a validation gate before notification.
//! - [`SignalList`]: an ordered list with the full `Vec`-like mutation surface.
//! - [`SignalDictionary`]: a unique-key map, enumerated in key order.
//! - [`SignalBridge`]: keeps two signals equal in both directions.
//!
//! # Invariants
//!
//! 1. Each successful mutating call emits exactly one notification, after the
//!    backing storage has been updated, no matter how many elements it touched.
//! 2. Calls that leave the contents unchanged (removing an absent element or
//!    key, `remove_all` matching nothing, an empty range or batch, clearing an
//!    empty container, setting an equal value) emit nothing.
//! 3. Reads never notify.
//! 4. No borrow is held while subscribers run, so a subscriber may read or
//!    mutate the primitive that notified it.
//! 5. [`Restore::restore`] replaces contents without notifying; callers pair it
//!    with an explicit `force_change` once the whole model is consistent.

mod bridge;
mod dictionary;
mod error;
mod event;
mod list;
mod restore;
mod signal;

#[cfg(test)]
mod tests;

pub use bridge::SignalBridge;
pub use dictionary::SignalDictionary;
pub use error::SignalError;
pub use event::{Event, Subscription};
pub use list::SignalList;
pub use restore::Restore;
pub use signal::Signal;
