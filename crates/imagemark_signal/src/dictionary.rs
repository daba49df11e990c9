//! Observable unique-key map.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::error::SignalError;
use crate::event::{Event, Subscription};
use crate::restore::Restore;

struct DictionaryInner<K: 'static, V: 'static> {
    entries: RefCell<BTreeMap<K, V>>,
    changed: Event<()>,
}

/// A map from unique keys to values that notifies after every successful
/// mutation. Entries enumerate in ascending key order.
pub struct SignalDictionary<K: 'static, V: 'static> {
    inner: Rc<DictionaryInner<K, V>>,
}

impl<K, V> SignalDictionary<K, V>
where
    K: Ord + Clone + fmt::Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self::from_map(BTreeMap::new())
    }

    pub fn from_map(entries: BTreeMap<K, V>) -> Self {
        Self {
            inner: Rc::new(DictionaryInner {
                entries: RefCell::new(entries),
                changed: Event::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Strict lookup.
    pub fn get(&self, key: &K) -> Result<V, SignalError> {
        self.try_get(key).ok_or_else(|| SignalError::KeyNotFound {
            key: format!("{:?}", key),
        })
    }

    /// Non-failing lookup.
    pub fn try_get(&self, key: &K) -> Option<V> {
        self.inner.entries.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.entries.borrow().contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.inner.entries.borrow().values().any(|v| v == value)
    }

    pub fn keys(&self) -> Vec<K> {
        self.inner.entries.borrow().keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<V> {
        self.inner.entries.borrow().values().cloned().collect()
    }

    /// Copy of every key/value pair in key order.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (key, value) in self.inner.entries.borrow().iter() {
            f(key, value);
        }
    }

    /// Borrow the backing map without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&BTreeMap<K, V>) -> R) -> R {
        f(&self.inner.entries.borrow())
    }

    /// Insert a new entry. Fails without notifying if `key` is present.
    pub fn add(&self, key: K, value: V) -> Result<(), SignalError> {
        {
            let mut entries = self.inner.entries.borrow_mut();
            if entries.contains_key(&key) {
                return Err(SignalError::DuplicateKey {
                    key: format!("{:?}", key),
                });
            }
            entries.insert(key, value);
        }
        self.notify();
        Ok(())
    }

    /// Insert or overwrite. Notifies unless the key already mapped to an
    /// equal value; returns whether it notified.
    pub fn set(&self, key: K, value: V) -> bool {
        {
            let mut entries = self.inner.entries.borrow_mut();
            if entries.get(&key) == Some(&value) {
                return false;
            }
            entries.insert(key, value);
        }
        self.notify();
        true
    }

    /// Replace the whole contents. Notifies only when they differ.
    pub fn set_all(&self, entries: BTreeMap<K, V>) -> bool {
        {
            let mut current = self.inner.entries.borrow_mut();
            if *current == entries {
                return false;
            }
            *current = entries;
        }
        self.notify();
        true
    }

    /// Mutate the value under `key` in place, notifying once. Returns `false`
    /// without notifying when the key is absent.
    pub fn update(&self, key: &K, f: impl FnOnce(&mut V)) -> bool {
        {
            let mut entries = self.inner.entries.borrow_mut();
            let Some(value) = entries.get_mut(key) else {
                return false;
            };
            f(value);
        }
        self.notify();
        true
    }

    /// Mutate the value under `key`, inserting `default()` first when the key
    /// is absent. Always notifies once.
    pub fn upsert_with(&self, key: K, default: impl FnOnce() -> V, f: impl FnOnce(&mut V)) {
        {
            let mut entries = self.inner.entries.borrow_mut();
            f(entries.entry(key).or_insert_with(default));
        }
        self.notify();
    }

    /// Remove the entry for `key`. Returns whether one existed; nothing is
    /// emitted otherwise.
    pub fn remove(&self, key: &K) -> bool {
        let removed = self.inner.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.notify();
        }
        removed
    }

    /// Remove every entry. Clearing an empty dictionary emits nothing.
    pub fn clear(&self) {
        {
            let mut entries = self.inner.entries.borrow_mut();
            if entries.is_empty() {
                return;
            }
            entries.clear();
        }
        self.notify();
    }

    /// Notify subscribers without changing anything.
    pub fn force_change(&self) {
        self.notify();
    }

    pub fn subscribe(&self, handler: impl Fn() + 'static) -> Subscription {
        self.inner.changed.subscribe(move |_| handler())
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.subscriber_count()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self) {
        self.inner.changed.emit(&());
    }
}

impl<K, V> Default for SignalDictionary<K, V>
where
    K: Ord + Clone + fmt::Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: 'static, V: 'static> Clone for SignalDictionary<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: fmt::Debug + 'static, V: fmt::Debug + 'static> fmt::Debug for SignalDictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalDictionary")
            .field("entries", &*self.inner.entries.borrow())
            .field("subscribers", &self.inner.changed.subscriber_count())
            .finish()
    }
}

impl<K, V> Restore for SignalDictionary<K, V>
where
    K: Ord + Clone + fmt::Debug + 'static,
    V: Clone + PartialEq + 'static,
{
    type Snapshot = BTreeMap<K, V>;

    fn snapshot(&self) -> BTreeMap<K, V> {
        self.inner.entries.borrow().clone()
    }

    fn restore(&self, snapshot: BTreeMap<K, V>) {
        *self.inner.entries.borrow_mut() = snapshot;
    }
}

impl<K: Serialize + 'static, V: Serialize + 'static> Serialize for SignalDictionary<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.entries.borrow().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counted(dict: &SignalDictionary<String, i32>) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = Rc::clone(&count);
            dict.subscribe(move || count.set(count.get() + 1))
        };
        (count, sub)
    }

    #[test]
    fn add_rejects_duplicate_keys() {
        let dict = SignalDictionary::new();
        let (count, _sub) = counted(&dict);

        dict.add("a".to_string(), 1).unwrap();
        let err = dict.add("a".to_string(), 2).unwrap_err();
        assert!(matches!(err, SignalError::DuplicateKey { .. }));
        assert_eq!(dict.get(&"a".to_string()).unwrap(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn remove_absent_key_is_silent() {
        let dict = SignalDictionary::new();
        dict.add("a".to_string(), 1).unwrap();
        let (count, _sub) = counted(&dict);

        assert!(!dict.remove(&"missing".to_string()));
        assert_eq!(count.get(), 0);
        assert!(dict.remove(&"a".to_string()));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn lookups_never_notify() {
        let dict = SignalDictionary::new();
        dict.set("b".to_string(), 2);
        dict.set("a".to_string(), 1);
        let (count, _sub) = counted(&dict);

        assert!(dict.contains_key(&"a".to_string()));
        assert!(dict.contains_value(&2));
        assert_eq!(dict.try_get(&"z".to_string()), None);
        assert!(matches!(
            dict.get(&"z".to_string()),
            Err(SignalError::KeyNotFound { .. })
        ));
        assert_eq!(dict.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(dict.values(), vec![1, 2]);
        assert_eq!(dict.len(), 2);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn set_skips_equal_values() {
        let dict = SignalDictionary::new();
        let (count, _sub) = counted(&dict);

        assert!(dict.set("a".to_string(), 1));
        assert!(!dict.set("a".to_string(), 1));
        assert!(dict.set("a".to_string(), 2));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn update_and_upsert_notify_once() {
        let dict = SignalDictionary::new();
        let (count, _sub) = counted(&dict);

        assert!(!dict.update(&"a".to_string(), |v| *v += 1));
        assert_eq!(count.get(), 0);

        dict.upsert_with("a".to_string(), || 10, |v| *v += 1);
        assert_eq!(dict.try_get(&"a".to_string()), Some(11));
        assert!(dict.update(&"a".to_string(), |v| *v *= 2));
        assert_eq!(dict.try_get(&"a".to_string()), Some(22));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn clear_notifies_only_when_non_empty() {
        let dict = SignalDictionary::new();
        dict.set("a".to_string(), 1);
        dict.set("b".to_string(), 2);
        let (count, _sub) = counted(&dict);
        dict.clear();
        assert!(dict.is_empty());
        assert_eq!(count.get(), 1);

        dict.clear();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let dict = SignalDictionary::new();
        dict.set("b".to_string(), 2);
        dict.set("a".to_string(), 1);
        assert_eq!(serde_json::to_string(&dict).unwrap(), r#"{"a":1,"b":2}"#);
    }
}
