//! Observable ordered list.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::error::SignalError;
use crate::event::{Event, Subscription};
use crate::restore::Restore;

struct ListInner<T: 'static> {
    items: RefCell<Vec<T>>,
    changed: Event<()>,
}

/// An ordered, index-addressable list that notifies after every mutation.
///
/// Notifications carry no payload; subscribers re-read the list. Bulk
/// operations (`extend`, `remove_range`, `sort`, ...) notify once per call.
///
/// Closures passed to predicates and comparators run while the list is
/// borrowed and must not touch the list itself.
pub struct SignalList<T: 'static> {
    inner: Rc<ListInner<T>>,
}

impl<T: Clone + PartialEq + 'static> SignalList<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a list with initial contents. No notification is emitted.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(ListInner {
                items: RefCell::new(items),
                changed: Event::new(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Result<T, SignalError> {
        let items = self.inner.items.borrow();
        SignalError::check_index(index, items.len())?;
        Ok(items[index].clone())
    }

    /// Borrow the elements without cloning them.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.borrow())
    }

    /// Copy of the elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    /// Copy of `count` elements starting at `index`.
    pub fn get_range(&self, index: usize, count: usize) -> Result<Vec<T>, SignalError> {
        let items = self.inner.items.borrow();
        SignalError::check_range(index, count, items.len())?;
        Ok(items[index..index + count].to_vec())
    }

    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        for item in self.inner.items.borrow().iter() {
            f(item);
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.inner.items.borrow().contains(item)
    }

    /// Position of the first occurrence of `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.inner.items.borrow().iter().position(|x| x == item)
    }

    /// Position of the first occurrence of `item` at or after `start`.
    pub fn index_of_from(&self, item: &T, start: usize) -> Result<Option<usize>, SignalError> {
        let len = self.len();
        SignalError::check_range(start, 0, len)?;
        self.index_of_range(item, start, len - start)
    }

    /// Position of the first occurrence of `item` within
    /// `start..start + count`.
    pub fn index_of_range(
        &self,
        item: &T,
        start: usize,
        count: usize,
    ) -> Result<Option<usize>, SignalError> {
        let items = self.inner.items.borrow();
        SignalError::check_range(start, count, items.len())?;
        Ok(items[start..start + count]
            .iter()
            .position(|x| x == item)
            .map(|offset| start + offset))
    }

    /// Position of the last occurrence of `item`.
    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        self.inner.items.borrow().iter().rposition(|x| x == item)
    }

    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.inner
            .items
            .borrow()
            .iter()
            .find(|x| predicate(x))
            .cloned()
    }

    pub fn find_index(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.inner.items.borrow().iter().position(|x| predicate(x))
    }

    pub fn exists(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.inner.items.borrow().iter().any(|x| predicate(x))
    }

    pub fn true_for_all(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.inner.items.borrow().iter().all(|x| predicate(x))
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Replace the element at `index`. Notifies only when the new element
    /// differs from the old one; returns whether it did.
    pub fn set(&self, index: usize, item: T) -> Result<bool, SignalError> {
        {
            let mut items = self.inner.items.borrow_mut();
            SignalError::check_index(index, items.len())?;
            if items[index] == item {
                return Ok(false);
            }
            items[index] = item;
        }
        self.notify();
        Ok(true)
    }

    /// Replace the whole contents. Notifies only when they differ.
    pub fn set_all(&self, items: Vec<T>) -> bool {
        {
            let mut current = self.inner.items.borrow_mut();
            if *current == items {
                return false;
            }
            *current = items;
        }
        self.notify();
        true
    }

    /// Append one element.
    pub fn push(&self, item: T) {
        self.inner.items.borrow_mut().push(item);
        self.notify();
    }

    /// Append every element of `items`, notifying once. An empty `items`
    /// changes nothing and emits nothing.
    pub fn extend(&self, items: impl IntoIterator<Item = T>) {
        let added = {
            let mut current = self.inner.items.borrow_mut();
            let before = current.len();
            current.extend(items);
            current.len() - before
        };
        if added > 0 {
            self.notify();
        }
    }

    /// Insert `item` at `index` (`index == len` appends).
    pub fn insert(&self, index: usize, item: T) -> Result<(), SignalError> {
        {
            let mut items = self.inner.items.borrow_mut();
            SignalError::check_range(index, 0, items.len())?;
            items.insert(index, item);
        }
        self.notify();
        Ok(())
    }

    /// Insert every element of `items` starting at `index`, notifying once
    /// unless `items` was empty.
    pub fn insert_range(
        &self,
        index: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), SignalError> {
        let added = {
            let mut current = self.inner.items.borrow_mut();
            SignalError::check_range(index, 0, current.len())?;
            let before = current.len();
            current.splice(index..index, items);
            current.len() - before
        };
        if added > 0 {
            self.notify();
        }
        Ok(())
    }

    /// Remove the first occurrence of `item`. Returns whether one was found;
    /// nothing is emitted otherwise.
    pub fn remove(&self, item: &T) -> bool {
        {
            let mut items = self.inner.items.borrow_mut();
            let Some(index) = items.iter().position(|x| x == item) else {
                return false;
            };
            items.remove(index);
        }
        self.notify();
        true
    }

    /// Remove and return the element at `index`.
    pub fn remove_at(&self, index: usize) -> Result<T, SignalError> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            SignalError::check_index(index, items.len())?;
            items.remove(index)
        };
        self.notify();
        Ok(removed)
    }

    /// Remove `count` elements starting at `index`, notifying once. A zero
    /// `count` is validated but emits nothing.
    pub fn remove_range(&self, index: usize, count: usize) -> Result<(), SignalError> {
        {
            let mut items = self.inner.items.borrow_mut();
            SignalError::check_range(index, count, items.len())?;
            if count == 0 {
                return Ok(());
            }
            items.drain(index..index + count);
        }
        self.notify();
        Ok(())
    }

    /// Remove every element matching `predicate`. Returns the number removed
    /// and notifies only when it is non-zero.
    pub fn remove_all(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            let before = items.len();
            items.retain(|x| !predicate(x));
            before - items.len()
        };
        if removed > 0 {
            self.notify();
        }
        removed
    }

    /// Remove every element. Clearing an empty list emits nothing.
    pub fn clear(&self) {
        {
            let mut items = self.inner.items.borrow_mut();
            if items.is_empty() {
                return;
            }
            items.clear();
        }
        self.notify();
    }

    /// Stable sort with the natural order.
    pub fn sort(&self)
    where
        T: Ord,
    {
        self.inner.items.borrow_mut().sort();
        self.notify();
    }

    /// Stable sort with a comparison function.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> Ordering) {
        self.inner.items.borrow_mut().sort_by(compare);
        self.notify();
    }

    /// Stable sort of `count` elements starting at `index`.
    pub fn sort_range_by(
        &self,
        index: usize,
        count: usize,
        compare: impl FnMut(&T, &T) -> Ordering,
    ) -> Result<(), SignalError> {
        {
            let mut items = self.inner.items.borrow_mut();
            SignalError::check_range(index, count, items.len())?;
            items[index..index + count].sort_by(compare);
        }
        self.notify();
        Ok(())
    }

    pub fn reverse(&self) {
        self.inner.items.borrow_mut().reverse();
        self.notify();
    }

    /// Reverse `count` elements starting at `index`.
    pub fn reverse_range(&self, index: usize, count: usize) -> Result<(), SignalError> {
        {
            let mut items = self.inner.items.borrow_mut();
            SignalError::check_range(index, count, items.len())?;
            items[index..index + count].reverse();
        }
        self.notify();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Notification
    // ------------------------------------------------------------------

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

impl<T: Clone + PartialEq + 'static> Default for SignalList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for SignalList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for SignalList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalList")
            .field("items", &*self.inner.items.borrow())
            .field("subscribers", &self.inner.changed.subscriber_count())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Restore for SignalList<T> {
    type Snapshot = Vec<T>;

    fn snapshot(&self) -> Vec<T> {
        self.to_vec()
    }

    fn restore(&self, snapshot: Vec<T>) {
        *self.inner.items.borrow_mut() = snapshot;
    }
}

impl<T: Serialize + 'static> Serialize for SignalList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.items.borrow().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counted<T: Clone + PartialEq + 'static>(list: &SignalList<T>) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = Rc::clone(&count);
            list.subscribe(move || count.set(count.get() + 1))
        };
        (count, sub)
    }

    #[test]
    fn bulk_operations_notify_once() {
        let list = SignalList::new();
        let (count, _sub) = counted(&list);

        list.extend(vec![5, 3, 9, 1]);
        assert_eq!(count.get(), 1);

        list.sort();
        assert_eq!(list.to_vec(), vec![1, 3, 5, 9]);
        assert_eq!(count.get(), 2);

        list.remove_range(1, 2).unwrap();
        assert_eq!(list.to_vec(), vec![1, 9]);
        assert_eq!(count.get(), 3);

        list.insert_range(1, vec![4, 4, 4]).unwrap();
        assert_eq!(list.to_vec(), vec![1, 4, 4, 4, 9]);
        assert_eq!(count.get(), 4);

        list.reverse();
        assert_eq!(list.to_vec(), vec![9, 4, 4, 4, 1]);
        assert_eq!(count.get(), 5);
    }

    #[test]
    fn reads_never_notify() {
        let list = SignalList::from_vec(vec!["a", "b", "a"]);
        let (count, _sub) = counted(&list);

        assert!(list.contains(&"b"));
        assert_eq!(list.index_of(&"a"), Some(0));
        assert_eq!(list.last_index_of(&"a"), Some(2));
        assert_eq!(list.index_of_from(&"a", 1).unwrap(), Some(2));
        assert_eq!(list.index_of_range(&"a", 1, 1).unwrap(), None);
        assert_eq!(list.len(), 3);
        assert_eq!(list.get_range(1, 2).unwrap(), vec!["b", "a"]);
        assert!(list.exists(|x| *x == "b"));
        assert!(!list.true_for_all(|x| *x == "a"));
        assert_eq!(list.find_index(|x| *x == "b"), Some(1));
        let mut seen = 0;
        list.for_each(|_| seen += 1);
        assert_eq!(seen, 3);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn removing_absent_element_is_silent() {
        let list = SignalList::from_vec(vec![1, 2, 3]);
        let (count, _sub) = counted(&list);

        assert!(!list.remove(&7));
        assert_eq!(list.remove_all(|x| *x > 10), 0);
        assert_eq!(count.get(), 0);

        assert!(list.remove(&2));
        assert_eq!(list.remove_all(|x| *x >= 1), 2);
        assert!(list.is_empty());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn mutations_that_change_nothing_are_silent() {
        let list = SignalList::from_vec(vec![1, 2, 3]);
        let (count, _sub) = counted(&list);

        list.remove_range(1, 0).unwrap();
        list.remove_range(3, 0).unwrap();
        list.extend(Vec::new());
        list.insert_range(2, Vec::new()).unwrap();
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        assert_eq!(count.get(), 0);

        list.clear();
        assert_eq!(count.get(), 1);
        list.clear();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn remove_takes_first_occurrence() {
        let list = SignalList::from_vec(vec![1, 2, 1]);
        list.remove(&1);
        assert_eq!(list.to_vec(), vec![2, 1]);
    }

    #[test]
    fn index_set_only_notifies_on_difference() {
        let list = SignalList::from_vec(vec![1, 2]);
        let (count, _sub) = counted(&list);

        assert!(!list.set(0, 1).unwrap());
        assert!(list.set(0, 5).unwrap());
        assert_eq!(list.get(0).unwrap(), 5);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let list = SignalList::from_vec(vec![1, 2]);
        let (count, _sub) = counted(&list);

        assert_eq!(
            list.get(2),
            Err(SignalError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(list.set(5, 0).is_err());
        assert!(list.remove_at(2).is_err());
        assert!(list.insert(3, 0).is_err());
        assert_eq!(
            list.remove_range(1, 2),
            Err(SignalError::RangeOutOfBounds {
                index: 1,
                count: 2,
                len: 2
            })
        );
        assert!(list.reverse_range(0, 3).is_err());
        assert!(list.sort_range_by(usize::MAX, 2, |a, b| a.cmp(b)).is_err());
        assert_eq!(list.to_vec(), vec![1, 2]);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn insert_at_len_appends() {
        let list = SignalList::from_vec(vec![1]);
        list.insert(1, 2).unwrap();
        assert_eq!(list.to_vec(), vec![1, 2]);
        assert_eq!(list.remove_at(0).unwrap(), 1);
    }

    #[test]
    fn ranged_sort_and_reverse() {
        let list = SignalList::from_vec(vec![4, 3, 2, 1]);
        list.sort_range_by(1, 3, |a, b| a.cmp(b)).unwrap();
        assert_eq!(list.to_vec(), vec![4, 1, 2, 3]);
        list.reverse_range(0, 2).unwrap();
        assert_eq!(list.to_vec(), vec![1, 4, 2, 3]);
        list.sort_by(|a, b| b.cmp(a));
        assert_eq!(list.to_vec(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn set_all_skips_identical_contents() {
        let list = SignalList::from_vec(vec![1, 2]);
        let (count, _sub) = counted(&list);
        assert!(!list.set_all(vec![1, 2]));
        assert!(list.set_all(vec![2]));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn subscriber_can_read_the_list() {
        let list = SignalList::new();
        let observed = Rc::new(Cell::new(0));
        let _sub = {
            let handle = list.clone();
            let observed = Rc::clone(&observed);
            list.subscribe(move || observed.set(handle.len()))
        };
        list.extend(vec!['a', 'b']);
        assert_eq!(observed.get(), 2);
    }

    #[test]
    fn restore_is_silent() {
        let list = SignalList::from_vec(vec![1]);
        let (count, _sub) = counted(&list);
        list.restore(vec![3, 4]);
        assert_eq!(list.snapshot(), vec![3, 4]);
        assert_eq!(count.get(), 0);
    }
}
