//! Change listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

/// Listener registry. Notification works on a snapshot of the list, so a
/// listener may subscribe or unsubscribe while being called.
pub(crate) struct Listeners<T> {
    entries: RefCell<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<T> Listeners<T> {
    pub(crate) fn add(&self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    pub(crate) fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub(crate) fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_can_unsubscribe_itself() {
        let listeners: Rc<Listeners<u32>> = Rc::new(Listeners::default());
        let seen = Rc::new(Cell::new(0));
        let id = Rc::new(Cell::new(None));

        let (l2, s2, id2) = (Rc::clone(&listeners), Rc::clone(&seen), Rc::clone(&id));
        let sub = listeners.add(move |v| {
            s2.set(s2.get() + v);
            if let Some(me) = id2.get() {
                l2.remove(me);
            }
        });
        id.set(Some(sub));

        listeners.notify(&5);
        listeners.notify(&5);
        assert_eq!(seen.get(), 5);
        assert!(listeners.is_empty());
    }
}
