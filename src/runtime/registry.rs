//! Id lookup for widgets.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::widgets::base::{WidgetCell, WidgetHandle};

/// Maps user-assigned ids to live widgets.
///
/// Entries are weak: the registry never keeps a widget alive, and a widget releases its
/// id when dropped. One registry is shared by every widget of a session.
#[derive(Debug, Default)]
pub struct IdRegistry {
    entries: RefCell<HashMap<String, Weak<WidgetCell>>>,
}

impl IdRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Point `id` at `handle`. A live widget already holding `id` loses it.
    pub fn register(&self, id: &str, handle: &WidgetHandle) {
        let mut entries = self.entries.borrow_mut();
        let replaced = entries
            .get(id)
            .and_then(Weak::upgrade)
            .is_some_and(|current| !Rc::ptr_eq(&current, handle.cell()));
        if replaced {
            warn!(id, widget = handle.type_name(), "id taken over by another widget");
        }
        entries.insert(id.to_string(), Rc::downgrade(handle.cell()));
        debug!(id, widget = handle.type_name(), "registered id");
    }

    /// Forget `id` regardless of which widget holds it.
    pub fn deregister(&self, id: &str) -> bool {
        let removed = self.entries.borrow_mut().remove(id).is_some();
        if removed {
            debug!(id, "deregistered id");
        }
        removed
    }

    /// Forget `id` only if `cell` still holds it.
    pub(crate) fn release(&self, id: &str, cell: &Rc<WidgetCell>) {
        let mut entries = self.entries.borrow_mut();
        let owned = entries
            .get(id)
            .is_some_and(|entry| std::ptr::eq(entry.as_ptr(), Rc::as_ptr(cell)));
        if owned {
            entries.remove(id);
            debug!(id, "released id");
        }
    }

    pub fn get(&self, id: &str) -> Option<WidgetHandle> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(id).map(Weak::upgrade) {
            Some(Some(cell)) => Some(WidgetHandle::from_cell(cell)),
            Some(None) => {
                entries.remove(id);
                None
            }
            None => None,
        }
    }

    /// The id `handle`'s widget is registered under.
    pub fn get_id(&self, handle: &WidgetHandle) -> Option<String> {
        self.entries
            .borrow()
            .iter()
            .find(|(_, entry)| std::ptr::eq(entry.as_ptr(), Rc::as_ptr(handle.cell())))
            .map(|(id, _)| id.clone())
    }

    /// Registered ids of live widgets, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.prune();
        let mut ids: Vec<String> = self.entries.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.prune();
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&self) {
        self.entries
            .borrow_mut()
            .retain(|_, entry| entry.strong_count() > 0);
    }
}
