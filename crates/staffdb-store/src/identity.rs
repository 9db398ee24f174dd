//! Shared record handles and the per-session identity map

use std::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::schema::Record;

/// Shared, single-threaded handle to a record
///
/// Cloning a handle yields another reference to the same object. Two
/// handles refer to the same stored row exactly when `ptr_eq` holds.
pub struct Handle<R>(Rc<RefCell<R>>);

impl<R> Handle<R> {
    pub fn new(record: R) -> Self {
        Self(Rc::new(RefCell::new(record)))
    }

    /// Immutable access to the record
    ///
    /// # Panics
    ///
    /// Panics if the record is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, R> {
        self.0.borrow()
    }

    /// Mutable access to the record's fields
    ///
    /// # Panics
    ///
    /// Panics if the record is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, R> {
        self.0.borrow_mut()
    }

    /// Immutable access, failing instead of panicking while mutably borrowed
    pub fn try_borrow(&self) -> Result<Ref<'_, R>, BorrowError> {
        self.0.try_borrow()
    }

    /// Mutable access, failing instead of panicking while borrowed
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, R>, BorrowMutError> {
        self.0.try_borrow_mut()
    }

    /// Same in-memory object
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<R: Record> Handle<R> {
    /// # Panics
    ///
    /// Panics if the record is currently mutably borrowed.
    pub fn id(&self) -> Option<i64> {
        self.0.borrow().id()
    }
}

impl<R> Clone for Handle<R> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<R: fmt::Debug> fmt::Debug for Handle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(record) => f.debug_tuple("Handle").field(&*record).finish(),
            Err(_) => f.debug_tuple("Handle").field(&"<borrowed>").finish(),
        }
    }
}

impl<R: fmt::Display> fmt::Display for Handle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0.borrow(), f)
    }
}

impl<R> From<R> for Handle<R> {
    fn from(record: R) -> Self {
        Self::new(record)
    }
}

/// id → live instance for one record type
///
/// Owned by a `Session`; every repository read goes through it so that one
/// stored row is represented by one object.
pub struct IdentityMap<R> {
    entries: HashMap<i64, Handle<R>>,
}

impl<R> IdentityMap<R> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, id: i64) -> Option<Handle<R>> {
        self.entries.get(&id).cloned()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn insert(&mut self, id: i64, handle: Handle<R>) {
        self.entries.insert(id, handle);
    }

    pub(crate) fn remove(&mut self, id: i64) -> Option<Handle<R>> {
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every cached instance; handles already given out stay valid
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<R> Default for IdentityMap<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for IdentityMap<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&i64> = self.entries.keys().collect();
        ids.sort();
        f.debug_struct("IdentityMap").field("ids", &ids).finish()
    }
}
