//! In-memory working set of games this process considers active.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::domain::Guid;

#[derive(Debug, Default)]
pub struct GameRegistry {
    active: Mutex<HashSet<Guid>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the guid was already tracked.
    pub fn insert(&self, guid: Guid) -> bool {
        self.active.lock().insert(guid)
    }

    pub fn remove(&self, guid: Guid) -> bool {
        self.active.lock().remove(&guid)
    }

    pub fn contains(&self, guid: Guid) -> bool {
        self.active.lock().contains(&guid)
    }

    /// Copy of the current set, so callers can await without holding the lock.
    pub fn snapshot(&self) -> Vec<Guid> {
        self.active.lock().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let registry = GameRegistry::new();
        let guid = Guid::new();
        assert!(registry.insert(guid));
        assert!(!registry.insert(guid));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot(), vec![guid]);
        assert!(registry.remove(guid));
        assert!(!registry.contains(guid));
        assert!(registry.is_empty());
    }
}
