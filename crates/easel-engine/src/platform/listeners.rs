use super::{CloseListener, ListenerId, WindowKey};

/// Close-listener registry shared by the backends.
#[derive(Default)]
pub(crate) struct CloseListeners {
    next: u64,
    entries: Vec<(ListenerId, CloseListener)>,
    /// Ids of entries handed out by [`detach`](Self::detach) and not yet restored.
    detached: Vec<ListenerId>,
    /// Detached ids removed before [`restore`](Self::restore).
    removed: Vec<ListenerId>,
}

impl CloseListeners {
    pub(crate) fn add(&mut self, listener: CloseListener) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        if self.entries.len() != before {
            return true;
        }

        if self.detached.contains(&id) && !self.removed.contains(&id) {
            self.removed.push(id);
            return true;
        }
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len() + self.detached.len() - self.removed.len()
    }

    /// Moves the current listeners out so they can run without borrowing the
    /// registry. Adds and removes made meanwhile are applied by `restore`.
    pub(crate) fn detach(&mut self) -> Vec<(ListenerId, CloseListener)> {
        let entries = std::mem::take(&mut self.entries);
        self.detached = entries.iter().map(|(id, _)| *id).collect();
        entries
    }

    /// Puts detached listeners back ahead of any added since `detach`.
    pub(crate) fn restore(&mut self, mut entries: Vec<(ListenerId, CloseListener)>) {
        let removed = std::mem::take(&mut self.removed);
        self.detached.clear();
        entries.retain(|(id, _)| !removed.contains(id));
        entries.append(&mut self.entries);
        self.entries = entries;
    }

    /// Notifies listeners in registration order.
    pub(crate) fn dispatch(&mut self, key: WindowKey) {
        for (_, listener) in self.entries.iter_mut() {
            listener(key);
        }
    }
}
