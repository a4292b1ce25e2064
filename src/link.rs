//! Hyperlink URL storage for linked spans.
//!
//! Spans reference URLs through the 24-bit id packed into
//! [`InlineFormat`](crate::InlineFormat). The pool owns the URL strings and
//! reference-counts them: a slot starts unreferenced, every span that takes
//! the id must [`retain`](HrefPool::retain) it, and every span destroyed
//! while carrying the id must [`release`](HrefPool::release) it. A slot
//! whose count returns to zero is recycled.

/// Pool of hyperlink URLs with reference counting.
///
/// Ids are 1-indexed; 0 always means "no link". Stale or zero ids are safe
/// to pass to any method.
#[derive(Clone, Debug, Default)]
pub struct HrefPool {
    slots: Vec<Option<HrefSlot>>,
    recycled: Vec<u32>,
}

#[derive(Clone, Debug)]
struct HrefSlot {
    url: String,
    refs: u32,
}

impl HrefPool {
    /// Create a new empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a URL and return its id.
    ///
    /// The slot starts with a reference count of zero; callers retain it
    /// once per span that adopts the id.
    pub fn insert(&mut self, url: &str) -> u32 {
        if let Some(id) = self.recycled.pop() {
            self.slots[(id - 1) as usize] = Some(HrefSlot {
                url: url.to_string(),
                refs: 0,
            });
            return id;
        }
        self.slots.push(Some(HrefSlot {
            url: url.to_string(),
            refs: 0,
        }));
        self.slots.len() as u32
    }

    /// Look up the URL for an id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&str> {
        if id == 0 {
            return None;
        }
        let idx = (id - 1) as usize;
        self.slots
            .get(idx)
            .and_then(|slot| slot.as_ref())
            .map(|slot| slot.url.as_str())
    }

    /// Increment the reference count for an id.
    pub fn retain(&mut self, id: u32) {
        if let Some(slot) = self.slot_mut(id) {
            slot.refs = slot.refs.saturating_add(1);
        }
    }

    /// Decrement the reference count, recycling the slot at zero.
    pub fn release(&mut self, id: u32) {
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        if slot.refs > 0 {
            slot.refs -= 1;
        }
        if slot.refs == 0 {
            let idx = (id - 1) as usize;
            self.slots[idx] = None;
            self.recycled.push(id);
        }
    }

    /// Number of slots ever allocated (including recycled ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the pool has never allocated a slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot_mut(&mut self, id: u32) -> Option<&mut HrefSlot> {
        if id == 0 {
            return None;
        }
        let idx = (id - 1) as usize;
        self.slots.get_mut(idx).and_then(|slot| slot.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let mut pool = HrefPool::new();
        let id = pool.insert("https://example.com");
        assert_ne!(id, 0);
        assert_eq!(pool.get(id), Some("https://example.com"));
    }

    #[test]
    fn test_ids_are_1_indexed() {
        let mut pool = HrefPool::new();
        assert_eq!(pool.insert("https://one.example"), 1);
        assert_eq!(pool.insert("https://two.example"), 2);
        assert_eq!(pool.get(0), None);
    }

    #[test]
    fn test_release_recycles_at_zero() {
        let mut pool = HrefPool::new();
        let id = pool.insert("https://example.com");
        pool.retain(id);
        pool.release(id);
        assert_eq!(pool.get(id), None);

        let reused = pool.insert("https://other.example");
        assert_eq!(reused, id);
        assert_eq!(pool.get(reused), Some("https://other.example"));
    }

    #[test]
    fn test_multiple_retains_keep_slot_alive() {
        let mut pool = HrefPool::new();
        let id = pool.insert("https://example.com");
        pool.retain(id);
        pool.retain(id);
        pool.release(id);
        assert_eq!(pool.get(id), Some("https://example.com"));
        pool.release(id);
        assert_eq!(pool.get(id), None);
    }

    #[test]
    fn test_stale_and_zero_ids_safe() {
        let mut pool = HrefPool::new();
        pool.retain(0);
        pool.release(0);
        pool.retain(999);
        pool.release(999);
        assert_eq!(pool.get(999), None);

        let id = pool.insert("https://example.com");
        pool.retain(id);
        pool.release(id);
        // Double release on a recycled slot must not panic or corrupt
        pool.release(id);
        assert_eq!(pool.get(id), None);
    }

    #[test]
    fn test_unicode_url() {
        let mut pool = HrefPool::new();
        let id = pool.insert("https://example.com/路径");
        assert_eq!(pool.get(id), Some("https://example.com/路径"));
    }

    #[test]
    fn test_len_counts_recycled_slots() {
        let mut pool = HrefPool::new();
        let id = pool.insert("https://one.example");
        pool.insert("https://two.example");
        pool.retain(id);
        pool.release(id);
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_empty());
    }
}
