use std::hash::Hash;

use indexmap::IndexMap;

/// Counters describing one [`HandlePool::sync`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolSyncStats {
    pub reused: usize,
    pub recycled: usize,
    pub allocated: usize,
    pub released: usize,
}

/// Keyed pool of reusable draw handles (text layers, shape layers, ...).
///
/// Each frame the host passes the content keys it needs; handles whose key
/// persists are kept, handles of vanished keys go to a free list, and new keys
/// take a free handle before allocating.
#[derive(Debug, Clone)]
pub struct HandlePool<K, H> {
    live: IndexMap<K, H>,
    free: Vec<H>,
}

impl<K, H> Default for HandlePool<K, H> {
    fn default() -> Self {
        Self {
            live: IndexMap::new(),
            free: Vec::new(),
        }
    }
}

impl<K, H> HandlePool<K, H>
where
    K: Hash + Eq,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the pool with this frame's keys, keeping their order.
    ///
    /// Duplicate keys are collapsed to their first occurrence.
    pub fn sync<I, F>(&mut self, keys: I, mut allocate: F) -> PoolSyncStats
    where
        I: IntoIterator<Item = K>,
        F: FnMut(&K) -> H,
    {
        let mut stats = PoolSyncStats::default();
        let mut previous = std::mem::take(&mut self.live);
        let mut ordered: IndexMap<K, Option<H>> = IndexMap::new();

        for key in keys {
            if ordered.contains_key(&key) {
                continue;
            }
            let handle = previous.swap_remove(&key);
            if handle.is_some() {
                stats.reused += 1;
            }
            ordered.insert(key, handle);
        }

        stats.released = previous.len();
        self.free.extend(previous.into_values());

        for (key, handle) in ordered {
            let handle = match handle {
                Some(handle) => handle,
                None => match self.free.pop() {
                    Some(handle) => {
                        stats.recycled += 1;
                        handle
                    }
                    None => {
                        stats.allocated += 1;
                        allocate(&key)
                    }
                },
            };
            self.live.insert(key, handle);
        }
        stats
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&H> {
        self.live.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut H> {
        self.live.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &H)> {
        self.live.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Handles parked for reuse.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Drops all parked handles.
    pub fn clear_free(&mut self) -> Vec<H> {
        std::mem::take(&mut self.free)
    }
}

#[cfg(test)]
mod tests {
    use super::{HandlePool, PoolSyncStats};

    #[test]
    fn persisting_keys_keep_their_handles() {
        let mut next = 0;
        let mut pool: HandlePool<&str, u32> = HandlePool::new();
        let mut allocate = |_: &&str| {
            next += 1;
            next
        };

        let first = pool.sync(["Jan 01", "Jan 02"], &mut allocate);
        assert_eq!(first.allocated, 2);
        let jan02 = *pool.get(&"Jan 02").expect("handle");

        let second = pool.sync(["Jan 02", "Jan 03"], &mut allocate);
        assert_eq!(
            second,
            PoolSyncStats {
                reused: 1,
                recycled: 1,
                allocated: 0,
                released: 1,
            }
        );
        assert_eq!(pool.get(&"Jan 02"), Some(&jan02));
        assert_eq!(pool.get(&"Jan 03"), Some(&1));
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn vanished_keys_are_parked_and_order_follows_input() {
        let mut pool: HandlePool<u8, String> = HandlePool::new();
        pool.sync([3, 1, 2, 1], |key| format!("h{key}"));
        let keys: Vec<_> = pool.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![3, 1, 2]);

        let stats = pool.sync([2], |key| format!("h{key}"));
        assert_eq!(stats.released, 2);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.free_len(), 2);
        assert_eq!(pool.clear_free().len(), 2);
    }
}
