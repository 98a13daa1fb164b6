//! Lock-per-bucket map used to accumulate scores from many threads at once.
//!
//! A key always lands in bucket `key mod bucket_count`, so two threads only contend
//! when their keys share a bucket.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Integer keys that can be routed to a bucket by remainder.
pub trait BucketKey: Ord + Copy {
    fn bucket(&self, bucket_count: usize) -> usize;
}

macro_rules! impl_bucket_key {
    ($($t:ty),*) => {
        $(impl BucketKey for $t {
            #[inline]
            fn bucket(&self, bucket_count: usize) -> usize {
                (*self as u64 % bucket_count as u64) as usize
            }
        })*
    };
}

impl_bucket_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Exclusive access to one value slot. The owning bucket stays locked until dropped.
pub type Access<'a, V> = MappedMutexGuard<'a, V>;

pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: BucketKey, V: Default> ConcurrentMap<K, V> {
    pub fn new(bucket_count: usize) -> Self {
        let buckets = (0..bucket_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { buckets }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_for(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        &self.buckets[key.bucket(self.buckets.len())]
    }

    /// Lock the key's bucket and hand out its slot, inserting `V::default()` if absent.
    pub fn access(&self, key: K) -> Access<'_, V> {
        MutexGuard::map(self.bucket_for(&key).lock(), |map| map.entry(key).or_default())
    }

    pub fn erase(&self, key: &K) -> Option<V> {
        self.bucket_for(key).lock().remove(key)
    }

    /// Drain every bucket in turn into a plain map.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for bucket in &self.buckets {
            let mut guard = bucket.lock();
            result.append(&mut *guard);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn access_creates_default_slot() {
        let map: ConcurrentMap<i32, f64> = ConcurrentMap::new(3);
        *map.access(7) += 1.5;
        *map.access(7) += 1.0;
        *map.access(-4) += 2.0;
        let plain = map.build_ordinary_map();
        assert_eq!(plain.get(&7), Some(&2.5));
        assert_eq!(plain.get(&-4), Some(&2.0));
    }

    #[test]
    fn erase_removes_only_that_key() {
        let map: ConcurrentMap<u32, i64> = ConcurrentMap::new(2);
        *map.access(1) = 10;
        *map.access(3) = 30;
        assert_eq!(map.erase(&1), Some(10));
        assert_eq!(map.erase(&1), None);
        assert_eq!(map.build_ordinary_map().into_iter().collect::<Vec<_>>(), vec![(3, 30)]);
    }

    #[test]
    fn zero_buckets_is_clamped() {
        let map: ConcurrentMap<i32, i32> = ConcurrentMap::new(0);
        assert_eq!(map.bucket_count(), 1);
        *map.access(5) += 1;
        assert_eq!(map.build_ordinary_map().len(), 1);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let map: ConcurrentMap<i32, u64> = ConcurrentMap::new(7);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for key in 0..100 {
                        *map.access(key) += 1;
                    }
                });
            }
        });
        let plain = map.build_ordinary_map();
        assert_eq!(plain.len(), 100);
        assert!(plain.values().all(|&count| count == 8));
    }
}
