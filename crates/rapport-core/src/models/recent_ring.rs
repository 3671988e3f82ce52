//! Bounded FIFO ring used for "last N" histories.

use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-capacity ring, oldest entry first. Pushing onto a full ring evicts the
/// oldest entry. Serializes as a plain array.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentRing<T, const N: usize> {
    items: VecDeque<T>,
}

impl<T, const N: usize> RecentRing<T, N> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(N),
        }
    }

    /// Append an entry, returning the evicted one if the ring was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        if N == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() >= N {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) {
        self.items.retain(f);
    }
}

impl<T, const N: usize> Default for RecentRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FromIterator<T> for RecentRing<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = Self::new();
        for item in iter {
            ring.push(item);
        }
        ring
    }
}

impl<T: Serialize, const N: usize> Serialize for RecentRing<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for RecentRing<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn evicts_oldest_first() {
        let mut ring: RecentRing<u32, 3> = RecentRing::new();
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(ring.push(3), None);
        assert_eq!(ring.push(4), Some(1));
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(ring.newest(), Some(&4));
    }

    #[test]
    fn deserializing_oversized_array_keeps_newest() {
        let ring: RecentRing<u32, 2> = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(serde_json::to_string(&ring).unwrap(), "[3,4]");
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(values in proptest::collection::vec(any::<u16>(), 0..64)) {
            let ring: RecentRing<u16, 10> = values.iter().copied().collect();
            prop_assert!(ring.len() <= 10);
            let expected: Vec<u16> = values.iter().rev().take(10).rev().copied().collect();
            prop_assert_eq!(ring.iter().copied().collect::<Vec<_>>(), expected);
        }
    }
}
