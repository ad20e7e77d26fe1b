use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority of an open-set entry, compared lexicographically: lowest
/// f-score first, then earliest insertion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpenKey {
    pub f: u32,
    pub seq: u64,
}

/// Heap entry. Ordered by key only; the cell index is payload.
#[derive(Copy, Clone, Debug)]
struct Entry {
    key: OpenKey,
    idx: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key first.
        other.key.cmp(&self.key)
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of cell indices with O(1) membership tests.
///
/// Every push takes the next value of a counter that is never reused, so
/// entries with equal f-scores pop in FIFO order and no two keys are equal.
#[derive(Clone, Debug, Default)]
pub struct OpenSet {
    heap: BinaryHeap<Entry>,
    member: Vec<bool>,
    next_seq: u64,
}

impl OpenSet {
    /// Create an empty open set for a grid of `len` cells.
    pub fn new(len: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            member: vec![false; len],
            next_seq: 0,
        }
    }

    /// Empty the set and resize the membership table, restarting the
    /// insertion counter.
    pub fn reset(&mut self, len: usize) {
        self.heap.clear();
        self.member.clear();
        self.member.resize(len, false);
        self.next_seq = 0;
    }

    /// Queue `idx` with priority `f` and return the key it was given.
    pub fn push(&mut self, idx: usize, f: u32) -> OpenKey {
        let key = OpenKey {
            f,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.push(Entry { key, idx });
        if let Some(m) = self.member.get_mut(idx) {
            *m = true;
        }
        key
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop(&mut self) -> Option<(usize, OpenKey)> {
        let Entry { key, idx } = self.heap.pop()?;
        if let Some(m) = self.member.get_mut(idx) {
            *m = false;
        }
        Some((idx, key))
    }

    /// Whether `idx` has an unprocessed entry.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.member.get(idx).copied().unwrap_or(false)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total pushes since the last reset.
    #[inline]
    pub fn pushed(&self) -> u64 {
        self.next_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_by_f_then_insertion_order() {
        let mut open = OpenSet::new(10);
        open.push(7, 5);
        open.push(3, 2);
        open.push(9, 5);
        open.push(1, 2);

        let order: Vec<usize> = std::iter::from_fn(|| open.pop().map(|(i, _)| i)).collect();
        // Equal f-scores come out first-in first-out, regardless of index.
        assert_eq!(order, vec![3, 1, 7, 9]);
    }

    #[test]
    fn membership_tracks_unprocessed_entries() {
        let mut open = OpenSet::new(4);
        assert!(!open.contains(2));
        open.push(2, 1);
        assert!(open.contains(2));
        assert_eq!(open.len(), 1);
        let (idx, key) = open.pop().unwrap();
        assert_eq!((idx, key), (2, OpenKey { f: 1, seq: 0 }));
        assert!(!open.contains(2));
        assert!(open.is_empty());
        assert!(!open.contains(99));
    }

    #[test]
    fn counter_is_never_reused_until_reset() {
        let mut open = OpenSet::new(3);
        assert_eq!(open.push(0, 0).seq, 0);
        open.pop();
        assert_eq!(open.push(0, 0).seq, 1);
        assert_eq!(open.pushed(), 2);

        open.reset(3);
        assert!(open.is_empty());
        assert!(!open.contains(0));
        assert_eq!(open.push(1, 4).seq, 0);
    }

    #[test]
    fn keys_order_lexicographically() {
        let a = OpenKey { f: 3, seq: 9 };
        let b = OpenKey { f: 4, seq: 0 };
        let c = OpenKey { f: 3, seq: 10 };
        assert!(a < b);
        assert!(a < c);
        assert!(c < b);
    }
}
