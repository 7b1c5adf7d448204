//! Delayed effects registered against the simulation clock.
//!
//! A `Timeline` holds items due at a given simulation time. Items due at the
//! same time come out in insertion order. Clearing a timeline cancels
//! everything in it; callers revalidate their targets when an item fires.

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due_ms: f64,
    item: T,
}

#[derive(Debug, Clone)]
pub struct Timeline<T> {
    entries: Vec<Scheduled<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item` to fire once the clock reaches `due_ms`.
    pub fn schedule(&mut self, due_ms: f64, item: T) {
        // Sorted by due time; new items go after equal dues.
        let at = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(at, Scheduled { due_ms, item });
    }

    /// Remove and return every item due at or before `now_ms`, in order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let split = self.entries.partition_point(|e| e.due_ms <= now_ms);
        self.entries.drain(..split).map(|e| e.item).collect()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.entries.first().map(|e| e.due_ms)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> {
        self.entries.iter().map(|e| (e.due_ms, &e.item))
    }
}
