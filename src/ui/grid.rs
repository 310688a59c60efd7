//! Incremental grid population.
//!
//! Large filtered sets are appended to the grid in fixed-size chunks;
//! the shell places a sentinel after the last rendered tile and
//! reports when it scrolls into view, which releases the next chunk.

use std::ops::Range;

/// Tiles released per sentinel hit.
pub const DEFAULT_CHUNK_SIZE: usize = 72;

/// Chunked window over a filtered result set.
#[derive(Debug)]
pub struct VirtualGrid {
    chunk_size: usize,
    total: usize,
    next: usize,
}

impl Default for VirtualGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl VirtualGrid {
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            total: 0,
            next: 0,
        }
    }

    /// Restarts chunking over a result set of `total` entries. Called
    /// whenever the filter, search, or view changes.
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.next = 0;
    }

    /// Index range of tiles released so far.
    #[must_use]
    pub fn rendered(&self) -> Range<usize> {
        0..self.next
    }

    /// True once every entry has been released, meaning the sentinel
    /// should be removed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next >= self.total
    }

    /// Releases the next chunk, returning the newly visible index
    /// range. `None` when the grid is already complete.
    pub fn on_sentinel_visible(&mut self) -> Option<Range<usize>> {
        if self.is_complete() {
            return None;
        }
        let start = self.next;
        self.next = (self.next + self.chunk_size).min(self.total);
        Some(start..self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_release_in_order_until_complete() {
        let mut grid = VirtualGrid::new(10);
        grid.reset(25);

        assert_eq!(grid.on_sentinel_visible(), Some(0..10));
        assert_eq!(grid.on_sentinel_visible(), Some(10..20));
        assert!(!grid.is_complete());
        assert_eq!(grid.on_sentinel_visible(), Some(20..25));
        assert!(grid.is_complete());
        assert_eq!(grid.on_sentinel_visible(), None);
        assert_eq!(grid.rendered(), 0..25);
    }

    #[test]
    fn reset_restarts_chunking() {
        let mut grid = VirtualGrid::new(10);
        grid.reset(100);
        grid.on_sentinel_visible();
        grid.on_sentinel_visible();

        grid.reset(5);
        assert_eq!(grid.rendered(), 0..0);
        assert_eq!(grid.on_sentinel_visible(), Some(0..5));
        assert!(grid.is_complete());
    }

    #[test]
    fn empty_set_is_complete_immediately() {
        let mut grid = VirtualGrid::default();
        grid.reset(0);
        assert!(grid.is_complete());
        assert_eq!(grid.on_sentinel_visible(), None);
    }
}
