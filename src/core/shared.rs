//! One-producer, many-reader parameter cells.
//!
//! A [`Publisher`] owns the only write handle to a value that any number of
//! [`Reader`]s observe. The cell is allocated once; readers keep their handle
//! for the lifetime of the scene and re-read it at render time, so a publish
//! is visible to everyone without re-fetching anything.
//!
//! Every publish is stamped with the frame number it belongs to, which lets a
//! consumer check that the producer already ran this frame
//! ([`Reader::is_current`]).

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
struct Stamped<T> {
    value: T,
    /// Frame of the last publish; `None` until the first one.
    frame: Option<u64>,
}

/// Sole write handle to a shared parameter cell. Not `Clone`.
#[derive(Debug)]
pub struct Publisher<T: Copy> {
    cell: Rc<Cell<Stamped<T>>>,
}

/// Read handle to a shared parameter cell.
#[derive(Debug)]
pub struct Reader<T: Copy> {
    cell: Rc<Cell<Stamped<T>>>,
}

impl<T: Copy> Clone for Reader<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Copy> Publisher<T> {
    /// Allocate a cell holding `initial`. Nothing is considered published yet.
    pub fn new(initial: T) -> Self {
        Self {
            cell: Rc::new(Cell::new(Stamped {
                value: initial,
                frame: None,
            })),
        }
    }

    /// Overwrite the value in place and stamp it with `frame`.
    pub fn publish(&self, value: T, frame: u64) {
        self.cell.set(Stamped {
            value,
            frame: Some(frame),
        });
    }

    /// Hand out a new reader of this cell.
    pub fn reader(&self) -> Reader<T> {
        Reader {
            cell: Rc::clone(&self.cell),
        }
    }

    /// Value most recently published.
    #[inline]
    pub fn current(&self) -> T {
        self.cell.get().value
    }

    /// Number of live readers.
    pub fn reader_count(&self) -> usize {
        Rc::strong_count(&self.cell) - 1
    }
}

impl<T: Copy> Reader<T> {
    /// Snapshot of the current value.
    #[inline]
    pub fn get(&self) -> T {
        self.cell.get().value
    }

    /// Frame of the last publish, if any.
    #[inline]
    pub fn published_frame(&self) -> Option<u64> {
        self.cell.get().frame
    }

    /// Whether the producer already published for `frame`.
    #[inline]
    pub fn is_current(&self, frame: u64) -> bool {
        self.published_frame() == Some(frame)
    }

    /// Whether both handles observe the same cell.
    pub fn same_cell(&self, other: &Reader<T>) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_see_publish_without_refetch() {
        let publisher = Publisher::new(1.0_f32);
        let a = publisher.reader();
        let b = a.clone();
        assert_eq!(a.get(), 1.0);

        publisher.publish(2.5, 7);
        assert_eq!(a.get(), 2.5);
        assert_eq!(b.get(), 2.5);
        assert!(a.same_cell(&b));
    }

    #[test]
    fn test_frame_stamp() {
        let publisher = Publisher::new([0.0_f32; 3]);
        let r = publisher.reader();
        assert_eq!(r.published_frame(), None);
        assert!(!r.is_current(0));

        publisher.publish([1.0, 0.0, 0.0], 3);
        assert!(r.is_current(3));
        assert!(!r.is_current(4));
    }

    #[test]
    fn test_reader_count() {
        let publisher = Publisher::new(0_u32);
        assert_eq!(publisher.reader_count(), 0);
        let r1 = publisher.reader();
        let _r2 = r1.clone();
        assert_eq!(publisher.reader_count(), 2);
        drop(r1);
        assert_eq!(publisher.reader_count(), 1);
    }
}
