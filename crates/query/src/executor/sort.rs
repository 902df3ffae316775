//! Sort executor.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::ast::{ColumnKey, Order, SortDirection};
use crate::executor::ResultRow;

/// Sort executor - orders result rows by the ORDER keys.
///
/// Keys are compared most significant first, ties fall through to the next
/// key, and `DOWN` reverses every key. The sort is stable.
pub struct SortExecutor {
    keys: Vec<String>,
    direction: SortDirection,
}

impl SortExecutor {
    /// Creates a new sort executor.
    pub fn new(order: &Order) -> Self {
        Self {
            keys: order.keys().iter().map(ColumnKey::name).collect(),
            direction: order.direction(),
        }
    }

    /// Sorts the rows in place.
    pub fn execute(&self, rows: &mut [ResultRow]) {
        rows.sort_by(|a, b| self.compare_rows(a, b));
    }

    fn compare_rows(&self, a: &ResultRow, b: &ResultRow) -> Ordering {
        for key in &self.keys {
            let cmp = a.get(key).cmp(&b.get(key));
            if cmp != Ordering::Equal {
                return match self.direction {
                    SortDirection::Up => cmp,
                    SortDirection::Down => cmp.reverse(),
                };
            }
        }
        Ordering::Equal
    }
}
