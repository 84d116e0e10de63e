//! Generic collections shared by the simulation core.
//!
//! # Example: Quick Start
//!
//! ```rust
//! use tidewater::game::collections::PriorityHeap;
//!
//! let mut heap = PriorityHeap::new();
//! heap.push("late", 5);
//! heap.push("early", 1);
//! assert_eq!(heap.pop(), Ok("early"));
//! ```

pub mod priority_heap;


pub use priority_heap::{CollectionError, HeapStats, PriorityHeap};
