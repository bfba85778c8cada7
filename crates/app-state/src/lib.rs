//! Screen state for Orbita Explorer
//!
//! This crate holds the per-screen state the views render from: the
//! [`LoadState`] of a one-shot fetch and the [`PagedList`] controller behind
//! infinite-scroll lists.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod load_state;
pub mod paged_list;

pub use load_state::{user_message, LoadState};
pub use paged_list::{ListSnapshot, PagedList};
