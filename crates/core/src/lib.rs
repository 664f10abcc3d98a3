//! Functional core for the marquee movie catalog.
//!
//! Domain types, pure operations and the trait seams that the `marquee`
//! crate implements. Nothing in here performs I/O.

pub mod cache;
pub mod catalog;
pub mod storage;
