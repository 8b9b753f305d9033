//! Todo Types - wire types shared by the todo server and its clients
//!
//! Pure data definitions with no runtime dependencies.

pub mod item;

pub use item::*;
