//! Data types for the sheet engine.

mod cell;
mod column;
mod filter;
mod sort;
mod span;
mod style;

pub use cell::*;
pub use column::*;
pub use filter::*;
pub use sort::*;
pub use span::*;
pub use style::*;
