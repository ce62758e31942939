//! Presenting configuration trees: path narrowing and bounded rendering.

pub mod path;
pub mod printer;

pub use path::{select, Segment};
pub use printer::{render, Depth, RenderOptions, CIRCULAR_MARKER};
