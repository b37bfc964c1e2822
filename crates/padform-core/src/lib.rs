//! Core types shared across the workspace.

pub mod point;

pub use point::Point;
