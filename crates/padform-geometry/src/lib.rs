//! Shape declarations, the shape kernel, and 2D outline primitives.

pub mod decl;
pub mod primitives;
pub mod shape;

pub use cavalier_contours::polyline::{PlineVertex, Polyline};
pub use decl::{SheetOverride, ShapeDecl, ShapeKind};
pub use shape::{Geometry, Shape, ShapeError};
