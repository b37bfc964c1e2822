use indexmap::IndexMap;
use padform_core::Point;
use padform_parser::Value;
use serde::Serialize;

/// Primitive type tag of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ShapeKind {
    Rect,
    Circle,
    Path,
    Text,
    Drill,
    Other(String),
}

impl ShapeKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Path => "path",
            ShapeKind::Text => "text",
            ShapeKind::Drill => "drill",
            ShapeKind::Other(s) => s,
        }
    }
}

impl From<&str> for ShapeKind {
    fn from(s: &str) -> Self {
        match s {
            "rect" => ShapeKind::Rect,
            "circle" => ShapeKind::Circle,
            "path" => ShapeKind::Path,
            "text" => ShapeKind::Text,
            "drill" => ShapeKind::Drill,
            other => ShapeKind::Other(other.to_string()),
        }
    }
}

impl From<ShapeKind> for String {
    fn from(k: ShapeKind) -> Self {
        k.as_str().to_string()
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to place on a protective sheet (soldermask, solderpaste) for a pad shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SheetOverride {
    /// No override given: derive from the pad shape.
    #[default]
    Derive,
    /// Empty collection or `"none"`: place nothing.
    Suppress,
    /// `"same"`: place the pad shape unmodified.
    Same,
    Explicit(Vec<ShapeDecl>),
}

/// A single shape as written in a footprint document.
///
/// Declarations are values: the adjusting methods consume and return a copy, so a
/// pad template shared by many pins is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDecl {
    /// `None` when the document left `type` out (only legal for drills).
    pub kind: Option<ShapeKind>,
    pub location: Point,
    pub rotate: f64,
    pub scale: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    /// Path data or text content (`value`, `d` or `text`).
    pub value: Option<String>,
    pub mirror: Option<bool>,
    pub rotate_origin: Option<Point>,
    /// Logical layer tokens, unexpanded.
    pub layers: Option<Vec<String>>,
    pub soldermask: SheetOverride,
    pub solderpaste: SheetOverride,
    /// Remaining keys (style, fonts, border radius...), in document order.
    pub extra: IndexMap<String, Value>,
}

impl ShapeDecl {
    #[must_use]
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind: Some(kind),
            location: Point::origin(),
            rotate: 0.0,
            scale: None,
            width: None,
            height: None,
            diameter: None,
            value: None,
            mirror: None,
            rotate_origin: None,
            layers: None,
            soldermask: SheetOverride::Derive,
            solderpaste: SheetOverride::Derive,
            extra: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Point) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_rotate(mut self, rotate: f64) -> Self {
        self.rotate = rotate;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = Some(diameter);
        self
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = Some(mirror);
        self
    }

    #[must_use]
    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = Some(layers.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_kind_or(mut self, fallback: ShapeKind) -> Self {
        if self.kind.is_none() {
            self.kind = Some(fallback);
        }
        self
    }

    #[must_use]
    pub fn kind_str(&self) -> &str {
        self.kind.as_ref().map_or("", ShapeKind::as_str)
    }

    #[must_use]
    pub fn is_kind(&self, kind: &ShapeKind) -> bool {
        self.kind.as_ref() == Some(kind)
    }
}
