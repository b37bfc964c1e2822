use indexmap::IndexMap;
use padform_core::Point;
use padform_parser::Value;
use serde::Serialize;

use crate::decl::{ShapeDecl, ShapeKind};
use crate::primitives::{circle, rounded_rectangle};
use crate::Polyline;

const DEFAULT_STYLE: &str = "stroke:none;";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShapeError {
    #[error("shapes must have a 'type' definition")]
    MissingType,
    #[error("a '{kind}' shape requires a '{field}' definition")]
    MissingField { kind: String, field: &'static str },
    #[error("invalid '{field}' on a '{kind}' shape")]
    InvalidField { kind: String, field: &'static str },
}

/// Type-specific dimensions of an instantiated shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "geometry", rename_all = "kebab-case")]
pub enum Geometry {
    Rect {
        width: f64,
        height: f64,
        /// `[top-left, top-right, bottom-right, bottom-left]`
        border_radius: [f64; 4],
    },
    Circle {
        diameter: f64,
    },
    Drill {
        diameter: f64,
    },
    Path {
        d: String,
    },
    Text {
        text: String,
    },
    Other,
}

/// An instantiated primitive: one declaration resolved to absolute placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Shape {
    #[serde(rename = "type")]
    kind: ShapeKind,
    location: Point,
    rotate: f64,
    #[serde(skip_serializing_if = "Point::is_origin")]
    rotate_origin: Point,
    scale: f64,
    #[serde(flatten)]
    geometry: Geometry,
    mirror: bool,
    mirror_x: bool,
    mirror_y: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label_style_class: Option<String>,
    style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    style_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buffer_to_pour: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gerber_lp: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, Value>,
}

impl Shape {
    pub fn new(decl: &ShapeDecl) -> Result<Self, ShapeError> {
        let kind = decl.kind.clone().ok_or(ShapeError::MissingType)?;
        let mut attributes = decl.extra.clone();

        let geometry = match &kind {
            ShapeKind::Rect => Geometry::Rect {
                width: required(decl.width, &kind, "width")?,
                height: required(decl.height, &kind, "height")?,
                border_radius: border_radius(attributes.shift_remove("border-radius"), &kind)?,
            },
            ShapeKind::Circle => Geometry::Circle {
                diameter: required(decl.diameter, &kind, "diameter")?,
            },
            ShapeKind::Drill => Geometry::Drill {
                diameter: required(decl.diameter, &kind, "diameter")?,
            },
            ShapeKind::Path => Geometry::Path {
                d: required(decl.value.clone(), &kind, "value")?,
            },
            ShapeKind::Text => Geometry::Text {
                text: required(decl.value.clone(), &kind, "value")?,
            },
            ShapeKind::Other(_) => Geometry::Other,
        };

        let style = match attributes.shift_remove("style") {
            Some(Value::String(s)) if !s.trim().is_empty() => normalize_style(&s),
            Some(Value::String(_)) | Some(Value::Null) | None => DEFAULT_STYLE.to_string(),
            Some(_) => {
                return Err(ShapeError::InvalidField {
                    kind: kind.to_string(),
                    field: "style",
                })
            }
        };

        Ok(Self {
            location: decl.location,
            rotate: decl.rotate,
            rotate_origin: decl.rotate_origin.unwrap_or_default(),
            scale: decl.scale.unwrap_or(1.0),
            geometry,
            mirror: decl.mirror.unwrap_or(false),
            mirror_x: take_bool(&mut attributes, "mirror-x"),
            mirror_y: take_bool(&mut attributes, "mirror-y"),
            label: None,
            label_style_class: None,
            style,
            style_class: take_string(&mut attributes, "style-class"),
            buffer_to_pour: attributes
                .shift_remove("buffer-to-pour")
                .and_then(|v| v.as_f64()),
            gerber_lp: take_string(&mut attributes, "gerber-lp"),
            attributes,
            kind,
        })
    }

    #[must_use]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[must_use]
    pub fn location(&self) -> Point {
        self.location
    }

    #[must_use]
    pub fn rotate(&self) -> f64 {
        self.rotate
    }

    #[must_use]
    pub fn rotate_origin(&self) -> Point {
        self.rotate_origin
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn width(&self) -> Option<f64> {
        match self.geometry {
            Geometry::Rect { width, .. } => Some(width),
            _ => None,
        }
    }

    #[must_use]
    pub fn height(&self) -> Option<f64> {
        match self.geometry {
            Geometry::Rect { height, .. } => Some(height),
            _ => None,
        }
    }

    #[must_use]
    pub fn diameter(&self) -> Option<f64> {
        match self.geometry {
            Geometry::Circle { diameter } | Geometry::Drill { diameter } => Some(diameter),
            _ => None,
        }
    }

    #[must_use]
    pub fn mirror(&self) -> bool {
        self.mirror
    }

    #[must_use]
    pub fn mirror_x(&self) -> bool {
        self.mirror_x
    }

    #[must_use]
    pub fn mirror_y(&self) -> bool {
        self.mirror_y
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    #[must_use]
    pub fn label_style_class(&self) -> Option<&str> {
        self.label_style_class.as_deref()
    }

    pub fn set_label_style_class(&mut self, class: impl Into<String>) {
        self.label_style_class = Some(class.into());
    }

    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }

    #[must_use]
    pub fn style_class(&self) -> Option<&str> {
        self.style_class.as_deref()
    }

    #[must_use]
    pub fn buffer_to_pour(&self) -> Option<f64> {
        self.buffer_to_pour
    }

    #[must_use]
    pub fn gerber_lp(&self) -> Option<&str> {
        self.gerber_lp.as_deref()
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Closed outline in board coordinates, for primitives that have one.
    #[must_use]
    pub fn outline(&self) -> Option<Polyline<f64>> {
        let center = (self.location.x, self.location.y);
        match &self.geometry {
            Geometry::Rect {
                width,
                height,
                border_radius,
            } => Some(rounded_rectangle(
                center,
                (width * self.scale, height * self.scale),
                (*border_radius).map(|r| r * self.scale),
                // Polylines turn counter-clockwise; shapes turn clockwise.
                -self.rotate,
            )),
            Geometry::Circle { diameter } | Geometry::Drill { diameter } => {
                Some(circle(center, diameter * self.scale / 2.0))
            }
            Geometry::Path { .. } | Geometry::Text { .. } | Geometry::Other => None,
        }
    }
}

fn required<T>(v: Option<T>, kind: &ShapeKind, field: &'static str) -> Result<T, ShapeError> {
    v.ok_or_else(|| ShapeError::MissingField {
        kind: kind.to_string(),
        field,
    })
}

fn border_radius(v: Option<Value>, kind: &ShapeKind) -> Result<[f64; 4], ShapeError> {
    let invalid = || ShapeError::InvalidField {
        kind: kind.to_string(),
        field: "border-radius",
    };
    match v {
        None | Some(Value::Null) => Ok([0.0; 4]),
        Some(Value::Number(r)) => Ok([r; 4]),
        Some(Value::Seq(seq)) => {
            let radii = seq
                .iter()
                .map(|v| v.as_f64().ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()?;
            match radii.as_slice() {
                [] => Ok([0.0; 4]),
                [r] => Ok([*r; 4]),
                [a, b, c, d] => Ok([*a, *b, *c, *d]),
                _ => Err(invalid()),
            }
        }
        Some(_) => Err(invalid()),
    }
}

fn take_bool(attributes: &mut IndexMap<String, Value>, key: &str) -> bool {
    attributes
        .shift_remove(key)
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn take_string(attributes: &mut IndexMap<String, Value>, key: &str) -> Option<String> {
    attributes
        .shift_remove(key)
        .and_then(|v| v.as_str().map(str::to_string))
}

// "stroke-width: 0.2 ; fill:none" -> "stroke-width:0.2;fill:none;"
fn normalize_style(style: &str) -> String {
    let mut out = String::new();
    for decl in style.split(';') {
        let Some((prop, val)) = decl.split_once(':') else {
            continue;
        };
        out.push_str(prop.trim());
        out.push(':');
        out.push_str(val.trim());
        out.push(';');
    }
    out
}
