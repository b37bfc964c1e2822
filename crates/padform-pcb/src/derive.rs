//! Default soldermask/solderpaste geometry for pad shapes without an override.

use indexmap::IndexMap;
use padform_geometry::{ShapeDecl, ShapeError};
use padform_parser::SheetDistances;

/// Adjusts a copy of a placed pad declaration for a protective sheet.
pub type DeriveFn = fn(ShapeDecl, &SheetDistances) -> Result<ShapeDecl, ShapeError>;

/// Derivation rules keyed by shape type tag. Types without a rule pass through unchanged.
#[derive(Debug, Clone)]
pub struct DerivationRules {
    rules: IndexMap<String, DeriveFn>,
}

impl Default for DerivationRules {
    fn default() -> Self {
        let mut rules = Self::empty();
        rules.register("path", scale_path);
        rules.register("rect", buffer_rect);
        rules.register("circle", buffer_circle);
        rules
    }
}

impl DerivationRules {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Install `rule` for `kind`, returning the rule it replaced.
    pub fn register(&mut self, kind: impl Into<String>, rule: DeriveFn) -> Option<DeriveFn> {
        self.rules.insert(kind.into(), rule)
    }

    #[must_use]
    pub fn has_rule(&self, kind: &str) -> bool {
        self.rules.contains_key(kind)
    }

    pub fn derive(
        &self,
        decl: &ShapeDecl,
        distances: &SheetDistances,
    ) -> Result<ShapeDecl, ShapeError> {
        match self.rules.get(decl.kind_str()) {
            Some(rule) => rule(decl.clone(), distances),
            None => Ok(decl.clone()),
        }
    }
}

fn scale_path(mut decl: ShapeDecl, d: &SheetDistances) -> Result<ShapeDecl, ShapeError> {
    decl.scale = Some(decl.scale.unwrap_or(1.0) * d.path_scale);
    Ok(decl)
}

fn buffer_rect(mut decl: ShapeDecl, d: &SheetDistances) -> Result<ShapeDecl, ShapeError> {
    let missing = |field| ShapeError::MissingField {
        kind: "rect".to_string(),
        field,
    };
    decl.width = Some(decl.width.ok_or_else(|| missing("width"))? + d.rect_buffer);
    decl.height = Some(decl.height.ok_or_else(|| missing("height"))? + d.rect_buffer);
    Ok(decl)
}

fn buffer_circle(mut decl: ShapeDecl, d: &SheetDistances) -> Result<ShapeDecl, ShapeError> {
    let diameter = decl.diameter.ok_or_else(|| ShapeError::MissingField {
        kind: "circle".to_string(),
        field: "diameter",
    })?;
    decl.diameter = Some(diameter + d.circle_buffer);
    Ok(decl)
}
