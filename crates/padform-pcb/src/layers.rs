//! Logical-to-physical layer expansion.

use padform_parser::StackConfig;

pub const TOP: &str = "top";
pub const BOTTOM: &str = "bottom";
const INTERNAL_PREFIX: &str = "internal-";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayerError {
    #[error("unknown layer \"{0}\"")]
    UnknownLayer(String),
    #[error("layer \"{layer}\" is outside the stack ({internal} internal layers)")]
    OutsideStack { layer: String, internal: usize },
}

/// Expands declaration-level layer tokens into physical layer ids.
pub trait LayerResolver {
    /// Physical layers denoted by `tokens`, in token order, without repeats.
    fn expand(&self, tokens: &[String]) -> Result<Vec<String>, LayerError>;
}

/// A board stack of `top`, `internal-1`..`internal-N`, `bottom`.
///
/// Tokens: `top`, `bottom`, `internal-<n>`, `internal` (every internal layer), `surface`
/// (top and bottom) and `all` (the whole stack, top to bottom).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStack {
    internal: usize,
}

impl LayerStack {
    #[must_use]
    pub fn new(internal: usize) -> Self {
        Self { internal }
    }

    #[must_use]
    pub fn from_config(cfg: &StackConfig) -> Self {
        Self::new(cfg.internal_layers)
    }

    #[must_use]
    pub fn internal_layers(&self) -> Vec<String> {
        (1..=self.internal)
            .map(|n| format!("{INTERNAL_PREFIX}{n}"))
            .collect()
    }

    #[must_use]
    pub fn physical_layers(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.internal + 2);
        out.push(TOP.to_string());
        out.extend(self.internal_layers());
        out.push(BOTTOM.to_string());
        out
    }

    fn resolve_token(&self, token: &str) -> Result<Vec<String>, LayerError> {
        match token {
            TOP | BOTTOM => Ok(vec![token.to_string()]),
            "surface" => Ok(vec![TOP.to_string(), BOTTOM.to_string()]),
            "internal" => Ok(self.internal_layers()),
            "all" => Ok(self.physical_layers()),
            t => {
                let n = t
                    .strip_prefix(INTERNAL_PREFIX)
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| LayerError::UnknownLayer(t.to_string()))?;
                if n == 0 || n > self.internal {
                    return Err(LayerError::OutsideStack {
                        layer: t.to_string(),
                        internal: self.internal,
                    });
                }
                Ok(vec![t.to_string()])
            }
        }
    }
}

impl LayerResolver for LayerStack {
    fn expand(&self, tokens: &[String]) -> Result<Vec<String>, LayerError> {
        let mut out: Vec<String> = Vec::new();
        for token in tokens {
            for layer in self.resolve_token(token.trim())? {
                if !out.contains(&layer) {
                    out.push(layer);
                }
            }
        }
        Ok(out)
    }
}
