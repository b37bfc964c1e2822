//! Footprint expansion: pins, pads and layout sections to per-sheet, per-layer shapes.

pub mod definition;
pub mod derive;
pub mod footprint;
pub mod layers;
pub mod sheets;

use padform_parser::{Error as ParserError, ExpandConfig, Value};

pub use definition::{
    parse_footprint_definition, DefinitionError, FootprintDefinition, LayoutDecl, PadDecl, PinDecl,
};
pub use derive::{DerivationRules, DeriveFn};
pub use footprint::{Expander, Footprint, PAD_LABEL_CLASS};
pub use layers::{LayerError, LayerResolver, LayerStack};
pub use sheets::{Sheet, SheetShapes, DRILL_LAYER};

#[derive(Debug, thiserror::Error)]
pub enum FootprintError {
    #[error("pin \"{pin}\" uses undefined pad \"{pad}\"")]
    UnknownPad { pin: String, pad: String },
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error("invalid shape: {0}")]
    Shape(#[from] padform_geometry::ShapeError),
    #[error(transparent)]
    Layer(#[from] LayerError),
    #[error("failed to parse footprint: {0}")]
    Parser(#[from] ParserError),
}

pub fn expand_footprint(
    def: &FootprintDefinition,
    config: &ExpandConfig,
) -> Result<SheetShapes, FootprintError> {
    Footprint::new(def, config).map(Footprint::into_shapes)
}

pub fn expand_footprint_value(
    value: &Value,
    config: &ExpandConfig,
) -> Result<SheetShapes, FootprintError> {
    let def = parse_footprint_definition(value)?;
    expand_footprint(&def, config)
}

pub fn expand_footprint_from_yaml_str(
    yaml: &str,
    config: &ExpandConfig,
) -> Result<SheetShapes, FootprintError> {
    expand_footprint_value(&Value::from_yaml_str(yaml)?, config)
}

pub fn expand_footprint_from_json_str(
    json: &str,
    config: &ExpandConfig,
) -> Result<SheetShapes, FootprintError> {
    expand_footprint_value(&Value::try_from_json_str(json)?, config)
}
