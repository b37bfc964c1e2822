//! Expansion of a footprint definition into per-sheet, per-layer shapes.
//!
//! Four passes fill one [`SheetShapes`], always in this order: pins (conductor, soldermask,
//! solderpaste, drills), pours, the direct conductor/silkscreen/soldermask sections, and
//! assembly. No pass reads what another produced.

use padform_geometry::{Shape, SheetOverride, ShapeDecl, ShapeKind};
use padform_parser::{Distances, ExpandConfig, SheetDistances};
use tracing::{debug, trace};

use crate::definition::{FootprintDefinition, PinDecl};
use crate::derive::DerivationRules;
use crate::layers::{LayerResolver, LayerStack, BOTTOM, TOP};
use crate::sheets::{Sheet, SheetShapes, DRILL_LAYER};
use crate::FootprintError;

/// Style class given to pin labels on conductor shapes.
pub const PAD_LABEL_CLASS: &str = "pad-labels";

/// The expanded shapes of one footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    shapes: SheetShapes,
}

impl Footprint {
    pub fn new(def: &FootprintDefinition, config: &ExpandConfig) -> Result<Self, FootprintError> {
        let stack = LayerStack::from_config(&config.stack);
        let rules = DerivationRules::default();
        let shapes = Expander::new(&config.distances, &stack, &rules).expand(def)?;
        Ok(Self { shapes })
    }

    #[must_use]
    pub fn shapes(&self) -> &SheetShapes {
        &self.shapes
    }

    #[must_use]
    pub fn into_shapes(self) -> SheetShapes {
        self.shapes
    }
}

/// Expansion with caller-chosen collaborators.
pub struct Expander<'a> {
    distances: &'a Distances,
    resolver: &'a dyn LayerResolver,
    rules: &'a DerivationRules,
}

impl<'a> Expander<'a> {
    #[must_use]
    pub fn new(
        distances: &'a Distances,
        resolver: &'a dyn LayerResolver,
        rules: &'a DerivationRules,
    ) -> Self {
        Self {
            distances,
            resolver,
            rules,
        }
    }

    pub fn expand(&self, def: &FootprintDefinition) -> Result<SheetShapes, FootprintError> {
        let mut shapes = SheetShapes::new();

        self.process_pins(def, &mut shapes)?;
        self.import(Sheet::Pours, &def.layout.pours, &mut shapes)?;
        self.import(Sheet::Conductor, &def.layout.conductor, &mut shapes)?;
        self.import(Sheet::Silkscreen, &def.layout.silkscreen, &mut shapes)?;
        self.import(Sheet::Soldermask, &def.layout.soldermask, &mut shapes)?;
        self.import(Sheet::Assembly, &def.layout.assembly, &mut shapes)?;

        debug!(
            pins = def.pins.len(),
            pads = def.pads.len(),
            shapes = shapes.len(),
            "expanded footprint"
        );
        Ok(shapes)
    }

    fn process_pins(
        &self,
        def: &FootprintDefinition,
        shapes: &mut SheetShapes,
    ) -> Result<(), FootprintError> {
        for (pin_name, pin) in &def.pins {
            let pad = def
                .pads
                .get(&pin.pad)
                .ok_or_else(|| FootprintError::UnknownPad {
                    pin: pin_name.clone(),
                    pad: pin.pad.clone(),
                })?;
            trace!(pin = %pin_name, pad = %pin.pad, shapes = pad.shapes.len(), "placing pin");

            for pad_shape in &pad.shapes {
                let placed = place_pad_shape(pad_shape, pin);
                for layer in self.pad_layers(pad_shape)? {
                    let mut conductor = Shape::new(&placed)?;
                    if pin.show_label {
                        conductor.set_label(pin.label.as_deref().unwrap_or(pin_name));
                        conductor.set_label_style_class(PAD_LABEL_CLASS);
                    }
                    shapes.push(Sheet::Conductor, &layer, conductor);

                    for (sheet, sheet_override, distances) in [
                        (
                            Sheet::Soldermask,
                            &pad_shape.soldermask,
                            &self.distances.soldermask,
                        ),
                        (
                            Sheet::Solderpaste,
                            &pad_shape.solderpaste,
                            &self.distances.solderpaste,
                        ),
                    ] {
                        let protective = self.protective_shapes(
                            sheet_override,
                            distances,
                            pad_shape,
                            &placed,
                            pin,
                        )?;
                        for shape in protective {
                            shapes.push(sheet, &layer, shape);
                        }
                    }
                }
            }

            for drill in &pad.drills {
                let placed = drill
                    .clone()
                    .with_kind_or(ShapeKind::Drill)
                    .with_location(pin.location + drill.location);
                shapes.push(Sheet::Drills, DRILL_LAYER, Shape::new(&placed)?);
            }
        }
        Ok(())
    }

    /// Soldermask or solderpaste shapes for one pad shape on one layer.
    fn protective_shapes(
        &self,
        sheet_override: &SheetOverride,
        distances: &SheetDistances,
        pad_shape: &ShapeDecl,
        placed: &ShapeDecl,
        pin: &PinDecl,
    ) -> Result<Vec<Shape>, FootprintError> {
        Ok(match sheet_override {
            SheetOverride::Derive => vec![Shape::new(&self.rules.derive(placed, distances)?)?],
            SheetOverride::Suppress => Vec::new(),
            SheetOverride::Same => vec![Shape::new(placed)?],
            SheetOverride::Explicit(decls) => decls
                .iter()
                .map(|decl| {
                    // Explicit shapes sit on the pad shape's unrotated offset; their own
                    // `location` is not used.
                    let adjusted = decl
                        .clone()
                        .with_rotate(decl.rotate + pin.rotate)
                        .with_location(pad_shape.location + pin.location);
                    Shape::new(&adjusted)
                })
                .collect::<Result<_, _>>()?,
        })
    }

    /// Copy footprint-level shapes onto `sheet`.
    fn import(
        &self,
        sheet: Sheet,
        decls: &[ShapeDecl],
        shapes: &mut SheetShapes,
    ) -> Result<(), FootprintError> {
        // Bottom silkscreen/conductor/soldermask text reads mirrored unless told otherwise.
        let mirror_bottom_text = matches!(
            sheet,
            Sheet::Conductor | Sheet::Silkscreen | Sheet::Soldermask
        );
        for decl in decls {
            for layer in self.layout_layers(decl)? {
                let shape = if mirror_bottom_text
                    && layer == BOTTOM
                    && decl.is_kind(&ShapeKind::Text)
                    && decl.mirror.is_none()
                {
                    Shape::new(&decl.clone().with_mirror(true))?
                } else {
                    Shape::new(decl)?
                };
                shapes.push(sheet, &layer, shape);
            }
        }
        trace!(sheet = %sheet, shapes = decls.len(), "imported layout shapes");
        Ok(())
    }

    /// Pad shapes default to `top` only when `layers` is absent; an empty list places nothing.
    fn pad_layers(&self, decl: &ShapeDecl) -> Result<Vec<String>, FootprintError> {
        match &decl.layers {
            Some(tokens) => Ok(self.resolver.expand(tokens)?),
            None => Ok(self.resolver.expand(&[TOP.to_string()])?),
        }
    }

    /// Layout shapes default to `top` when `layers` is absent or empty.
    fn layout_layers(&self, decl: &ShapeDecl) -> Result<Vec<String>, FootprintError> {
        match decl.layers.as_deref() {
            Some(tokens) if !tokens.is_empty() => Ok(self.resolver.expand(tokens)?),
            _ => Ok(self.resolver.expand(&[TOP.to_string()])?),
        }
    }
}

/// Absolute placement of a pad shape for `pin`.
///
/// The local offset is added to the pin location without turning it by the pin rotation;
/// rotations are summed. With a `rotate-origin` the location orbits that point instead.
fn place_pad_shape(pad_shape: &ShapeDecl, pin: &PinDecl) -> ShapeDecl {
    let rotate = pad_shape.rotate + pin.rotate;
    let mut location = pin.location + pad_shape.location;
    if let Some(origin) = pad_shape.rotate_origin.filter(|o| !o.is_origin()) {
        location.rotate(rotate, Some(origin + location));
    }
    pad_shape
        .clone()
        .with_location(location)
        .with_rotate(rotate)
}
