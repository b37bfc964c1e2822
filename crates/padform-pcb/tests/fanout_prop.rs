use indexmap::IndexMap;
use padform_core::Point;
use padform_geometry::{ShapeDecl, ShapeKind};
use padform_parser::{ExpandConfig, StackConfig};
use padform_pcb::{
    expand_footprint, FootprintDefinition, LayerResolver, LayerStack, PadDecl, PinDecl, Sheet,
};
use proptest::prelude::*;

const TOKENS: [&str; 5] = ["top", "bottom", "surface", "internal", "all"];

fn definition(pins: usize, shapes: usize, tokens: &[String]) -> FootprintDefinition {
    let shape = ShapeDecl::new(ShapeKind::Rect)
        .with_size(1.0, 1.0)
        .with_layers(tokens.iter().cloned());
    let mut pads = IndexMap::new();
    pads.insert(
        "pad".to_string(),
        PadDecl {
            shapes: vec![shape; shapes],
            drills: Vec::new(),
        },
    );
    let pins = (0..pins)
        .map(|i| {
            (
                format!("P{i}"),
                PinDecl {
                    location: Point::new(i as f64, 0.0),
                    rotate: 0.0,
                    pad: "pad".to_string(),
                    label: None,
                    show_label: true,
                },
            )
        })
        .collect();
    FootprintDefinition {
        pins,
        pads,
        ..FootprintDefinition::default()
    }
}

proptest! {
    #[test]
    fn every_layer_gets_one_shape_per_pad_shape(
        pins in 1usize..5,
        shapes in 1usize..4,
        internal in 0usize..3,
        picks in proptest::collection::vec(0usize..TOKENS.len(), 0..4),
    ) {
        let tokens: Vec<String> = picks.iter().map(|i| TOKENS[*i].to_string()).collect();
        let stack = LayerStack::new(internal);
        let layers = stack.expand(&tokens).unwrap().len();
        let cfg = ExpandConfig {
            stack: StackConfig { internal_layers: internal },
            ..ExpandConfig::default()
        };

        let out = expand_footprint(&definition(pins, shapes, &tokens), &cfg).unwrap();
        let expected = pins * shapes * layers;
        prop_assert_eq!(out.count(Sheet::Conductor), expected);
        prop_assert_eq!(out.count(Sheet::Soldermask), expected);
        prop_assert_eq!(out.count(Sheet::Solderpaste), expected);
        prop_assert_eq!(out.layer_count(Sheet::Conductor), layers);
    }
}
