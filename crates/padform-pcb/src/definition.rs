use indexmap::IndexMap;
use padform_core::Point;
use padform_geometry::{SheetOverride, ShapeDecl, ShapeKind};
use padform_parser::Value;
use tracing::trace;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DefinitionError {
    #[error("invalid footprint definition at {0}")]
    Invalid(String),
    #[error("invalid number at {0}")]
    InvalidNumber(String),
    #[error("invalid point at {0}")]
    InvalidPoint(String),
    #[error("invalid string at {0}")]
    InvalidString(String),
    #[error("invalid bool at {0}")]
    InvalidBool(String),
    #[error("missing {0}")]
    Missing(String),
}

/// A footprint document: pins placing pads, plus footprint-level layout shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FootprintDefinition {
    pub pins: IndexMap<String, PinDecl>,
    pub pads: IndexMap<String, PadDecl>,
    pub layout: LayoutDecl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinDecl {
    pub location: Point,
    pub rotate: f64,
    pub pad: String,
    pub label: Option<String>,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PadDecl {
    pub shapes: Vec<ShapeDecl>,
    pub drills: Vec<ShapeDecl>,
}

/// Footprint-level shapes. A missing section reads as empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutDecl {
    pub pours: Vec<ShapeDecl>,
    pub conductor: Vec<ShapeDecl>,
    pub silkscreen: Vec<ShapeDecl>,
    pub soldermask: Vec<ShapeDecl>,
    pub assembly: Vec<ShapeDecl>,
}

/// Key holding the logical layer set of assembly shapes.
///
/// Every other section uses `layers`; existing documents depend on the difference.
const ASSEMBLY_LAYER_KEY: &str = "layer";
const LAYERS_KEY: &str = "layers";

pub fn parse_footprint_definition(value: &Value) -> Result<FootprintDefinition, DefinitionError> {
    let Value::Map(map) = value else {
        return Err(DefinitionError::Invalid("root must be a map".into()));
    };

    let pins = match map.get("pins") {
        Some(Value::Map(pins)) => parse_pins(pins)?,
        Some(Value::Null) | None => IndexMap::new(),
        _ => return Err(DefinitionError::Invalid("pins".into())),
    };
    let pads = match map.get("pads") {
        Some(Value::Map(pads)) => parse_pads(pads)?,
        Some(Value::Null) | None => IndexMap::new(),
        _ => return Err(DefinitionError::Invalid("pads".into())),
    };
    let layout = parse_layout(value)?;

    Ok(FootprintDefinition { pins, pads, layout })
}

fn parse_pins(
    map: &IndexMap<String, Value>,
) -> Result<IndexMap<String, PinDecl>, DefinitionError> {
    let mut out = IndexMap::new();
    for (name, v) in map {
        let at = format!("pins.{name}.layout");
        let Some(Value::Map(layout)) = v.get("layout") else {
            return Err(DefinitionError::Missing(at));
        };
        let pad = layout
            .get("pad")
            .and_then(value_as_name)
            .ok_or_else(|| DefinitionError::Missing(format!("{at}.pad")))?;
        let label = match layout.get("label") {
            Some(Value::Null) | None => None,
            Some(v) => Some(
                value_as_name(v).ok_or_else(|| DefinitionError::InvalidString(format!("{at}.label")))?,
            ),
        };
        out.insert(
            name.clone(),
            PinDecl {
                location: parse_point_opt(layout.get("location"), &format!("{at}.location"))?
                    .unwrap_or_default(),
                rotate: parse_number_opt(layout.get("rotate"), &format!("{at}.rotate"))?
                    .unwrap_or(0.0),
                pad,
                label,
                show_label: parse_bool_opt(layout.get("show-label"), &format!("{at}.show-label"))?
                    .unwrap_or(true),
            },
        );
    }
    Ok(out)
}

fn parse_pads(map: &IndexMap<String, Value>) -> Result<IndexMap<String, PadDecl>, DefinitionError> {
    let mut out = IndexMap::new();
    for (name, v) in map {
        let at = format!("pads.{name}");
        let Value::Map(pad) = v else {
            return Err(DefinitionError::Invalid(at));
        };
        out.insert(
            name.clone(),
            PadDecl {
                shapes: parse_shape_list(pad.get("shapes"), &format!("{at}.shapes"), LAYERS_KEY)?,
                drills: parse_shape_list(pad.get("drills"), &format!("{at}.drills"), LAYERS_KEY)?,
            },
        );
    }
    Ok(out)
}

fn parse_layout(root: &Value) -> Result<LayoutDecl, DefinitionError> {
    Ok(LayoutDecl {
        pours: parse_section(root, "pours", LAYERS_KEY)?,
        conductor: parse_section(root, "conductor", LAYERS_KEY)?,
        silkscreen: parse_section(root, "silkscreen", LAYERS_KEY)?,
        soldermask: parse_section(root, "soldermask", LAYERS_KEY)?,
        assembly: parse_section(root, "assembly", ASSEMBLY_LAYER_KEY)?,
    })
}

/// Shapes of `layout.<sheet>`. Anything but a sequence at `layout.<sheet>.shapes` is no shapes.
fn parse_section(
    root: &Value,
    sheet: &str,
    layers_key: &str,
) -> Result<Vec<ShapeDecl>, DefinitionError> {
    let at = format!("layout.{sheet}.shapes");
    let section = root.get_path(&at);
    match section.and_then(Value::as_seq) {
        Some(seq) => seq
            .iter()
            .enumerate()
            .map(|(i, item)| parse_shape_decl(item, &format!("{at}[{i}]"), layers_key))
            .collect(),
        None => {
            if section.is_some_and(|v| !v.is_null())
                || root
                    .get_path(&format!("layout.{sheet}"))
                    .is_some_and(|v| v.as_map().is_none() && !v.is_null())
            {
                trace!(section = %at, "skipping malformed layout section");
            }
            Ok(Vec::new())
        }
    }
}

fn parse_shape_list(
    v: Option<&Value>,
    at: &str,
    layers_key: &str,
) -> Result<Vec<ShapeDecl>, DefinitionError> {
    match v {
        Some(Value::Seq(seq)) => seq
            .iter()
            .enumerate()
            .map(|(i, item)| parse_shape_decl(item, &format!("{at}[{i}]"), layers_key))
            .collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        _ => Err(DefinitionError::Invalid(at.to_string())),
    }
}

/// Parse one shape declaration. `layers_key` names the key holding its logical layers.
pub fn parse_shape_decl(
    v: &Value,
    at: &str,
    layers_key: &str,
) -> Result<ShapeDecl, DefinitionError> {
    let Value::Map(map) = v else {
        return Err(DefinitionError::Invalid(at.to_string()));
    };

    let mut decl = ShapeDecl::new(ShapeKind::Rect);
    decl.kind = match map.get("type") {
        Some(Value::String(s)) => Some(ShapeKind::from(s.as_str())),
        Some(Value::Null) | None => None,
        Some(_) => return Err(DefinitionError::InvalidString(format!("{at}.type"))),
    };

    for (key, value) in map {
        let key_at = || format!("{at}.{key}");
        match key.as_str() {
            "type" => {}
            "location" => decl.location = parse_point(value, &key_at())?,
            "rotate" => decl.rotate = parse_number(value, &key_at())?,
            "scale" => decl.scale = Some(parse_number(value, &key_at())?),
            "width" => decl.width = Some(parse_number(value, &key_at())?),
            "height" => decl.height = Some(parse_number(value, &key_at())?),
            "diameter" => decl.diameter = Some(parse_number(value, &key_at())?),
            // `value` wins over its aliases regardless of key order.
            "value" => decl.value = Some(parse_string(value, &key_at())?),
            "d" | "text" => {
                if !map.contains_key("value") && decl.value.is_none() {
                    decl.value = Some(parse_string(value, &key_at())?);
                }
            }
            "mirror" => decl.mirror = parse_bool_opt(Some(value), &key_at())?,
            "rotate-origin" => decl.rotate_origin = parse_point_opt(Some(value), &key_at())?,
            "soldermask" => decl.soldermask = parse_override(value, &key_at())?,
            "solderpaste" => decl.solderpaste = parse_override(value, &key_at())?,
            k if k == layers_key => decl.layers = parse_layer_tokens(value, &key_at())?,
            _ => {
                decl.extra.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(decl)
}

fn parse_override(v: &Value, at: &str) -> Result<SheetOverride, DefinitionError> {
    match v {
        Value::Null => Ok(SheetOverride::Derive),
        Value::String(s) => match s.as_str() {
            "none" => Ok(SheetOverride::Suppress),
            "same" => Ok(SheetOverride::Same),
            _ => Err(DefinitionError::InvalidString(at.to_string())),
        },
        v if v.is_empty_collection() => Ok(SheetOverride::Suppress),
        Value::Map(_) => Ok(SheetOverride::Explicit(vec![parse_shape_decl(
            v, at, LAYERS_KEY,
        )?])),
        Value::Seq(seq) => seq
            .iter()
            .enumerate()
            .map(|(i, item)| parse_shape_decl(item, &format!("{at}[{i}]"), LAYERS_KEY))
            .collect::<Result<Vec<_>, _>>()
            .map(SheetOverride::Explicit),
        _ => Err(DefinitionError::Invalid(at.to_string())),
    }
}

fn parse_layer_tokens(v: &Value, at: &str) -> Result<Option<Vec<String>>, DefinitionError> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(vec![s.clone()])),
        Value::Seq(seq) => seq
            .iter()
            .map(|t| {
                t.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| DefinitionError::InvalidString(at.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Err(DefinitionError::InvalidString(at.to_string())),
    }
}

fn parse_point(v: &Value, at: &str) -> Result<Point, DefinitionError> {
    match v {
        Value::Seq(seq) if seq.len() == 2 => Ok(Point::new(
            parse_number(&seq[0], at)?,
            parse_number(&seq[1], at)?,
        )),
        _ => Err(DefinitionError::InvalidPoint(at.to_string())),
    }
}

fn parse_point_opt(v: Option<&Value>, at: &str) -> Result<Option<Point>, DefinitionError> {
    match v {
        Some(Value::Null) | None => Ok(None),
        Some(v) => parse_point(v, at).map(Some),
    }
}

fn parse_number(v: &Value, at: &str) -> Result<f64, DefinitionError> {
    match v {
        Value::Number(n) => Ok(*n),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| DefinitionError::InvalidNumber(at.to_string())),
        _ => Err(DefinitionError::InvalidNumber(at.to_string())),
    }
}

fn parse_number_opt(v: Option<&Value>, at: &str) -> Result<Option<f64>, DefinitionError> {
    match v {
        Some(Value::Null) | None => Ok(None),
        Some(v) => parse_number(v, at).map(Some),
    }
}

fn parse_string(v: &Value, at: &str) -> Result<String, DefinitionError> {
    value_as_name(v).ok_or_else(|| DefinitionError::InvalidString(at.to_string()))
}

fn parse_bool_opt(v: Option<&Value>, at: &str) -> Result<Option<bool>, DefinitionError> {
    match v {
        Some(Value::Null) | None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        // Older documents spell booleans as strings.
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(_) => Err(DefinitionError::InvalidBool(at.to_string())),
    }
}

/// Names and labels may be written as bare numbers (`pad: 1`).
fn value_as_name(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(yaml: &str) -> Result<ShapeDecl, DefinitionError> {
        parse_shape_decl(&Value::from_yaml_str(yaml).unwrap(), "shape", LAYERS_KEY)
    }

    #[test]
    fn shape_decl_known_keys_and_extras() {
        let d = decl(
            "{type: rect, width: 1, height: '2.5', location: [1, -1], rotate: 45, style: 'fill:none', layers: [top, bottom]}",
        )
        .unwrap();
        assert_eq!(d.kind, Some(ShapeKind::Rect));
        assert_eq!(d.width, Some(1.0));
        assert_eq!(d.height, Some(2.5));
        assert_eq!(d.location, Point::new(1.0, -1.0));
        assert_eq!(d.rotate, 45.0);
        assert_eq!(d.layers, Some(vec!["top".to_string(), "bottom".to_string()]));
        assert_eq!(d.extra.get("style"), Some(&Value::String("fill:none".into())));
        assert_eq!(d.soldermask, SheetOverride::Derive);
    }

    #[test]
    fn single_layer_token_and_null() {
        assert_eq!(decl("{type: text, layers: bottom}").unwrap().layers, Some(vec!["bottom".into()]));
        assert_eq!(decl("{type: text, layers: ~}").unwrap().layers, None);
    }

    #[test]
    fn path_data_aliases() {
        assert_eq!(decl("{type: path, d: 'm 0,0 h 1'}").unwrap().value.as_deref(), Some("m 0,0 h 1"));
        assert_eq!(
            decl("{type: path, d: 'm 1,1', value: 'm 0,0'}").unwrap().value.as_deref(),
            Some("m 0,0")
        );
        assert_eq!(decl("{type: text, text: 'REF'}").unwrap().value.as_deref(), Some("REF"));
    }

    #[test]
    fn override_forms() {
        assert_eq!(decl("{type: rect, soldermask: []}").unwrap().soldermask, SheetOverride::Suppress);
        assert_eq!(decl("{type: rect, soldermask: {}}").unwrap().soldermask, SheetOverride::Suppress);
        assert_eq!(decl("{type: rect, solderpaste: none}").unwrap().solderpaste, SheetOverride::Suppress);
        assert_eq!(decl("{type: rect, solderpaste: same}").unwrap().solderpaste, SheetOverride::Same);
        assert_eq!(decl("{type: rect, soldermask: ~}").unwrap().soldermask, SheetOverride::Derive);

        let single = decl("{type: rect, soldermask: {type: circle, diameter: 1}}").unwrap();
        let SheetOverride::Explicit(list) = single.soldermask else {
            panic!("expected explicit override");
        };
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].diameter, Some(1.0));

        let many = decl("{type: rect, solderpaste: [{type: rect, width: 1, height: 1}, {type: circle, diameter: 2}]}")
            .unwrap();
        assert!(matches!(many.solderpaste, SheetOverride::Explicit(ref l) if l.len() == 2));

        assert_eq!(
            decl("{type: rect, soldermask: maybe}").unwrap_err(),
            DefinitionError::InvalidString("shape.soldermask".into())
        );
    }

    #[test]
    fn mirror_accepts_string_booleans() {
        assert_eq!(decl("{type: text, mirror: 'True'}").unwrap().mirror, Some(true));
        assert_eq!(decl("{type: text, mirror: false}").unwrap().mirror, Some(false));
        assert!(decl("{type: text, mirror: 3}").is_err());
    }

    #[test]
    fn bad_location_reports_path() {
        assert_eq!(
            decl("{type: rect, location: [1]}").unwrap_err(),
            DefinitionError::InvalidPoint("shape.location".into())
        );
    }

    #[test]
    fn assembly_reads_singular_layer_key() {
        let v = Value::from_yaml_str(
            r#"
layout:
  assembly:
    shapes:
      - {type: rect, width: 1, height: 1, layer: [bottom], layers: [top]}
  silkscreen:
    shapes:
      - {type: rect, width: 1, height: 1, layer: [bottom], layers: [top]}
"#,
        )
        .unwrap();
        let def = parse_footprint_definition(&v).unwrap();
        assert_eq!(def.layout.assembly[0].layers, Some(vec!["bottom".into()]));
        assert!(def.layout.assembly[0].extra.contains_key("layers"));
        assert_eq!(def.layout.silkscreen[0].layers, Some(vec!["top".into()]));
        assert!(def.layout.silkscreen[0].extra.contains_key("layer"));
    }

    #[test]
    fn missing_sections_read_as_empty() {
        let v = Value::from_yaml_str("layout: {pours: {}, silkscreen: {shapes: ~}}").unwrap();
        let def = parse_footprint_definition(&v).unwrap();
        assert!(def.pins.is_empty());
        assert!(def.pads.is_empty());
        assert_eq!(def.layout, LayoutDecl::default());
    }

    #[test]
    fn malformed_layout_sections_read_as_empty() {
        let v = Value::from_yaml_str(
            r#"
pins: {P1: {layout: {pad: smd}}}
pads: {smd: {shapes: [{type: rect, width: 1, height: 1}]}}
layout:
  pours: []
  assembly: oops
  silkscreen: {shapes: nope}
  conductor: {shapes: {type: rect}}
  soldermask: {shapes: [{type: text, value: OK}]}
"#,
        )
        .unwrap();
        let def = parse_footprint_definition(&v).unwrap();
        assert_eq!(def.pins.len(), 1);
        assert_eq!(def.pads["smd"].shapes.len(), 1);
        assert!(def.layout.pours.is_empty());
        assert!(def.layout.assembly.is_empty());
        assert!(def.layout.silkscreen.is_empty());
        assert!(def.layout.conductor.is_empty());
        assert_eq!(def.layout.soldermask.len(), 1);

        let v = Value::from_yaml_str("layout: 3").unwrap();
        assert_eq!(parse_footprint_definition(&v).unwrap().layout, LayoutDecl::default());
    }

    #[test]
    fn pad_shape_lists_stay_strict() {
        let v = Value::from_yaml_str("pads: {smd: {shapes: oops}}").unwrap();
        assert_eq!(
            parse_footprint_definition(&v).unwrap_err(),
            DefinitionError::Invalid("pads.smd.shapes".into())
        );
    }

    #[test]
    fn pins_need_layout_and_pad() {
        let v = Value::from_yaml_str("pins: {1: {layout: {location: [0, 1]}}}").unwrap();
        assert_eq!(
            parse_footprint_definition(&v).unwrap_err(),
            DefinitionError::Missing("pins.1.layout.pad".into())
        );

        let v = Value::from_yaml_str("pins: {1: {pad: smd}}").unwrap();
        assert_eq!(
            parse_footprint_definition(&v).unwrap_err(),
            DefinitionError::Missing("pins.1.layout".into())
        );
    }

    #[test]
    fn pin_defaults_and_numeric_names() {
        let v = Value::from_yaml_str("pins: {1: {layout: {pad: 2, label: 7}}}").unwrap();
        let def = parse_footprint_definition(&v).unwrap();
        let pin = &def.pins["1"];
        assert_eq!(pin.pad, "2");
        assert_eq!(pin.label.as_deref(), Some("7"));
        assert_eq!(pin.location, Point::origin());
        assert_eq!(pin.rotate, 0.0);
        assert!(pin.show_label);
    }

    #[test]
    fn null_label_means_pin_name() {
        let v = Value::from_yaml_str("pins: {P1: {layout: {pad: smd, label: ~}}}").unwrap();
        assert_eq!(parse_footprint_definition(&v).unwrap().pins["P1"].label, None);
    }
}
