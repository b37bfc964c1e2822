use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use padform_parser::{ExpandConfig, Value};
use padform_pcb::{expand_footprint_value, FootprintError, Sheet, SheetShapes};
use tracing::{debug, info};

use crate::error::CliError;

/// Load the expansion config, applying command-line overrides on top.
pub fn load_config(
    path: Option<&Path>,
    internal_layers: Option<usize>,
) -> Result<ExpandConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::input(format!("failed to read config {}: {e}", path.display()))
            })?;
            let parsed = if is_json(path) {
                ExpandConfig::from_json_str(&text)
            } else {
                ExpandConfig::from_yaml_str(&text)
            };
            parsed.map_err(|e| {
                CliError::input(format!("invalid config {}: {e}", path.display()))
            })?
        }
        None => ExpandConfig::default(),
    };
    if let Some(n) = internal_layers {
        config.stack.internal_layers = n;
    }
    debug!(?config, "expansion config");
    Ok(config)
}

/// Read one footprint document (YAML, or JSON by extension) and expand it.
pub fn expand_file(path: &Path, config: &ExpandConfig) -> Result<SheetShapes, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("failed to read {}: {e}", path.display())))?;
    let value = if is_json(path) {
        Value::try_from_json_str(&text)
    } else {
        Value::from_yaml_str(&text)
    }
    .map_err(|e| CliError::input(format!("failed to parse {}: {e}", path.display())))?;

    let shapes = expand_footprint_value(&value, config).map_err(|e| match e {
        FootprintError::Parser(_)
        | FootprintError::Definition(_)
        | FootprintError::UnknownPad { .. } => CliError::input(format!("{}: {e}", path.display())),
        FootprintError::Shape(_) | FootprintError::Layer(_) => {
            CliError::processing(format!("{}: {e}", path.display()))
        }
    })?;
    info!(path = %path.display(), shapes = shapes.len(), "expanded footprint");
    Ok(shapes)
}

/// Write `shapes` as `<stem>.shapes.json` under `out_dir`.
pub fn write_shapes(out_dir: &Path, input: &Path, shapes: &SheetShapes) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(out_dir).map_err(|e| {
        CliError::processing(format!("failed to create {}: {e}", out_dir.display()))
    })?;
    let target = out_dir.join(format!("{}.shapes.json", footprint_name(input)));
    let json = serde_json::to_string_pretty(shapes)
        .map_err(|e| CliError::processing(format!("failed to serialize shapes: {e}")))?;
    std::fs::write(&target, json)
        .map_err(|e| CliError::processing(format!("failed to write {}: {e}", target.display())))?;
    debug!(path = %target.display(), "wrote shapes");
    Ok(target)
}

pub fn footprint_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "footprint".to_string())
}

/// First footprint name shared by two inputs; their output files would collide.
pub fn duplicate_name(inputs: &[PathBuf]) -> Option<String> {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .map(|path| footprint_name(path))
        .find(|name| !seen.insert(name.clone()))
}

/// One summary line: shape counts per sheet, then drill sizes.
pub fn summary_line(name: &str, shapes: &SheetShapes) -> String {
    let mut line = format!("{name}:");
    for sheet in Sheet::ALL {
        let _ = write!(
            line,
            " {sheet}={}/{}",
            shapes.count(sheet),
            shapes.layer_count(sheet)
        );
    }
    let drills = shapes.drill_diameters();
    if !drills.is_empty() {
        let sizes: Vec<String> = drills.iter().map(|(d, n)| format!("{n}x{d}")).collect();
        let _ = write!(line, " drills[{}]", sizes.join(","));
    }
    line
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
