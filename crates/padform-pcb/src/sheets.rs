use indexmap::IndexMap;
use padform_geometry::Shape;
use serde::Serialize;

/// Drills go through the board; they are all filed under this layer key.
pub const DRILL_LAYER: &str = "top";

/// Manufacturing purpose of a shape, independent of the physical layer it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sheet {
    Conductor,
    Pours,
    Soldermask,
    Silkscreen,
    Assembly,
    Solderpaste,
    Drills,
}

impl Sheet {
    pub const ALL: [Sheet; 7] = [
        Sheet::Conductor,
        Sheet::Pours,
        Sheet::Soldermask,
        Sheet::Silkscreen,
        Sheet::Assembly,
        Sheet::Solderpaste,
        Sheet::Drills,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Sheet::Conductor => "conductor",
            Sheet::Pours => "pours",
            Sheet::Soldermask => "soldermask",
            Sheet::Silkscreen => "silkscreen",
            Sheet::Assembly => "assembly",
            Sheet::Solderpaste => "solderpaste",
            Sheet::Drills => "drills",
        }
    }
}

impl std::fmt::Display for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shapes of one footprint, by sheet then physical layer.
///
/// Shapes within a layer keep insertion order, which is their drawing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SheetShapes {
    sheets: IndexMap<Sheet, IndexMap<String, Vec<Shape>>>,
}

impl Default for SheetShapes {
    fn default() -> Self {
        Self {
            sheets: Sheet::ALL
                .into_iter()
                .map(|sheet| (sheet, IndexMap::new()))
                .collect(),
        }
    }
}

impl SheetShapes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sheet: Sheet, layer: &str, shape: Shape) {
        self.sheets
            .entry(sheet)
            .or_default()
            .entry(layer.to_string())
            .or_default()
            .push(shape);
    }

    /// Layers of `sheet` that received at least one shape, in first-use order.
    #[must_use]
    pub fn get(&self, sheet: Sheet) -> Option<&IndexMap<String, Vec<Shape>>> {
        self.sheets.get(&sheet)
    }

    #[must_use]
    pub fn layer(&self, sheet: Sheet, layer: &str) -> &[Shape] {
        self.sheets
            .get(&sheet)
            .and_then(|layers| layers.get(layer))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sheet, &IndexMap<String, Vec<Shape>>)> {
        self.sheets.iter().map(|(sheet, layers)| (*sheet, layers))
    }

    #[must_use]
    pub fn count(&self, sheet: Sheet) -> usize {
        self.sheets
            .get(&sheet)
            .map_or(0, |layers| layers.values().map(Vec::len).sum())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        Sheet::ALL.iter().map(|s| self.count(*s)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn layer_count(&self, sheet: Sheet) -> usize {
        self.sheets.get(&sheet).map_or(0, IndexMap::len)
    }

    /// Drill diameters with how often each occurs, in first-seen order.
    #[must_use]
    pub fn drill_diameters(&self) -> Vec<(f64, usize)> {
        let mut out: Vec<(f64, usize)> = Vec::new();
        for shape in self.layer(Sheet::Drills, DRILL_LAYER) {
            let Some(d) = shape.diameter() else {
                continue;
            };
            match out.iter_mut().find(|(seen, _)| *seen == d) {
                Some((_, n)) => *n += 1,
                None => out.push((d, 1)),
            }
        }
        out
    }
}
