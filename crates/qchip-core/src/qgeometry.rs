//! Geometry tables: one table per element category, holding the element rows
//! of every component plus the column defaults contributed by renderers.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DesignError;
use crate::geometry::{BBox, Path, Polygon};

/// Name of a geometry table, e.g. `"path"` or `"poly"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementCategory(String);

impl ElementCategory {
    pub const PATH: &'static str = "path";
    pub const POLY: &'static str = "poly";

    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn path() -> Self {
        Self::new(Self::PATH)
    }

    pub fn poly() -> Self {
        Self::new(Self::POLY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ElementCategory {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementCategory {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage kind of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Str,
    Int,
    Float,
    Bool,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Str => "str",
            ColumnKind::Int => "int",
            ColumnKind::Float => "float",
            ColumnKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A typed cell value for a renderer column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ColumnValue {
    /// The column kind this value would declare if used as an example value.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValue::Bool(_) => ColumnKind::Bool,
            ColumnValue::Int(_) => ColumnKind::Int,
            ColumnValue::Float(_) => ColumnKind::Float,
            ColumnValue::Str(_) => ColumnKind::Str,
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Str(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Str(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Bool(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Int(value)
    }
}

impl From<i32> for ColumnValue {
    fn from(value: i32) -> Self {
        ColumnValue::Int(value as i64)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Float(value)
    }
}

/// Shape carried by an element row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Path(Path),
    Poly(Polygon),
}

impl Geometry {
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            Geometry::Path(p) => p.bbox(),
            Geometry::Poly(p) => p.bbox(),
        }
    }
}

/// One row of a geometry table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QGeometryElement {
    pub name: String,
    pub component: String,
    pub category: ElementCategory,
    pub geometry: Geometry,
    pub layer: u32,
    pub chip: String,
    /// Subtracted from the ground plane rather than drawn.
    pub subtract: bool,
    /// Per-row renderer column values: renderer name -> column -> value.
    pub values: IndexMap<String, IndexMap<String, ColumnValue>>,
}

impl QGeometryElement {
    pub fn new(component: &str, name: &str, category: ElementCategory, geometry: Geometry) -> Self {
        Self {
            name: name.to_string(),
            component: component.to_string(),
            category,
            geometry,
            layer: 1,
            chip: "main".to_string(),
            subtract: false,
            values: IndexMap::new(),
        }
    }

    pub fn path(component: &str, name: &str, path: Path) -> Self {
        Self::new(component, name, ElementCategory::path(), Geometry::Path(path))
    }

    pub fn poly(component: &str, name: &str, polygon: Polygon) -> Self {
        Self::new(component, name, ElementCategory::poly(), Geometry::Poly(polygon))
    }

    pub fn with_value(mut self, renderer: &str, column: &str, value: impl Into<ColumnValue>) -> Self {
        self.values
            .entry(renderer.to_string())
            .or_default()
            .insert(column.to_string(), value.into());
        self
    }

    /// This row's own value of a renderer column, without table defaults.
    pub fn value(&self, renderer: &str, column: &str) -> Option<&ColumnValue> {
        self.values.get(renderer)?.get(column)
    }
}

/// Outcome of [`QGeometryTables::add_default_data`]. `Added` (code 5) is the
/// only accepted status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TableDataStatus {
    EmptyName = 1,
    UnknownTable = 2,
    Conflict = 3,
    Added = 5,
}

impl TableDataStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_accepted(self) -> bool {
        self == TableDataStatus::Added
    }
}

type RendererDefaults = IndexMap<String, IndexMap<String, ColumnValue>>;
type RendererColumns = IndexMap<String, IndexMap<String, ColumnKind>>;

/// The geometry tables of one design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QGeometryTables {
    tables: IndexMap<ElementCategory, Vec<QGeometryElement>>,
    /// table -> renderer name -> column -> kind
    columns: IndexMap<ElementCategory, RendererColumns>,
    /// table -> renderer name -> column -> default value
    renderer_defaults: IndexMap<ElementCategory, RendererDefaults>,
}

impl QGeometryTables {
    pub fn new() -> Self {
        let mut tables = IndexMap::new();
        tables.insert(ElementCategory::path(), Vec::new());
        tables.insert(ElementCategory::poly(), Vec::new());
        Self {
            tables,
            columns: IndexMap::new(),
            renderer_defaults: IndexMap::new(),
        }
    }

    /// Add an extra table. Returns false if it already exists.
    pub fn register_table(&mut self, category: ElementCategory) -> bool {
        if self.tables.contains_key(&category) {
            return false;
        }
        log::debug!("Registered geometry table '{}'", category);
        self.tables.insert(category, Vec::new());
        true
    }

    pub fn has_table(&self, category: &str) -> bool {
        self.tables.contains_key(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &ElementCategory> {
        self.tables.keys()
    }

    // ── Rows ─────────────────────────────────────────────────────────

    /// Append a row. Every per-row value must belong to a declared renderer
    /// column of the row's table and match that column's kind.
    pub fn add_element(&mut self, element: QGeometryElement) -> Result<(), DesignError> {
        if !self.tables.contains_key(&element.category) {
            return Err(DesignError::UnknownTable(element.category.to_string()));
        }
        for (renderer, values) in &element.values {
            for (column, value) in values {
                let table = element.category.as_str();
                match self.column_kind(table, renderer, column) {
                    None => {
                        return Err(DesignError::UnknownColumn {
                            table: table.to_string(),
                            renderer: renderer.clone(),
                            column: column.clone(),
                        })
                    }
                    Some(kind) if kind != value.kind() => {
                        return Err(DesignError::ColumnKindMismatch {
                            table: table.to_string(),
                            renderer: renderer.clone(),
                            column: column.clone(),
                            expected: kind,
                            found: value.kind(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        if let Some(rows) = self.tables.get_mut(&element.category) {
            rows.push(element);
        }
        Ok(())
    }

    pub fn elements(&self, category: &str) -> &[QGeometryElement] {
        self.tables.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rows of one component, table by table in table order.
    pub fn component_elements(&self, component: &str) -> Vec<&QGeometryElement> {
        self.tables
            .values()
            .flatten()
            .filter(|e| e.component == component)
            .collect()
    }

    pub fn remove_component(&mut self, component: &str) -> usize {
        let mut removed = 0;
        for rows in self.tables.values_mut() {
            let before = rows.len();
            rows.retain(|e| e.component != component);
            removed += before - rows.len();
        }
        removed
    }

    pub fn element_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    // ── Renderer columns ─────────────────────────────────────────────

    /// Declare a typed renderer column, creating the table if needed. An
    /// identical declaration is accepted again; a different kind is a
    /// conflict and leaves the declaration as it was.
    pub fn add_renderer_column(
        &mut self,
        table: &str,
        renderer: &str,
        column: &str,
        kind: ColumnKind,
    ) -> TableDataStatus {
        if table.is_empty() || renderer.is_empty() || column.is_empty() {
            return TableDataStatus::EmptyName;
        }
        self.register_table(ElementCategory::new(table));

        let columns = self
            .columns
            .entry(ElementCategory::new(table))
            .or_default()
            .entry(renderer.to_string())
            .or_default();
        match columns.get(column) {
            Some(existing) if *existing != kind => TableDataStatus::Conflict,
            Some(_) => TableDataStatus::Added,
            None => {
                columns.insert(column.to_string(), kind);
                TableDataStatus::Added
            }
        }
    }

    pub fn column_kind(&self, table: &str, renderer: &str, column: &str) -> Option<ColumnKind> {
        self.columns.get(table)?.get(renderer)?.get(column).copied()
    }

    pub fn renderer_columns(&self, table: &str, renderer: &str) -> Option<&IndexMap<String, ColumnKind>> {
        self.columns.get(table)?.get(renderer)
    }

    /// Record the default value of a renderer column. An identical value
    /// already on file is accepted; a different one is never overwritten.
    pub fn add_default_data(
        &mut self,
        table: &str,
        renderer: &str,
        column: &str,
        value: &ColumnValue,
    ) -> TableDataStatus {
        if table.is_empty() || renderer.is_empty() || column.is_empty() {
            return TableDataStatus::EmptyName;
        }
        if !self.tables.contains_key(table) {
            return TableDataStatus::UnknownTable;
        }
        if self
            .column_kind(table, renderer, column)
            .is_some_and(|kind| kind != value.kind())
        {
            return TableDataStatus::Conflict;
        }

        let columns = self
            .renderer_defaults
            .entry(ElementCategory::new(table))
            .or_default()
            .entry(renderer.to_string())
            .or_default();

        match columns.get(column) {
            Some(existing) if existing != value => TableDataStatus::Conflict,
            Some(_) => TableDataStatus::Added,
            None => {
                columns.insert(column.to_string(), value.clone());
                TableDataStatus::Added
            }
        }
    }

    pub fn default_value(&self, table: &str, renderer: &str, column: &str) -> Option<&ColumnValue> {
        self.renderer_defaults.get(table)?.get(renderer)?.get(column)
    }

    /// Value of a renderer column for one row, falling back to the table default.
    pub fn element_value<'a>(
        &'a self,
        element: &'a QGeometryElement,
        renderer: &str,
        column: &str,
    ) -> Option<&'a ColumnValue> {
        element
            .value(renderer, column)
            .or_else(|| self.default_value(element.category.as_str(), renderer, column))
    }
}

impl Default for QGeometryTables {
    fn default() -> Self {
        Self::new()
    }
}
