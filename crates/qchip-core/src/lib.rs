//! # QChip Core
//!
//! Design-side data for superconducting chip layouts: the nested options
//! model with deep merge, geometry value types, per-design geometry tables
//! with renderer-owned columns, the renderer template store, and the
//! `QDesign` container that ties them together.

pub mod design;
pub mod error;
pub mod geometry;
pub mod logger;
pub mod options;
pub mod qgeometry;
pub mod template;

pub use design::{Chip, Component, QDesign};
pub use error::DesignError;
pub use geometry::{BBox, Path, Point, Polygon};
pub use logger::DesignLogger;
pub use options::{OptionValue, OptionsModel};
pub use qgeometry::{
    ColumnKind, ColumnValue, ElementCategory, Geometry, QGeometryElement,
    QGeometryTables, TableDataStatus,
};
pub use template::TemplateStore;
