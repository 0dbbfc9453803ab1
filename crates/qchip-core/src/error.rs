use thiserror::Error;

use crate::qgeometry::ColumnKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    #[error("Geometry table '{0}' does not exist")]
    UnknownTable(String),

    #[error("Component '{0}' already exists in the design")]
    DuplicateComponent(String),

    #[error("Component '{0}' not found in the design")]
    UnknownComponent(String),

    #[error("Chip '{0}' already exists in the design")]
    DuplicateChip(String),

    #[error("Element '{element}' refers to chip '{chip}', which is not part of the design")]
    UnknownChip { element: String, chip: String },

    #[error("Table '{table}' has no column '{column}' for renderer '{renderer}'")]
    UnknownColumn {
        table: String,
        renderer: String,
        column: String,
    },

    #[error("Column '{column}' of renderer '{renderer}' in table '{table}' holds {expected} values, got {found}")]
    ColumnKindMismatch {
        table: String,
        renderer: String,
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },
}
