use thiserror::Error;

use crate::identity::RendererId;

#[derive(Error, Debug)]
pub enum RendererError {
    #[error(
        "Column '{column}' of table '{category}' is already owned by renderer '{existing_owner}', \
         renderer '{new_owner}' cannot claim it"
    )]
    SchemaCollision {
        category: String,
        column: String,
        existing_owner: RendererId,
        new_owner: RendererId,
    },

    #[error("Design '{design}' cannot host renderers: it does not expose {missing}")]
    NotBoundDesign { design: String, missing: &'static str },

    #[error("Renderer name '{name}' is already used by '{existing}', renderer '{identity}' cannot be loaded")]
    DuplicateName {
        name: String,
        existing: RendererId,
        identity: RendererId,
    },

    #[error("Renderer '{0}' has not been loaded")]
    NotLoaded(RendererId),

    #[error("Renderer '{0}' has not been instantiated")]
    NotFound(RendererId),

    #[error("Initialization of renderer '{identity}' failed: {source}")]
    InitializationFailed {
        identity: RendererId,
        source: Box<RendererError>,
    },

    #[error("Renderer operation '{operation}' is not implemented by this backend")]
    NotImplemented { operation: String },

    #[error("Element '{element}' belongs to table '{category}', which this renderer cannot draw")]
    UnknownElementCategory { category: String, element: String },

    #[error("Component '{0}' not found in the design")]
    UnknownComponent(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid renderer settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RendererError {
    pub fn not_implemented(operation: &str) -> Self {
        RendererError::NotImplemented {
            operation: operation.to_string(),
        }
    }
}

/// Conditions that are logged and reported but never abort the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    #[error("Renderer '{0}' is already loaded, doing nothing")]
    AlreadyLoaded(RendererId),

    #[error("Default options for renderer '{identity}' are missing from design '{design}' (key '{key}')")]
    TemplateMissing {
        identity: RendererId,
        design: String,
        key: String,
    },

    #[error("Default for column '{column}' of table '{table}' was not added to the design (status {status})")]
    TableDataRejected {
        table: String,
        column: String,
        status: u8,
    },
}
