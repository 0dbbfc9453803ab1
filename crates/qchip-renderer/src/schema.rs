use indexmap::IndexMap;
use qchip_core::{ColumnKind, ElementCategory};

use crate::error::RendererError;
use crate::identity::RendererId;

/// Renderer columns per table: `category -> column -> kind`.
pub type SchemaExtension = IndexMap<ElementCategory, IndexMap<String, ColumnKind>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub kind: ColumnKind,
    pub owner: RendererId,
}

/// The renderer columns of every loaded renderer, per element category.
/// A column name belongs to exactly one renderer within a category.
#[derive(Debug, Default, Clone)]
pub struct SchemaExtensionRegistry {
    schema: IndexMap<ElementCategory, IndexMap<String, SchemaColumn>>,
}

impl SchemaExtensionRegistry {
    pub fn new() -> Self {
        Self {
            schema: IndexMap::new(),
        }
    }

    /// Record every column of `extension` under `owner`.
    ///
    /// All columns are checked before any is written, so a collision leaves
    /// the registry exactly as it was. Returns the number of new columns.
    pub fn register(&mut self, owner: &RendererId, extension: &SchemaExtension) -> Result<usize, RendererError> {
        for (category, columns) in extension {
            let Some(existing) = self.schema.get(category) else {
                continue;
            };
            for column in columns.keys() {
                if let Some(claimed) = existing.get(column) {
                    if &claimed.owner != owner {
                        return Err(RendererError::SchemaCollision {
                            category: category.to_string(),
                            column: column.clone(),
                            existing_owner: claimed.owner.clone(),
                            new_owner: owner.clone(),
                        });
                    }
                }
            }
        }

        let mut added = 0;
        for (category, columns) in extension {
            let table = self.schema.entry(category.clone()).or_default();
            for (column, kind) in columns {
                if table.contains_key(column) {
                    continue;
                }
                table.insert(
                    column.clone(),
                    SchemaColumn {
                        kind: *kind,
                        owner: owner.clone(),
                    },
                );
                added += 1;
            }
        }
        log::debug!("Registered {} renderer columns for '{}'", added, owner);
        Ok(added)
    }

    /// Column kinds of one category, for materialising table storage.
    pub fn columns(&self, category: &str) -> IndexMap<String, ColumnKind> {
        self.schema
            .get(category)
            .map(|columns| {
                columns
                    .iter()
                    .map(|(name, column)| (name.clone(), column.kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn column(&self, category: &str, column: &str) -> Option<&SchemaColumn> {
        self.schema.get(category)?.get(column)
    }

    pub fn owner(&self, category: &str, column: &str) -> Option<&RendererId> {
        self.column(category, column).map(|c| &c.owner)
    }

    /// Every column owned by `owner`, per category, in registration order.
    pub fn owned_columns(&self, owner: &RendererId) -> SchemaExtension {
        self.schema
            .iter()
            .filter_map(|(category, columns)| {
                let owned: IndexMap<String, ColumnKind> = columns
                    .iter()
                    .filter(|(_, column)| &column.owner == owner)
                    .map(|(name, column)| (name.clone(), column.kind))
                    .collect();
                (!owned.is_empty()).then(|| (category.clone(), owned))
            })
            .collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = &ElementCategory> {
        self.schema.keys()
    }

    pub fn column_count(&self) -> usize {
        self.schema.values().map(IndexMap::len).sum()
    }
}
