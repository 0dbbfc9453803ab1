use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DesignError;
use crate::geometry::{BBox, Point};
use crate::logger::DesignLogger;
use crate::options::OptionsModel;
use crate::qgeometry::{ColumnValue, QGeometryElement, QGeometryTables, TableDataStatus};
use crate::template::TemplateStore;

/// A chip (substrate) of the design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chip {
    pub name: String,
    pub size: BBox,
    pub material: String,
    pub options: OptionsModel,
}

impl Chip {
    pub fn new(name: &str, size: BBox) -> Self {
        Self {
            name: name.to_string(),
            size,
            material: "silicon".to_string(),
            options: OptionsModel::new(),
        }
    }
}

/// A placed component. Its shapes live in the design's geometry tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    /// Name of the generator that produced the component, e.g. `"TransmonPocket"`.
    pub class_name: String,
    pub options: OptionsModel,
}

impl Component {
    pub fn new(name: &str, class_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            class_name: class_name.to_string(),
            options: OptionsModel::new(),
        }
    }
}

/// The central design container: chips, components, their geometry tables,
/// and the renderer template options registered against it.
#[derive(Debug, Serialize, Deserialize)]
pub struct QDesign {
    pub id: Uuid,
    pub name: String,
    chips: IndexMap<String, Chip>,
    /// Components in insertion order.
    components: IndexMap<String, Component>,
    qgeometry: QGeometryTables,
    #[serde(skip)]
    template_options: TemplateStore,
    #[serde(skip)]
    logger: DesignLogger,
}

impl QDesign {
    /// New design with a single 9mm x 6mm `main` chip.
    pub fn new(name: &str) -> Self {
        let mut chips = IndexMap::new();
        chips.insert(
            "main".to_string(),
            Chip::new("main", BBox::centered(Point::new(0.0, 0.0), 9.0, 6.0)),
        );
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            chips,
            components: IndexMap::new(),
            qgeometry: QGeometryTables::new(),
            template_options: TemplateStore::new(),
            logger: DesignLogger::new(name),
        }
    }

    pub fn logger(&self) -> &DesignLogger {
        &self.logger
    }

    // ── Chips ────────────────────────────────────────────────────────

    pub fn add_chip(&mut self, chip: Chip) -> Result<(), DesignError> {
        if self.chips.contains_key(&chip.name) {
            return Err(DesignError::DuplicateChip(chip.name));
        }
        self.chips.insert(chip.name.clone(), chip);
        Ok(())
    }

    pub fn chip(&self, name: &str) -> Option<&Chip> {
        self.chips.get(name)
    }

    pub fn chips(&self) -> impl Iterator<Item = &Chip> {
        self.chips.values()
    }

    // ── Components ───────────────────────────────────────────────────

    pub fn add_component(&mut self, component: Component) -> Result<Uuid, DesignError> {
        if self.components.contains_key(&component.name) {
            return Err(DesignError::DuplicateComponent(component.name));
        }
        let id = component.id;
        self.components.insert(component.name.clone(), component);
        Ok(id)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Remove a component together with its geometry rows.
    pub fn remove_component(&mut self, name: &str) -> Result<Component, DesignError> {
        let component = self
            .components
            .shift_remove(name)
            .ok_or_else(|| DesignError::UnknownComponent(name.to_string()))?;
        let rows = self.qgeometry.remove_component(name);
        self.logger
            .debug(format_args!("Removed component '{}' and {} geometry rows", name, rows));
        Ok(component)
    }

    // ── Geometry tables ──────────────────────────────────────────────

    /// Add a geometry row for an existing component on an existing chip.
    pub fn add_element(&mut self, element: QGeometryElement) -> Result<(), DesignError> {
        if !self.components.contains_key(&element.component) {
            return Err(DesignError::UnknownComponent(element.component));
        }
        if !self.chips.contains_key(&element.chip) {
            return Err(DesignError::UnknownChip {
                element: element.name,
                chip: element.chip,
            });
        }
        self.qgeometry.add_element(element)
    }

    pub fn component_elements(&self, name: &str) -> Vec<&QGeometryElement> {
        self.qgeometry.component_elements(name)
    }

    pub fn qgeometry(&self) -> &QGeometryTables {
        &self.qgeometry
    }

    pub fn qgeometry_mut(&mut self) -> &mut QGeometryTables {
        &mut self.qgeometry
    }

    /// Register the default value of a renderer-owned column.
    pub fn add_default_data_for_qgeometry_tables(
        &mut self,
        table: &str,
        renderer: &str,
        column: &str,
        value: &ColumnValue,
    ) -> TableDataStatus {
        self.qgeometry.add_default_data(table, renderer, column, value)
    }

    // ── Renderer templates ───────────────────────────────────────────

    pub fn template_options(&self) -> &TemplateStore {
        &self.template_options
    }

    pub fn template_options_mut(&mut self) -> &mut TemplateStore {
        &mut self.template_options
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Template options are not persisted; they are rebuilt on the next
    /// renderer instantiation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut design: Self = serde_json::from_str(json)?;
        design.logger = DesignLogger::new(&design.name);
        Ok(design)
    }
}
