use crate::model::entity::{Entity, Value};
use crate::model::style::InputType;
use serde::{Deserialize, Serialize};

/// Storage type of a declared system column.
///
/// The archive codec picks its encode/decode rule from this type, so every
/// column of a [`Record`] kind must declare one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    DateTime,
    Decimal,
    Integer,
    /// Long free text; obscured inside archives.
    Text,
    VarChar,
}

/// One declared system column of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    pub attribute_name: &'static str,
    pub data_type: DataType,
}

impl TableColumn {
    pub const fn new(attribute_name: &'static str, data_type: DataType) -> Self {
        Self {
            attribute_name,
            data_type,
        }
    }
}

/// An entity kind with a fixed set of declared columns on top of its open
/// attribute bag.
pub trait Record {
    /// Declared system columns, in archive order.
    const TABLE_COLUMNS: &'static [TableColumn];

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// Value of a declared column. Kinds that synthesize a column from their
    /// attribute bag override this.
    fn column_value(&self, attribute_name: &str) -> Value {
        self.entity()
            .get(attribute_name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set_column_value(&mut self, attribute_name: &str, value: Value) {
        self.entity_mut().set(attribute_name, value);
    }

    /// Whether `name` is one of the declared columns (case-insensitive).
    fn is_table_column(name: &str) -> bool {
        Self::TABLE_COLUMNS
            .iter()
            .any(|c| c.attribute_name.eq_ignore_ascii_case(name))
    }
}

/// Column descriptor driving the admin record grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentColumn {
    pub attribute_name: String,
    pub display_name: String,
    pub input_type: Option<InputType>,
    /// Whether the column is shown in the list view.
    pub is_list: bool,
}
