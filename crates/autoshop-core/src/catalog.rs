use serde::{Deserialize, Serialize};

/// Target of a single-column foreign key as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

/// Catalog answer for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    /// `information_schema.columns.data_type`, e.g. `character varying`.
    pub declared_type: String,
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnDescription {
    pub fn family(&self) -> TypeFamily {
        TypeFamily::classify(&self.declared_type)
    }
}

/// Coarse grouping of declared types used to pick a random-value rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFamily {
    Integer,
    ShortText,
    LongText,
    Date,
    Boolean,
    Float,
    Timestamp,
    Other,
}

impl TypeFamily {
    pub fn classify(declared_type: &str) -> Self {
        let declared = declared_type.trim().to_lowercase();
        match declared.as_str() {
            "integer" | "smallint" | "bigint" => TypeFamily::Integer,
            "character varying" | "character" => TypeFamily::ShortText,
            "text" => TypeFamily::LongText,
            "date" => TypeFamily::Date,
            "boolean" => TypeFamily::Boolean,
            "double precision" | "real" | "numeric" => TypeFamily::Float,
            other if other.starts_with("timestamp") => TypeFamily::Timestamp,
            _ => TypeFamily::Other,
        }
    }
}
