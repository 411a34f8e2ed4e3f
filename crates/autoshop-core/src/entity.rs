use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The five tables managed by autoshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Car,
    Owner,
    Mechanic,
    ServiceRecord,
    ServiceMechanic,
}

impl Entity {
    pub const ALL: [Entity; 5] = [
        Entity::Car,
        Entity::Owner,
        Entity::Mechanic,
        Entity::ServiceRecord,
        Entity::ServiceMechanic,
    ];

    /// Display name used in operator-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            Entity::Car => "Car",
            Entity::Owner => "Owner",
            Entity::Mechanic => "Mechanic",
            Entity::ServiceRecord => "ServiceRecord",
            Entity::ServiceMechanic => "ServiceMechanic",
        }
    }

    pub fn descriptor(self) -> &'static EntityDescriptor {
        match self {
            Entity::Car => &CAR,
            Entity::Owner => &OWNER,
            Entity::Mechanic => &MECHANIC,
            Entity::ServiceRecord => &SERVICE_RECORD,
            Entity::ServiceMechanic => &SERVICE_MECHANIC,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = Error;

    /// Accepts the display name or the table name, ignoring case, `-` and `_`.
    fn from_str(value: &str) -> Result<Self> {
        let normalized: String = value
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .collect::<String>()
            .to_lowercase();
        Entity::ALL
            .into_iter()
            .find(|entity| entity.descriptor().table == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unknown entity '{value}'")))
    }
}

/// How operator input for a column is parsed into a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    Decimal,
    Text,
    Date,
}

/// A non-key column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Semantic check evaluated before create/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The column, when supplied, must hold an integer.
    Integer {
        column: &'static str,
        message: &'static str,
    },
    /// The column, when supplied, must hold the key of an existing `target` row.
    /// A null value passes only when `nullable` is set.
    References {
        column: &'static str,
        target: Entity,
        nullable: bool,
    },
}

impl Rule {
    pub fn column(&self) -> &'static str {
        match *self {
            Rule::Integer { column, .. } | Rule::References { column, .. } => column,
        }
    }
}

/// Static metadata that drives generic SQL construction for one table.
#[derive(Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub entity: Entity,
    pub table: &'static str,
    /// `None` for join tables without a single-column key.
    pub primary_key: Option<&'static str>,
    /// Ordered non-key columns.
    pub columns: &'static [ColumnSpec],
    pub rules: &'static [Rule],
}

impl EntityDescriptor {
    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }

    /// Key column, or `Error::NoPrimaryKey` for join tables.
    pub fn require_primary_key(&self) -> Result<&'static str> {
        self.primary_key
            .ok_or_else(|| Error::NoPrimaryKey(self.table.to_string()))
    }
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

pub static CAR: EntityDescriptor = EntityDescriptor {
    entity: Entity::Car,
    table: "car",
    primary_key: Some("carid"),
    columns: &[
        col("make", ColumnKind::Text),
        col("model", ColumnKind::Text),
        col("year", ColumnKind::Integer),
        col("vin", ColumnKind::Text),
        col("ownerid", ColumnKind::Integer),
    ],
    rules: &[
        Rule::Integer {
            column: "year",
            message: "Year must be an integer.",
        },
        Rule::References {
            column: "ownerid",
            target: Entity::Owner,
            nullable: true,
        },
    ],
};

pub static OWNER: EntityDescriptor = EntityDescriptor {
    entity: Entity::Owner,
    table: "owner",
    primary_key: Some("ownerid"),
    columns: &[
        col("firstname", ColumnKind::Text),
        col("lastname", ColumnKind::Text),
        col("phone", ColumnKind::Text),
        col("email", ColumnKind::Text),
    ],
    rules: &[],
};

pub static MECHANIC: EntityDescriptor = EntityDescriptor {
    entity: Entity::Mechanic,
    table: "mechanic",
    primary_key: Some("mechanicid"),
    columns: &[
        col("name", ColumnKind::Text),
        col("specialty", ColumnKind::Text),
        col("phone", ColumnKind::Text),
    ],
    rules: &[],
};

pub static SERVICE_RECORD: EntityDescriptor = EntityDescriptor {
    entity: Entity::ServiceRecord,
    table: "servicerecord",
    primary_key: Some("serviceid"),
    columns: &[
        col("carid", ColumnKind::Integer),
        col("servicedate", ColumnKind::Date),
        col("servicetype", ColumnKind::Text),
        col("servicecost", ColumnKind::Decimal),
    ],
    rules: &[Rule::References {
        column: "carid",
        target: Entity::Car,
        nullable: false,
    }],
};

pub static SERVICE_MECHANIC: EntityDescriptor = EntityDescriptor {
    entity: Entity::ServiceMechanic,
    table: "servicemechanic",
    primary_key: None,
    columns: &[
        col("serviceid", ColumnKind::Integer),
        col("mechanicid", ColumnKind::Integer),
        col("hoursworked", ColumnKind::Decimal),
    ],
    rules: &[
        Rule::References {
            column: "serviceid",
            target: Entity::ServiceRecord,
            nullable: false,
        },
        Rule::References {
            column: "mechanicid",
            target: Entity::Mechanic,
            nullable: false,
        },
    ],
};
