//! Ad-hoc search criteria.
//!
//! A criterion only contributes a predicate when its value is non-empty, so a
//! search with every field blank degenerates to `1=1`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityDescriptor};
use crate::error::{Error, Result};
use crate::value::Value;

/// Comparison applied by a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Eq,
    Like,
    Gte,
    Lte,
}

impl Op {
    pub fn sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Like => "LIKE",
            Op::Gte => ">=",
            Op::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub column: String,
    pub op: Op,
    pub value: Value,
}

/// Criteria for one entity's search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub entity: Entity,
    criteria: Vec<Criterion>,
}

impl SearchCriteria {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            criteria: Vec::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.criteria.push(Criterion {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Criteria whose value is non-empty, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria
            .iter()
            .filter(|criterion| !criterion.value.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.active().next().is_none()
    }

    /// Every criterion column must be a column (or the key) of the entity.
    pub fn check(&self, descriptor: &EntityDescriptor) -> Result<()> {
        for criterion in &self.criteria {
            let known = descriptor.primary_key == Some(criterion.column.as_str())
                || descriptor.column(&criterion.column).is_some();
            if !known {
                return Err(Error::UnknownColumn {
                    table: descriptor.table.to_string(),
                    column: criterion.column.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Cars by exact make and an inclusive year range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSearch {
    pub make: Option<String>,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
}

impl From<CarSearch> for SearchCriteria {
    fn from(search: CarSearch) -> Self {
        SearchCriteria::new(Entity::Car)
            .with("make", Op::Eq, search.make)
            .with("year", Op::Gte, search.year_from)
            .with("year", Op::Lte, search.year_to)
    }
}

/// Mechanics by exact specialty and a `LIKE` name pattern such as `%John%`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanicSearch {
    pub specialty: Option<String>,
    pub name_pattern: Option<String>,
}

impl From<MechanicSearch> for SearchCriteria {
    fn from(search: MechanicSearch) -> Self {
        SearchCriteria::new(Entity::Mechanic)
            .with("specialty", Op::Eq, search.specialty)
            .with("name", Op::Like, search.name_pattern)
    }
}

/// Service records by inclusive date range and exact service type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecordSearch {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub servicetype: Option<String>,
}

impl From<ServiceRecordSearch> for SearchCriteria {
    fn from(search: ServiceRecordSearch) -> Self {
        SearchCriteria::new(Entity::ServiceRecord)
            .with("servicedate", Op::Gte, search.date_from)
            .with("servicedate", Op::Lte, search.date_to)
            .with("servicetype", Op::Eq, search.servicetype)
    }
}
