//! Semantic checks declared on the entity descriptors.

use async_trait::async_trait;

use autoshop_core::{Entity, EntityDescriptor, Payload, Result, Rule, Validation, Value};

/// Existence checks the rules and the delete guard depend on.
#[async_trait]
pub trait RecordLookup {
    /// True when `entity` has a row with primary key `key`.
    async fn exists(&self, entity: Entity, key: i64) -> Result<bool>;

    /// True when at least one `child` row has `column = key`.
    async fn is_referenced(&self, child: Entity, column: &str, key: i64) -> Result<bool>;
}

/// Run the descriptor's rules against a payload.
///
/// Only supplied columns are checked, so partial updates validate what they
/// touch. All failures are collected; a store error during a lookup aborts
/// with `Err`.
pub async fn validate<L>(
    descriptor: &EntityDescriptor,
    payload: &Payload,
    lookup: &L,
) -> Result<Validation>
where
    L: RecordLookup + Sync + ?Sized,
{
    let mut validation = Validation::default();

    for rule in descriptor.rules {
        let Some(value) = payload.get(rule.column()) else {
            continue;
        };

        match *rule {
            Rule::Integer { message, .. } => {
                if value.as_i64().is_none() {
                    validation.push(message);
                }
            }
            Rule::References {
                target, nullable, ..
            } => match value {
                Value::Null if nullable => {}
                Value::Int(key) => {
                    if !lookup.exists(target, *key).await? {
                        validation.push(missing(target, value));
                    }
                }
                other => validation.push(missing(target, other)),
            },
        }
    }

    Ok(validation)
}

fn missing(target: Entity, value: &Value) -> String {
    format!("{target} with ID {value} does not exist.")
}
