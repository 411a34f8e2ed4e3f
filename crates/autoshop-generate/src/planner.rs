//! Turns catalog descriptions into a reusable `INSERT` statement.

use std::collections::BTreeSet;

use autoshop_core::{ColumnDescription, Entity, ForeignKeyRef, Result, TypeFamily};
use autoshop_introspect::Catalog;

/// Store-side expression producing one column value per executed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExpr {
    /// Random value chosen by the declared type.
    Random(TypeFamily),
    /// One existing value of the referenced column, picked at random.
    Reference(ForeignKeyRef),
}

impl ValueExpr {
    pub fn for_column(column: &ColumnDescription) -> Self {
        match &column.foreign_key {
            Some(reference) => ValueExpr::Reference(reference.clone()),
            None => ValueExpr::Random(column.family()),
        }
    }

    pub fn sql(&self) -> String {
        match self {
            ValueExpr::Random(family) => random_sql(*family).to_string(),
            ValueExpr::Reference(reference) => format!(
                "(SELECT {} FROM {} ORDER BY RANDOM() LIMIT 1)",
                quote_ident(&reference.column),
                quote_ident(&reference.table)
            ),
        }
    }
}

fn random_sql(family: TypeFamily) -> &'static str {
    match family {
        TypeFamily::Integer => "TRUNC(RANDOM() * 1000)::INTEGER",
        TypeFamily::ShortText => "LEFT(MD5(RANDOM()::TEXT), 10)",
        TypeFamily::LongText => "LEFT(MD5(RANDOM()::TEXT), 20)",
        TypeFamily::Date => "DATE '2024-01-01' + (RANDOM() * 365)::INT",
        TypeFamily::Boolean => "(RANDOM() < 0.5)",
        TypeFamily::Float => "(RANDOM() * 1000)",
        TypeFamily::Timestamp => {
            "TIMESTAMP '2024-01-01 00:00:00' + (RANDOM() * INTERVAL '365 days')"
        }
        TypeFamily::Other => "NULL",
    }
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Column list and value expressions for one table, executed once per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    pub table: String,
    pub columns: Vec<(String, ValueExpr)>,
}

impl InsertPlan {
    pub fn sql(&self) -> String {
        let names: Vec<String> = self
            .columns
            .iter()
            .map(|(name, _)| quote_ident(name))
            .collect();
        let values: Vec<String> = self.columns.iter().map(|(_, expr)| expr.sql()).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&self.table),
            names.join(", "),
            values.join(", ")
        )
    }

    /// Distinct referenced tables, each needing at least one row.
    pub fn references(&self) -> BTreeSet<&ForeignKeyRef> {
        self.columns
            .iter()
            .filter_map(|(_, expr)| match expr {
                ValueExpr::Reference(reference) => Some(reference),
                ValueExpr::Random(_) => None,
            })
            .collect()
    }
}

pub fn plan_insert(table: &str, columns: &[ColumnDescription]) -> InsertPlan {
    InsertPlan {
        table: table.to_string(),
        columns: columns
            .iter()
            .map(|column| (column.name.clone(), ValueExpr::for_column(column)))
            .collect(),
    }
}

/// Describe every non-key column of `entity` and plan its insert.
pub async fn plan_for<C>(catalog: &C, entity: Entity) -> Result<InsertPlan>
where
    C: Catalog + Sync + ?Sized,
{
    let descriptor = entity.descriptor();
    let names: Vec<&str> = descriptor.column_names().collect();
    let described = catalog.describe_columns(descriptor.table, &names).await?;
    Ok(plan_insert(descriptor.table, &described))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, declared_type: &str) -> ColumnDescription {
        ColumnDescription {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            foreign_key: None,
        }
    }

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_ident("car"), "\"car\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn unknown_types_become_null() {
        let plan = plan_insert("t", &[column("blob", "bytea"), column("flag", "boolean")]);
        assert_eq!(
            plan.sql(),
            "INSERT INTO \"t\" (\"blob\", \"flag\") VALUES (NULL, (RANDOM() < 0.5))"
        );
    }

    #[test]
    fn references_are_deduplicated() {
        let owner = ForeignKeyRef {
            table: "owner".to_string(),
            column: "ownerid".to_string(),
        };
        let mut first = column("a", "integer");
        first.foreign_key = Some(owner.clone());
        let mut second = column("b", "integer");
        second.foreign_key = Some(owner.clone());

        let plan = plan_insert("t", &[first, second]);
        assert_eq!(plan.references().into_iter().collect::<Vec<_>>(), vec![&owner]);
    }
}
