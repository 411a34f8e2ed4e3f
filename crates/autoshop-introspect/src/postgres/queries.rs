use sqlx::PgPool;

use autoshop_core::Result;

use crate::db::map_db_error;

pub async fn fetch_data_type(
    pool: &PgPool,
    schema: &str,
    table: &str,
    column: &str,
) -> Result<Option<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select data_type::text
        from information_schema.columns
        where table_schema = $1
          and table_name = $2
          and column_name = $3
        "#,
    )
    .bind(schema)
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await
    .map_err(map_db_error)
}

pub struct RawForeignKey {
    pub constraint_name: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

pub async fn fetch_foreign_key(
    pool: &PgPool,
    schema: &str,
    table: &str,
    column: &str,
) -> Result<Option<RawForeignKey>> {
    let row = sqlx::query_as::<_, (String, String, String)>(
        r#"
        select
          tc.constraint_name::text,
          ccu.table_name::text,
          ccu.column_name::text
        from information_schema.table_constraints as tc
        join information_schema.key_column_usage as kcu
          on tc.constraint_name = kcu.constraint_name
         and tc.constraint_schema = kcu.constraint_schema
        join information_schema.constraint_column_usage as ccu
          on ccu.constraint_name = tc.constraint_name
         and ccu.constraint_schema = tc.constraint_schema
        where tc.constraint_type = 'FOREIGN KEY'
          and tc.table_schema = $1
          and tc.table_name = $2
          and kcu.column_name = $3
        order by tc.constraint_name
        limit 1
        "#,
    )
    .bind(schema)
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await
    .map_err(map_db_error)?;

    Ok(row.map(
        |(constraint_name, referenced_table, referenced_column)| RawForeignKey {
            constraint_name,
            referenced_table,
            referenced_column,
        },
    ))
}
