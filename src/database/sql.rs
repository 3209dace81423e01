use sqlx::postgres::PgArguments;
use sqlx::{self, FromRow};
use uuid::Uuid;

/// Typed bind parameter for dynamically assembled queries.
///
/// Gallery and feature lists are native `TEXT[]` columns, so parameters
/// carry concrete Rust types instead of JSON values - a `serde_json::Value`
/// array would bind as JSONB.
#[derive(Debug, Clone)]
pub enum SqlParam {
    Int(i32),
    OptInt(Option<i32>),
    BigInt(i64),
    Float(Option<f64>),
    Text(String),
    OptText(Option<String>),
    TextArray(Vec<String>),
    Uuid(Uuid),
    OptUuid(Option<Uuid>),
}

/// SQL text plus its ordered bind parameters.
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

pub fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match p {
        SqlParam::Int(v) => q.bind(*v),
        SqlParam::OptInt(v) => q.bind(*v),
        SqlParam::BigInt(v) => q.bind(*v),
        SqlParam::Float(v) => q.bind(*v),
        SqlParam::Text(v) => q.bind(v),
        SqlParam::OptText(v) => q.bind(v.as_deref()),
        SqlParam::TextArray(v) => q.bind(v),
        SqlParam::Uuid(v) => q.bind(*v),
        SqlParam::OptUuid(v) => q.bind(*v),
    }
}

pub fn bind_param_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match p {
        SqlParam::Int(v) => q.bind(*v),
        SqlParam::OptInt(v) => q.bind(*v),
        SqlParam::BigInt(v) => q.bind(*v),
        SqlParam::Float(v) => q.bind(*v),
        SqlParam::Text(v) => q.bind(v),
        SqlParam::OptText(v) => q.bind(v.as_deref()),
        SqlParam::TextArray(v) => q.bind(v),
        SqlParam::Uuid(v) => q.bind(*v),
        SqlParam::OptUuid(v) => q.bind(*v),
    }
}

/// Accumulates `SET column = $n` fragments for a dynamically shaped UPDATE.
///
/// Image columns are only included when the workflow actually changed them,
/// so the SET list cannot be a fixed string.
#[derive(Debug, Default)]
pub struct UpdateBuilder {
    assignments: Vec<String>,
    params: Vec<SqlParam>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, value: SqlParam) -> &mut Self {
        self.params.push(value);
        self.assignments
            .push(format!("\"{}\" = ${}", column, self.params.len()));
        self
    }

    /// Render `UPDATE table SET ... WHERE id = $n RETURNING ...`
    pub fn into_sql(mut self, table: &str, id: Uuid, returning: &str) -> SqlResult {
        self.params.push(SqlParam::Uuid(id));
        let query = format!(
            "UPDATE \"{}\" SET {} WHERE id = ${} RETURNING {}",
            table,
            self.assignments.join(", "),
            self.params.len(),
            returning,
        );
        SqlResult {
            query,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_builder_numbers_binds_in_order() {
        let mut builder = UpdateBuilder::new();
        builder
            .set("title", SqlParam::Text("t".into()))
            .set("price", SqlParam::Int(5));
        let id = Uuid::new_v4();
        let sql = builder.into_sql("properties", id, "title");
        assert_eq!(
            sql.query,
            "UPDATE \"properties\" SET \"title\" = $1, \"price\" = $2 WHERE id = $3 RETURNING title"
        );
        assert_eq!(sql.params.len(), 3);
    }
}
