use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, PgPool, Postgres, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{SqlParam, SqlResult};

/// Runs a generated SELECT and maps every row.
pub async fn fetch_all<T>(pool: &PgPool, sql: &SqlResult) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    Ok(q.fetch_all(pool).await?)
}

/// Runs a generated `SELECT COUNT(*) AS count` query.
pub async fn fetch_count(pool: &PgPool, sql: &SqlResult) -> Result<i64, DatabaseError> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query(q, p);
    }
    let row = q.fetch_one(pool).await?;
    let count: i64 = row.try_get("count")?;
    Ok(count)
}

fn bind_param_query<'q>(
    q: Query<'q, Postgres, PgArguments>,
    p: &'q SqlParam,
) -> Query<'q, Postgres, PgArguments> {
    match p {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::BigInt(i) => q.bind(*i),
    }
}

fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::BigInt(i) => q.bind(*i),
    }
}
