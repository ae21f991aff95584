use uuid::Uuid;

use super::error::FilterError;
use super::pagination::{PageRequest, DEFAULT_SORT_COLUMN};
use super::types::{SortDirection, SqlParam, SqlResult};

/// Static description of a tenant-scoped table that can be listed.
#[derive(Debug, Clone, Copy)]
pub struct ListTarget {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub sortable: &'static [&'static str],
    pub search_column: &'static str,
}

/// Tenant-scoped, searchable, sortable, paginated listing over one table.
///
/// The WHERE clause is built once and shared by the count and the page
/// query, so the reported total always describes the same row set.
#[derive(Debug, Clone)]
pub struct ListQuery {
    target: ListTarget,
    where_clause: String,
    params: Vec<SqlParam>,
    sort_column: &'static str,
    sort_order: SortDirection,
    limit: i64,
    offset: i64,
}

impl ListQuery {
    pub fn new(target: ListTarget, company_id: Uuid, request: &PageRequest) -> Result<Self, FilterError> {
        validate_identifier(target.table).map_err(|_| FilterError::InvalidTableName(target.table.to_string()))?;
        for column in target.columns.iter().chain(target.sortable).chain([&target.search_column]) {
            validate_identifier(column)?;
        }
        if !target.sortable.contains(&DEFAULT_SORT_COLUMN) {
            return Err(FilterError::MissingDefaultSort(target.table.to_string()));
        }

        let mut where_clause = String::from("\"company_id\" = $1");
        let mut params = vec![SqlParam::Uuid(company_id)];

        if let Some(term) = request.search.as_deref() {
            params.push(SqlParam::Text(format!("%{}%", escape_like(term))));
            where_clause.push_str(&format!(" AND \"{}\" ILIKE ${}", target.search_column, params.len()));
        }

        Ok(Self {
            target,
            where_clause,
            params,
            sort_column: resolve_sort_column(target.sortable, &request.sort_by),
            sort_order: request.sort_order,
            limit: i64::from(request.limit),
            offset: request.offset(),
        })
    }

    pub fn sort_column(&self) -> &'static str {
        self.sort_column
    }

    pub fn count_sql(&self) -> SqlResult {
        SqlResult {
            query: format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                self.target.table, self.where_clause
            ),
            params: self.params.clone(),
        }
    }

    pub fn select_sql(&self) -> SqlResult {
        let columns = self
            .target
            .columns
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut params = self.params.clone();
        let limit_idx = params.len() + 1;
        params.push(SqlParam::BigInt(self.limit));
        params.push(SqlParam::BigInt(self.offset));

        // "id" breaks ties so pages stay disjoint when the sort column repeats.
        let query = format!(
            "SELECT {} FROM \"{}\" WHERE {} ORDER BY \"{}\" {}, \"id\" ASC LIMIT ${} OFFSET ${}",
            columns,
            self.target.table,
            self.where_clause,
            self.sort_column,
            self.sort_order.to_sql(),
            limit_idx,
            limit_idx + 1,
        );

        SqlResult { query, params }
    }
}

/// Maps the caller's sort key onto the allow-list. Unknown keys sort by `created_at`.
pub fn resolve_sort_column(allowlist: &[&'static str], requested: &str) -> &'static str {
    allowlist
        .iter()
        .copied()
        .find(|column| *column == requested)
        .unwrap_or(DEFAULT_SORT_COLUMN)
}

/// Escapes LIKE metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn validate_identifier(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(name.to_string()));
    }
    Ok(())
}
