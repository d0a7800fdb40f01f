use sqlx::{postgres::PgArguments, FromRow};

use crate::database::models::project::{ProjectFilter, ProjectStatus};

const PROJECT_COLUMNS: &str =
    "id, owner_email, name, description, status, is_public, created_at, updated_at";

/// Bind value for a generated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Builds SELECT statements over the `projects` table with numbered placeholders
#[derive(Debug, Default)]
pub struct QueryBuilder {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
    order: Vec<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owner-scoped list narrowed by the optional status and name filters
    pub fn owner_projects(owner_email: &str, filter: &ProjectFilter) -> Self {
        let mut builder = Self::new().where_eq("owner_email", SqlParam::Text(owner_email.to_string()));
        if let Some(status) = filter.status {
            builder = builder.where_status(status);
        }
        if let Some(needle) = filter.name_contains.as_deref() {
            builder = builder.where_contains_insensitive("name", needle);
        }
        builder.order_by_desc("updated_at")
    }

    pub fn public_projects() -> Self {
        Self::new()
            .where_eq("is_public", SqlParam::Bool(true))
            .order_by_desc("updated_at")
    }

    pub fn where_eq(mut self, column: &'static str, value: SqlParam) -> Self {
        self.params.push(value);
        self.conditions.push(format!("\"{}\" = ${}", column, self.params.len()));
        self
    }

    pub fn where_status(self, status: ProjectStatus) -> Self {
        self.where_eq("status", SqlParam::Text(status.as_str().to_string()))
    }

    /// Case-insensitive substring match; LIKE wildcards in `needle` match literally
    pub fn where_contains_insensitive(mut self, column: &'static str, needle: &str) -> Self {
        self.params.push(SqlParam::Text(format!("%{}%", escape_like(needle))));
        self.conditions.push(format!("\"{}\" ILIKE ${}", column, self.params.len()));
        self
    }

    pub fn order_by_desc(mut self, column: &'static str) -> Self {
        self.order.push(format!("\"{}\" DESC", column));
        self
    }

    pub fn build(self) -> SqlResult {
        let mut query = format!("SELECT {} FROM projects", PROJECT_COLUMNS);
        if !self.conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.conditions.join(" AND "));
        }
        if !self.order.is_empty() {
            query.push_str(" ORDER BY ");
            query.push_str(&self.order.join(", "));
        }
        SqlResult { query, params: self.params }
    }
}

/// Escape `\`, `%` and `_` so user input is matched literally by LIKE/ILIKE
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn bind_params<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    params: &'q [SqlParam],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for param in params {
        q = match param {
            SqlParam::Text(s) => q.bind(s.as_str()),
            SqlParam::Bool(b) => q.bind(*b),
        };
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_query_without_filters() {
        let sql = QueryBuilder::owner_projects("a@b.co", &ProjectFilter::default()).build();
        assert_eq!(
            sql.query,
            format!("SELECT {} FROM projects WHERE \"owner_email\" = $1 ORDER BY \"updated_at\" DESC", PROJECT_COLUMNS)
        );
        assert_eq!(sql.params, vec![SqlParam::Text("a@b.co".to_string())]);
    }

    #[test]
    fn owner_query_with_status_and_search() {
        let filter = ProjectFilter {
            status: Some(ProjectStatus::Active),
            name_contains: Some("50%_off".to_string()),
        };
        let sql = QueryBuilder::owner_projects("a@b.co", &filter).build();
        assert!(sql.query.contains("\"owner_email\" = $1 AND \"status\" = $2 AND \"name\" ILIKE $3"));
        assert_eq!(
            sql.params,
            vec![
                SqlParam::Text("a@b.co".to_string()),
                SqlParam::Text("ACTIVE".to_string()),
                SqlParam::Text("%50\\%\\_off%".to_string()),
            ]
        );
    }

    #[test]
    fn public_query_uses_visibility_flag() {
        let sql = QueryBuilder::public_projects().build();
        assert!(sql.query.ends_with("WHERE \"is_public\" = $1 ORDER BY \"updated_at\" DESC"));
        assert_eq!(sql.params, vec![SqlParam::Bool(true)]);
    }

    #[test]
    fn escapes_backslash() {
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
