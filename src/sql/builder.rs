//! Builds parameterized SELECT / COUNT statements for listing helpers.

use crate::store::Dialect;

/// Column that scopes rows to a tenant.
pub const ACCOUNT_COLUMN: &str = "cid";

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

/// A single-table query: columns, equality filters and ordering.
#[derive(Clone, Debug)]
pub struct TableQuery {
    table: String,
    columns: Vec<String>,
    filters: Vec<(String, String)>,
    order_by: Vec<(String, bool)>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        TableQuery {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Select only these columns (default `*`).
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Restrict rows to one tenant (`cid = ?`).
    pub fn for_account(self, account_id: &str) -> Self {
        self.filter_eq(ACCOUNT_COLUMN, account_id)
    }

    pub fn order_by(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order_by.push((column.into(), descending));
        self
    }

    fn column_list(&self, dialect: Dialect) -> String {
        if self.columns.is_empty() {
            return "*".to_string();
        }
        self.columns
            .iter()
            .map(|c| dialect.quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn from_where(&self, dialect: Dialect, q: &mut QueryBuf) -> String {
        let mut sql = format!("FROM {}", dialect.quote_ident(&self.table));
        let mut where_parts = Vec::new();
        for (col, val) in &self.filters {
            q.params.push(val.clone());
            where_parts.push(format!(
                "{} = {}",
                dialect.quote_ident(col),
                dialect.placeholder(q.params.len())
            ));
        }
        if !where_parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_parts.join(" AND "));
        }
        sql
    }

    fn order_clause(&self, dialect: Dialect) -> String {
        if self.order_by.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .order_by
            .iter()
            .map(|(c, desc)| {
                format!("{} {}", dialect.quote_ident(c), if *desc { "DESC" } else { "ASC" })
            })
            .collect();
        format!(" ORDER BY {}", parts.join(", "))
    }
}

/// `SELECT COUNT(*)` over the query's filters.
pub fn count(query: &TableQuery, dialect: Dialect) -> QueryBuf {
    let mut q = QueryBuf::new();
    let from = query.from_where(dialect, &mut q);
    q.sql = format!("SELECT COUNT(*) {}", from);
    q
}

/// One page of rows.
pub fn select_page(query: &TableQuery, dialect: Dialect, limit: u32, offset: u64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let from = query.from_where(dialect, &mut q);
    q.sql = format!(
        "SELECT {} {}{} LIMIT {} OFFSET {}",
        query.column_list(dialect),
        from,
        query.order_clause(dialect),
        limit,
        offset
    );
    q
}

/// `limit` rows in random order; any explicit ordering is ignored.
pub fn select_random(query: &TableQuery, dialect: Dialect, limit: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let from = query.from_where(dialect, &mut q);
    q.sql = format!(
        "SELECT {} {} ORDER BY {} LIMIT {}",
        query.column_list(dialect),
        from,
        dialect.random_fn(),
        limit
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles() -> TableQuery {
        TableQuery::new("articles")
            .columns(["id", "title"])
            .for_account("acme")
            .filter_eq("status", "published")
            .order_by("id", true)
    }

    #[test]
    fn page_on_postgres() {
        let q = select_page(&articles(), Dialect::Postgres, 12, 24);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "title" FROM "articles" WHERE "cid" = $1 AND "status" = $2 ORDER BY "id" DESC LIMIT 12 OFFSET 24"#
        );
        assert_eq!(q.params, vec!["acme", "published"]);
    }

    #[test]
    fn count_on_mysql() {
        let q = count(&articles(), Dialect::Mysql);
        assert_eq!(
            q.sql,
            "SELECT COUNT(*) FROM `articles` WHERE `cid` = ? AND `status` = ?"
        );
    }

    #[test]
    fn random_uses_dialect_function() {
        let q = select_random(&TableQuery::new("tags"), Dialect::Mysql, 5);
        assert_eq!(q.sql, "SELECT * FROM `tags` ORDER BY RAND() LIMIT 5");
        let q = select_random(&TableQuery::new("tags"), Dialect::Sqlite, 5);
        assert_eq!(q.sql, r#"SELECT * FROM "tags" ORDER BY RANDOM() LIMIT 5"#);
        assert!(q.params.is_empty());
    }
}
