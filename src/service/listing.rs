//! Paginated and random listings over a `TableQuery`.

use crate::context::RequestContext;
use crate::sql::{count, select_page, select_random, TableQuery};
use crate::store::Db;
use sqlx::any::AnyRow;
use sqlx::FromRow;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page position derived from the request's `page` query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub offset: u64,
    /// The query string minus `page`, for building page links.
    pub query: String,
}

impl Pagination {
    /// Missing, invalid or < 1 `page` is page 1. `page_size` above 100 is 100; 0 or less is 12.
    pub fn from_query(raw_query: Option<&str>, page_size: i64) -> Self {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(raw_query.unwrap_or_default()).unwrap_or_default();
        let mut page = 1u32;
        let mut rest = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            if key == "page" {
                page = value.trim().parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1);
            } else {
                rest.push((key, value));
            }
        }
        let page_size = match page_size {
            s if s > MAX_PAGE_SIZE as i64 => MAX_PAGE_SIZE,
            s if s <= 0 => DEFAULT_PAGE_SIZE,
            s => s as u32,
        };
        Pagination {
            page,
            page_size,
            offset: u64::from(page - 1) * u64::from(page_size),
            query: serde_urlencoded::to_string(&rest).unwrap_or_default(),
        }
    }

    /// Expose `page`, `pageSize` and `query` to templates.
    pub fn assign_to(&self, ctx: &mut RequestContext) {
        ctx.assign("page", self.page);
        ctx.assign("pageSize", self.page_size);
        ctx.assign("query", &self.query);
    }
}

/// Count all rows matching `query`, then fetch the page selected by the request.
pub async fn find_and_count<T>(
    db: &Db,
    ctx: &mut RequestContext,
    query: &TableQuery,
    page_size: i64,
) -> Result<(Vec<T>, i64), sqlx::Error>
where
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    let pagination = Pagination::from_query(ctx.uri().query(), page_size);
    pagination.assign_to(ctx);

    let q = count(query, db.dialect());
    let mut total = sqlx::query_scalar::<_, i64>(&q.sql);
    for p in q.params {
        total = total.bind(p);
    }
    let total = total.fetch_one(db.pool()).await?;

    let q = select_page(query, db.dialect(), pagination.page_size, pagination.offset);
    let mut rows = sqlx::query_as::<_, T>(&q.sql);
    for p in q.params {
        rows = rows.bind(p);
    }
    let rows = rows.fetch_all(db.pool()).await?;
    Ok((rows, total))
}

/// Up to `limit` rows in random order.
pub async fn random<T>(db: &Db, query: &TableQuery, limit: u32) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    let q = select_random(query, db.dialect(), limit);
    let mut rows = sqlx::query_as::<_, T>(&q.sql);
    for p in q.params {
        rows = rows.bind(p);
    }
    rows.fetch_all(db.pool()).await
}
