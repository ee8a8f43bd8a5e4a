//! Shared pagination contract for list endpoints.
//!
//! Query parameters are parsed leniently into a [`PageRequest`]; SQL-backed
//! repositories build their count and data statements with [`PagedQuery`],
//! in-memory ones slice a sorted `Vec` with [`PageResult::from_sorted`].
//!
//! The count and data statements run separately without a transaction, so
//! under concurrent writes `total_items` may be slightly stale relative to
//! `items`.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement, Value};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const MAX_LIMIT: u64 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` (any case) is ascending, anything else is descending.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    /// Orients an ascending comparison.
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw `?page=&limit=&sortOrder=&search=` parameters.
///
/// Everything is kept as a string so that malformed numbers fall back to
/// defaults instead of rejecting the request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

impl PageParams {
    pub fn into_request(self, default_limit: u64) -> PageRequest {
        let page = parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(self.limit.as_deref()).unwrap_or(default_limit);

        PageRequest::new(page, limit)
            .with_sort_order(
                self.sort_order
                    .as_deref()
                    .map(SortOrder::parse_lenient)
                    .unwrap_or_default(),
            )
            .with_search(self.search)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v >= 1)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub sort_order: SortOrder,
    pub search: Option<String>,
}

impl PageRequest {
    /// Page and limit are clamped to `>= 1`; limit is capped at [`MAX_LIMIT`].
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
            sort_order: SortOrder::Desc,
            search: None,
        }
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Blank search terms are dropped.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// In-memory counterpart of [`PagedQuery::search`]: case-insensitive
    /// substring match against any of `fields`. No search term matches all.
    pub fn matches_search(&self, fields: &[&str]) -> bool {
        match self.search_term() {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                fields.iter().any(|f| f.to_lowercase().contains(&needle))
            }
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, 20)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

/// `ceil(total_items / limit)`, zero when there is nothing to show.
pub fn total_pages(total_items: u64, limit: u64) -> u64 {
    if total_items == 0 {
        0
    } else {
        total_items.div_ceil(limit.max(1))
    }
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_items: u64, page: &PageRequest) -> Self {
        Self {
            items,
            current_page: page.page,
            total_pages: total_pages(total_items, page.limit),
            total_items,
        }
    }

    /// Slice an already filtered and ordered collection.
    pub fn from_sorted(all: Vec<T>, page: &PageRequest) -> Self {
        let total_items = all.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(offset).take(limit).collect();
        Self::new(items, total_items, page)
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<PageResult<U>, E> {
        Ok(PageResult {
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?,
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        })
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// `%term%` with LIKE wildcards and the escape character escaped.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

/// Builder for the `COUNT(*)` + `LIMIT/OFFSET` statement pair.
///
/// ```ignore
/// let (count, data) = PagedQuery::new("id, username, created_at", "users")
///     .filter_eq("role", "user")
///     .search(&["username"], page.search_term())
///     .order_by("created_at", "id")
///     .build(&page);
/// ```
#[derive(Clone, Debug)]
pub struct PagedQuery {
    select: String,
    from: String,
    conditions: Vec<String>,
    values: Vec<Value>,
    order: Option<(String, String)>,
}

impl PagedQuery {
    pub fn new(select: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            from: from.into(),
            conditions: Vec::new(),
            values: Vec::new(),
            order: None,
        }
    }

    fn next_placeholder(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    pub fn filter_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        let placeholder = self.next_placeholder(value.into());
        self.conditions.push(format!("{column} = {placeholder}"));
        self
    }

    /// Adds an arbitrary predicate. Each `?` in `fragment` is replaced, in
    /// order, by the next positional placeholder bound to `values`.
    pub fn filter_raw(mut self, fragment: &str, values: Vec<Value>) -> Self {
        let mut values = values.into_iter().peekable();
        let mut sql = String::with_capacity(fragment.len());
        for c in fragment.chars() {
            match (c, values.next_if(|_| c == '?')) {
                (_, Some(value)) => sql.push_str(&self.next_placeholder(value)),
                (c, None) => sql.push(c),
            }
        }
        self.conditions.push(sql);
        self
    }

    /// Case-insensitive substring match OR-ed across `columns`.
    /// A missing or blank term adds nothing.
    pub fn search(mut self, columns: &[&str], term: Option<&str>) -> Self {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }

        let placeholder = self.next_placeholder(like_pattern(term).into());
        let predicate = columns
            .iter()
            .map(|col| format!("{col} ILIKE {placeholder} ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.conditions.push(format!("({predicate})"));
        self
    }

    pub fn order_by(mut self, sort_column: &str, tie_break_column: &str) -> Self {
        self.order = Some((sort_column.to_string(), tie_break_column.to_string()));
        self
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Returns `(count, data)` statements.
    pub fn build(&self, page: &PageRequest) -> (Statement, Statement) {
        let where_clause = self.where_clause();

        let count_sql = format!("SELECT COUNT(*) AS total FROM {}{}", self.from, where_clause);
        let count = Statement::from_sql_and_values(
            DbBackend::Postgres,
            count_sql,
            self.values.clone(),
        );

        let direction = page.sort_order.as_sql();
        let order_clause = match &self.order {
            Some((sort, tie)) => format!(" ORDER BY {sort} {direction}, {tie} {direction}"),
            None => String::new(),
        };

        let limit_index = self.values.len() + 1;
        let data_sql = format!(
            "SELECT {} FROM {}{}{} LIMIT ${} OFFSET ${}",
            self.select,
            self.from,
            where_clause,
            order_clause,
            limit_index,
            limit_index + 1
        );

        let mut data_values = self.values.clone();
        data_values.push(to_i64(page.limit).into());
        data_values.push(to_i64(page.offset()).into());
        let data = Statement::from_sql_and_values(DbBackend::Postgres, data_sql, data_values);

        (count, data)
    }

    /// Run both statements and assemble the page.
    pub async fn fetch<R, C>(&self, db: &C, page: &PageRequest) -> Result<PageResult<R>, DbErr>
    where
        R: FromQueryResult,
        C: ConnectionTrait,
    {
        let (count, data) = self.build(page);

        let total_items = CountRow::find_by_statement(count)
            .one(db)
            .await?
            .map(|row| row.total.max(0) as u64)
            .unwrap_or(0);

        let items = if total_items == 0 {
            Vec::new()
        } else {
            R::find_by_statement(data).all(db).await?
        };

        Ok(PageResult::new(items, total_items, page))
    }
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(String::from),
            limit: limit.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_lenient_parsing_falls_back_to_defaults() {
        let req = params(Some("abc"), Some("-3")).into_request(20);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 20);

        let req = params(Some("0"), Some("0")).into_request(10);
        assert_eq!((req.page, req.limit), (1, 10));

        let req = params(Some("3"), Some("7")).into_request(20);
        assert_eq!((req.page, req.limit, req.offset()), (3, 7, 14));
    }

    #[test]
    fn test_limit_is_capped() {
        let req = params(None, Some("5000")).into_request(20);
        assert_eq!(req.limit, MAX_LIMIT);
    }

    #[test]
    fn test_sort_order_and_search() {
        let req = PageParams {
            sort_order: Some("ASC".into()),
            search: Some("   ".into()),
            ..Default::default()
        }
        .into_request(20);
        assert_eq!(req.sort_order, SortOrder::Asc);
        assert_eq!(req.search, None);

        let req = PageParams {
            sort_order: Some("sideways".into()),
            search: Some(" bob ".into()),
            ..Default::default()
        }
        .into_request(20);
        assert_eq!(req.sort_order, SortOrder::Desc);
        assert_eq!(req.search_term(), Some("bob"));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(45, 10), 5);
    }

    #[test]
    fn test_from_sorted_slices_pages() {
        let page = PageRequest::new(3, 2);
        let result = PageResult::from_sorted((1..=5).collect::<Vec<_>>(), &page);
        assert_eq!(result.items, vec![5]);
        assert_eq!(result.current_page, 3);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total_items, 5);

        let beyond = PageResult::from_sorted(vec![1, 2], &PageRequest::new(9, 2));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 1);

        let empty = PageResult::<i32>::from_sorted(vec![], &PageRequest::default());
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_page_result_serializes_camel_case() {
        let result = PageResult::new(vec!["a"], 1, &PageRequest::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": ["a"],
                "currentPage": 1,
                "totalPages": 1,
                "totalItems": 1
            })
        );
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bob"), "%bob%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_matches_search_in_memory() {
        let page = PageRequest::default().with_search(Some("LIC".into()));
        assert!(page.matches_search(&["alice"]));
        assert!(page.matches_search(&["nope", "Felicity"]));
        assert!(!page.matches_search(&["bob"]));
        assert!(PageRequest::default().matches_search(&["anything"]));
    }

    #[test]
    fn test_build_without_filters() {
        let page = PageRequest::new(2, 10);
        let (count, data) = PagedQuery::new("id, title", "news")
            .order_by("created_at", "id")
            .build(&page);

        assert_eq!(count.sql, "SELECT COUNT(*) AS total FROM news");
        assert!(count.values.is_none_or(|v| v.0.is_empty()));

        assert_eq!(
            data.sql,
            "SELECT id, title FROM news ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let values = data.values.unwrap().0;
        assert_eq!(values, vec![Value::from(10i64), Value::from(10i64)]);
    }

    #[test]
    fn test_build_with_filters_and_search() {
        let page = PageRequest::new(1, 20)
            .with_sort_order(SortOrder::Asc)
            .with_search(Some("rust".into()));

        let (count, data) = PagedQuery::new("id, subject", "reviews")
            .filter_eq("user_id", "u-1")
            .filter_raw("LOWER(category) = LOWER(?)", vec!["Tech".into()])
            .search(&["subject", "message"], page.search_term())
            .order_by("created_at", "id")
            .build(&page);

        let where_clause = " WHERE user_id = $1 AND LOWER(category) = LOWER($2) \
             AND (subject ILIKE $3 ESCAPE '\\' OR message ILIKE $3 ESCAPE '\\')";
        assert_eq!(count.sql, format!("SELECT COUNT(*) AS total FROM reviews{where_clause}"));
        assert_eq!(
            data.sql,
            format!(
                "SELECT id, subject FROM reviews{where_clause} \
                 ORDER BY created_at ASC, id ASC LIMIT $4 OFFSET $5"
            )
        );

        let values = data.values.unwrap().0;
        assert_eq!(values.len(), 5);
        assert_eq!(values[2], Value::from("%rust%"));
        assert_eq!(values[3], Value::from(20i64));
        assert_eq!(values[4], Value::from(0i64));
        assert_eq!(count.values.unwrap().0.len(), 3);
    }

    #[test]
    fn test_blank_search_adds_no_predicate() {
        let (count, _) = PagedQuery::new("*", "users")
            .search(&["username"], Some("  "))
            .build(&PageRequest::default());
        assert_eq!(count.sql, "SELECT COUNT(*) AS total FROM users");
    }
}
