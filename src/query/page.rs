use serde::Serialize;

use crate::core::error::{Error, ErrorKind, Result};

/// Validated `(page, limit)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, max_limit: usize) -> Result<Self> {
        if limit == 0 || limit > max_limit {
            return Err(Error::invalid_argument(format!(
                "limit must be between 1 and {}",
                max_limit
            )));
        }
        if page == 0 {
            return Err(Error::invalid_argument("page must be at least 1"));
        }
        Ok(Pagination { page, limit })
    }

    pub fn start_index(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total_results: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Window `[start, start + limit)` of `items`; empty past the end.
pub fn paginate<T>(items: &[T], pagination: Pagination) -> (&[T], PageInfo) {
    let total = items.len();
    let start = pagination.start_index().min(total);
    let end = start.saturating_add(pagination.limit).min(total);
    let info = PageInfo {
        page: pagination.page,
        limit: pagination.limit,
        total_results: total,
        total_pages: total.div_ceil(pagination.limit),
        has_next: pagination.start_index().saturating_add(pagination.limit) < total,
        has_prev: pagination.page > 1,
    };
    (&items[start..end], info)
}

/// One page of search hits.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage<T> {
    pub query: String,
    pub results: Vec<T>,
    pub pagination: PageInfo,
    pub filter: Option<String>,
}

/// Trim and lower-case a search term; empty terms are rejected.
pub fn normalize_query(raw: &str) -> Result<String> {
    let term = raw.trim().to_lowercase();
    if term.is_empty() {
        return Err(Error::new(ErrorKind::InvalidQuery, "search query is required"));
    }
    Ok(term)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeInfo {
    pub start: usize,
    pub end: usize,
    pub count: usize,
    pub has_more: bool,
    pub total: usize,
}

/// Check `start >= 0`, `end > start` and `end - start <= max_window`.
pub fn validate_range(start: i64, end: i64, max_window: usize) -> Result<(usize, usize)> {
    if start < 0 {
        return Err(Error::new(ErrorKind::InvalidRange, "start must be >= 0"));
    }
    if end <= start {
        return Err(Error::new(ErrorKind::InvalidRange, "end must be greater than start"));
    }
    let window = (end - start) as u64;
    if window > max_window as u64 {
        return Err(Error::new(
            ErrorKind::InvalidRange,
            format!("range too large, at most {} records per request", max_window),
        ));
    }
    Ok((start as usize, end as usize))
}

/// Records `[start, end)` of `items`, clamped to its length. An empty
/// window is an `EmptyResult`.
pub fn slice_range<T>(items: &[T], start: usize, end: usize) -> Result<(&[T], RangeInfo)> {
    let total = items.len();
    let from = start.min(total);
    let to = end.min(total);
    let slice = &items[from..to];
    if slice.is_empty() {
        return Err(Error::new(
            ErrorKind::EmptyResult,
            format!("no records in range {}..{} (total {})", start, end, total),
        ));
    }
    let info = RangeInfo {
        start,
        end,
        count: slice.len(),
        has_more: end < total,
        total,
    };
    Ok((slice, info))
}

/// Previous/next identifiers around a position within one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub current_position: usize,
    pub total: usize,
}

impl Navigation {
    /// `position` is 0-based; `id_at` renders the identifier at a position.
    pub fn at(position: usize, total: usize, id_at: impl Fn(usize) -> String) -> Self {
        Navigation {
            previous: position.checked_sub(1).map(&id_at),
            next: (position + 1 < total).then(|| id_at(position + 1)),
            current_position: position + 1,
            total,
        }
    }
}
