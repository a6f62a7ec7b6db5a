//! Page arithmetic shared by every post listing.

use serde::Serialize;

/// Offset/limit window requested from a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows to skip. Saturates instead of overflowing for absurd page numbers.
    pub fn offset(&self) -> usize {
        self.page
            .max(1)
            .saturating_sub(1)
            .saturating_mul(self.per_page)
    }
}

/// Page number as received from a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageRequest {
    /// No page given, or a value that is not an integer.
    #[default]
    First,
    Number(i64),
}

impl PageRequest {
    /// Parse a raw `?page=` value. Missing or non-numeric input selects the
    /// first page.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(number)) => Self::Number(number),
            _ => Self::First,
        }
    }
}

impl From<usize> for PageRequest {
    fn from(page: usize) -> Self {
        Self::Number(i64::try_from(page).unwrap_or(i64::MAX))
    }
}

/// Splits `total` items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub total: usize,
    pub per_page: usize,
}

impl Paginator {
    pub fn new(total: usize, per_page: usize) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages; an empty collection still has one (empty) page.
    pub fn num_pages(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Resolve a request to an existing page. Out-of-range numbers, including
    /// zero and negatives, select the last page.
    pub fn resolve(&self, request: PageRequest) -> usize {
        match request {
            PageRequest::First => 1,
            PageRequest::Number(number) => match usize::try_from(number) {
                Ok(page) if (1..=self.num_pages()).contains(&page) => page,
                _ => self.num_pages(),
            },
        }
    }

    pub fn window(&self, page: usize) -> Pagination {
        Pagination {
            page,
            per_page: self.per_page,
        }
    }
}

/// One page of items plus the numbers a pager widget needs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, paginator: &Paginator) -> Self {
        let total_pages = paginator.num_pages();
        Self {
            items,
            page,
            total_pages,
            total_items: paginator.total,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}
