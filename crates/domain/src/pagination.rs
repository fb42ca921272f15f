//! Pagination for list endpoints and client-side tables.

use serde::{Deserialize, Serialize};

use crate::request::{QueryParams, ToQuery};

/// Default rows per page in tables.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A page request (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Creates a page request, normalising zero values to 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Index of the first row on this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }
}

impl ToQuery for PageRequest {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with("page", self.page)
            .with("limit", self.page_size)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Total rows across all pages.
    pub total: u64,
    /// Page number, starting at 1.
    pub page: u32,
    /// Rows per page.
    #[serde(alias = "limit")]
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages, at least 1.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.page_size)).max(1)
    }

    /// Returns true when a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Returns true when an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slices an in-memory list into the requested page.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let start = request.offset().min(items.len());
    let end = start.saturating_add(request.page_size as usize).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        total: items.len() as u64,
        page: request.page,
        page_size: request.page_size,
    }
}

/// List endpoints answer either with a bare array or a page envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// `{ items, total, page, pageSize }`
    Paged(Page<T>),
    /// `{ data: [...] }`, optionally with `total`, `page` and `limit`.
    #[serde(rename_all = "camelCase")]
    Wrapped {
        /// Rows.
        data: Vec<T>,
        /// Total rows across all pages, when the server reports it.
        #[serde(default)]
        total: Option<u64>,
        /// Page number, when the server reports it.
        #[serde(default)]
        page: Option<u32>,
        /// Rows per page, when the server reports it.
        #[serde(default, alias = "limit")]
        page_size: Option<u32>,
    },
    /// `[...]`
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Normalises into a page. Paging fields missing from the answer are
    /// filled as if every row fit on a single page.
    #[must_use]
    pub fn into_page(self) -> Page<T> {
        match self {
            Self::Paged(page) => page,
            Self::Wrapped {
                data,
                total,
                page,
                page_size,
            } => single_page(data, total, page, page_size),
            Self::Plain(items) => single_page(items, None, None, None),
        }
    }
}

fn single_page<T>(
    items: Vec<T>,
    total: Option<u64>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Page<T> {
    let len = items.len();
    Page {
        total: total.unwrap_or(len as u64),
        page: page.unwrap_or(1).max(1),
        page_size: page_size
            .unwrap_or_else(|| u32::try_from(len).unwrap_or(u32::MAX))
            .max(1),
        items,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paginate_middle_and_last_page() {
        let rows: Vec<u32> = (1..=25).collect();

        let second = paginate(&rows, PageRequest::new(2, 10));
        assert_eq!(second.items, (11..=20).collect::<Vec<_>>());
        assert!(second.has_next());
        assert!(second.has_previous());

        let third = paginate(&rows, PageRequest::new(3, 10));
        assert_eq!(third.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(third.total_pages(), 3);
        assert!(!third.has_next());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let rows = vec!['a', 'b'];
        let page = paginate(&rows, PageRequest::new(9, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }

    #[test]
    fn zero_page_normalises_to_first() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request, PageRequest { page: 1, page_size: 1 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn list_response_accepts_every_shape() {
        let paged: ListResponse<u32> = serde_json::from_str(
            r#"{"items":[1,2],"total":12,"page":2,"limit":2}"#,
        )
        .unwrap();
        let page = paged.into_page();
        assert_eq!(page.total, 12);
        assert_eq!(page.page_size, 2);

        let wrapped: ListResponse<u32> = serde_json::from_str(r#"{"data":[1,2,3]}"#).unwrap();
        let page = wrapped.into_page();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total, 3);
        assert!(!page.has_next());

        let wrapped: ListResponse<u32> = serde_json::from_str(
            r#"{"data":[1,2],"total":57,"page":2,"limit":2}"#,
        )
        .unwrap();
        let page = wrapped.into_page();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 57);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 2);
        assert!(page.has_next());
        assert!(page.has_previous());

        let plain: ListResponse<u32> = serde_json::from_str("[4]").unwrap();
        assert_eq!(plain.into_page().total, 1);
    }
}
