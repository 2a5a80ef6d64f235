//! Paging wire types shared by every listed resource.
//!
//! Pages are 1-based on the wire (`pageNumber=1` is the first page). Paginator
//! controls count from 0; [`PageRequest::from_index`] is the only place where the
//! two meet.

use serde::{Deserialize, Serialize};

/// Page size used until the server says otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Query parameters of a paged read (`?pageNumber=&pageSize=`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from 1-based page number. Both values are clamped to 1.
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Translate a 0-based paginator index into a 1-based page request.
    pub fn from_index(page_index: u32, page_size: u32) -> Self {
        Self::new(page_index.saturating_add(1), page_size)
    }

    /// The 0-based index paginator controls display for this page.
    pub fn index(&self) -> u32 {
        self.page_number.saturating_sub(1)
    }

    /// Offset of the first item of this page in the full collection.
    pub fn offset(&self) -> usize {
        self.index() as usize * self.page_size as usize
    }

    /// Slice one page out of a fully loaded collection.
    pub fn slice<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        let start = self.offset().min(all.len());
        let end = start.saturating_add(self.page_size as usize).min(all.len());
        &all[start..end]
    }
}

/// Response of a paged read.
///
/// Every metadata field is optional: the server may omit any of them, and
/// some collections answer with a bare JSON array instead of an envelope.
/// Zero is treated the same as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(from = "PagedWire<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total_items: Option<u64>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub total_pages: Option<u32>,
}

impl<T> PagedResponse<T> {
    pub fn new(items: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_items: Some(total_items),
            page_number: Some(request.page_number),
            page_size: Some(request.page_size),
            total_pages: None,
        }
    }

    /// Server page number, or `fallback` when absent.
    pub fn page_number_or(&self, fallback: u32) -> u32 {
        self.page_number.filter(|n| *n > 0).unwrap_or(fallback)
    }

    /// Server page size, or `fallback` when absent.
    pub fn page_size_or(&self, fallback: u32) -> u32 {
        self.page_size.filter(|n| *n > 0).unwrap_or(fallback)
    }

    /// Total item count; absent counts as zero.
    pub fn total(&self) -> u64 {
        self.total_items.unwrap_or(0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PagedWire<T> {
    Bare(Vec<T>),
    Envelope {
        #[serde(default = "Vec::new")]
        items: Vec<T>,
        #[serde(default, rename = "totalItems")]
        total_items: Option<u64>,
        #[serde(default, rename = "pageNumber")]
        page_number: Option<u32>,
        #[serde(default, rename = "pageSize")]
        page_size: Option<u32>,
        #[serde(default, rename = "totalPages")]
        total_pages: Option<u32>,
    },
}

impl<T> From<PagedWire<T>> for PagedResponse<T> {
    fn from(wire: PagedWire<T>) -> Self {
        match wire {
            PagedWire::Bare(items) => Self {
                total_items: Some(items.len() as u64),
                items,
                page_number: None,
                page_size: None,
                total_pages: None,
            },
            PagedWire::Envelope {
                items,
                total_items,
                page_number,
                page_size,
                total_pages,
            } => Self {
                items,
                total_items,
                page_number,
                page_size,
                total_pages,
            },
        }
    }
}
