//! Limit/offset pagination primitives shared by the backend list endpoints.
//!
//! Callers normalise the raw `limit`/`offset` query parameters into a
//! [`PageRequest`], repositories answer with a [`Page`] holding one slice of
//! results plus the total row count, and inbound adapters wrap that page into
//! a [`Paginated`] envelope carrying absolute `next`/`previous` links.
//!
//! ```
//! use pagination::{Page, PageParams, PageRequest, Paginated};
//! use url::Url;
//!
//! let request = PageRequest::from_params(PageParams { limit: Some(2), offset: None }, 20)
//!     .expect("valid params");
//! let page = Page::new(vec!["a", "b"], 5, request);
//! let base = Url::parse("https://example.test/api/posts").expect("valid url");
//! let envelope = Paginated::from_page(page, &base);
//! assert_eq!(envelope.count, 5);
//! assert_eq!(
//!     envelope.next.as_deref(),
//!     Some("https://example.test/api/posts?limit=2&offset=2")
//! );
//! assert!(envelope.previous.is_none());
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

/// Largest page size any caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Window size used when neither the client nor the caller chooses one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Errors raised while normalising pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The requested limit was zero.
    #[error("limit must be a positive integer")]
    ZeroLimit,
    /// The configured default limit was outside `1..=MAX_LIMIT`.
    #[error("default limit {value} must be between 1 and {max}", max = MAX_LIMIT)]
    InvalidDefault {
        /// The rejected default.
        value: u32,
    },
}

/// Raw pagination query parameters as supplied by clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Maximum number of results to return.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u64>,
}

/// Validated pagination window.
///
/// ## Invariants
/// - `limit` is within `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Build a request, clamping oversized limits to [`MAX_LIMIT`].
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroLimit`] when `limit` is zero.
    pub fn new(limit: u32, offset: u64) -> Result<Self, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        Ok(Self {
            limit: limit.min(MAX_LIMIT),
            offset,
        })
    }

    /// Normalise raw client parameters using `default_limit` when absent.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidDefault`] for a misconfigured default
    /// and [`PaginationError::ZeroLimit`] when the client asks for zero rows.
    pub fn from_params(params: PageParams, default_limit: u32) -> Result<Self, PaginationError> {
        if default_limit == 0 || default_limit > MAX_LIMIT {
            return Err(PaginationError::InvalidDefault {
                value: default_limit,
            });
        }
        Self::new(params.limit.unwrap_or(default_limit), params.offset.unwrap_or(0))
    }

    /// Maximum number of rows in the window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before the window starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Request for the window following this one, if `total` has more rows.
    #[must_use]
    pub fn next(&self, total: u64) -> Option<Self> {
        let offset = self.offset.saturating_add(u64::from(self.limit));
        (offset < total).then_some(Self {
            limit: self.limit,
            offset,
        })
    }

    /// Request for the window preceding this one, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        (self.offset > 0).then(|| Self {
            limit: self.limit,
            offset: self.offset.saturating_sub(u64::from(self.limit)),
        })
    }

    fn apply_to(&self, base: &Url) -> Url {
        let retained: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(key, _)| key != "limit" && key != "offset")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        let mut url = base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &retained {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("limit", &self.limit.to_string());
            if self.offset > 0 {
                pairs.append_pair("offset", &self.offset.to_string());
            }
        }
        url
    }
}

/// One window of results together with the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows inside the requested window.
    pub items: Vec<T>,
    /// Number of rows across all windows.
    pub total: u64,
    /// Window that produced `items`.
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Assemble a page from a slice of rows and the total count.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Transform every row while keeping the window metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

/// Serialised list envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Number of rows across all windows.
    pub count: u64,
    /// Absolute link to the following window.
    pub next: Option<String>,
    /// Absolute link to the preceding window.
    pub previous: Option<String>,
    /// Rows inside this window.
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Build the envelope, deriving links from the request URL `base`.
    ///
    /// Existing query parameters other than `limit` and `offset` are kept.
    #[must_use]
    pub fn from_page(page: Page<T>, base: &Url) -> Self {
        let Page {
            items,
            total,
            request,
        } = page;
        Self {
            count: total,
            next: request.next(total).map(|next| next.apply_to(base).into()),
            previous: request
                .previous()
                .map(|previous| previous.apply_to(base).into()),
            results: items,
        }
    }
}
