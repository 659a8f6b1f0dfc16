//! Response models and request parameters for The One API.
//!
//! List endpoints share one envelope shape, which [`Paged`] passes through
//! unmodified; the record types mirror the documented wire fields.

use serde::Deserialize;

/// Server envelope for list endpoints.
///
/// The API wraps every list response as
/// `{docs, total, limit, offset, page, pages}`. Which of the pagination
/// counters appear depends on whether limit/page or offset pagination was
/// requested, so the optional ones stay optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    /// The records for this page.
    pub docs: Vec<T>,
    /// Total number of records across all pages.
    pub total: u64,
    /// Page size used for this response.
    pub limit: u64,
    /// Offset into the result set, when offset pagination was used.
    #[serde(default)]
    pub offset: Option<u64>,
    /// Current page number.
    #[serde(default)]
    pub page: Option<u64>,
    /// Total number of pages.
    #[serde(default)]
    pub pages: Option<u64>,
}

/// A movie record from `/movie`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Record ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Movie title.
    pub name: String,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime_in_minutes: Option<f64>,
    /// Production budget, millions USD.
    #[serde(default)]
    pub budget_in_millions: Option<f64>,
    /// Box office revenue, millions USD.
    #[serde(default)]
    pub box_office_revenue_in_millions: Option<f64>,
    /// Academy Award nominations.
    #[serde(default)]
    pub academy_award_nominations: Option<u32>,
    /// Academy Award wins.
    #[serde(default)]
    pub academy_award_wins: Option<u32>,
    /// Rotten Tomatoes score.
    #[serde(default)]
    pub rotten_tomatoes_score: Option<f64>,
}

/// A quote record from `/movie/{id}/quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    /// Record ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// The quoted line.
    pub dialog: String,
    /// ID of the movie the quote is from.
    pub movie: String,
    /// ID of the character who says the line.
    pub character: String,
}

/// Pagination parameters for quote lookups.
///
/// Unset values fall back to the server-side conventions this library has
/// always used: 10 results per page, starting at page 1. Zero is treated the
/// same as unset.
///
/// # Examples
///
/// ```
/// use the_one_api::QuoteParams;
///
/// let defaults = QuoteParams::default();
/// let custom = QuoteParams::default().limit(50).page(2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteParams {
    /// Number of results per page. Defaults to 10.
    pub limit: Option<u32>,
    /// Page number to fetch. Defaults to 1.
    pub page: Option<u32>,
}

/// Default page size for quote lookups.
pub(crate) const DEFAULT_QUOTE_LIMIT: u32 = 10;

/// Default page number for quote lookups.
pub(crate) const DEFAULT_QUOTE_PAGE: u32 = 1;

impl QuoteParams {
    /// Sets the number of results per page.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page number to fetch.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// The effective page size, with unset or zero mapped to the default.
    pub(crate) fn effective_limit(&self) -> u32 {
        self.limit
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_QUOTE_LIMIT)
    }

    /// The effective page number, with unset or zero mapped to the default.
    pub(crate) fn effective_page(&self) -> u32 {
        self.page.filter(|&v| v > 0).unwrap_or(DEFAULT_QUOTE_PAGE)
    }
}
