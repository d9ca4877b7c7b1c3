//! Filter, sort and paginate over an already materialized series list.
//!
//! Steps always run in that order. An empty outcome is reported as `None`
//! so callers can answer "not found" instead of an empty page.

use serde::Deserialize;
use validator::Validate;

use crate::models::Series;

/// Filter value that disables title matching.
pub const WILDCARD: &str = "*";

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Anything with a title the search can match and order on.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for Series {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Query string of the series search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct SeriesQuery {
    /// 1-indexed page number.
    #[validate(range(min = 1, max = 99999, message = "Page must be between 1 and 99999."))]
    pub page: i32,

    /// Case-sensitive title substring, or `*` for everything.
    #[validate(length(min = 1, max = 255, message = "Filter must be between 1 and 255 characters."))]
    pub filter: String,

    /// Order by title ascending; otherwise keep store order.
    pub sort: bool,
}

impl Default for SeriesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            filter: WILDCARD.to_string(),
            sort: false,
        }
    }
}

impl SeriesQuery {
    /// Runs filter, sort and paginate over `items`.
    ///
    /// Returns `None` when nothing is left on the requested page.
    #[must_use]
    pub fn apply<T: Titled>(&self, items: Vec<T>, page_size: usize) -> Option<Vec<T>> {
        let mut items = filter_by_title(items, &self.filter);
        if items.is_empty() {
            return None;
        }

        if self.sort {
            items.sort_by(|a, b| a.title().cmp(b.title()));
        }

        let page = paginate(items, self.page, page_size);
        (!page.is_empty()).then_some(page)
    }
}

/// Keeps items whose title contains `filter`; the wildcard keeps everything.
#[must_use]
pub fn filter_by_title<T: Titled>(items: Vec<T>, filter: &str) -> Vec<T> {
    if filter == WILDCARD {
        return items;
    }

    items
        .into_iter()
        .filter(|item| item.title().contains(filter))
        .collect()
}

/// Slices out one 1-indexed page. Pages below 1 are empty.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: i32, page_size: usize) -> Vec<T> {
    let Some(index) = usize::try_from(page).ok().and_then(|p| p.checked_sub(1)) else {
        return Vec::new();
    };

    items
        .into_iter()
        .skip(index.saturating_mul(page_size))
        .take(page_size)
        .collect()
}
