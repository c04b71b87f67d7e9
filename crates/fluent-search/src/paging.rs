//! Paging: which slice of the ordered result set is returned.
//!
//! In [`PageMode::Pager`] the stored position is a 1-based page number; in
//! [`PageMode::Start`] it is a 0-based offset.

use serde::{Deserialize, Serialize};

use crate::queryable::Queryable;

/// Default page size.
pub const DEFAULT_DISPLAY: i32 = 10;

/// How [`PagingOptions::start`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    /// `start` is an offset.
    Start,
    /// `start` is a page number.
    #[default]
    Pager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingOptions {
    pub mode: PageMode,
    pub start: i32,
    /// Page size; zero or negative means no limit.
    pub display: i32,
}

impl Default for PagingOptions {
    fn default() -> Self {
        PagingOptions {
            mode: PageMode::Pager,
            start: 0,
            display: DEFAULT_DISPLAY,
        }
    }
}

impl PagingOptions {
    pub fn with_display(display: i32) -> Self {
        PagingOptions {
            display,
            ..PagingOptions::default()
        }
    }

    /// Number of results to skip.
    ///
    /// For the pager this is `(page - 1) * display`, `0` for the first page
    /// and for a non-positive page size. Never negative.
    pub fn starting_position(&self) -> i32 {
        match self.mode {
            PageMode::Pager if self.start <= 1 || self.display <= 0 => 0,
            PageMode::Pager => (self.start - 1).saturating_mul(self.display),
            PageMode::Start => self.start.max(0),
        }
    }

    /// Result limit, `None` when unlimited.
    pub fn limit(&self) -> Option<usize> {
        (self.display > 0).then_some(self.display as usize)
    }

    /// Issues `skip`/`take` against a queryable, omitting no-op calls.
    pub fn apply<T, Q: Queryable<T>>(&self, queryable: Q) -> Q {
        let skip = self.starting_position();
        let queryable = if skip > 0 {
            queryable.skip(skip as usize)
        } else {
            queryable
        };

        match self.limit() {
            Some(take) => queryable.take(take),
            None => queryable,
        }
    }
}

/// Builder over [`PagingOptions`].
pub struct PagingBuilder<'a> {
    options: &'a mut PagingOptions,
}

impl<'a> PagingBuilder<'a> {
    pub fn new(options: &'a mut PagingOptions) -> Self {
        PagingBuilder { options }
    }

    pub fn set_page_mode(&mut self, mode: PageMode) -> &mut Self {
        self.options.mode = mode;
        self
    }

    /// Sets the 1-based page; anything below 1 is stored as 1.
    pub fn set_page(&mut self, page: i32) -> &mut Self {
        self.options.start = page.max(1);
        self
    }

    /// Sets the offset. Negative values become 0; with `include_start` a
    /// positive start is moved back one so that result is included.
    pub fn set_starting_position(&mut self, start: i32, include_start: bool) -> &mut Self {
        let start = start.max(0);
        self.options.start = if include_start && start > 0 {
            start - 1
        } else {
            start
        };
        self
    }

    pub fn skip(&mut self, start: i32, include_start: bool) -> &mut Self {
        self.set_starting_position(start, include_start)
    }

    /// Sets the page size; zero or negative disables the limit.
    pub fn set_display_size(&mut self, display: i32) -> &mut Self {
        self.options.display = display;
        self
    }

    pub fn take(&mut self, display: i32) -> &mut Self {
        self.set_display_size(display)
    }
}
