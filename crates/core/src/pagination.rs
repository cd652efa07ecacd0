//! Page window computation and pagination state.
//!
//! [`compute_window`] is the pure engine: it maps a record count, a page size
//! and a requested page to the index bounds of the visible slice.
//! [`PaginationState`] wraps it with the current page, the selected page size
//! and the allowed page-size options.

use std::num::NonZeroUsize;
use std::ops::Range;

use serde::Serialize;

use crate::error::CoreError;

/// Page sizes offered by the rows-per-page control when none are configured.
pub const DEFAULT_PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 30, 40, 50];

/// Rows per page on first mount.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Bounds of one page of a record collection.
///
/// `start_index..end_index` is always a valid (possibly empty) range into a
/// collection of the `total_count` the window was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub start_index: usize,
    pub end_index: usize,
    /// 1-based page number after clamping.
    pub effective_page: usize,
    pub total_pages: usize,
}

impl PageWindow {
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }
}

/// Number of pages needed for `total_count` rows. An empty collection still
/// has one (empty) page.
pub fn total_pages(total_count: usize, page_size: NonZeroUsize) -> usize {
    total_count.div_ceil(page_size.get()).max(1)
}

/// Compute the visible window for `requested_page`, clamped into
/// `1..=total_pages`.
pub fn compute_window(
    total_count: usize,
    page_size: NonZeroUsize,
    requested_page: i64,
) -> PageWindow {
    let total_pages = total_pages(total_count, page_size);
    let last = i64::try_from(total_pages).unwrap_or(i64::MAX);
    let effective_page = usize::try_from(requested_page.clamp(1, last)).unwrap_or(1);

    let start_index = ((effective_page - 1) * page_size.get()).min(total_count);
    let end_index = start_index.saturating_add(page_size.get()).min(total_count);

    PageWindow {
        start_index,
        end_index,
        effective_page,
        total_pages,
    }
}

// ---------------------------------------------------------------------------
// Page-size options
// ---------------------------------------------------------------------------

/// Ordered set of page sizes the rows-per-page control may select from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeOptions(Vec<NonZeroUsize>);

impl PageSizeOptions {
    /// Build an option set. Values must be positive and strictly ascending.
    pub fn new(values: impl IntoIterator<Item = usize>) -> Result<Self, CoreError> {
        let mut options: Vec<NonZeroUsize> = Vec::new();
        for value in values {
            let size = NonZeroUsize::new(value).ok_or_else(|| {
                CoreError::Validation("Page size options must be positive".to_string())
            })?;
            if options.last().is_some_and(|prev| *prev >= size) {
                return Err(CoreError::Validation(
                    "Page size options must be strictly ascending".to_string(),
                ));
            }
            options.push(size);
        }
        if options.is_empty() {
            return Err(CoreError::Validation(
                "At least one page size option is required".to_string(),
            ));
        }
        Ok(Self(options))
    }

    /// Look up `size` in the option set.
    pub fn resolve(&self, size: usize) -> Result<NonZeroUsize, CoreError> {
        self.0
            .iter()
            .copied()
            .find(|option| option.get() == size)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid page size {size}. Must be one of: {}",
                    self.values()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    pub fn contains(&self, size: usize) -> bool {
        self.resolve(size).is_ok()
    }

    pub fn values(&self) -> Vec<usize> {
        self.0.iter().map(|v| v.get()).collect()
    }
}

impl Default for PageSizeOptions {
    fn default() -> Self {
        Self(
            DEFAULT_PAGE_SIZE_OPTIONS
                .iter()
                .filter_map(|v| NonZeroUsize::new(*v))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Pagination state
// ---------------------------------------------------------------------------

/// Current page and page size of one table mount.
///
/// The stored page is always the effective (clamped) page for the record
/// count passed to the last navigation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    page_size: NonZeroUsize,
    options: PageSizeOptions,
}

impl PaginationState {
    pub fn new(options: PageSizeOptions, page_size: usize) -> Result<Self, CoreError> {
        let page_size = options.resolve(page_size)?;
        Ok(Self {
            current_page: 1,
            page_size,
            options,
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn options(&self) -> &PageSizeOptions {
        &self.options
    }

    pub fn window(&self, total_count: usize) -> PageWindow {
        compute_window(total_count, self.page_size, self.page_as_i64())
    }

    /// Jump to `page`, clamped into range. Returns the effective page.
    pub fn go_to(&mut self, page: i64, total_count: usize) -> usize {
        self.current_page = compute_window(total_count, self.page_size, page).effective_page;
        self.current_page
    }

    pub fn first(&mut self) -> usize {
        self.current_page = 1;
        self.current_page
    }

    pub fn previous(&mut self, total_count: usize) -> usize {
        self.go_to(self.page_as_i64().saturating_sub(1), total_count)
    }

    pub fn next(&mut self, total_count: usize) -> usize {
        self.go_to(self.page_as_i64().saturating_add(1), total_count)
    }

    pub fn last(&mut self, total_count: usize) -> usize {
        self.current_page = total_pages(total_count, self.page_size);
        self.current_page
    }

    /// Re-clamp after the record count changed.
    pub fn clamp(&mut self, total_count: usize) -> usize {
        self.go_to(self.page_as_i64(), total_count)
    }

    /// Switch to another page size from the option set and go back to page 1.
    pub fn set_page_size(&mut self, size: usize) -> Result<(), CoreError> {
        self.page_size = self.options.resolve(size)?;
        self.current_page = 1;
        Ok(())
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self, total_count: usize) -> bool {
        self.current_page < total_pages(total_count, self.page_size)
    }

    fn page_as_i64(&self) -> i64 {
        i64::try_from(self.current_page).unwrap_or(i64::MAX)
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: NonZeroUsize::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1),
            options: PageSizeOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn window_bounds_hold_for_all_small_inputs() {
        for total in 0..60 {
            for page_size in 1..12 {
                for requested in -3..12 {
                    let w = compute_window(total, size(page_size), requested);
                    assert!(w.start_index <= w.end_index, "{total}/{page_size}/{requested}");
                    assert!(w.end_index <= total);
                    assert!(w.effective_page >= 1);
                    assert!(w.effective_page <= w.total_pages);
                    assert!(w.len() <= page_size);
                }
            }
        }
    }

    #[test]
    fn twenty_three_records_ten_per_page() {
        let first = compute_window(23, size(10), 1);
        assert_eq!(first.range(), 0..10);
        assert_eq!(first.total_pages, 3);

        let third = compute_window(23, size(10), 3);
        assert_eq!(third.range(), 20..23);
        assert_eq!(third.effective_page, 3);
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let w = compute_window(0, size(10), 1);
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.effective_page, 1);
        assert!(w.is_empty());
    }

    #[test]
    fn requested_page_is_clamped() {
        assert_eq!(compute_window(23, size(10), 0).effective_page, 1);
        assert_eq!(compute_window(23, size(10), -7).effective_page, 1);
        assert_eq!(compute_window(23, size(10), 99).effective_page, 3);
        assert_eq!(compute_window(23, size(10), 99).range(), 20..23);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        assert_eq!(total_pages(20, size(10)), 2);
        assert_eq!(total_pages(21, size(10)), 3);
    }

    #[test]
    fn huge_page_size_does_not_overflow() {
        let w = compute_window(5, size(usize::MAX), 1);
        assert_eq!(w.range(), 0..5);
        assert_eq!(w.total_pages, 1);
    }

    #[test]
    fn options_reject_zero_unsorted_and_empty() {
        assert!(PageSizeOptions::new([10, 0]).is_err());
        assert!(PageSizeOptions::new([20, 10]).is_err());
        assert!(PageSizeOptions::new([10, 10]).is_err());
        assert!(PageSizeOptions::new(Vec::new()).is_err());
        assert!(PageSizeOptions::new([5, 25]).is_ok());
    }

    #[test]
    fn default_options_match_rows_per_page_control() {
        let options = PageSizeOptions::default();
        assert_eq!(options.values(), vec![10, 20, 30, 40, 50]);
        assert!(!options.contains(15));
    }

    #[test]
    fn changing_page_size_resets_to_first_page() {
        let mut state = PaginationState::default();
        state.go_to(3, 45);
        assert_eq!(state.current_page(), 3);

        state.set_page_size(20).unwrap();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.page_size().get(), 20);
    }

    #[test]
    fn page_size_outside_options_is_rejected_and_state_kept() {
        let mut state = PaginationState::default();
        state.go_to(2, 45);

        let err = state.set_page_size(15).unwrap_err();
        assert!(err.to_string().contains("15"));
        assert_eq!(state.current_page(), 2);
        assert_eq!(state.page_size().get(), 10);
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let mut state = PaginationState::default();
        assert!(!state.can_go_previous());
        assert_eq!(state.previous(23), 1);

        assert_eq!(state.next(23), 2);
        assert_eq!(state.next(23), 3);
        assert!(!state.can_go_next(23));
        assert_eq!(state.next(23), 3);

        assert_eq!(state.first(), 1);
        assert_eq!(state.last(23), 3);
    }

    #[test]
    fn clamp_after_shrinking_collection() {
        let mut state = PaginationState::default();
        state.last(45);
        assert_eq!(state.current_page(), 5);
        assert_eq!(state.clamp(12), 2);
        assert_eq!(state.clamp(0), 1);
    }

    #[test]
    fn new_requires_default_size_in_options() {
        let options = PageSizeOptions::new([5, 25]).unwrap();
        assert!(PaginationState::new(options.clone(), 10).is_err());
        assert_eq!(PaginationState::new(options, 25).unwrap().page_size().get(), 25);
    }
}
