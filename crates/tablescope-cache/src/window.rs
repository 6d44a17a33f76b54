use std::ops::RangeInclusive;

/// Visible-column descriptor that drives a cache update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdateRequest {
    pub first_column_index: usize,
    pub visible_columns: usize,
}

impl UpdateRequest {
    pub fn new(first_column_index: usize, visible_columns: usize) -> Self {
        Self {
            first_column_index,
            visible_columns,
        }
    }
}

/// Inclusive range of column indices to keep resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnWindow {
    pub start: usize,
    pub end: usize,
}

impl ColumnWindow {
    /// Expand the visible columns of `request` by `overscan_factor` screens on
    /// each side, clamped to `[0, total_columns - 1]`.
    ///
    /// `start = max(first - visible * k, 0)` and
    /// `end = min(start + visible * (1 + 2k), total_columns - 1)`.
    ///
    /// Returns `None` for an empty table. A `first_column_index` past the last
    /// column is clamped to the last column, so the returned window always
    /// contains the (clamped) first visible column.
    pub fn overscanned(
        request: UpdateRequest,
        total_columns: usize,
        overscan_factor: usize,
    ) -> Option<Self> {
        let last = total_columns.checked_sub(1)?;
        let first = request.first_column_index.min(last);
        let margin = request.visible_columns.saturating_mul(overscan_factor);
        let span = request
            .visible_columns
            .saturating_mul(overscan_factor.saturating_mul(2).saturating_add(1));

        let start = first.saturating_sub(margin);
        let end = start.saturating_add(span).min(last);
        Some(Self { start, end })
    }

    /// Number of columns covered; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}
