//! Row-range work partitioning.
//!
//! Divides the image's rows into contiguous stripes that can be rendered
//! independently, one per worker thread.

/// A half-open range of image rows `[y0, y1)` assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row of the range (inclusive)
    pub y0: u32,
    /// One past the last row of the range
    pub y1: u32,
}

impl RowRange {
    /// Number of rows in the range.
    pub fn len(&self) -> u32 {
        self.y1 - self.y0
    }

    /// True if the range contains no rows.
    pub fn is_empty(&self) -> bool {
        self.y0 >= self.y1
    }

    /// Iterate over the rows of the range in increasing order.
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.y0..self.y1
    }
}

/// Partition `[0, height)` into at most `workers` contiguous row ranges.
///
/// Each range holds `ceil(height / workers)` rows except possibly the last,
/// which is shrunk to fit. When `workers` exceeds `height` the trailing
/// ranges would be empty; those are omitted, so every returned range is
/// non-empty and the union is exactly `[0, height)`.
pub fn partition_rows(height: u32, workers: usize) -> Vec<RowRange> {
    let workers = workers.max(1) as u32;
    let rows_per_worker = height.div_ceil(workers);

    let mut ranges = Vec::with_capacity(workers as usize);
    for i in 0..workers {
        let y0 = i * rows_per_worker;
        let y1 = (y0 + rows_per_worker).min(height);
        if y0 >= height {
            break;
        }
        ranges.push(RowRange { y0, y1 });
    }
    ranges
}
