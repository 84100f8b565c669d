/// Half-open interval `[start, end)` on any ordered axis: calendar dates,
/// day offsets or normalized timeline positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<T> {
    pub start: T,
    pub end: T,
}

impl<T: PartialOrd + Copy> Span<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    /// `start <= end`. Unordered values (NaN) are never valid.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Zero-length span, a single point on the axis.
    pub fn is_empty(&self) -> bool {
        !(self.start < self.end)
    }

    /// Half-open intersection test.
    ///
    /// Abutting spans (`a.end == b.start`) do not overlap, and an empty span
    /// overlaps nothing, not even a span that strictly contains its point.
    /// That last rule is intentional: a zero-length task stays in lane 0
    /// rather than taking a lane below a bar that covers its date.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.end <= other.start || self.start >= other.end)
    }
}
