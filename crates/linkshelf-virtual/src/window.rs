use std::ops::Range;

/// Half-open range of item indexes eligible for rendering: `[start, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowRange {
    pub start: usize,
    pub end: usize,
}

impl WindowRange {
    /// Window for `len` items of `item_height` px, scrolled to
    /// `scroll_offset` in a viewport `viewport_height` px tall, widened by
    /// `buffer` items on both sides:
    ///
    /// `start = max(0, floor(S / H) - B)`, `end = min(N, ceil((S + V) / H) + B)`.
    ///
    /// Degenerate input (no items, non-positive height, non-finite geometry)
    /// yields an empty window.
    ///
    /// ```rust
    /// use linkshelf_virtual::WindowRange;
    ///
    /// let w = WindowRange::compute(1000, 200.0, 5, 2000.0, 800.0);
    /// assert_eq!(w.as_range(), 5..19);
    /// ```
    pub fn compute(
        len: usize,
        item_height: f32,
        buffer: usize,
        scroll_offset: f32,
        viewport_height: f32,
    ) -> Self {
        if len == 0 || !(item_height.is_finite() && item_height > 0.0) {
            return Self::default();
        }
        if !(scroll_offset.is_finite() && viewport_height.is_finite()) {
            return Self::default();
        }

        let h = item_height as f64;
        let s = scroll_offset as f64;
        let v = (viewport_height as f64).max(0.0);
        let b = buffer as f64;

        let start = ((s / h).floor() - b).max(0.0);
        let end = (((s + v) / h).ceil() + b).max(0.0).min(len as f64);

        let end = end as usize;
        let start = (start as usize).min(end);
        Self { start, end }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_of_list() {
        let w = WindowRange::compute(1000, 200.0, 5, 0.0, 800.0);
        assert_eq!(w, WindowRange { start: 0, end: 9 });
    }

    #[test]
    fn scrolled_into_list() {
        let w = WindowRange::compute(1000, 200.0, 5, 2000.0, 800.0);
        assert_eq!(w, WindowRange { start: 5, end: 19 });
    }

    #[test]
    fn partial_rows_round_outward() {
        // floor(250/100) = 2, ceil(650/100) = 7
        let w = WindowRange::compute(100, 100.0, 0, 250.0, 400.0);
        assert_eq!(w.as_range(), 2..7);
        assert!(w.contains(2) && w.contains(6) && !w.contains(7));
    }

    #[test]
    fn clamps_to_list_end() {
        let w = WindowRange::compute(12, 200.0, 5, 1600.0, 800.0);
        assert_eq!(w.as_range(), 3..12);
    }

    #[test]
    fn scrolled_past_content_is_empty() {
        let w = WindowRange::compute(10, 200.0, 2, 50_000.0, 800.0);
        assert!(w.is_empty());
        assert_eq!(w.len(), 0);
    }

    #[test]
    fn degenerate_inputs_are_empty() {
        assert!(WindowRange::compute(0, 200.0, 5, 0.0, 800.0).is_empty());
        assert!(WindowRange::compute(10, 0.0, 5, 0.0, 800.0).is_empty());
        assert!(WindowRange::compute(10, -1.0, 5, 0.0, 800.0).is_empty());
        assert!(WindowRange::compute(10, 200.0, 5, f32::NAN, 800.0).is_empty());
    }

    #[test]
    fn negative_scroll_saturates_at_zero() {
        let w = WindowRange::compute(100, 50.0, 1, -120.0, 200.0);
        assert_eq!(w.start, 0);
        // ceil(80/50) + 1
        assert_eq!(w.end, 3);
    }

    #[test]
    fn matches_membership_formula() {
        let (h, b, v) = (37.0f32, 3usize, 410.0f32);
        for n in [0usize, 1, 7, 64] {
            for s in [0.0f32, 18.5, 37.0, 500.0, 2000.0] {
                let w = WindowRange::compute(n, h, b, s, v);
                let lo = ((s / h).floor() as i64 - b as i64).max(0);
                let hi = (((s + v) / h).ceil() as i64 + b as i64).min(n as i64);
                let expected: Vec<usize> =
                    (0..n).filter(|&i| lo <= i as i64 && (i as i64) < hi).collect();
                let got: Vec<usize> = (0..n).filter(|&i| w.contains(i)).collect();
                assert_eq!(got, expected, "n={n} s={s}");
            }
        }
    }
}
