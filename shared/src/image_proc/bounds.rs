//! Integer pixel bounds for images.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive integer pixel bounds `[xmin, xmax] x [ymin, ymax]`.
///
/// Bounds are *defined* when `xmin <= xmax` and `ymin <= ymax`. The
/// [`Bounds::undefined`] value describes an image that has no pixel grid
/// yet; operations that need a grid reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub xmin: i64,
    pub xmax: i64,
    pub ymin: i64,
    pub ymax: i64,
}

impl Bounds {
    pub fn new(xmin: i64, xmax: i64, ymin: i64, ymax: i64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Bounds of a `cols x rows` image with the lower-left pixel at (1, 1).
    pub fn with_size(cols: usize, rows: usize) -> Self {
        if cols == 0 || rows == 0 {
            return Self::undefined();
        }
        Self::new(1, cols as i64, 1, rows as i64)
    }

    pub fn undefined() -> Self {
        Self::new(0, -1, 0, -1)
    }

    pub fn is_defined(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    /// Number of columns (0 when undefined, saturating at `usize::MAX`)
    pub fn width(&self) -> usize {
        if self.is_defined() {
            span(self.xmin, self.xmax)
        } else {
            0
        }
    }

    /// Number of rows (0 when undefined, saturating at `usize::MAX`)
    pub fn height(&self) -> usize {
        if self.is_defined() {
            span(self.ymin, self.ymax)
        } else {
            0
        }
    }

    /// ndarray shape `(rows, cols)` of an image with these bounds
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn npix(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    /// Iterate `(x, y)` pixel coordinates in row-major order (y outer).
    pub fn iter_positions(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let (xmin, xmax) = (self.xmin, self.xmax);
        let ys = if self.is_defined() {
            self.ymin..=self.ymax
        } else {
            // Empty range
            1..=0
        };
        ys.flat_map(move |y| (xmin..=xmax).map(move |x| (x, y)))
    }
}

/// Inclusive pixel count of `lo..=hi` for `lo <= hi`.
fn span(lo: i64, hi: i64) -> usize {
    usize::try_from(hi.abs_diff(lo))
        .unwrap_or(usize::MAX)
        .saturating_add(1)
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_defined() {
            write!(
                f,
                "[{}..{}] x [{}..{}]",
                self.xmin, self.xmax, self.ymin, self.ymax
            )
        } else {
            write!(f, "undefined")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_size() {
        let b = Bounds::with_size(5, 3);
        assert!(b.is_defined());
        assert_eq!(b.width(), 5);
        assert_eq!(b.height(), 3);
        assert_eq!(b.shape(), (3, 5));
        assert_eq!(b.npix(), 15);
    }

    #[test]
    fn test_undefined() {
        let b = Bounds::undefined();
        assert!(!b.is_defined());
        assert_eq!(b.npix(), 0);
        assert_eq!(b.iter_positions().count(), 0);
        assert_eq!(Bounds::with_size(0, 4), Bounds::undefined());
    }

    #[test]
    fn test_extreme_bounds_do_not_overflow() {
        let b = Bounds::new(i64::MIN, i64::MAX, -2, 2);
        assert_eq!(b.width(), usize::MAX);
        assert_eq!(b.height(), 5);
        assert_eq!(b.npix(), usize::MAX);

        let edge = Bounds::new(i64::MAX - 2, i64::MAX, i64::MIN, i64::MIN + 1);
        assert_eq!(edge.shape(), (2, 3));
        assert_eq!(edge.iter_positions().count(), 6);
    }

    #[test]
    fn test_iter_positions_row_major() {
        let b = Bounds::new(-1, 0, 2, 3);
        let positions: Vec<_> = b.iter_positions().collect();
        assert_eq!(positions, vec![(-1, 2), (0, 2), (-1, 3), (0, 3)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Bounds::new(1, 4, 1, 2).to_string(), "[1..4] x [1..2]");
        assert_eq!(Bounds::undefined().to_string(), "undefined");
    }
}
