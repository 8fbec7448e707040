//! Pixel size of the map viewport.

use num_traits::Num;
use serde::{Deserialize, Serialize};

/// Size of a rectangular area, e.g. the map viewport in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size<N = f64> {
    width: N,
    height: N,
}

impl<N: Num + PartialOrd + Copy> Size<N> {
    /// Creates a new size. Negative dimensions are clamped to zero.
    pub fn new(width: N, height: N) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Width.
    pub fn width(&self) -> N {
        self.width
    }

    /// Height.
    pub fn height(&self) -> N {
        self.height
    }

    /// Half of the width.
    pub fn half_width(&self) -> N {
        self.width / two()
    }

    /// Half of the height.
    pub fn half_height(&self) -> N {
        self.height / two()
    }

    /// Returns true if any of the dimensions is zero.
    pub fn is_zero(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }

    /// Returns the size reduced by `padding` on every side, clamped to zero.
    pub fn shrink(&self, padding: N) -> Self {
        let margin = padding * two();
        let reduce = |side: N| if side > margin { side - margin } else { N::zero() };

        Self {
            width: reduce(self.width),
            height: reduce(self.height),
        }
    }
}

fn two<N: Num>() -> N {
    N::one() + N::one()
}

fn non_negative<N: Num + PartialOrd>(value: N) -> N {
    if value < N::zero() {
        N::zero()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_clamps_to_zero() {
        let size = Size::new(300.0, 80.0).shrink(50.0);
        assert_eq!(size.width(), 200.0);
        assert_eq!(size.height(), 0.0);
        assert!(size.is_zero());
    }

    #[test]
    fn negative_dimensions_are_clamped() {
        let size = Size::new(-1, 10);
        assert_eq!(size.width(), 0);
        assert_eq!(size.height(), 10);
        assert_eq!(size.half_height(), 5);
    }
}
