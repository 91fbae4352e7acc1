//! Three-point elevation bracket mutated by the homing search.

use crate::constants::{Kilometer, Radian};

use super::TENTH_DEGREE;

/// One bracket entry: an elevation, and the traced ground range once known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BracketPoint {
    pub elevation: Radian,
    pub range: Option<Kilometer>,
}

/// The search bracket: three elevations in strictly descending order, each
/// with an optional traced range. Every mutation re-centers the middle
/// elevation between the endpoints, so the ordering holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bracket {
    high: BracketPoint,
    mid: BracketPoint,
    low: BracketPoint,
}

impl Bracket {
    /// Start with `high_elevation` on top, the ground at the bottom and the
    /// middle halfway between; no ranges are known yet.
    pub fn new(high_elevation: Radian) -> Self {
        Self {
            high: BracketPoint {
                elevation: high_elevation,
                range: None,
            },
            mid: BracketPoint {
                elevation: high_elevation / 2.0,
                range: None,
            },
            low: BracketPoint {
                elevation: 0.0,
                range: None,
            },
        }
    }

    pub fn high(&self) -> BracketPoint {
        self.high
    }

    pub fn mid(&self) -> BracketPoint {
        self.mid
    }

    pub fn low(&self) -> BracketPoint {
        self.low
    }

    /// Elevation spread between the endpoints.
    pub fn spread(&self) -> Radian {
        self.high.elevation - self.low.elevation
    }

    pub fn record_high(&mut self, range: Kilometer) {
        self.high.range = Some(range);
    }

    pub fn record_mid(&mut self, range: Kilometer) {
        self.mid.range = Some(range);
    }

    pub fn clear_mid(&mut self) {
        self.mid.range = None;
    }

    fn reset_mid_elevation(&mut self) {
        self.mid.elevation = (self.high.elevation + self.low.elevation) / 2.0;
    }

    /// The high probe escaped: pull the top down to the midpoint of the upper
    /// half and forget its range.
    pub fn recenter_after_exit(&mut self) {
        self.high.elevation = (self.high.elevation + self.mid.elevation) / 2.0;
        self.high.range = None;
        self.reset_mid_elevation();
    }

    /// Double the top elevation (an F-layer search that landed in the E layer
    /// needs a much steeper start).
    pub fn widen_high(&mut self) {
        self.high.elevation *= 2.0;
        self.reset_mid_elevation();
    }

    /// Pull the top a quarter of the spread down (an E-layer search that
    /// jumped to the F layer needs a shallower start).
    pub fn lower_high_by_quarter(&mut self) {
        self.high.elevation -= self.spread() / 4.0;
        self.reset_mid_elevation();
    }

    /// The whole bracket sits too low: the old top becomes the bottom and the
    /// top moves up ten percent.
    pub fn raise_high_by_tenth(&mut self) {
        self.low = self.high;
        self.high.elevation *= 1.1;
        self.high.range = None;
        self.reset_mid_elevation();
    }

    /// The middle undershot the target: it becomes the new top.
    pub fn promote_mid_to_high(&mut self) {
        self.high = self.mid;
        self.reset_mid_elevation();
    }

    /// The middle overshot the target: it becomes the new bottom.
    pub fn demote_mid_to_low(&mut self) {
        self.low = self.mid;
        self.reset_mid_elevation();
    }

    /// The middle dropped into the E layer: move the bottom just under the
    /// middle and forget both ranges, squeezing the next middle upward.
    pub fn nudge_low_for_e_layer(&mut self) {
        self.low = BracketPoint {
            elevation: self.mid.elevation - TENTH_DEGREE,
            range: None,
        };
        self.reset_mid_elevation();
        self.mid.range = None;
    }
}
