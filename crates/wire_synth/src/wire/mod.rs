//! Wire geometry.
//!
//! A [`Wire`] is either a straight segment or a circular arc. Pixel coordinates
//! use the image convention: `x` grows to the right and `y` grows downwards, so
//! an orientation `phi` points along `(cos phi, -sin phi)`.
use std::fmt;

use glam::IVec2;

pub mod placer;

/// Minimum arc sagitta in pixels for a wire to be drawn bent.
pub const MIN_BENT_SAGITTA: f64 = 2.0;

/// Sagitta of an arc with the given length and opening angle in radians.
///
/// Returns `0.0` for a zero angle.
pub fn sagitta(length: f64, opening_angle: f64) -> f64 {
    if opening_angle <= 0.0 {
        return 0.0;
    }
    (length / opening_angle) * (1.0 - (opening_angle / 2.0).cos())
}

/// Whether a wire with this length and opening angle is drawn as an arc.
pub fn bends(length: f64, opening_angle: f64) -> bool {
    opening_angle > 0.0 && sagitta(length, opening_angle) >= MIN_BENT_SAGITTA
}

/// A fully specified wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    /// Arc (or chord) length in pixels.
    pub length: f64,
    /// Stroke width in pixels.
    pub width: f64,
    /// Opening angle in radians. May be non-zero for a straight wire whose sagitta is too small.
    pub opening_angle: f64,
    /// Orientation in radians, `[0, 2pi)`.
    pub orientation: f64,
    pub start: IVec2,
    pub end: IVec2,
    /// Arc center, present only for bent wires.
    pub center: Option<IVec2>,
    /// Arc radius `length / opening_angle`, `0.0` for straight wires.
    pub radius: f64,
}

impl Wire {
    /// Computes the geometry of a wire starting at `start` with orientation `orientation`.
    pub fn from_start(
        length: f64,
        width: f64,
        opening_angle: f64,
        orientation: f64,
        start: IVec2,
    ) -> Self {
        let (sin_phi, cos_phi) = orientation.sin_cos();
        if bends(length, opening_angle) {
            let radius = length / opening_angle;
            let center = IVec2::new(
                (start.x as f64 + radius * cos_phi) as i32,
                (start.y as f64 - radius * sin_phi) as i32,
            );
            let end_angle = opening_angle + orientation;
            let end = IVec2::new(
                (center.x as f64 - radius * end_angle.cos()) as i32,
                (center.y as f64 + radius * end_angle.sin()) as i32,
            );
            Self {
                length,
                width,
                opening_angle,
                orientation,
                start,
                end,
                center: Some(center),
                radius,
            }
        } else {
            let end = IVec2::new(
                (start.x as f64 + length * cos_phi) as i32,
                (start.y as f64 - length * sin_phi) as i32,
            );
            Self {
                length,
                width,
                opening_angle,
                orientation,
                start,
                end,
                center: None,
                radius: 0.0,
            }
        }
    }

    pub fn is_bent(&self) -> bool {
        self.center.is_some()
    }

    /// Number of polyline segments approximating a bent wire, `floor(length / width)`, at least one.
    pub fn step_count(&self) -> usize {
        let steps = (self.length / self.width).floor();
        if steps.is_finite() && steps >= 1.0 {
            steps as usize
        } else {
            1
        }
    }

    /// Point on the arc at polar angle `angle` around the center.
    ///
    /// Straight wires return their start point.
    pub fn arc_point(&self, angle: f64) -> IVec2 {
        match self.center {
            Some(c) => IVec2::new(
                c.x.saturating_sub((self.radius * angle.cos()) as i32),
                c.y.saturating_add((self.radius * angle.sin()) as i32),
            ),
            None => self.start,
        }
    }

    /// Polar angles of the polyline vertices of a bent wire, from `orientation` to
    /// `orientation + opening_angle` inclusive. The last angle is exact.
    pub fn arc_angles(&self) -> impl Iterator<Item = f64> + '_ {
        let steps = self.step_count();
        let increment = self.opening_angle / steps as f64;
        (0..=steps).map(move |i| {
            if i == steps {
                self.orientation + self.opening_angle
            } else {
                self.orientation + i as f64 * increment
            }
        })
    }

    /// Whether every checked point lies strictly inside `(0, size)` on both axes.
    ///
    /// Bent wires whose bounding square around the center is inside are accepted
    /// without walking the arc.
    pub fn is_contained(&self, size: u32) -> bool {
        let size = size as i32;
        let inside = |p: IVec2| p.x > 0 && p.x < size && p.y > 0 && p.y < size;
        match self.center {
            None => inside(self.start) && inside(self.end),
            Some(c) => {
                let s = size as f64;
                let (cx, cy) = (c.x as f64, c.y as f64);
                if cx - self.radius > 0.0
                    && cx + self.radius < s
                    && cy - self.radius > 0.0
                    && cy + self.radius < s
                {
                    return true;
                }
                self.arc_angles().all(|a| inside(self.arc_point(a)))
            }
        }
    }

    pub fn opening_angle_deg(&self) -> f64 {
        self.opening_angle.to_degrees()
    }

    pub fn orientation_deg(&self) -> f64 {
        self.orientation.to_degrees()
    }
}

/// Rounds half-up to one decimal place.
fn round_tenth(value: f64) -> f64 {
    ((value + 0.05) * 10.0).floor() / 10.0
}

/// Tab-separated wire-information row matching [`crate::batch::output::wire_log_header`].
impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let center = self.center.unwrap_or(IVec2::ZERO);
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.1}\t{:.1}",
            self.length as i64,
            self.width as i64,
            self.start.x,
            self.start.y,
            self.end.x,
            self.end.y,
            center.x,
            center.y,
            self.radius as i64,
            round_tenth(self.opening_angle_deg()),
            round_tenth(self.orientation_deg()),
        )
    }
}
