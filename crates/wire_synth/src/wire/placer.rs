//! Bounded placement of wires on a square canvas.
//!
//! Length, width and opening angle are sampled once per wire. Orientation and
//! start point are then re-rolled until the wire fits the canvas or the attempt
//! budget runs out.
use std::f64::consts::TAU;

use glam::IVec2;
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sampling::{rand01, AttributeSampling, AttributeSource};
use crate::wire::Wire;

/// Placement attempts per wire before giving up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Longest accepted wire, in multiples of the canvas size.
pub const MAX_LENGTH_FACTOR: f64 = 64.0;

/// Global bounds for wire generation.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct WireBounds {
    /// Canvas edge length in pixels; the canvas is `size x size`.
    pub size: u32,
    pub length: AttributeSource,
    pub width: AttributeSource,
    /// Opening angle source in degrees.
    pub opening_angle_deg: AttributeSource,
    /// Skip the containment check entirely.
    pub allow_outside: bool,
}

impl WireBounds {
    /// Uniform bounds with opening angles drawn from `[0, max_opening_angle_deg]`.
    pub fn uniform(
        size: u32,
        (min_length, max_length): (f64, f64),
        (min_width, max_width): (f64, f64),
        max_opening_angle_deg: f64,
    ) -> Self {
        Self {
            size,
            length: AttributeSource::uniform(min_length, max_length),
            width: AttributeSource::uniform(min_width, max_width),
            opening_angle_deg: AttributeSource::uniform(0.0, max_opening_angle_deg),
            allow_outside: false,
        }
    }

    pub fn with_length(mut self, source: AttributeSource) -> Self {
        self.length = source;
        self
    }

    pub fn with_width(mut self, source: AttributeSource) -> Self {
        self.width = source;
        self
    }

    pub fn with_opening_angle(mut self, source: AttributeSource) -> Self {
        self.opening_angle_deg = source;
        self
    }

    pub fn with_allow_outside(mut self, allow_outside: bool) -> Self {
        self.allow_outside = allow_outside;
        self
    }

    /// Validates the bounds, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > i32::MAX as u32 {
            return Err(Error::InvalidConfig(format!(
                "image size must be in 1..={}, got {}",
                i32::MAX,
                self.size
            )));
        }
        let (min_l, max_l) = self.length.range();
        if min_l.is_nan() || min_l <= 0.0 {
            return Err(Error::InvalidConfig("wire length must be > 0".into()));
        }
        let limit = self.max_length();
        if max_l.is_nan() || max_l > limit {
            return Err(Error::InvalidConfig(format!(
                "wire length must not exceed {limit} for image size {}, got {max_l}",
                self.size
            )));
        }
        let (min_w, _) = self.width.range();
        if min_w.is_nan() || min_w <= 0.0 {
            return Err(Error::InvalidConfig("wire width must be > 0".into()));
        }
        let (min_a, max_a) = self.opening_angle_deg.range();
        if min_a < 0.0 || max_a > 360.0 {
            return Err(Error::InvalidConfig(format!(
                "opening angle must lie in [0, 360] degrees, got [{min_a}, {max_a}]"
            )));
        }
        Ok(())
    }

    /// Longest wire allowed on this canvas.
    pub fn max_length(&self) -> f64 {
        MAX_LENGTH_FACTOR * self.size as f64
    }
}

/// Attributes sampled once per wire and kept across placement attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireAttributes {
    pub length: f64,
    pub width: f64,
    /// Opening angle in radians.
    pub opening_angle: f64,
}

impl WireAttributes {
    pub fn new(length: f64, width: f64, opening_angle_deg: f64) -> Self {
        Self {
            length,
            width,
            opening_angle: opening_angle_deg.to_radians(),
        }
    }
}

/// A validated wire and the number of attempts it took.
#[derive(Debug, Clone)]
pub struct PlacedWire {
    pub wire: Wire,
    pub attempts: usize,
}

/// Samples attributes and places wires within [`WireBounds`].
#[derive(Debug, Clone)]
pub struct WirePlacer {
    bounds: WireBounds,
    max_attempts: usize,
}

impl WirePlacer {
    pub fn try_new(bounds: WireBounds) -> Result<Self> {
        bounds.validate()?;
        Ok(Self::new(bounds))
    }

    pub fn new(bounds: WireBounds) -> Self {
        debug_assert!(bounds.size > 0, "size must be > 0");
        Self {
            bounds,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }

    /// Override the placement attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn bounds(&self) -> &WireBounds {
        &self.bounds
    }

    /// Draw length, width and opening angle for one wire.
    pub fn sample_attributes<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<WireAttributes> {
        let length = self.bounds.length.sample(rng)?;
        let width = self.bounds.width.sample(rng)?;
        let opening_angle_deg = self.bounds.opening_angle_deg.sample(rng)?;
        Ok(WireAttributes::new(length, width, opening_angle_deg))
    }

    /// Sample attributes and place one wire.
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PlacedWire> {
        let attributes = self.sample_attributes(rng)?;
        self.place_with(attributes, rng)
    }

    /// Place a wire with fixed attributes, re-rolling orientation and start point.
    pub fn place_with<R: Rng + ?Sized>(
        &self,
        attributes: WireAttributes,
        rng: &mut R,
    ) -> Result<PlacedWire> {
        let WireAttributes {
            length,
            width,
            opening_angle,
        } = attributes;
        if !length.is_finite() || !width.is_finite() || length <= 0.0 || width <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "wire length and width must be finite and > 0, got {length} and {width}"
            )));
        }
        if length > self.bounds.max_length() {
            return Err(Error::InvalidConfig(format!(
                "wire length {length} exceeds the limit {} for image size {}",
                self.bounds.max_length(),
                self.bounds.size
            )));
        }

        let size = self.bounds.size as f64;
        for attempt in 1..=self.max_attempts {
            let orientation = rand01(rng) * TAU;
            let start = IVec2::new((rand01(rng) * size) as i32, (rand01(rng) * size) as i32);
            let wire = Wire::from_start(length, width, opening_angle, orientation, start);

            if self.bounds.allow_outside || wire.is_contained(self.bounds.size) {
                if attempt > 1 {
                    debug!(
                        "Placed wire (length {:.1}, bent: {}) after {} attempts.",
                        length,
                        wire.is_bent(),
                        attempt
                    );
                }
                return Ok(PlacedWire {
                    wire,
                    attempts: attempt,
                });
            }
        }

        Err(Error::PlacementExhausted {
            attempts: self.max_attempts,
            length,
            width,
            opening_angle_deg: opening_angle.to_degrees(),
        })
    }
}
