// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference transforms: forward placement of child geometry, dual pull-back of query points.

use kurbo::{Affine, Point, Vec2};
use rastrum_diff::Scalar;

use crate::GeomError;

/// Placement of a referenced cell inside its parent.
///
/// The forward map takes child coordinates to parent coordinates: reflect about the x axis (if
/// `reflect_x`), scale by `magnification`, rotate counter-clockwise by `rotation` degrees, then
/// translate by `origin`. [`SpatialTransform::apply`] is its inverse and is what sampling uses.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpatialTransform {
    /// Position of the child origin in the parent frame.
    pub origin: Point,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f64,
    /// Mirror the child about its x axis before anything else.
    pub reflect_x: bool,
    /// Uniform scale factor; `None` means 1.
    pub magnification: Option<f64>,
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SpatialTransform {
    /// The identity placement.
    pub const IDENTITY: Self = Self {
        origin: Point::ORIGIN,
        rotation: 0.0,
        reflect_x: false,
        magnification: None,
    };

    /// A pure translation.
    pub fn translate(origin: impl Into<Point>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::IDENTITY
        }
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the x-axis reflection.
    #[must_use]
    pub fn with_reflection(mut self, reflect_x: bool) -> Self {
        self.reflect_x = reflect_x;
        self
    }

    /// Set the magnification.
    #[must_use]
    pub fn with_magnification(mut self, magnification: f64) -> Self {
        self.magnification = Some(magnification);
        self
    }

    /// Reject parameters the pull-back cannot invert.
    pub fn validate(&self) -> Result<(), GeomError> {
        if !self.origin.is_finite() {
            let value = if self.origin.x.is_finite() {
                self.origin.y
            } else {
                self.origin.x
            };
            return Err(GeomError::InvalidParameter {
                name: "origin",
                value,
            });
        }
        if !self.rotation.is_finite() {
            return Err(GeomError::InvalidParameter {
                name: "rotation",
                value: self.rotation,
            });
        }
        match self.magnification {
            Some(m) if m == 0.0 || !m.is_finite() => Err(GeomError::InvalidParameter {
                name: "magnification",
                value: m,
            }),
            _ => Ok(()),
        }
    }

    /// The forward map as an affine transform, for placing polygons.
    pub fn to_affine(&self) -> Affine {
        let mut affine = Affine::translate(self.origin.to_vec2())
            * Affine::rotate(self.rotation.to_radians());
        if let Some(m) = self.magnification {
            affine *= Affine::scale(m);
        }
        if self.reflect_x {
            affine *= Affine::FLIP_Y;
        }
        affine
    }

    /// Pull a parent-frame point back into the child frame.
    ///
    /// Subtract the origin, rotate by minus the rotation, divide by the magnification, then
    /// negate y when reflecting.
    pub fn apply<S: Scalar>(&self, x: S, y: S) -> (S, S) {
        let Vec2 { x: ox, y: oy } = self.origin.to_vec2();
        let (dx, dy) = (x - ox, y - oy);
        let (sin, cos) = (-self.rotation.to_radians()).sin_cos();
        let mut xr = dx * cos - dy * sin;
        let mut yr = dy * cos + dx * sin;
        if let Some(m) = self.magnification {
            xr = xr / m;
            yr = yr / m;
        }
        if self.reflect_x {
            yr = -yr;
        }
        (xr, yr)
    }

    /// [`Self::apply`] over paired coordinate slices.
    pub fn apply_all<S: Scalar>(&self, xs: &[S], ys: &[S]) -> (Vec<S>, Vec<S>) {
        xs.iter().zip(ys).map(|(&x, &y)| self.apply(x, y)).unzip()
    }
}

/// Pull a point back through a chain of placements, outermost first.
///
/// `chain[0]` is the placement nearest the root; the result is in the frame of the last
/// child. An empty chain is the identity.
pub fn apply_chain<S: Scalar>(chain: &[SpatialTransform], x: S, y: S) -> (S, S) {
    chain.iter().fold((x, y), |(x, y), t| t.apply(x, y))
}
