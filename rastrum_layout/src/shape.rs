// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implicit shapes: a density field bound to a layer spec and a bounding box.

use std::rc::Rc;

use rastrum_diff::Scalar;
use rastrum_geom::{BoundingBox, DensityField, GeomError, bounded_raster, bounded_sample};

use crate::LayerSpec;

/// A density field placed on one layer and restricted to a bounding box.
///
/// The field is reference counted: cloning a shape, or a tree holding it, shares the field
/// rather than copying it. `'f` bounds whatever the field borrows, typically the tape its
/// parameters live on.
pub struct ImplicitShape<'f, S: Scalar = f64> {
    spec: LayerSpec,
    field: Rc<dyn DensityField<S> + 'f>,
    bbox: BoundingBox,
}

impl<S: Scalar> Clone for ImplicitShape<'_, S> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec,
            field: Rc::clone(&self.field),
            bbox: self.bbox,
        }
    }
}

impl<S: Scalar> core::fmt::Debug for ImplicitShape<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ImplicitShape")
            .field("spec", &self.spec)
            .field("bbox", &self.bbox)
            .finish_non_exhaustive()
    }
}

impl<'f, S: Scalar> ImplicitShape<'f, S> {
    /// Bind `field` to `spec` inside `bbox`.
    pub fn new(spec: LayerSpec, field: impl DensityField<S> + 'f, bbox: BoundingBox) -> Self {
        Self::shared(spec, Rc::new(field), bbox)
    }

    /// Like [`Self::new`], for a field that is already shared.
    pub fn shared(spec: LayerSpec, field: Rc<dyn DensityField<S> + 'f>, bbox: BoundingBox) -> Self {
        Self { spec, field, bbox }
    }

    /// Layer spec the shape rasterizes on.
    pub fn spec(&self) -> LayerSpec {
        self.spec
    }

    /// Box outside which the shape is empty.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The unbounded field.
    pub fn field(&self) -> &(dyn DensityField<S> + 'f) {
        self.field.as_ref()
    }

    /// Bounded sample at `(x, y)`: clamped to `[0, 1]` inside the box, zero outside.
    #[inline]
    pub fn sample(&self, x: S, y: S) -> S {
        bounded_sample(self.field(), &self.bbox, x, y)
    }

    /// [`Self::sample`] over paired coordinate slices.
    pub fn raster(&self, xs: &[S], ys: &[S]) -> Result<Vec<S>, GeomError> {
        bounded_raster(self.field(), &self.bbox, xs, ys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rastrum_diff::{Tape, Var};

    fn ramp<'t>(gain: Var<'t>) -> impl Fn(Var<'t>, Var<'t>) -> Var<'t> {
        move |x, _y| x * gain
    }

    #[test]
    fn clones_share_the_field() {
        let bbox = BoundingBox::new((0.0, 0.0), (1.0, 1.0)).unwrap();
        let shape = ImplicitShape::new(LayerSpec::new(1, 0), |x: f64, _y: f64| 2.0 * x, bbox);
        let copy = shape.clone();
        assert!(Rc::ptr_eq(&shape.field, &copy.field), "field is shared");
        assert_eq!(copy.spec(), LayerSpec::new(1, 0));
        assert_eq!(copy.sample(0.25, 0.5), 0.5);
        assert_eq!(copy.sample(0.75, 0.5), 1.0, "clamped");
        assert_eq!(copy.sample(1.5, 0.5), 0.0, "outside the box");
        assert_eq!(
            shape.raster(&[0.1, 0.2], &[0.5]),
            Err(GeomError::LengthMismatch { x: 2, y: 1 })
        );
    }

    #[test]
    fn tracked_parameters_reach_the_sample() {
        let tape = Tape::new();
        let gain = tape.var(0.5);
        let bbox = BoundingBox::new((0.0, 0.0), (1.0, 1.0)).unwrap();
        let shape = ImplicitShape::new(LayerSpec::default(), ramp(gain), bbox);
        let v = shape.sample(Scalar::constant(0.8), Scalar::constant(0.5));
        assert!((v.value() - 0.4).abs() < 1e-12, "{v:?}");
        assert!((v.gradients().wrt(gain) - 0.8).abs() < 1e-12);
    }
}
