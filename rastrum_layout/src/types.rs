// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the device tree: device identifiers, layer specs, and references.

use rastrum_geom::SpatialTransform;

/// Identifier for a device in a [`DeviceTree`](crate::DeviceTree).
///
/// A small, copyable handle holding the device's slot in the tree's arena. Devices are never
/// removed, so an id stays valid for as long as the tree that issued it. An id past the end of a
/// tree is reported as [`LayoutError::UnknownDevice`](crate::LayoutError::UnknownDevice).
///
/// Ids order by insertion.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub(crate) u32);

impl DeviceId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A `(layer, datatype)` pair selecting which shapes take part in an operation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LayerSpec {
    /// Layer number.
    pub layer: u32,
    /// Datatype number.
    pub datatype: u32,
}

impl LayerSpec {
    /// Create a layer spec.
    pub const fn new(layer: u32, datatype: u32) -> Self {
        Self { layer, datatype }
    }
}

impl From<(u32, u32)> for LayerSpec {
    fn from((layer, datatype): (u32, u32)) -> Self {
        Self::new(layer, datatype)
    }
}

/// One placement of a child device inside a cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reference {
    /// The placed device.
    pub child: DeviceId,
    /// Child-to-parent placement.
    pub transform: SpatialTransform,
}
