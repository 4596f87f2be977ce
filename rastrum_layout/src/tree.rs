// Copyright 2025 the Rastrum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: construction, traversal, flattening.

use std::collections::HashMap;

use kurbo::Affine;
use rastrum_contour::deraster_at;
use rastrum_diff::Scalar;
use rastrum_geom::{Polygon, SpatialTransform};

use crate::{DeviceId, ImplicitShape, LayerSpec, LayoutError, Reference};

/// A named container of layer-tagged polygons and references to other devices.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    name: String,
    polygons: Vec<(LayerSpec, Polygon)>,
    references: Vec<Reference>,
}

impl Cell {
    /// Cell name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polygons in the cell's own frame, with their layer specs.
    pub fn polygons(&self) -> &[(LayerSpec, Polygon)] {
        &self.polygons
    }

    /// Placements of child devices.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }
}

/// A leaf carrying an implicit shape and a polygon preview of it.
#[derive(Clone, Debug)]
pub struct ImplicitDevice<'f, S: Scalar = f64> {
    name: String,
    shape: ImplicitShape<'f, S>,
    previews: Vec<Polygon>,
}

impl<'f, S: Scalar> ImplicitDevice<'f, S> {
    /// Leaf name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The implicit shape.
    pub fn shape(&self) -> &ImplicitShape<'f, S> {
        &self.shape
    }

    /// Preview polygons, on the shape's layer spec.
    pub fn previews(&self) -> &[Polygon] {
        &self.previews
    }
}

/// A device: either a cell or an implicit leaf.
#[derive(Clone, Debug)]
pub enum Device<'f, S: Scalar = f64> {
    /// Explicit geometry and references.
    Cell(Cell),
    /// A density field with its preview.
    Implicit(ImplicitDevice<'f, S>),
}

impl<S: Scalar> Device<'_, S> {
    /// The device name.
    pub fn name(&self) -> &str {
        match self {
            Self::Cell(cell) => cell.name(),
            Self::Implicit(leaf) => leaf.name(),
        }
    }
}

/// An implicit leaf reached from some root, with the placements leading to it.
#[derive(Clone, Debug)]
pub struct ImplicitLeaf<'a, 'f, S: Scalar = f64> {
    /// The leaf.
    pub device: DeviceId,
    /// Reference transforms from the root down to the leaf, outermost first.
    pub chain: Vec<SpatialTransform>,
    /// The leaf's shape.
    pub shape: &'a ImplicitShape<'f, S>,
}

/// Arena of devices.
///
/// Cells reference other devices by [`DeviceId`]; a device may be referenced any number of
/// times, from any number of cells. The reference graph must be acyclic. Adding a reference
/// does not check this; every traversal does, and fails with
/// [`LayoutError::MalformedHierarchy`].
#[derive(Clone)]
pub struct DeviceTree<'f, S: Scalar = f64> {
    devices: Vec<Device<'f, S>>,
}

impl<S: Scalar> Default for DeviceTree<'_, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scalar> core::fmt::Debug for DeviceTree<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.devices.len();
        let cells = self
            .devices
            .iter()
            .filter(|d| matches!(d, Device::Cell(_)))
            .count();
        f.debug_struct("DeviceTree")
            .field("devices_total", &total)
            .field("cells", &cells)
            .field("implicit", &(total - cells))
            .finish_non_exhaustive()
    }
}

impl<'f, S: Scalar> DeviceTree<'f, S> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the tree has no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Look up a device.
    pub fn device(&self, id: DeviceId) -> Result<&Device<'f, S>, LayoutError> {
        self.devices
            .get(id.idx())
            .ok_or(LayoutError::UnknownDevice { device: id })
    }

    /// Name of a device.
    pub fn name(&self, id: DeviceId) -> Result<&str, LayoutError> {
        self.device(id).map(Device::name)
    }

    fn push(&mut self, device: Device<'f, S>) -> DeviceId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "DeviceId uses 32-bit indices by design."
        )]
        let id = DeviceId::new(self.devices.len() as u32);
        self.devices.push(device);
        id
    }

    fn cell_mut(&mut self, id: DeviceId) -> Result<&mut Cell, LayoutError> {
        match self.devices.get_mut(id.idx()) {
            Some(Device::Cell(cell)) => Ok(cell),
            Some(Device::Implicit(_)) => Err(LayoutError::NotACell { device: id }),
            None => Err(LayoutError::UnknownDevice { device: id }),
        }
    }

    /// Add an empty cell.
    pub fn add_cell(&mut self, name: impl Into<String>) -> DeviceId {
        self.push(Device::Cell(Cell {
            name: name.into(),
            ..Cell::default()
        }))
    }

    /// Add a polygon on `spec` to `cell`.
    pub fn add_polygon(
        &mut self,
        cell: DeviceId,
        spec: LayerSpec,
        polygon: Polygon,
    ) -> Result<(), LayoutError> {
        self.cell_mut(cell)?.polygons.push((spec, polygon));
        Ok(())
    }

    /// Place `child` inside `parent`.
    ///
    /// The transform is validated here so traversals never meet an uninvertible placement.
    pub fn add_reference(
        &mut self,
        parent: DeviceId,
        child: DeviceId,
        transform: SpatialTransform,
    ) -> Result<(), LayoutError> {
        transform.validate()?;
        self.device(child)?;
        self.cell_mut(parent)?
            .references
            .push(Reference { child, transform });
        Ok(())
    }

    /// Add an implicit leaf with the given preview polygons.
    pub fn add_implicit(
        &mut self,
        name: impl Into<String>,
        shape: ImplicitShape<'f, S>,
        previews: Vec<Polygon>,
    ) -> DeviceId {
        self.push(Device::Implicit(ImplicitDevice {
            name: name.into(),
            shape,
            previews,
        }))
    }

    /// Add an implicit device and return the cell that wraps it.
    ///
    /// The shape's field is derasterized at `deraster_resolution` (default threshold) to build
    /// the preview. The leaf is placed in a new cell named `name` with the identity transform;
    /// callers place and extend the wrapper, never the leaf.
    pub fn add_implicit_device(
        &mut self,
        name: impl Into<String>,
        shape: ImplicitShape<'f, S>,
        deraster_resolution: f64,
    ) -> Result<DeviceId, LayoutError> {
        let name = name.into();
        let previews = deraster_at(shape.field(), shape.bbox(), deraster_resolution)?;
        tracing::debug!(%name, previews = previews.len(), "derasterized implicit device");
        let leaf = self.add_implicit(format!("{name}/implicit"), shape, previews);
        let wrapper = self.add_cell(name);
        self.add_reference(wrapper, leaf, SpatialTransform::IDENTITY)?;
        Ok(wrapper)
    }

    /// Every implicit leaf reachable from `root`, depth first, with its root-to-leaf chain.
    ///
    /// A leaf referenced along several paths appears once per path.
    pub fn extract_implicit(
        &self,
        root: DeviceId,
    ) -> Result<Vec<ImplicitLeaf<'_, 'f, S>>, LayoutError> {
        let mut leaves = Vec::new();
        self.walk(root, |id, device, chain| {
            if let Device::Implicit(leaf) = device {
                leaves.push(ImplicitLeaf {
                    device: id,
                    chain: chain.to_vec(),
                    shape: &leaf.shape,
                });
            }
            Ok(())
        })?;
        Ok(leaves)
    }

    /// A fresh tree holding the cells reachable from `root`, with implicit leaves and the
    /// references to them removed, and the id of `root`'s copy.
    ///
    /// Cells shared within the hierarchy stay shared in the copy. An implicit `root` gives a
    /// single empty cell of the same name.
    pub fn filter_implicit(&self, root: DeviceId) -> Result<(Self, DeviceId), LayoutError> {
        let mut filtered = Self::new();
        let mut copied = HashMap::new();
        let mut on_path = vec![false; self.devices.len()];
        let copy = self.filter_recursive(root, &mut filtered, &mut copied, &mut on_path)?;
        let new_root = match copy {
            Some(id) => id,
            None => filtered.add_cell(self.name(root)?),
        };
        Ok((filtered, new_root))
    }

    fn filter_recursive(
        &self,
        id: DeviceId,
        out: &mut Self,
        copied: &mut HashMap<DeviceId, DeviceId>,
        on_path: &mut [bool],
    ) -> Result<Option<DeviceId>, LayoutError> {
        let cell = match self.device(id)? {
            Device::Implicit(_) => return Ok(None),
            Device::Cell(cell) => cell,
        };
        if on_path[id.idx()] {
            return Err(LayoutError::MalformedHierarchy { device: id });
        }
        if let Some(&done) = copied.get(&id) {
            return Ok(Some(done));
        }
        on_path[id.idx()] = true;
        let mut references = Vec::with_capacity(cell.references.len());
        for r in &cell.references {
            if let Some(child) = self.filter_recursive(r.child, out, copied, on_path)? {
                references.push(Reference {
                    child,
                    transform: r.transform,
                });
            }
        }
        on_path[id.idx()] = false;
        let copy = out.push(Device::Cell(Cell {
            name: cell.name.clone(),
            polygons: cell.polygons.clone(),
            references,
        }));
        copied.insert(id, copy);
        Ok(Some(copy))
    }

    /// World-space polygons on `spec` reachable from `root`.
    ///
    /// Implicit leaves contribute their previews. Use [`Self::filter_implicit`] first to get the
    /// explicit geometry only.
    pub fn polygons(&self, root: DeviceId, spec: LayerSpec) -> Result<Vec<Polygon>, LayoutError> {
        let mut out = Vec::new();
        self.walk(root, |_, device, chain| {
            let local: Vec<&Polygon> = match device {
                Device::Cell(cell) => cell
                    .polygons
                    .iter()
                    .filter(|(s, _)| *s == spec)
                    .map(|(_, p)| p)
                    .collect(),
                Device::Implicit(leaf) if leaf.shape.spec() == spec => leaf.previews.iter().collect(),
                Device::Implicit(_) => Vec::new(),
            };
            if local.is_empty() {
                return Ok(());
            }
            let world = chain
                .iter()
                .fold(Affine::IDENTITY, |acc, t| acc * t.to_affine());
            for polygon in local {
                out.push(polygon.transformed(world)?);
            }
            Ok(())
        })?;
        Ok(out)
    }

    /// Depth-first pre-order walk from `root`, visiting each device once per path with the
    /// placements leading to it.
    fn walk<'a, V>(&'a self, root: DeviceId, mut visit: V) -> Result<(), LayoutError>
    where
        V: FnMut(DeviceId, &'a Device<'f, S>, &[SpatialTransform]) -> Result<(), LayoutError>,
    {
        let mut on_path = vec![false; self.devices.len()];
        let mut chain = Vec::new();
        self.walk_recursive(root, &mut chain, &mut on_path, &mut visit)
    }

    fn walk_recursive<'a, V>(
        &'a self,
        id: DeviceId,
        chain: &mut Vec<SpatialTransform>,
        on_path: &mut [bool],
        visit: &mut V,
    ) -> Result<(), LayoutError>
    where
        V: FnMut(DeviceId, &'a Device<'f, S>, &[SpatialTransform]) -> Result<(), LayoutError>,
    {
        let device = self.device(id)?;
        if on_path[id.idx()] {
            return Err(LayoutError::MalformedHierarchy { device: id });
        }
        visit(id, device, chain)?;
        if let Device::Cell(cell) = device {
            on_path[id.idx()] = true;
            for r in &cell.references {
                chain.push(r.transform);
                self.walk_recursive(r.child, chain, on_path, visit)?;
                chain.pop();
            }
            on_path[id.idx()] = false;
        }
        Ok(())
    }
}
