//! Coordinate storage backends for objects.
//!
//! Point lists suit thin or point-like objects. Region trees compress large
//! solid regions: a quadtree per slice for planar solids, or a single
//! octree for voxel solids with isotropic spacing. All backends expose the
//! same set semantics through [`CoordinateStore`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Integer voxel coordinate. Orders by slice, then row, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Slice.
    pub z: u32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.z, self.y, self.x).cmp(&(other.z, other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Storage kind chosen when an object is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VolumeType {
    /// Explicit point set; best for thin or point-like objects.
    #[default]
    PointList,
    /// Per-slice quadtree; best for large planar solids.
    QuadTree,
    /// Octree; best for large 3D solids with isotropic spacing.
    OcTree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Empty,
    Full,
    Split(Vec<Self>),
}

/// Compressed region tree over a cube (or square) with power-of-two side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegionTree {
    three_d: bool,
    size: u32,
    root: Node,
    count: usize,
}

impl RegionTree {
    pub(crate) fn new(extent: u32, three_d: bool) -> Self {
        Self {
            three_d,
            size: extent.max(1).next_power_of_two(),
            root: Node::Empty,
            count: 0,
        }
    }

    const fn arity(&self) -> usize {
        if self.three_d { 8 } else { 4 }
    }

    fn child_index(origin: [u32; 3], half: u32, p: [u32; 3]) -> (usize, [u32; 3]) {
        let mut index = 0;
        let mut child = origin;
        for (axis, (o, v)) in origin.iter().zip(p).enumerate() {
            if v >= o + half {
                index |= 1 << axis;
                if let Some(slot) = child.get_mut(axis) {
                    *slot = o + half;
                }
            }
        }
        (index, child)
    }

    fn normalise(&self, p: Point) -> Option<[u32; 3]> {
        let z = if self.three_d { p.z } else { 0 };
        (p.x < self.size && p.y < self.size && z < self.size).then_some([p.x, p.y, z])
    }

    pub(crate) fn insert(&mut self, p: Point) -> bool {
        let Some(target) = self.normalise(p) else {
            return false;
        };
        let arity = self.arity();
        let inserted = insert_node(&mut self.root, [0, 0, 0], self.size, target, arity);
        if inserted {
            self.count += 1;
        }
        inserted
    }

    pub(crate) fn contains(&self, p: Point) -> bool {
        let Some(target) = self.normalise(p) else {
            return false;
        };
        let mut node = &self.root;
        let mut origin = [0, 0, 0];
        let mut size = self.size;
        loop {
            match node {
                Node::Empty => return false,
                Node::Full => return true,
                Node::Split(children) => {
                    size >>= 1;
                    let (index, child_origin) = Self::child_index(origin, size, target);
                    match children.get(index) {
                        Some(child) => {
                            node = child;
                            origin = child_origin;
                        }
                        None => return false,
                    }
                }
            }
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.count
    }

    /// Appends all stored points, using `z` for planar trees.
    pub(crate) fn collect_into(&self, z: u32, out: &mut Vec<Point>) {
        collect_node(&self.root, [0, 0, 0], self.size, self.three_d, z, out);
    }

    /// Number of leaves; a measure of compression.
    #[cfg(test)]
    pub(crate) fn leaf_count(&self) -> usize {
        fn leaves(node: &Node) -> usize {
            match node {
                Node::Empty | Node::Full => 1,
                Node::Split(children) => children.iter().map(leaves).sum(),
            }
        }
        leaves(&self.root)
    }
}

fn insert_node(node: &mut Node, origin: [u32; 3], size: u32, p: [u32; 3], arity: usize) -> bool {
    match node {
        Node::Full => false,
        Node::Empty if size == 1 => {
            *node = Node::Full;
            true
        }
        Node::Empty => {
            *node = Node::Split(vec![Node::Empty; arity]);
            insert_node(node, origin, size, p, arity)
        }
        Node::Split(children) => {
            let half = size >> 1;
            let (index, child_origin) = RegionTree::child_index(origin, half, p);
            let inserted = children
                .get_mut(index)
                .is_some_and(|child| insert_node(child, child_origin, half, p, arity));
            if inserted && children.iter().all(|child| *child == Node::Full) {
                *node = Node::Full;
            }
            inserted
        }
    }
}

fn collect_node(
    node: &Node,
    origin: [u32; 3],
    size: u32,
    three_d: bool,
    plane_z: u32,
    out: &mut Vec<Point>,
) {
    match node {
        Node::Empty => {}
        Node::Full => {
            let [ox, oy, oz] = origin;
            let z_range = if three_d { oz..oz + size } else { plane_z..plane_z + 1 };
            for z in z_range {
                for y in oy..oy + size {
                    for x in ox..ox + size {
                        out.push(Point::new(x, y, z));
                    }
                }
            }
        }
        Node::Split(children) => {
            let half = size >> 1;
            for (index, child) in children.iter().enumerate() {
                let mut child_origin = origin;
                for (axis, slot) in child_origin.iter_mut().enumerate() {
                    if index & (1 << axis) != 0 {
                        *slot += half;
                    }
                }
                collect_node(child, child_origin, half, three_d, plane_z, out);
            }
        }
    }
}

/// Coordinate set of one object, backed by the chosen [`VolumeType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CoordinateStore {
    PointList(BTreeSet<Point>),
    QuadTree { extent: u32, slices: BTreeMap<u32, RegionTree> },
    OcTree(RegionTree),
}

impl CoordinateStore {
    /// Creates an empty store able to hold points within `extent` on every
    /// axis.
    pub(crate) fn new(volume_type: VolumeType, extent: u32) -> Self {
        match volume_type {
            VolumeType::PointList => Self::PointList(BTreeSet::new()),
            VolumeType::QuadTree => Self::QuadTree {
                extent,
                slices: BTreeMap::new(),
            },
            VolumeType::OcTree => Self::OcTree(RegionTree::new(extent, true)),
        }
    }

    pub(crate) fn insert(&mut self, p: Point) -> bool {
        match self {
            Self::PointList(points) => points.insert(p),
            Self::QuadTree { extent, slices } => slices
                .entry(p.z)
                .or_insert_with(|| RegionTree::new(*extent, false))
                .insert(p),
            Self::OcTree(tree) => tree.insert(p),
        }
    }

    pub(crate) fn contains(&self, p: Point) -> bool {
        match self {
            Self::PointList(points) => points.contains(&p),
            Self::QuadTree { slices, .. } => slices.get(&p.z).is_some_and(|tree| tree.contains(p)),
            Self::OcTree(tree) => tree.contains(p),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::PointList(points) => points.len(),
            Self::QuadTree { slices, .. } => slices.values().map(RegionTree::len).sum(),
            Self::OcTree(tree) => tree.len(),
        }
    }

    /// Returns all points in (z, y, x) order.
    pub(crate) fn points(&self) -> Vec<Point> {
        match self {
            Self::PointList(points) => points.iter().copied().collect(),
            Self::QuadTree { slices, .. } => {
                let mut out = Vec::new();
                for (z, tree) in slices {
                    let start = out.len();
                    tree.collect_into(*z, &mut out);
                    if let Some(tail) = out.get_mut(start..) {
                        tail.sort_unstable();
                    }
                }
                out
            }
            Self::OcTree(tree) => {
                let mut out = Vec::with_capacity(tree.len());
                tree.collect_into(0, &mut out);
                out.sort_unstable();
                out
            }
        }
    }
}
