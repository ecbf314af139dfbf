//! # Barnes–Hut Octree (3D)
//!
//! This module implements the **3D octree** used to approximate gravitational
//! forces in an `N`-body system. The goal is to replace the naive `O(N²)`
//! all-pairs force calculation with an approximate `O(N log N)` method while
//! preserving good accuracy for distant interactions.
//!
//! ## Core Concepts
//!
//! - The simulation space is recursively subdivided into 8 regions (octants).
//! - Each region becomes a node of the octree.
//! - A leaf holds one body; when a second body arrives the leaf is promoted to
//!   an internal node and both bodies are pushed down into children.
//! - Each node stores:
//!   - the indices of every body in its subtree
//!   - total mass of its subtree
//!   - center of mass (COM), updated incrementally on every insertion
//!   - bounding box (for computing size and subdivision)
//!
//! ## Storage
//!
//! Nodes live in a single arena (`Vec<OctreeNode>`) and refer to each other by
//! index. Bodies are referred to by their index in the caller's slice, never
//! copied. The root always sits at [`ROOT`]; clearing the tree truncates the
//! arena back to it, so the allocation is reused from one step to the next.
//!
//! ## Octant convention
//!
//! Children are indexed by which side of the node's midpoint a point falls on
//! (`>` midpoint is the upper side, ties go to the lower side):
//!
//! | index | x | y | z |
//! |-------|---|---|---|
//! | 0     | + | + | + |
//! | 1     | − | + | + |
//! | 2     | − | − | + |
//! | 3     | + | − | + |
//! | 4..7  | as 0..3 | | − |

use crate::error::{SimError, SimResult};
use crate::simulation::forces::ForceLaw;
use crate::simulation::states::{NVec3, PointMass};

/// Index of the root node in [`Octree::nodes`]
pub const ROOT: usize = 0;

/// Default limit on subdivision depth.
///
/// Each level halves the box, so past ~64 levels an `f64` midpoint no longer
/// separates anything.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: NVec3,
    pub max: NVec3,
}

impl BoundingBox {
    pub fn new(min: NVec3, max: NVec3) -> Self {
        Self { min, max }
    }

    /// Box from `[min, max]` intervals on each axis
    pub fn from_ranges(x: [f64; 2], y: [f64; 2], z: [f64; 2]) -> Self {
        Self {
            min: NVec3::new(x[0], y[0], z[0]),
            max: NVec3::new(x[1], y[1], z[1]),
        }
    }

    /// Tightest box around every body position (a zero box for no bodies)
    pub fn enclosing<B: PointMass>(bodies: &[B]) -> Self {
        if bodies.is_empty() {
            return Self::new(NVec3::zeros(), NVec3::zeros());
        }

        let mut min = NVec3::repeat(f64::INFINITY);
        let mut max = NVec3::repeat(f64::NEG_INFINITY);
        for b in bodies {
            let p = b.position();
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Self { min, max }
    }

    pub fn midpoint(&self) -> NVec3 {
        (self.min + self.max) * 0.5
    }

    /// Length of the box diagonal, used as the node size `s` in the opening test
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }

    pub fn contains(&self, p: &NVec3) -> bool {
        (0..3).all(|k| p[k] >= self.min[k] && p[k] <= self.max[k])
    }

    /// Octant of `p` relative to this box's midpoint
    pub fn octant_of(&self, p: &NVec3) -> usize {
        let mid = self.midpoint();
        octant_index(p.x > mid.x, p.y > mid.y, p.z > mid.z)
    }

    /// Sub-box covering octant `idx`: half the extent on each axis, on the
    /// side selected by the octant's flags.
    pub fn octant(&self, idx: usize) -> BoundingBox {
        let mid = self.midpoint();
        let flags = octant_flags(idx);
        let mut min = self.min;
        let mut max = self.max;

        for k in 0..3 {
            if flags[k] {
                min[k] = mid[k];
            } else {
                max[k] = mid[k];
            }
        }

        BoundingBox { min, max }
    }
}

/// Child index for the per-axis "above midpoint" flags
pub fn octant_index(x_up: bool, y_up: bool, z_up: bool) -> usize {
    let quadrant = match (x_up, y_up) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    };
    if z_up { quadrant } else { quadrant + 4 }
}

/// Inverse of [`octant_index`]
fn octant_flags(idx: usize) -> [bool; 3] {
    let (x_up, y_up) = match idx % 4 {
        0 => (true, true),
        1 => (false, true),
        2 => (false, false),
        _ => (true, false),
    };
    [x_up, y_up, idx < 4]
}

/// A single octree node.
///
/// A node is either
/// - a leaf (`internal == false`) holding exactly one body, or
/// - an internal node whose bodies have been pushed down into children.
///
/// Internal nodes keep the list of every body in their subtree so the
/// aggregates can be checked against it.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub bounds: BoundingBox,
    pub internal: bool,
    pub total_mass: f64,
    pub center_of_mass: NVec3,
    pub bodies: Vec<usize>, // indices into the body slice
    pub children: [Option<usize>; 8], // indices into Octree::nodes
    pub depth: usize,
}

impl OctreeNode {
    fn new(bounds: BoundingBox, internal: bool, depth: usize) -> Self {
        Self {
            bounds,
            internal,
            total_mass: 0.0,
            center_of_mass: NVec3::zeros(),
            bodies: Vec::new(),
            children: [None; 8],
            depth,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Fold one more body (already pushed onto `bodies`) into mass and COM
    fn accumulate(&mut self, pos: NVec3, m: f64) {
        let new_mass = self.total_mass + m;
        if self.bodies.len() == 1 {
            self.center_of_mass = pos;
        } else if new_mass != 0.0 {
            self.center_of_mass = (self.center_of_mass * self.total_mass + pos * m) / new_mass;
        }
        self.total_mass = new_mass;
    }
}

/// Arena-backed octree over a body slice.
#[derive(Debug, Clone)]
pub struct Octree {
    pub nodes: Vec<OctreeNode>,
    pub max_depth: usize,
}

impl Octree {
    /// Empty tree whose root covers `bounds`.
    ///
    /// The root is always an internal node: the first body inserted already
    /// goes into a child leaf.
    pub fn new(bounds: BoundingBox) -> Self {
        Self::with_max_depth(bounds, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(bounds: BoundingBox, max_depth: usize) -> Self {
        Self {
            nodes: vec![OctreeNode::new(bounds, true, 0)],
            max_depth,
        }
    }

    pub fn root(&self) -> &OctreeNode {
        &self.nodes[ROOT]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drop every node below the root and empty the root's aggregates
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.bodies.clear();
        root.total_mass = 0.0;
        root.center_of_mass = NVec3::zeros();
        root.children = [None; 8];
        root.internal = true;
    }

    /// Reset the root's bounding box
    pub fn update_coords(&mut self, x_range: [f64; 2], y_range: [f64; 2], z_range: [f64; 2]) {
        self.nodes[ROOT].bounds = BoundingBox::from_ranges(x_range, y_range, z_range);
    }

    /// Insert body `body_idx` of `bodies` starting at the root.
    pub fn insert<B: PointMass>(&mut self, body_idx: usize, bodies: &[B]) -> SimResult<()> {
        self.insert_at(ROOT, body_idx, bodies)
    }

    /// Insert every body in input order. Does not clear the tree first.
    pub fn build<B: PointMass>(&mut self, bodies: &[B]) -> SimResult<()> {
        for i in 0..bodies.len() {
            self.insert(i, bodies)?;
        }
        Ok(())
    }

    /// Clear, fit the root box to the bodies' extent, and build
    pub fn rebuild<B: PointMass>(&mut self, bodies: &[B]) -> SimResult<()> {
        self.clear();
        let bbox = BoundingBox::enclosing(bodies);
        self.update_coords(
            [bbox.min.x, bbox.max.x],
            [bbox.min.y, bbox.max.y],
            [bbox.min.z, bbox.max.z],
        );
        self.build(bodies)
    }

    /// Net force on body `i` from every other body, walking from the root.
    ///
    /// A node whose `size / distance` (box diagonal over distance to its COM)
    /// is below `theta` is treated as one point mass at its COM; otherwise
    /// its children are visited. Leaves give the exact pair force, except the
    /// leaf holding body `i` itself, which gives nothing.
    pub fn force_on_body<B: PointMass>(&self, i: usize, bodies: &[B], g: f64, theta: f64, law: ForceLaw) -> NVec3 {
        self.force_from_node(ROOT, i, bodies, g, theta, law)
    }

    /// Force on body `i` from the subtree rooted at `node_idx`
    pub fn force_from_node<B: PointMass>(&self, node_idx: usize, i: usize, bodies: &[B], g: f64, theta: f64, law: ForceLaw) -> NVec3 {
        let mut force = NVec3::zeros();
        let target = Target {
            index: i,
            pos: bodies[i].position(),
            mass: bodies[i].mass(),
        };
        self.traverse_node(node_idx, &target, bodies, g, theta, law, &mut force);
        force
    }

    // helpers ==============================================================================

    /// Insert one body into the subtree at `node_idx`.
    ///
    /// - Internal node: forward the body to the child for its octant.
    /// - Leaf that now holds two bodies: promote it and push both down.
    /// - Leaf with a single body: keep it here.
    fn insert_at<B: PointMass>(&mut self, node_idx: usize, body_idx: usize, bodies: &[B]) -> SimResult<()> {
        let pos = bodies[body_idx].position();
        let m = bodies[body_idx].mass();

        let node = &mut self.nodes[node_idx];
        node.bodies.push(body_idx);
        node.accumulate(pos, m);

        if node.internal {
            let child = self.child_for(node_idx, body_idx, &pos)?;
            return self.insert_at(child, body_idx, bodies);
        }

        if node.bodies.len() >= 2 {
            // a leaf has no children to delegate to yet, so everything it
            // holds is pushed down, not only the newcomer
            node.internal = true;
            let held = node.bodies.clone();
            for b in held {
                let p = bodies[b].position();
                let child = self.child_for(node_idx, b, &p)?;
                self.insert_at(child, b, bodies)?;
            }
        }

        Ok(())
    }

    /// Child of `node_idx` covering `pos`, created as an empty leaf if absent
    fn child_for(&mut self, node_idx: usize, body_idx: usize, pos: &NVec3) -> SimResult<usize> {
        let (bounds, depth) = {
            let node = &self.nodes[node_idx];
            (node.bounds, node.depth)
        };

        let octant = bounds.octant_of(pos);
        if let Some(child) = self.nodes[node_idx].children[octant] {
            return Ok(child);
        }

        if depth + 1 > self.max_depth {
            return Err(SimError::OctreeDepthExceeded {
                max_depth: self.max_depth,
                body: body_idx,
                position: *pos,
            });
        }

        let child = self.nodes.len();
        self.nodes.push(OctreeNode::new(bounds.octant(octant), false, depth + 1));
        self.nodes[node_idx].children[octant] = Some(child);
        Ok(child)
    }

    fn traverse_node<B: PointMass>(
        &self,
        node_idx: usize,
        target: &Target,
        bodies: &[B],
        g: f64,
        theta: f64,
        law: ForceLaw,
        acc: &mut NVec3,
    ) {
        let node = &self.nodes[node_idx];

        if node.is_empty() {
            return;
        }

        // Leaf: exact interaction with whatever it holds, skipping self
        if !node.internal {
            for &other in &node.bodies {
                if other == target.index {
                    continue;
                }
                let b = &bodies[other];
                *acc += law.pair_force(g, target.mass, &target.pos, b.mass(), &b.position());
            }
            return;
        }

        let s = node.bounds.diagonal();
        let d = (node.center_of_mass - target.pos).norm();

        if d > 0.0 && s / d < theta {
            // Far enough away: the whole subtree acts as one mass at its COM
            *acc += law.pair_force(g, target.mass, &target.pos, node.total_mass, &node.center_of_mass);
        } else {
            for child in node.children.iter().flatten() {
                self.traverse_node(*child, target, bodies, g, theta, law, acc);
            }
        }
    }
}

/// The body a traversal is computing the force on
struct Target {
    index: usize,
    pos: NVec3,
    mass: f64,
}
