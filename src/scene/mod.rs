//! Authoritative scene graph: groups and meshes with local transforms.
//!
//! Nodes live in a flat id-keyed map with parent/child links so the picker
//! can remove a node in O(1) lookup while ray queries still walk the
//! hierarchy. Removing a node releases every GPU resource of its subtree
//! into a queue the render output drains each frame.

pub mod material;
pub mod mesh;
pub mod mesh_gen;

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use self::material::{Material, Side};
use self::mesh::Geometry;
use crate::picking::ray::Ray;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Identity of a GPU-backed resource (geometry, material, or texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

static NEXT_RESOURCE: AtomicU64 = AtomicU64::new(1);

impl ResourceId {
    /// Allocate a fresh id.
    pub(crate) fn next() -> Self {
        Self(NEXT_RESOURCE.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Local translation, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent.
    pub translation: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Non-uniform scale.
    pub scale: Vec3,
}

impl Transform {
    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Drawable geometry paired with its material.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Triangle data.
    pub geometry: Geometry,
    /// Surface appearance.
    pub material: Material,
}

/// What a node carries.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node.
    Group,
    /// Renderable mesh.
    Mesh(Mesh),
}

/// A scene graph node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Human-readable label for logs.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Payload.
    pub kind: NodeKind,
    /// Hidden nodes (and their subtrees) are neither drawn nor picked.
    pub visible: bool,
    /// Whether ray queries consider this node's own mesh.
    pub pickable: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// An empty group.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    /// A mesh node.
    #[must_use]
    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::with_kind(name, NodeKind::Mesh(Mesh { geometry, material }))
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            kind,
            visible: true,
            pickable: true,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the local translation.
    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    /// Set whether ray queries consider this node.
    #[must_use]
    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    /// The mesh payload, if this is a mesh node.
    #[must_use]
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }

    /// Parent node, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A mesh ready to draw: node id, world matrix, and payload.
pub struct Renderable<'a> {
    /// Owning node.
    pub node: NodeId,
    /// Local-to-world matrix.
    pub world: Mat4,
    /// Geometry and material.
    pub mesh: &'a Mesh,
}

/// A ray/surface hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Node whose mesh was hit.
    pub node: NodeId,
    /// World-space hit point.
    pub point: Vec3,
    /// World-space distance from the ray origin.
    pub distance: f32,
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The scene graph plus environment (background, light).
pub struct Scene {
    background: [f32; 3],
    light_position: Vec3,
    nodes: FxHashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_node: u32,
    released: Vec<ResourceId>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(background: [f32; 3], light_position: Vec3) -> Self {
        Self {
            background,
            light_position,
            nodes: FxHashMap::default(),
            roots: Vec::new(),
            next_node: 0,
            released: Vec::new(),
        }
    }

    /// Clear color.
    #[must_use]
    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    /// Point light position for lit materials.
    #[must_use]
    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }


    /// Number of nodes (all depths).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the scene has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable access to a node's mesh, if it is a mesh node.
    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut Mesh> {
        match &mut self.nodes.get_mut(&id)?.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }

    /// Top-level nodes in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Add a top-level node.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.insert(node, None);
        self.roots.push(id);
        id
    }

    /// Add a node under `parent`. Returns `None` if the parent is gone.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.insert(node, Some(parent));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    fn insert(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        node.parent = parent;
        node.children.clear();
        let _ = self.nodes.insert(id, node);
        id
    }

    /// Detach `id` and its subtree from the scene and queue every GPU
    /// resource they own for release. Returns `false` if `id` is not in the
    /// scene.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        match node.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend_from_slice(&node.children);
                self.release_node(&node);
            }
        }
        true
    }

    fn release_node(&mut self, node: &Node) {
        if let NodeKind::Mesh(mesh) = &node.kind {
            self.released.push(mesh.geometry.id());
            self.released.extend(mesh.material.resource_ids());
        }
    }

    /// Queue a resource that was replaced in place (e.g. a swapped texture).
    pub fn release(&mut self, id: ResourceId) {
        self.released.push(id);
    }

    /// Drain the queue of resources released since the last call.
    pub fn take_released(&mut self) -> Vec<ResourceId> {
        std::mem::take(&mut self.released)
    }


    /// Local-to-world matrix of `id`.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut world = node.transform.matrix();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(&p)) {
            world = parent.transform.matrix() * world;
            node = parent;
        }
        Some(world)
    }

    /// Depth-first walk over visible nodes with their world matrices.
    fn visit_visible<'a>(&'a self, mut f: impl FnMut(NodeId, &'a Node, Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> =
            self.roots.iter().rev().map(|&id| (id, Mat4::IDENTITY)).collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            f(id, node, world);
            stack.extend(node.children.iter().rev().map(|&c| (c, world)));
        }
    }

    /// Every visible mesh with its world matrix.
    #[must_use]
    pub fn renderables(&self) -> Vec<Renderable<'_>> {
        let mut out = Vec::new();
        self.visit_visible(|id, node, world| {
            if let Some(mesh) = node.as_mesh() {
                out.push(Renderable {
                    node: id,
                    world,
                    mesh,
                });
            }
        });
        out
    }

    /// Intersect `ray` with every visible, pickable mesh (recursing through
    /// groups). Hits are sorted nearest first.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits = Vec::new();
        self.visit_visible(|id, node, world| {
            if !node.pickable {
                return;
            }
            if let Some(mesh) = node.as_mesh() {
                if let Some(hit) = intersect_mesh(ray, mesh, world) {
                    hits.push(Intersection {
                        node: id,
                        point: hit,
                        distance: ray.origin.distance(hit),
                    });
                }
            }
        });
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new([0.0; 3], Vec3::ZERO)
    }
}

/// Nearest world-space hit of `ray` on `mesh` placed at `world`.
fn intersect_mesh(ray: &Ray, mesh: &Mesh, world: Mat4) -> Option<Vec3> {
    let geometry = &mesh.geometry;
    if geometry.triangle_count() == 0 {
        return None;
    }
    let inverse = world.inverse();
    if !inverse.is_finite() {
        return None;
    }
    let local = ray.transformed(&inverse);
    let _ = local.intersect_aabb(geometry.bounds())?;

    let cull = mesh.material.side == Side::Front;
    let t = geometry
        .triangles()
        .filter_map(|[a, b, c]| local.intersect_triangle(a, b, c, cull))
        .min_by(f32::total_cmp)?;
    Some(world.transform_point3(local.at(t)))
}
