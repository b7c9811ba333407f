extern crate glam;
use glam::Vec3A;

use smallvec::{smallvec, SmallVec};

use crate::{
    Grow, Hit, InPlaceRayIntersect, Ray, SplitPlane, SplitPlaneStrategy, AABB, BVH,
};

/// Inline traversal stack size, deeper trees spill to the heap
const MAX_STACK_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleBVHNode {
    pub aabb: AABB,
    left_first: u32,
    pub prim_count: u32,
}

impl SimpleBVHNode {
    /// Compute the SAH cost of this node
    #[inline]
    pub fn compute_sah(&self) -> f32 {
        self.prim_count as f32 * self.aabb.area()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.prim_count > 0
    }

    #[inline]
    pub fn left_child(&self) -> u32 {
        debug_assert!(!self.is_leaf());
        self.left_first
    }

    #[inline]
    pub fn first_prim(&self) -> u32 {
        debug_assert!(self.is_leaf());
        self.left_first
    }

    #[inline]
    pub fn right_child(&self) -> u32 {
        self.left_child() + 1
    }

    #[inline]
    pub fn setup_prims(&mut self, first_prim: u32, prim_count: u32) {
        self.prim_count = prim_count;
        self.left_first = first_prim;
    }

    #[inline]
    pub fn setup_left_child(&mut self, left_child: u32) {
        self.prim_count = 0;
        self.left_first = left_child;
    }
}

/// Binary BVH over an owned set of primitives, stored as a flat node array
#[derive(Debug, Clone)]
pub struct SimpleBVH<P> {
    prims: Vec<P>,
    prims_id: Vec<u32>,
    nodes: Vec<SimpleBVHNode>,
    root_node_id: u32,
    nodes_used: u32,
}

impl<P> Default for SimpleBVH<P> {
    fn default() -> Self {
        Self {
            prims: Vec::new(),
            prims_id: Vec::new(),
            nodes: vec![SimpleBVHNode::default(); 2],
            root_node_id: 1,
            nodes_used: 2,
        }
    }
}

impl<P> SimpleBVH<P>
where
    P: BVH,
{
    pub fn build<Strat>(prims: Vec<P>) -> Self
    where
        Strat: SplitPlaneStrategy,
    {
        let prim_count = prims.len();

        let mut bvh = Self {
            prims_id: (0..prim_count as u32).collect(),
            prims,
            ..Default::default()
        };

        bvh.root_node_id = 1;
        bvh.nodes_used = 2; // skip one for cache alignment

        // we use 2 * N as node[0] is empty to make the caches fit
        bvh.nodes.resize(
            if prim_count > 0 { 2 * prim_count } else { 2 },
            Default::default(),
        );

        let root = &mut bvh.nodes[bvh.root_node_id as usize];
        root.setup_prims(0, prim_count as u32);
        root.aabb = Default::default();

        if prim_count > 0 {
            bvh.build_node_bounds(bvh.root_node_id);
            bvh.subdivide::<Strat>(bvh.root_node_id);
        }

        bvh
    }

    fn build_node_bounds(&mut self, node_id: u32) {
        let node = &mut self.nodes[node_id as usize];
        assert!(node.is_leaf(), "Not valid for internal nodes");
        node.aabb = Default::default();

        let first = node.first_prim() as usize;
        for i in 0..node.prim_count as usize {
            let prim = &self.prims[self.prims_id[first + i] as usize];
            node.aabb.grow(&prim.bounds());
        }
    }

    fn subdivide<Strat>(&mut self, node_id: u32)
    where
        Strat: SplitPlaneStrategy,
    {
        let node = &mut self.nodes[node_id as usize];
        assert!(node.is_leaf(), "Not valid for internal nodes");

        let SplitPlane {
            axis,
            split_position: split_pos,
            should_split,
        } = Strat::get_split_plane(node, &self.prims, &self.prims_id);

        if !should_split {
            return;
        }

        // Quick partition
        // j might go below 0 in the case i == 0
        let mut i = node.first_prim() as isize;
        let mut j = i + node.prim_count as isize - 1;
        while i <= j {
            if self.prims[self.prims_id[i as usize] as usize].centroid()[axis] < split_pos {
                i += 1;
            } else {
                self.prims_id.swap(i as usize, j as usize);
                j -= 1;
            }
        }

        let i = i as usize;

        // One side is empty
        let left_count = i - node.first_prim() as usize;
        if left_count == 0 || left_count == node.prim_count as usize {
            return;
        }

        // create child nodes
        let left_child_idx = self.nodes_used;
        let right_child_idx = self.nodes_used + 1;
        self.nodes_used += 2;

        let node_first_prim = node.first_prim(); // it is lost after prim_count = 0
        let node_prim_count = node.prim_count; // it is lost after prim_count = 0

        node.setup_left_child(left_child_idx);

        self.nodes[left_child_idx as usize].setup_prims(node_first_prim, left_count as u32);
        self.nodes[right_child_idx as usize]
            .setup_prims(i as u32, node_prim_count - left_count as u32);

        self.build_node_bounds(left_child_idx);
        self.build_node_bounds(right_child_idx);
        self.subdivide::<Strat>(left_child_idx);
        self.subdivide::<Strat>(right_child_idx);
    }

    #[inline]
    pub fn prims(&self) -> &[P] {
        &self.prims
    }

    /// Number of nodes in the tree, leaves included
    #[inline]
    pub fn node_count(&self) -> u32 {
        self.nodes_used - self.root_node_id
    }

    /// Visit every primitive stored in a leaf within `radius` of `center`.
    ///
    /// The visitor receives the primitive index in build order and may shrink the radius, which
    /// prunes the rest of the traversal.
    pub fn point_query<F>(&self, center: Vec3A, radius: &mut f32, mut visit: F)
    where
        F: FnMut(u32, &P, &mut f32),
    {
        if self.prims.is_empty() {
            return;
        }

        let mut stack: SmallVec<[u32; MAX_STACK_SIZE]> = smallvec![self.root_node_id];

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            if node.aabb.distance_squared(center) > *radius * *radius {
                continue;
            }

            if node.is_leaf() {
                let first = node.first_prim() as usize;
                for &prim_id in &self.prims_id[first..first + node.prim_count as usize] {
                    visit(prim_id, &self.prims[prim_id as usize], radius);
                }
            } else {
                stack.push(node.right_child());
                stack.push(node.left_child());
            }
        }
    }
}

impl<P> SimpleBVH<P>
where
    P: BVH + InPlaceRayIntersect,
{
    fn inplace_intersect_ray(&self, ray: &Ray, hit: &mut Hit) {
        let root = &self.nodes[self.root_node_id as usize];
        let root_dist = root.aabb.ray_intersect(ray, hit.distance);
        if root_dist.is_infinite() {
            return;
        }

        // pending far children with their entry distance
        let mut stack: SmallVec<[(u32, f32); MAX_STACK_SIZE]> = SmallVec::new();
        let mut node_id = self.root_node_id;

        loop {
            let node = &self.nodes[node_id as usize];

            if node.is_leaf() {
                let first = node.first_prim() as usize;
                for &prim_id in &self.prims_id[first..first + node.prim_count as usize] {
                    self.prims[prim_id as usize].inplace_ray_intersect(ray, hit);
                }
            } else {
                let mut child1 = node.left_child();
                let mut child2 = node.right_child();

                let mut dist1 = self.nodes[child1 as usize].aabb.ray_intersect(ray, hit.distance);
                let mut dist2 = self.nodes[child2 as usize].aabb.ray_intersect(ray, hit.distance);

                if dist1 > dist2 {
                    (dist1, dist2) = (dist2, dist1);
                    (child1, child2) = (child2, child1);
                }

                if dist1.is_finite() {
                    if dist2.is_finite() {
                        stack.push((child2, dist2));
                    }
                    node_id = child1;
                    continue;
                }
            }

            // skip pending nodes that are now behind the closest hit
            loop {
                match stack.pop() {
                    None => return,
                    Some((next_id, dist)) if dist < hit.distance => {
                        node_id = next_id;
                        break;
                    }
                    Some(_) => continue,
                }
            }
        }
    }
}

impl<P> InPlaceRayIntersect for SimpleBVH<P>
where
    P: BVH + InPlaceRayIntersect,
{
    #[inline]
    fn inplace_ray_intersect(&self, ray: &Ray, hit: &mut Hit) {
        if !self.prims.is_empty() {
            self.inplace_intersect_ray(ray, hit);
        }
    }
}

impl<P> BVH for SimpleBVH<P>
where
    P: BVH,
{
    #[inline]
    fn bounds(&self) -> AABB {
        self.nodes[self.root_node_id as usize].aabb
    }

    #[inline]
    fn centroid(&self) -> Vec3A {
        self.bounds().center()
    }
}
