//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared primitives. Each split partitions the primitives
//! around the median of their box minima along one axis, so construction is
//! expected O(n log n) and the tree is balanced.

use crate::error::{SceneError, SceneResult};
use crate::hittable::{HitRecord, Hittable};
use caustic_math::{Aabb, Interval, Ray};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Seed for the axis choices of [`SplitAxis::Random`], so scenes build the
/// same tree every run.
const BUILD_SEED: u64 = 0x6276_685f_7365_6564;

/// How each level of the tree picks the axis to split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    /// Uniform among x, y and z at every level.
    #[default]
    Random,
    /// Longest extent of the primitive centroids.
    Longest,
}

/// A primitive together with its padded bounding box.
type Entry = (Arc<dyn Hittable>, Aabb);

enum BvhChild {
    Node(Box<BvhNode>),
    Primitive(Arc<dyn Hittable>),
}

impl BvhChild {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhChild::Node(node) => node.hit(ray, ray_t, rec, rng),
            BvhChild::Primitive(object) => object.hit(ray, ray_t, rec, rng),
        }
    }
}

/// BVH node: a box around two children.
///
/// A node over a single primitive stores it in both slots.
pub struct BvhNode {
    left: BvhChild,
    right: BvhChild,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH with the default split policy.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> SceneResult<Self> {
        Self::with_policy(objects, SplitAxis::default())
    }

    pub fn with_policy(objects: Vec<Arc<dyn Hittable>>, policy: SplitAxis) -> SceneResult<Self> {
        let mut rng = StdRng::seed_from_u64(BUILD_SEED);
        Self::with_rng(objects, policy, &mut rng)
    }

    /// Build with an explicit random source for the split axes.
    pub fn with_rng(
        objects: Vec<Arc<dyn Hittable>>,
        policy: SplitAxis,
        rng: &mut dyn RngCore,
    ) -> SceneResult<Self> {
        if objects.is_empty() {
            return Err(SceneError::EmptyBvh);
        }

        let entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| match object.bounding_box() {
                Some(bbox) => Ok((object, bbox.padded())),
                None => Err(SceneError::UnboundedPrimitive { index }),
            })
            .collect::<SceneResult<Vec<Entry>>>()?;

        let count = entries.len();
        let start = Instant::now();
        let root = Self::build(entries, policy, rng);

        log::debug!(
            "BVH built over {} primitives: {} nodes, depth {} ({:?} split) in {:.2?}",
            count,
            root.node_count(),
            root.depth(),
            policy,
            start.elapsed()
        );

        Ok(root)
    }

    fn build(mut entries: Vec<Entry>, policy: SplitAxis, rng: &mut dyn RngCore) -> Self {
        let axis = match policy {
            SplitAxis::Random => rng.gen_range(0..3),
            SplitAxis::Longest => entries
                .iter()
                .fold(Aabb::EMPTY, |acc, (_, bbox)| {
                    let c = bbox.centroid();
                    Aabb::surrounding(&acc, &Aabb::from_points(c, c))
                })
                .longest_axis(),
        };

        let by_min = |a: &Entry, b: &Entry| -> Ordering {
            a.1.axis_interval(axis)
                .min
                .total_cmp(&b.1.axis_interval(axis).min)
        };

        match entries.len() {
            0 | 1 => {
                // Only the entry point can pass an empty list, and it refuses.
                let (object, bbox) = entries.swap_remove(0);
                Self {
                    left: BvhChild::Primitive(object.clone()),
                    right: BvhChild::Primitive(object),
                    bbox,
                }
            }
            2 => {
                entries.sort_unstable_by(by_min);
                let (b, b_box) = entries.swap_remove(1);
                let (a, a_box) = entries.swap_remove(0);
                Self {
                    left: BvhChild::Primitive(a),
                    right: BvhChild::Primitive(b),
                    bbox: Aabb::surrounding(&a_box, &b_box),
                }
            }
            n => {
                let mid = n / 2;
                entries.select_nth_unstable_by(mid, by_min);
                let upper = entries.split_off(mid);

                let left = Self::build(entries, policy, rng);
                let right = Self::build(upper, policy, rng);
                let bbox = Aabb::surrounding(&left.bbox, &right.bbox);

                Self {
                    left: BvhChild::Node(Box::new(left)),
                    right: BvhChild::Node(Box::new(right)),
                    bbox,
                }
            }
        }
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + [&self.left, &self.right]
            .iter()
            .map(|child| match child {
                BvhChild::Node(node) => node.node_count(),
                BvhChild::Primitive(_) => 0,
            })
            .sum::<usize>()
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        1 + [&self.left, &self.right]
            .iter()
            .map(|child| match child {
                BvhChild::Node(node) => node.depth(),
                BvhChild::Primitive(_) => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec, rng);

        // Only check right up to closest hit
        let right_t = if hit_left { ray_t.with_max(rec.t) } else { ray_t };
        let hit_right = self.right.hit(ray, right_t, rec, rng);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }
}
