use eframe::egui::Vec2;

use super::Link;
use super::quadtree::QuadNode;
use crate::util::fallback_direction;

const MIN_DISTANCE_SQ: f32 = 1.0;
const COINCIDENT_EPSILON: f32 = 0.0001;

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    /// Repulsive magnitude per unit mass at unit distance, already alpha-scaled.
    pub(super) strength: f32,
    pub(super) theta: f32,
}

#[derive(Clone, Copy)]
pub(super) struct LinkParams {
    pub(super) alpha: f32,
    pub(super) strength: f32,
    pub(super) base_distance: f32,
    pub(super) distance_per_weight: f32,
    pub(super) min_distance: f32,
}

impl LinkParams {
    pub(super) fn rest_length(self, weight: f32) -> f32 {
        (self.base_distance - weight * self.distance_per_weight).max(self.min_distance)
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) collision_strength: f32,
    pub(super) max_collision_distance_sq: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionInputs<'a> {
    pub(super) predicted: &'a [Vec2],
    pub(super) radii: &'a [f32],
    pub(super) pinned: &'a [bool],
}

fn repulsion_between(point: Vec2, other: Vec2, strength: f32, fallback: Vec2) -> Vec2 {
    let delta = point - other;
    let distance_sq = delta.length_sq();
    if distance_sq <= COINCIDENT_EPSILON * COINCIDENT_EPSILON {
        return fallback * strength;
    }
    delta * (strength / distance_sq.max(MIN_DISTANCE_SQ))
}

pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    masses: &[f32],
    params: RepulsionParams,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *force += repulsion_between(
                point,
                positions[other_index],
                params.strength * masses[other_index],
                fallback_direction(index, other_index),
            );
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance_sq = delta.length_sq().max(COINCIDENT_EPSILON);
    let distance = distance_sq.sqrt();
    let can_approximate = !node.bounds.contains(point)
        && ((node.bounds.side_length() / distance) < params.theta)
        && node.count > 1;

    if can_approximate {
        *force += delta * (params.strength * node.mass / distance_sq.max(MIN_DISTANCE_SQ));
        return;
    }

    for child in &node.children {
        if let Some(child) = child.as_ref() {
            accumulate_repulsion_for_node(child, index, positions, masses, params, force);
        }
    }
}

/// Spring toward each link's weight-dependent rest length, evaluated on
/// predicted positions. The better-connected endpoint moves less.
pub(super) fn accumulate_link_forces(
    links: &[Link],
    positions: &[Vec2],
    velocities: &[Vec2],
    degree: &[usize],
    params: LinkParams,
    forces: &mut [Vec2],
) {
    let node_count = positions.len();
    for link in links {
        let (source, target) = (link.source, link.target);
        if source >= node_count || target >= node_count || source == target {
            continue;
        }

        let mut delta =
            (positions[target] + velocities[target]) - (positions[source] + velocities[source]);
        if delta.length_sq() <= COINCIDENT_EPSILON * COINCIDENT_EPSILON {
            delta = fallback_direction(source, target) * COINCIDENT_EPSILON;
        }
        let distance = delta.length();

        let rest_length = params.rest_length(link.weight);
        let stretch = (distance - rest_length) / distance * params.alpha * params.strength;
        let correction = delta * stretch;

        let source_degree = degree[source].max(1) as f32;
        let target_degree = degree[target].max(1) as f32;
        let bias = source_degree / (source_degree + target_degree);

        forces[target] -= correction * bias;
        forces[source] += correction * (1.0 - bias);
    }
}

/// Uniform pull that moves the centroid of the unpinned vertices toward `center`.
pub(super) fn accumulate_centering(
    positions: &[Vec2],
    pinned: &[bool],
    center: Vec2,
    strength: f32,
    forces: &mut [Vec2],
) {
    let mut centroid = Vec2::ZERO;
    let mut free = 0usize;
    for (position, &is_pinned) in positions.iter().zip(pinned) {
        if !is_pinned {
            centroid += *position;
            free += 1;
        }
    }
    if free == 0 {
        return;
    }

    centroid /= free as f32;
    let shift = (center - centroid) * strength;
    for (force, &is_pinned) in forces.iter_mut().zip(pinned) {
        if !is_pinned {
            *force += shift;
        }
    }
}

fn resolve_overlap(
    from: usize,
    to: usize,
    inputs: CollisionInputs<'_>,
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    let (from_radius, to_radius) = (inputs.radii[from], inputs.radii[to]);
    let min_distance = from_radius + to_radius;
    let delta = inputs.predicted[from] - inputs.predicted[to];
    let distance_sq = delta.length_sq();
    if distance_sq >= min_distance * min_distance {
        return;
    }

    let distance = distance_sq.sqrt();
    let (direction, distance) = if distance > COINCIDENT_EPSILON {
        (delta / distance, distance)
    } else {
        (fallback_direction(from, to), 0.0)
    };

    let from_area = from_radius * from_radius;
    let to_area = to_radius * to_radius;
    let total_area = (from_area + to_area).max(f32::EPSILON);
    let (from_share, to_share) = match (inputs.pinned[from], inputs.pinned[to]) {
        (true, true) => return,
        (true, false) => (0.0, 1.0),
        (false, true) => (1.0, 0.0),
        (false, false) => (to_area / total_area, from_area / total_area),
    };

    let push = direction * ((min_distance - distance) * params.collision_strength);
    forces[from] += push * from_share;
    forces[to] -= push * to_share;
}

/// Dual-tree traversal over the spatial index, pruning cell pairs that are
/// farther apart than the largest possible collision distance.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    inputs: CollisionInputs<'_>,
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > params.max_collision_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_overlap(from, to, inputs, params, forces);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_overlap(from, to, inputs, params, forces);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, inputs, params, forces);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(child_a, child_b, false, inputs, params, forces);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, inputs, params, forces);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, inputs, params, forces);
        }
    }
}
