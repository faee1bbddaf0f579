//! Force simulation engine.
//!
//! Each [`Simulation::tick`] accumulates forces (many-body repulsion through a
//! Barnes-Hut quadtree, weighted link springs, centering, collision), integrates
//! velocities with friction, then cools `alpha` toward `alpha_target`.

mod forces;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;
use forces::{
    CollisionInputs, CollisionParams, LinkParams, RepulsionParams, accumulate_centering,
    accumulate_collision_pairs, accumulate_link_forces, accumulate_repulsion_for_node,
};
pub use quadtree::QuadtreeCell;
use quadtree::{QuadNode, collect_quadtree_cells};

const COINCIDENT_JITTER: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub alpha_start: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    /// Many-body strength; negative values repel.
    pub charge_strength: f32,
    pub theta: f32,
    pub link_base_distance: f32,
    pub link_distance_per_weight: f32,
    pub link_min_distance: f32,
    pub link_strength: f32,
    pub center_strength: f32,
    /// Added to each vertex's radius to form its collision radius.
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub reheat_alpha_target: f32,
    /// Ticks allowed since the last (re)start before ticking stops regardless of alpha.
    pub max_ticks: Option<usize>,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_start: 1.0,
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            charge_strength: -280.0,
            theta: 0.9,
            link_base_distance: 100.0,
            link_distance_per_weight: 8.0,
            link_min_distance: 1.0,
            link_strength: 0.4,
            center_strength: 0.1,
            collision_padding: 12.0,
            collision_strength: 0.7,
            reheat_alpha_target: 0.3,
            max_ticks: Some(3000),
            seed: 0,
        }
    }
}

/// Construction input for one simulated vertex.
#[derive(Clone, Debug)]
pub struct NodeSpec {
    /// Stable key used to derive the seeded initial position.
    pub key: String,
    pub radius: f32,
    pub mass: f32,
    /// Previous position to resume from instead of a seeded placement.
    pub position: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimNode {
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Option<Vec2>,
    pub radius: f32,
    pub mass: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub weight: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    /// Alpha is below `alpha_min` and nothing is reheating it.
    Settled,
    TickCapReached,
}

#[derive(Default)]
struct PhysicsScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    masses: Vec<f32>,
    pinned: Vec<bool>,
}

pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<Link>,
    degree: Vec<usize>,
    config: SimulationConfig,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    ticks_since_start: usize,
    total_ticks: usize,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub fn new(specs: &[NodeSpec], links: Vec<Link>, config: SimulationConfig, center: Vec2) -> Self {
        let node_count = specs.len();
        let spread = 10.0 * (node_count as f32).sqrt() + 40.0;
        let nodes = specs
            .iter()
            .map(|spec| {
                let position = spec.position.unwrap_or_else(|| {
                    let (jx, jy) = stable_pair(spec.key.as_str(), config.seed);
                    center + vec2(jx, jy) * spread
                });
                SimNode {
                    position,
                    velocity: Vec2::ZERO,
                    pin: None,
                    radius: spec.radius,
                    mass: spec.mass,
                }
            })
            .collect::<Vec<_>>();

        let links = links
            .into_iter()
            .filter(|link| {
                link.source < node_count && link.target < node_count && link.source != link.target
            })
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; node_count];
        for link in &links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }

        Self {
            nodes,
            links,
            degree,
            config,
            center,
            alpha: config.alpha_start,
            alpha_target: 0.0,
            ticks_since_start: 0,
            total_ticks: 0,
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn ticks_since_start(&self) -> usize {
        self.ticks_since_start
    }

    pub fn collision_radius(&self, index: usize) -> Option<f32> {
        self.nodes
            .get(index)
            .map(|node| node.radius + self.config.collision_padding)
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
    }

    /// Fix a vertex at `at`. The pinned vertex is not integrated while pinned.
    pub fn pin(&mut self, index: usize, at: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(at);
            node.position = at;
            node.velocity = Vec2::ZERO;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    pub fn pinned(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.pin.map(|_| index))
    }

    /// Ease alpha toward `target` over the coming ticks.
    pub fn reheat(&mut self, target: f32) {
        self.alpha_target = target.max(0.0);
        self.ticks_since_start = 0;
    }

    /// Let alpha cool back toward zero. The tick cap window restarts so a
    /// pin held past the cap still gets to re-cool.
    pub fn release_heat(&mut self) {
        self.alpha_target = 0.0;
        self.ticks_since_start = 0;
    }

    /// Jump alpha to `alpha` immediately for a fresh layout pass.
    pub fn restart(&mut self, alpha: f32) {
        self.alpha = alpha.max(0.0);
        self.ticks_since_start = 0;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.is_settled() {
            return TickOutcome::Settled;
        }
        if self
            .config
            .max_ticks
            .is_some_and(|cap| self.ticks_since_start >= cap)
        {
            return TickOutcome::TickCapReached;
        }

        if self.total_ticks == 0 {
            self.separate_coincident();
        }

        self.accumulate_forces();
        self.integrate();

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.ticks_since_start += 1;
        self.total_ticks += 1;

        TickOutcome::Advanced
    }

    /// Tick until the simulation settles or hits the tick cap; returns ticks advanced.
    pub fn run_to_rest(&mut self) -> usize {
        let mut advanced = 0;
        while self.tick() == TickOutcome::Advanced {
            advanced += 1;
        }
        advanced
    }

    /// Spatial index cells over the current positions.
    pub fn quadtree_cells(&mut self) -> Vec<QuadtreeCell> {
        let positions = &mut self.scratch.positions;
        let masses = &mut self.scratch.masses;
        positions.clear();
        masses.clear();
        for node in &self.nodes {
            positions.push(node.position);
            masses.push(node.mass);
        }

        let mut cells = Vec::new();
        if let Some(quadtree) = QuadNode::build(positions, masses) {
            collect_quadtree_cells(&quadtree, 0, &mut cells);
        }
        cells
    }

    fn separate_coincident(&mut self) {
        let mut groups: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if node.pin.is_some() {
                continue;
            }
            groups
                .entry((node.position.x.to_bits(), node.position.y.to_bits()))
                .or_default()
                .push(index);
        }

        for members in groups.values() {
            for &index in members.iter().skip(1) {
                let (jx, jy) = stable_pair(&index, self.config.seed ^ 0x9e37_79b9_7f4a_7c15);
                let mut offset = vec2(jx, jy);
                if offset.length_sq() <= f32::EPSILON {
                    offset = vec2(1.0, 0.0);
                }
                self.nodes[index].position += offset.normalized() * COINCIDENT_JITTER;
            }
        }
    }

    fn accumulate_forces(&mut self) {
        let node_count = self.nodes.len();
        let scratch = &mut self.scratch;
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch.velocities.clear();
        scratch.radii.clear();
        scratch.masses.clear();
        scratch.pinned.clear();

        let mut max_radius = 0.0_f32;
        for node in &self.nodes {
            let collision_radius = node.radius + self.config.collision_padding;
            scratch.positions.push(node.position);
            scratch.velocities.push(node.velocity);
            scratch.radii.push(collision_radius);
            scratch.masses.push(node.mass);
            scratch.pinned.push(node.pin.is_some());
            max_radius = max_radius.max(collision_radius);
        }

        let config = self.config;
        let alpha = self.alpha;
        let forces = &mut scratch.forces;
        let positions = &scratch.positions;

        if let Some(quadtree) = QuadNode::build(positions, &scratch.masses) {
            let params = RepulsionParams {
                strength: -config.charge_strength * alpha,
                theta: config.theta,
            };
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_repulsion_for_node(
                    &quadtree,
                    index,
                    positions,
                    &scratch.masses,
                    params,
                    force,
                );
            }
        }

        accumulate_link_forces(
            &self.links,
            positions,
            &scratch.velocities,
            &self.degree,
            LinkParams {
                alpha,
                strength: config.link_strength,
                base_distance: config.link_base_distance,
                distance_per_weight: config.link_distance_per_weight,
                min_distance: config.link_min_distance,
            },
            forces,
        );

        accumulate_centering(
            positions,
            &scratch.pinned,
            self.center,
            config.center_strength * alpha,
            forces,
        );

        scratch.predicted.clear();
        for index in 0..node_count {
            scratch
                .predicted
                .push(positions[index] + scratch.velocities[index] + forces[index]);
        }

        let max_collision_distance = max_radius * 2.0;
        if max_collision_distance > 0.0
            && let Some(quadtree) = QuadNode::build(&scratch.predicted, &scratch.masses)
        {
            accumulate_collision_pairs(
                &quadtree,
                &quadtree,
                true,
                CollisionInputs {
                    predicted: &scratch.predicted,
                    radii: &scratch.radii,
                    pinned: &scratch.pinned,
                },
                CollisionParams {
                    collision_strength: config.collision_strength,
                    max_collision_distance_sq: max_collision_distance * max_collision_distance,
                },
                forces,
            );
        }
    }

    fn integrate(&mut self) {
        let friction = (1.0 - self.config.velocity_decay).clamp(0.0, 1.0);
        for (node, force) in self.nodes.iter_mut().zip(&self.scratch.forces) {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            let mut velocity = (node.velocity + *force) * friction;
            if !velocity.x.is_finite() || !velocity.y.is_finite() {
                velocity = Vec2::ZERO;
            }
            node.velocity = velocity;
            node.position += velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(key: &str, radius: f32) -> NodeSpec {
        NodeSpec {
            key: key.to_string(),
            radius,
            mass: 1.0,
            position: None,
        }
    }

    #[test]
    fn initial_placement_is_seeded_and_deterministic() {
        let specs = vec![spec("A", 10.0), spec("B", 10.0)];
        let config = SimulationConfig::default();
        let first = Simulation::new(&specs, Vec::new(), config, vec2(100.0, 100.0));
        let second = Simulation::new(&specs, Vec::new(), config, vec2(100.0, 100.0));
        assert_eq!(first.nodes(), second.nodes());

        let reseeded = Simulation::new(
            &specs,
            Vec::new(),
            SimulationConfig { seed: 99, ..config },
            vec2(100.0, 100.0),
        );
        assert_ne!(first.nodes()[0].position, reseeded.nodes()[0].position);
    }

    #[test]
    fn invalid_links_are_dropped_at_construction() {
        let specs = vec![spec("A", 10.0), spec("B", 10.0)];
        let links = vec![
            Link { source: 0, target: 1, weight: 2.0 },
            Link { source: 1, target: 1, weight: 2.0 },
            Link { source: 0, target: 9, weight: 2.0 },
        ];
        let simulation =
            Simulation::new(&specs, links, SimulationConfig::default(), Vec2::ZERO);
        assert_eq!(simulation.links().len(), 1);
    }

    #[test]
    fn coincident_start_positions_are_separated_on_first_tick() {
        let specs = (0..3)
            .map(|index| NodeSpec {
                position: Some(vec2(50.0, 50.0)),
                ..spec(&format!("n{index}"), 5.0)
            })
            .collect::<Vec<_>>();
        let mut simulation =
            Simulation::new(&specs, Vec::new(), SimulationConfig::default(), vec2(50.0, 50.0));
        simulation.tick();

        let nodes = simulation.nodes();
        for a in 0..nodes.len() {
            for b in (a + 1)..nodes.len() {
                assert!((nodes[a].position - nodes[b].position).length() > 0.01);
            }
        }
        assert!(nodes.iter().all(|node| node.position.x.is_finite()));
    }

    #[test]
    fn ticking_is_a_no_op_once_settled() {
        let specs = vec![spec("A", 10.0), spec("B", 10.0)];
        let mut simulation =
            Simulation::new(&specs, Vec::new(), SimulationConfig::default(), Vec2::ZERO);
        simulation.run_to_rest();
        assert!(simulation.is_settled());

        let before = simulation.nodes().to_vec();
        assert_eq!(simulation.tick(), TickOutcome::Settled);
        assert_eq!(simulation.nodes(), before.as_slice());
    }

    #[test]
    fn tick_cap_stops_a_simulation_that_never_cools() {
        let config = SimulationConfig {
            alpha_decay: 0.0,
            max_ticks: Some(25),
            ..SimulationConfig::default()
        };
        let mut simulation = Simulation::new(&[spec("A", 10.0)], Vec::new(), config, Vec2::ZERO);

        assert_eq!(simulation.run_to_rest(), 25);
        assert_eq!(simulation.tick(), TickOutcome::TickCapReached);

        simulation.reheat(0.3);
        assert_eq!(simulation.tick(), TickOutcome::Advanced);
    }

    #[test]
    fn releasing_heat_after_the_tick_cap_lets_the_layout_cool() {
        let config = SimulationConfig {
            max_ticks: Some(300),
            ..SimulationConfig::default()
        };
        let specs = vec![spec("A", 10.0), spec("B", 10.0)];
        let links = vec![Link { source: 0, target: 1, weight: 2.0 }];
        let mut simulation = Simulation::new(&specs, links, config, Vec2::ZERO);
        simulation.run_to_rest();

        simulation.reheat(0.3);
        simulation.pin(0, vec2(40.0, 0.0));
        let mut last = TickOutcome::Advanced;
        for _ in 0..350 {
            last = simulation.tick();
        }
        assert_eq!(last, TickOutcome::TickCapReached);

        simulation.unpin(0);
        simulation.release_heat();
        assert_eq!(simulation.tick(), TickOutcome::Advanced);
        simulation.run_to_rest();
        assert!(simulation.is_settled());
    }

    #[test]
    fn reheat_eases_alpha_up_instead_of_jumping() {
        let specs = vec![spec("A", 10.0), spec("B", 10.0)];
        let mut simulation =
            Simulation::new(&specs, Vec::new(), SimulationConfig::default(), Vec2::ZERO);
        simulation.run_to_rest();
        let cold = simulation.alpha();

        simulation.reheat(0.3);
        assert!(!simulation.is_settled());
        simulation.tick();
        assert!(simulation.alpha() > cold);
        assert!(simulation.alpha() < 0.05);

        for _ in 0..400 {
            simulation.tick();
        }
        assert!((simulation.alpha() - 0.3).abs() < 0.01);

        simulation.release_heat();
        simulation.run_to_rest();
        assert!(simulation.is_settled());
    }

    #[test]
    fn restart_jumps_alpha() {
        let mut simulation =
            Simulation::new(&[spec("A", 10.0)], Vec::new(), SimulationConfig::default(), Vec2::ZERO);
        simulation.run_to_rest();
        simulation.restart(0.8);
        assert_eq!(simulation.alpha(), 0.8);
        assert_eq!(simulation.tick(), TickOutcome::Advanced);
    }

    #[test]
    fn pinned_vertex_holds_its_pin_through_ticks() {
        let specs = vec![spec("A", 10.0), spec("B", 10.0), spec("C", 10.0)];
        let links = vec![Link { source: 0, target: 1, weight: 3.0 }];
        let mut simulation =
            Simulation::new(&specs, links, SimulationConfig::default(), Vec2::ZERO);
        simulation.pin(0, vec2(-400.0, 900.0));

        for _ in 0..50 {
            simulation.tick();
        }
        assert_eq!(simulation.nodes()[0].position, vec2(-400.0, 900.0));
        assert_eq!(simulation.nodes()[0].velocity, Vec2::ZERO);
        assert_eq!(simulation.pinned().collect::<Vec<_>>(), vec![0]);

        simulation.unpin(0);
        assert_eq!(simulation.pinned().count(), 0);
    }

    #[test]
    fn quadtree_cells_cover_current_positions() {
        let specs = vec![spec("A", 10.0), spec("B", 10.0), spec("C", 10.0)];
        let mut simulation =
            Simulation::new(&specs, Vec::new(), SimulationConfig::default(), Vec2::ZERO);
        let cells = simulation.quadtree_cells();
        assert!(!cells.is_empty());
        assert_eq!(cells[0].depth, 0);
        assert_eq!(cells.iter().filter(|cell| cell.is_leaf).count(), 3);
    }
}
