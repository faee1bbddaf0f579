use eframe::egui::{Vec2, vec2};
use serde::Serialize;

use crate::physics::SimNode;

const DEFAULT_CLAMP_MARGIN: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Extra space kept between a vertex's rendered edge and the canvas border.
    pub margin: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            margin: DEFAULT_CLAMP_MARGIN,
        }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    /// Project a physical position into `[r, dimension - r]` on both axes.
    pub fn clamp(self, position: Vec2, radius: f32) -> Vec2 {
        let inset = radius + self.margin;
        vec2(
            clamp_axis(position.x, inset, self.width),
            clamp_axis(position.y, inset, self.height),
        )
    }
}

fn clamp_axis(value: f32, inset: f32, dimension: f32) -> f32 {
    let low = inset;
    let high = dimension - inset;
    if high < low || value.is_nan() {
        return dimension * 0.5;
    }
    value.clamp(low, high)
}

/// Rendered positions for every simulated vertex. Physical state is left untouched.
pub fn project(nodes: &[SimNode], viewport: Viewport) -> Vec<Vec2> {
    nodes
        .iter()
        .map(|node| viewport.clamp(node.position, node.radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(position: Vec2, radius: f32) -> SimNode {
        SimNode {
            position,
            velocity: Vec2::ZERO,
            pin: None,
            radius,
            mass: 1.0,
        }
    }

    #[test]
    fn far_outside_positions_land_on_the_inset_border() {
        let viewport = Viewport::new(680.0, 500.0);
        let nodes = vec![
            node_at(vec2(-1.0e6, 3.0e7), 22.0),
            node_at(vec2(f32::INFINITY, f32::NEG_INFINITY), 13.0),
            node_at(vec2(340.0, 250.0), 16.0),
        ];
        let rendered = project(&nodes, viewport);

        assert_eq!(rendered[0], vec2(30.0, 470.0));
        assert_eq!(rendered[1], vec2(659.0, 21.0));
        assert_eq!(rendered[2], vec2(340.0, 250.0));
        assert_eq!(nodes[0].position, vec2(-1.0e6, 3.0e7));
    }

    #[test]
    fn viewport_smaller_than_vertex_centres_it() {
        let viewport = Viewport::new(20.0, 400.0);
        assert_eq!(viewport.clamp(vec2(-50.0, -50.0), 22.0), vec2(10.0, 30.0));
    }

    #[test]
    fn nan_is_projected_to_the_middle() {
        let viewport = Viewport::new(100.0, 100.0);
        assert_eq!(viewport.clamp(vec2(f32::NAN, 70.0), 5.0), vec2(50.0, 70.0));
    }
}
