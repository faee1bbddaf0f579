use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use kg_layout::{Frame, FrameEdge};

pub(super) fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(10, 14, 26));

    let step = 40.0;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 90, 40));

    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Arrowhead at `end`, pulled back so its tip touches a circle of `radius`.
pub(super) fn draw_arrowhead(painter: &Painter, start: Pos2, end: Pos2, radius: f32, stroke: Stroke) {
    let delta = end - start;
    let length = delta.length();
    if length <= radius + f32::EPSILON {
        return;
    }

    let direction = delta / length;
    let tip = end - direction * radius;
    let size = 4.0 + stroke.width;
    let normal = vec2(-direction.y, direction.x);
    let base = tip - direction * size;
    painter.line_segment([tip, base + normal * size * 0.6], stroke);
    painter.line_segment([tip, base - normal * size * 0.6], stroke);
}

/// Index into `frame.vertices` of the closest vertex whose disc contains `point`.
pub(super) fn vertex_at(frame: &Frame, point: Vec2) -> Option<usize> {
    frame
        .vertices
        .iter()
        .enumerate()
        .filter_map(|(index, vertex)| {
            let distance = (vec2(vertex.x, vertex.y) - point).length();
            (distance <= vertex.radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Index into `frame.edges` of the closest edge within `tolerance` of `point`.
pub(super) fn edge_at(frame: &Frame, point: Vec2, tolerance: f32) -> Option<usize> {
    frame
        .edges
        .iter()
        .enumerate()
        .filter_map(|(index, edge)| {
            let distance = distance_to_edge(edge, point);
            (distance <= tolerance).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

fn distance_to_edge(edge: &FrameEdge, point: Vec2) -> f32 {
    let start = vec2(edge.x1, edge.y1);
    let end = vec2(edge.x2, edge.y2);
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return (point - start).length();
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    (point - (start + segment * t)).length()
}

#[cfg(test)]
mod tests {
    use kg_layout::graph::Category;
    use kg_layout::interaction::Emphasis;
    use kg_layout::{FrameEdge, FrameVertex};

    use super::*;

    fn frame() -> Frame {
        let vertex = |id: &str, x: f32, y: f32| FrameVertex {
            id: id.to_string(),
            label: id.to_string(),
            category: Category::Target,
            x,
            y,
            radius: 16.0,
            pinned: false,
        };
        Frame {
            vertices: vec![vertex("A", 100.0, 100.0), vertex("B", 300.0, 100.0)],
            edges: vec![FrameEdge {
                id: 0,
                source: 0,
                target: 1,
                x1: 100.0,
                y1: 100.0,
                x2: 300.0,
                y2: 100.0,
                relation: "INHIBITS".to_string(),
                weight: 3.0,
                emphasis: Emphasis::Neutral,
            }],
            selection: None,
        }
    }

    #[test]
    fn vertex_hit_uses_rendering_radius() {
        let frame = frame();
        assert_eq!(vertex_at(&frame, vec2(110.0, 108.0)), Some(0));
        assert_eq!(vertex_at(&frame, vec2(300.0, 116.0)), Some(1));
        assert_eq!(vertex_at(&frame, vec2(200.0, 100.0)), None);
    }

    #[test]
    fn edge_hit_measures_distance_to_the_segment() {
        let frame = frame();
        assert_eq!(edge_at(&frame, vec2(200.0, 104.0), 5.0), Some(0));
        assert_eq!(edge_at(&frame, vec2(200.0, 110.0), 5.0), None);
        assert_eq!(edge_at(&frame, vec2(320.0, 100.0), 5.0), None);
    }
}
