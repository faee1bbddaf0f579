use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2, vec2,
};

use kg_layout::graph::relation_color;
use kg_layout::interaction::{Emphasis, HoverTarget};
use kg_layout::{Frame, PointerTarget, TickOutcome, Viewport};

use super::ExplorerApp;
use super::render_utils::{
    blend_color, draw_arrowhead, draw_background, edge_at, rgb, vertex_at, with_opacity,
};

const EDGE_HIT_TOLERANCE: f32 = 5.0;

impl ExplorerApp {
    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        self.explorer
            .set_viewport(Viewport::new(rect.width(), rect.height()));

        let before = self.explorer.frame();
        self.handle_pointer(ui, rect, &response, &before);

        if self.live_physics || self.dragging.is_some() {
            if self.explorer.tick() == TickOutcome::Advanced {
                ui.ctx().request_repaint();
            }
        } else if response.dragged() {
            ui.ctx().request_repaint();
        }

        let origin = rect.min.to_vec2();
        let to_screen = |x: f32, y: f32| Pos2::new(x, y) + origin;

        if self.show_quadtree_overlay {
            for cell in self.explorer.quadtree_cells() {
                let half = vec2(cell.half_extent, cell.half_extent);
                let cell_rect = Rect::from_min_max(
                    (cell.center - half + origin).to_pos2(),
                    (cell.center + half + origin).to_pos2(),
                );
                let alpha = if cell.is_leaf { 110 } else { 55 };
                let width = (1.4 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
                painter.rect_stroke(
                    cell_rect,
                    0.0,
                    Stroke::new(width, Color32::from_rgba_unmultiplied(106, 198, 255, alpha)),
                    egui::StrokeKind::Middle,
                );
            }
        }

        let frame = self.explorer.frame();
        for edge in &frame.edges {
            let stroke = edge.emphasis.stroke(edge.weight);
            let color = with_opacity(rgb(relation_color(&edge.relation)), stroke.opacity);
            let start = to_screen(edge.x1, edge.y1);
            let end = to_screen(edge.x2, edge.y2);
            let line = Stroke::new(stroke.width, color);
            painter.line_segment([start, end], line);

            let target_radius = frame.vertices[edge.target].radius;
            draw_arrowhead(&painter, start, end, target_radius, line);
        }

        let selected_id = self.explorer.selected_id();
        let hovered_vertex = match self.explorer.controller().hover() {
            HoverTarget::Vertex(local) => Some(local),
            _ => None,
        };
        for (index, vertex) in frame.vertices.iter().enumerate() {
            let style = vertex.category.style();
            let color = rgb(style.color);
            let center = to_screen(vertex.x, vertex.y);
            let is_selected = selected_id == Some(vertex.id.as_str());
            let is_hovered = hovered_vertex == Some(index);

            if is_selected {
                painter.circle_stroke(
                    center,
                    vertex.radius + 5.0,
                    Stroke::new(2.0, blend_color(color, Color32::WHITE, 0.4)),
                );
            }

            let fill_opacity = if is_hovered || is_selected { 0.35 } else { 0.18 };
            painter.circle_filled(center, vertex.radius, with_opacity(color, fill_opacity));
            painter.circle_stroke(
                center,
                vertex.radius,
                Stroke::new(if vertex.pinned { 2.5 } else { 1.5 }, color),
            );
            painter.text(
                center,
                Align2::CENTER_CENTER,
                style.icon,
                FontId::proportional(vertex.radius * 0.8),
                color,
            );
            painter.text(
                center + vec2(0.0, vertex.radius + 4.0),
                Align2::CENTER_TOP,
                &vertex.label,
                FontId::proportional(11.0),
                Color32::from_gray(if is_hovered { 250 } else { 200 }),
            );
        }

        self.draw_edge_callout(&painter, rect, &frame);
    }

    fn handle_pointer(&mut self, ui: &Ui, rect: Rect, response: &Response, frame: &Frame) {
        let to_canvas = |pos: Pos2| -> Vec2 { pos - rect.min };
        let pointer = response.hover_pos().map(to_canvas);
        let hit_vertex = pointer.and_then(|point| vertex_at(frame, point));
        let hit_edge = match hit_vertex {
            Some(_) => None,
            None => pointer.and_then(|point| edge_at(frame, point, EDGE_HIT_TOLERANCE)),
        };

        if response.drag_started_by(egui::PointerButton::Primary) {
            let pressed = ui
                .input(|input| input.pointer.press_origin())
                .map(to_canvas)
                .and_then(|point| vertex_at(frame, point));
            if let Some(index) = pressed {
                let id = frame.vertices[index].id.clone();
                self.explorer.on_drag_start(&id);
                self.dragging = Some(id);
            }
        }

        if let Some(id) = self.dragging.clone() {
            if let Some(pos) = ui.input(|input| input.pointer.interact_pos()) {
                let point = to_canvas(pos);
                self.explorer.on_drag_move(&id, point.x, point.y);
            }
            if response.drag_stopped() {
                self.explorer.on_drag_end(&id);
                self.dragging = None;
            }
        }

        if self.dragging.is_none() {
            let target = match (hit_vertex, hit_edge) {
                (Some(index), _) => PointerTarget::Vertex(&frame.vertices[index].id),
                (None, Some(index)) => PointerTarget::Edge(frame.edges[index].id),
                (None, None) => PointerTarget::None,
            };
            self.explorer.on_hover(target);
        }

        if hit_vertex.is_some() || self.dragging.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let clicked = hit_vertex.map(|index| frame.vertices[index].id.as_str());
            if clicked.is_some() && clicked == self.explorer.selected_id() {
                self.explorer.on_select(None);
            } else {
                self.explorer.on_select(clicked);
            }
        }
    }

    fn draw_edge_callout(&self, painter: &egui::Painter, rect: Rect, frame: &Frame) {
        let Some((edge_id, edge)) = self.explorer.hovered_edge() else {
            return;
        };
        let Some(drawn) = frame
            .edges
            .iter()
            .find(|drawn| drawn.id == edge_id && drawn.emphasis == Emphasis::Callout)
        else {
            return;
        };

        let text = format!(
            "{} → {}\n{}  ·  weight {}",
            edge.source,
            edge.target,
            edge.label.as_deref().unwrap_or(&edge.relation),
            edge.weight
        );
        let anchor = rect.min + vec2((drawn.x1 + drawn.x2) * 0.5, (drawn.y1 + drawn.y2) * 0.5);
        let galley = painter.layout_no_wrap(
            text,
            FontId::proportional(12.0),
            Color32::from_gray(235),
        );
        let padding = vec2(8.0, 6.0);
        let mut callout = Rect::from_min_size(anchor + vec2(10.0, -10.0), galley.size() + padding * 2.0);
        if callout.right() > rect.right() {
            callout = callout.translate(vec2(-(callout.width() + 20.0), 0.0));
        }

        painter.rect_filled(callout, 6.0, Color32::from_rgba_unmultiplied(15, 22, 40, 235));
        painter.rect_stroke(
            callout,
            6.0,
            Stroke::new(1.0, rgb(relation_color(&edge.relation))),
            egui::StrokeKind::Inside,
        );
        painter.galley(callout.min + padding, galley, Color32::from_gray(235));
    }
}
