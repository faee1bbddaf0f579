use eframe::egui::{self, RichText, Ui};

use kg_layout::explorer::EdgeDirection;

use super::ExplorerApp;
use super::render_utils::rgb;

impl ExplorerApp {
    pub(super) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(details) = self.explorer.selection() else {
            ui.label("Click a vertex to inspect it.");
            return;
        };

        let vertex = &details.vertex;
        let category = vertex.category();
        let style = category.style();
        ui.label(
            RichText::new(format!("{} {}", style.icon, vertex.label))
                .strong()
                .color(rgb(style.color)),
        );
        if let Some(full_name) = &vertex.full_name {
            ui.label(full_name.as_str());
        }
        ui.small(format!("{} · {}", category.tag(), vertex.id));

        ui.separator();
        egui::Grid::new("vertex_attributes")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (name, value) in vertex.attributes.fields() {
                    ui.label(RichText::new(name).weak());
                    ui.label(value.to_string());
                    ui.end_row();
                }
            });

        ui.separator();
        ui.label(RichText::new(format!("Connections ({})", details.incident.len())).strong());
        if details.incident.is_empty() {
            ui.label("No edges touch this vertex.");
            return;
        }

        let mut jump_to = None;
        egui::ScrollArea::vertical()
            .id_salt("incident_edges_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for edge in &details.incident {
                    let arrow = match edge.direction {
                        EdgeDirection::Outgoing => "→",
                        EdgeDirection::Incoming => "←",
                    };
                    let mut text = RichText::new(format!(
                        "{arrow} {}  {}  (w {})",
                        edge.relation, edge.other_label, edge.weight
                    ));
                    if !edge.visible {
                        text = text.weak();
                    }

                    let response = ui.add_enabled(edge.visible, egui::Button::new(text).frame(false));
                    if response.clicked() {
                        jump_to = Some(edge.other_id.clone());
                    }
                }
            });

        if let Some(id) = jump_to {
            self.explorer.on_select(Some(&id));
        }
    }
}
