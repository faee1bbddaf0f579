use eframe::egui::{self, Align, Context, Layout, Ui};

use kg_layout::{Filter, GraphExplorer};

mod canvas;
mod details;
mod render_utils;

/// Alpha the "Relayout" button restarts from; gentler than a cold start.
const RELAYOUT_ALPHA: f32 = 0.8;

pub struct ExplorerApp {
    explorer: GraphExplorer,
    live_physics: bool,
    show_quadtree_overlay: bool,
    /// Id of the vertex under an active pointer drag.
    dragging: Option<String>,
}

impl ExplorerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, explorer: GraphExplorer) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self {
            explorer,
            live_physics: true,
            show_quadtree_overlay: false,
            dragging: None,
        }
    }

    fn set_filter(&mut self, filter: Filter) {
        if let Some(id) = self.dragging.take() {
            self.explorer.on_drag_end(&id);
        }
        self.explorer.set_filter(filter);
    }

    fn draw_top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("kg-layout");
            ui.separator();

            let mut filter = self.explorer.filter();
            for choice in Filter::choices() {
                let count = match choice {
                    Filter::All => self.explorer.store().vertex_count(),
                    Filter::Only(category) => self.explorer.store().count_by_category(category),
                };
                ui.selectable_value(&mut filter, choice, format!("{} ({count})", choice.label()));
            }
            if filter != self.explorer.filter() {
                self.set_filter(filter);
            }

            ui.separator();
            if ui.button("Relayout").clicked() {
                self.explorer.restart(RELAYOUT_ALPHA);
            }
            ui.checkbox(&mut self.live_physics, "Live physics");
            ui.checkbox(&mut self.show_quadtree_overlay, "Quadtree");

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let simulation = self.explorer.simulation();
                ui.label(format!("alpha {:.3}", simulation.alpha()));
                ui.label(format!(
                    "{} vertices  {} edges",
                    self.explorer.subgraph().vertex_count(),
                    self.explorer.subgraph().edge_count()
                ));
                let issues = self.explorer.issues().len();
                if issues > 0 {
                    ui.colored_label(
                        egui::Color32::from_rgb(244, 63, 94),
                        format!("{issues} malformed edges skipped"),
                    );
                }
            });
        });
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }
}
