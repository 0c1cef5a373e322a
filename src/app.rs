use eframe::egui;

use crate::analysis::NemdResults;
use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NemdViewerApp {
    pub state: ViewerState,
}

impl NemdViewerApp {
    pub fn new(results: NemdResults) -> Self {
        Self {
            state: ViewerState::new(results),
        }
    }
}

impl eframe::App for NemdViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: summary ----
        egui::SidePanel::left("summary_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::result_plot(ui, &self.state);
        });
    }
}

/// Open the viewer window and block until it is closed.
pub fn show(results: NemdResults) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NEMD spectral conductance",
        options,
        Box::new(|_cc| Ok(Box::new(NemdViewerApp::new(results)))),
    )
}
