use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{View, ViewerState};

// ---------------------------------------------------------------------------
// Left side panel – scalar summary
// ---------------------------------------------------------------------------

/// Render the summary panel.
pub fn side_panel(ui: &mut Ui, state: &ViewerState) {
    ui.heading("Summary");
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Quantity");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
            header.col(|ui| {
                ui.strong("Unit");
            });
        })
        .body(|mut body| {
            for (name, value, unit) in state.summary() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(name);
                    });
                    row.col(|ui| {
                        ui.monospace(value);
                    });
                    row.col(|ui| {
                        ui.label(unit);
                    });
                });
            }
        });

    ui.add_space(8.0);
    ui.strong("Temperature profile (K)");
    for (i, t) in state.results.temperature_profile.iter().enumerate() {
        ui.monospace(format!("{:>3}  {t:.3}", i + 1));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export spectrum CSV…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.title()).clicked() {
                state.set_view(view);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Export spectral conductance")
        .add_filter("CSV", &["csv"])
        .set_file_name("SpectralConductance.csv")
        .save_file();

    if let Some(path) = file {
        match crate::output::export_spectrum_csv(&path, &state.results) {
            Ok(()) => {
                log::info!("Exported spectral conductance to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
