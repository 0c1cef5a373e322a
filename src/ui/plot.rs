use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::state::{View, ViewerState};

// ---------------------------------------------------------------------------
// Result plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected view in the central panel.
pub fn result_plot(ui: &mut Ui, state: &ViewerState) {
    let (x_label, y_label) = state.view.axis_labels();

    Plot::new("result_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, (name, points)) in state.series().into_iter().enumerate() {
                let color = state.colors.get(idx);

                // The profile is a handful of groups; mark them.
                if state.view == View::TemperatureProfile {
                    plot_ui.points(
                        Points::new(PlotPoints::from(points.clone()))
                            .radius(4.0)
                            .color(color),
                    );
                }

                let line = Line::new(PlotPoints::from(points))
                    .name(name)
                    .color(color)
                    .width(2.0);

                plot_ui.line(line);
            }
        });
}
