use crate::analysis::NemdResults;
use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Plot views
// ---------------------------------------------------------------------------

/// The curves the viewer can show in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SpectralConductance,
    CorrelationTime,
    TemperatureProfile,
    EnergyAccumulation,
}

impl View {
    pub const ALL: [View; 4] = [
        View::SpectralConductance,
        View::CorrelationTime,
        View::TemperatureProfile,
        View::EnergyAccumulation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::SpectralConductance => "Spectral conductance",
            View::CorrelationTime => "Correlation time",
            View::TemperatureProfile => "Temperature profile",
            View::EnergyAccumulation => "Thermostat energy",
        }
    }

    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            View::SpectralConductance => ("Frequency (THz)", "G(ω) (GW/m²/K/THz)"),
            View::CorrelationTime => ("Correlation time (ps)", "K(t) (eV/ps)"),
            View::TemperatureProfile => ("Group", "Temperature (K)"),
            View::EnergyAccumulation => ("Time (ps)", "Energy (eV)"),
        }
    }

    /// Number of curves drawn in this view.
    pub fn series_count(self) -> usize {
        match self {
            View::EnergyAccumulation => 2,
            _ => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    pub results: NemdResults,

    /// Currently displayed curve(s).
    pub view: View,

    /// Colours for the current view.
    pub colors: SeriesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(results: NemdResults) -> Self {
        let view = View::SpectralConductance;
        Self {
            results,
            view,
            colors: SeriesColors::new(view.series_count()),
            status_message: None,
        }
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.colors = SeriesColors::new(view.series_count());
        }
    }

    /// `(name, [x, y] points)` for every curve of the current view.
    pub fn series(&self) -> Vec<(&'static str, Vec<[f64; 2]>)> {
        let r = &self.results;
        let pairs = |x: &ndarray::Array1<f64>, y: &ndarray::Array1<f64>| -> Vec<[f64; 2]> {
            x.iter().zip(y.iter()).map(|(&xi, &yi)| [xi, yi]).collect()
        };
        match self.view {
            View::SpectralConductance => {
                vec![("G(ω)", pairs(&r.frequency, &r.spectral_conductance))]
            }
            View::CorrelationTime => vec![("K(t)", pairs(&r.correlation_t, &r.correlation))],
            View::TemperatureProfile => {
                let points = r
                    .temperature_profile
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| [(i + 1) as f64, t])
                    .collect();
                vec![("T", points)]
            }
            View::EnergyAccumulation => vec![
                ("Ein", pairs(&r.energy_time, &r.ein)),
                ("Eout", pairs(&r.energy_time, &r.eout)),
            ],
        }
    }

    /// Scalar summary rows `(quantity, value, unit)`.
    pub fn summary(&self) -> Vec<(&'static str, String, &'static str)> {
        let r = &self.results;
        vec![
            ("ΔT", format!("{:.4}", r.delta_t), "K"),
            ("Q_in", format!("{:.6e}", r.flux.inbound), "eV/ps"),
            ("Q_out", format!("{:.6e}", r.flux.outbound), "eV/ps"),
            ("Q", format!("{:.6e}", r.flux.value), "eV/ps"),
            ("G", format!("{:.6}", r.conductance), "MW/m²/K"),
            ("A", format!("{:.4}", r.area), "Å²"),
            ("V", format!("{:.4}", r.volume), "Å³"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::HeatFlux;
    use ndarray::array;

    fn results() -> NemdResults {
        NemdResults {
            temperature_profile: array![310.0, 300.0, 290.0],
            energy_time: array![1.0, 2.0],
            ein: array![0.0, -1.0],
            eout: array![0.0, 1.0],
            delta_t: 20.0,
            flux: HeatFlux {
                inbound: 1.0,
                outbound: 1.0,
                value: 1.0,
            },
            conductance: 2.0,
            area: 4.0,
            volume: 8.0,
            correlation_t: array![-1.0, 0.0, 1.0],
            correlation: array![0.5, 1.0, 0.5],
            frequency: array![0.0, 1.0],
            spectral_conductance: array![0.1, 0.2],
        }
    }

    #[test]
    fn views_expose_aligned_series() {
        let mut state = ViewerState::new(results());
        assert_eq!(state.view, View::SpectralConductance);
        assert_eq!(state.series()[0].1, vec![[0.0, 0.1], [1.0, 0.2]]);

        state.set_view(View::TemperatureProfile);
        assert_eq!(state.series()[0].1[2], [3.0, 290.0]);

        state.set_view(View::EnergyAccumulation);
        let series = state.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].0, "Eout");
        assert_ne!(state.colors.get(0), state.colors.get(1));
    }

    #[test]
    fn summary_lists_scalars() {
        let state = ViewerState::new(results());
        let summary = state.summary();
        assert_eq!(summary.len(), 7);
        assert_eq!(summary[0].1, "20.0000");
    }
}
