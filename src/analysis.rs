//! Steady-state reductions and unit conversions.

use ndarray::{s, Array1, Array2, Axis};

use crate::config::{CellGeometry, Parity, Sampling};
use crate::data::model::ShcRun;
use crate::error::{NemdError, NemdResult};

/// eV/ps/Å²/K → MW/m²/K.
pub const CONDUCTANCE_FACTOR: f64 = 1.6e5;
/// eV/ps/Å³/K·Å → GW/m²/K/THz for the spectral conductance.
pub const SPECTRAL_FACTOR: f64 = 1.6e4;

// ---------------------------------------------------------------------------
// Parity switches
// ---------------------------------------------------------------------------

/// Rows of the temperature series treated as steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteadyWindow {
    /// `n/2 .. n`
    SecondHalf,
    /// `n/2 + 1 .. n`
    AfterMidpoint,
}

/// How the two heat-flux estimators are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxEstimator {
    /// Mean of the inbound and outbound estimators.
    Symmetric,
    /// Inbound estimator averaged with itself.
    InboundOnly,
}

impl Parity {
    pub fn steady_window(self) -> SteadyWindow {
        match self {
            Parity::Corrected => SteadyWindow::SecondHalf,
            Parity::Legacy => SteadyWindow::AfterMidpoint,
        }
    }

    pub fn flux_estimator(self) -> FluxEstimator {
        match self {
            Parity::Corrected => FluxEstimator::Symmetric,
            Parity::Legacy => FluxEstimator::InboundOnly,
        }
    }
}

// ---------------------------------------------------------------------------
// Temperature profile
// ---------------------------------------------------------------------------

/// Time-average of every group but column 0 over the steady-state window.
pub fn steady_state_temperature(
    temperature: &Array2<f64>,
    window: SteadyWindow,
) -> NemdResult<Array1<f64>> {
    let (n, groups) = temperature.dim();
    if n < 2 {
        return Err(NemdError::EmptyWindow(format!(
            "need at least 2 temperature samples, got {n}"
        )));
    }
    if groups < 2 {
        return Err(NemdError::EmptyWindow(format!(
            "need at least 2 temperature groups, got {groups}"
        )));
    }
    let start = match window {
        SteadyWindow::SecondHalf => n / 2,
        SteadyWindow::AfterMidpoint => n / 2 + 1,
    };
    if start >= n {
        return Err(NemdError::EmptyWindow(format!(
            "steady-state window starts at row {start} of {n}"
        )));
    }
    temperature
        .slice(s![start.., 1..])
        .mean_axis(Axis(0))
        .ok_or_else(|| NemdError::EmptyWindow("temperature window".into()))
}

/// `profile[0] − profile[last]`, hot minus cold for a regular profile.
pub fn temperature_difference(profile: &Array1<f64>) -> NemdResult<f64> {
    let n = profile.len();
    if n == 0 {
        return Err(NemdError::EmptyWindow("empty temperature profile".into()));
    }
    Ok(profile[0] - profile[n - 1])
}

// ---------------------------------------------------------------------------
// Heat flux
// ---------------------------------------------------------------------------

/// Heat flux through the thermostats, eV/ps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatFlux {
    /// From the heat-source thermostat energy.
    pub inbound: f64,
    /// From the heat-sink thermostat energy.
    pub outbound: f64,
    /// Combined estimate.
    pub value: f64,
}

pub fn heat_flux(
    ein: &Array1<f64>,
    eout: &Array1<f64>,
    sampling: &Sampling,
    estimator: FluxEstimator,
) -> NemdResult<HeatFlux> {
    let n = ein.len();
    if n != eout.len() {
        return Err(NemdError::LengthMismatch(format!(
            "Ein has {n} samples, Eout has {}",
            eout.len()
        )));
    }
    if n < 2 {
        return Err(NemdError::EmptyWindow(format!(
            "need at least 2 energy samples, got {n}"
        )));
    }
    let mid = n / 2;
    let elapsed = n as f64 / 2.0 * sampling.sample_period_ps();
    let inbound = (ein[mid] - ein[n - 1]) / elapsed;
    let outbound = (eout[n - 1] - eout[mid]) / elapsed;
    let value = match estimator {
        FluxEstimator::Symmetric => (inbound + outbound) / 2.0,
        FluxEstimator::InboundOnly => (inbound + inbound) / 2.0,
    };
    Ok(HeatFlux {
        inbound,
        outbound,
        value,
    })
}

/// Thermal conductance in MW/m²/K. `area` in Å², `delta_t` in K.
pub fn thermal_conductance(flux: f64, delta_t: f64, area: f64) -> f64 {
    CONDUCTANCE_FACTOR * flux / delta_t / area
}

// ---------------------------------------------------------------------------
// Spectral heat current
// ---------------------------------------------------------------------------

/// `(Ki + Ko) / width`, aligned with `run.t`.
pub fn correlation_time(run: &ShcRun, width: f64) -> NemdResult<Array1<f64>> {
    check_aligned("t", run.t.len(), &[("Ki", run.ki.len()), ("Ko", run.ko.len())])?;
    Ok((&run.ki + &run.ko) / width)
}

/// Spectral conductance in GW/m²/K/THz, aligned with `run.nu`.
pub fn spectral_conductance(run: &ShcRun, volume: f64, delta_t: f64) -> NemdResult<Array1<f64>> {
    check_aligned(
        "nu",
        run.nu.len(),
        &[("jwi", run.jwi.len()), ("jwo", run.jwo.len())],
    )?;
    Ok((&run.jwi + &run.jwo).mapv(|j| SPECTRAL_FACTOR * j / volume / delta_t))
}

fn check_aligned(axis: &str, len: usize, others: &[(&str, usize)]) -> NemdResult<()> {
    for (name, other) in others {
        if *other != len {
            return Err(NemdError::LengthMismatch(format!(
                "{name} has {other} points, {axis} has {len}"
            )));
        }
    }
    Ok(())
}

/// Sample times of `compute.out` rows in ps.
pub fn energy_time_axis(samples: usize, sampling: &Sampling, parity: Parity) -> Array1<f64> {
    let scale = match parity {
        Parity::Corrected => 1.0,
        Parity::Legacy => 1.0 / 1000.0,
    };
    let period = sampling.sample_period_ps() * scale;
    Array1::from_iter((1..=samples).map(|i| period * i as f64))
}

// ---------------------------------------------------------------------------
// Full result set
// ---------------------------------------------------------------------------

/// Everything derived from one NEMD run.
#[derive(Debug, Clone)]
pub struct NemdResults {
    pub temperature_profile: Array1<f64>,
    pub energy_time: Array1<f64>,
    pub ein: Array1<f64>,
    pub eout: Array1<f64>,
    pub delta_t: f64,
    pub flux: HeatFlux,
    /// MW/m²/K
    pub conductance: f64,
    pub area: f64,
    pub volume: f64,
    pub correlation_t: Array1<f64>,
    pub correlation: Array1<f64>,
    pub frequency: Array1<f64>,
    /// GW/m²/K/THz
    pub spectral_conductance: Array1<f64>,
}

impl NemdResults {
    pub fn compute(
        temperature: &Array2<f64>,
        ein: &Array1<f64>,
        eout: &Array1<f64>,
        shc: &ShcRun,
        sampling: &Sampling,
        geometry: &CellGeometry,
        parity: Parity,
    ) -> NemdResult<Self> {
        let temperature_profile = steady_state_temperature(temperature, parity.steady_window())?;
        let delta_t = temperature_difference(&temperature_profile)?;
        if delta_t == 0.0 {
            log::warn!("Temperature difference is zero, conductances will be infinite");
        }
        let flux = heat_flux(ein, eout, sampling, parity.flux_estimator())?;
        let area = geometry.area();
        let conductance = thermal_conductance(flux.value, delta_t, area);

        let correlation = correlation_time(shc, geometry.spectral_width)?;
        let spectral_conductance =
            spectral_conductance(shc, geometry.spectral_volume(), delta_t)?;

        Ok(Self {
            energy_time: energy_time_axis(ein.len(), sampling, parity),
            temperature_profile,
            ein: ein.clone(),
            eout: eout.clone(),
            delta_t,
            flux,
            conductance,
            area,
            volume: geometry.volume(),
            correlation_t: shc.t.clone(),
            correlation,
            frequency: shc.nu.clone(),
            spectral_conductance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array};

    fn shc_run(corr: usize, omega: usize) -> ShcRun {
        ShcRun {
            t: Array::linspace(-1.0, 1.0, corr),
            ki: Array1::from_elem(corr, 2.0),
            ko: Array1::from_elem(corr, 4.0),
            nu: Array::linspace(0.0, 50.0, omega),
            jwi: Array1::from_elem(omega, 1.0),
            jwo: Array1::from_elem(omega, 3.0),
        }
    }

    #[test]
    fn profile_averages_second_half_without_first_column() {
        let t = array![
            [0.0, 100.0, 200.0],
            [1.0, 110.0, 210.0],
            [2.0, 120.0, 220.0],
            [3.0, 130.0, 230.0],
        ];
        let profile = steady_state_temperature(&t, SteadyWindow::SecondHalf).unwrap();
        assert_eq!(profile.to_vec(), vec![125.0, 225.0]);

        let legacy = steady_state_temperature(&t, SteadyWindow::AfterMidpoint).unwrap();
        assert_eq!(legacy.to_vec(), vec![130.0, 230.0]);
    }

    #[test]
    fn profile_odd_length_uses_floor_midpoint() {
        let t = Array2::from_shape_fn((5, 4), |(i, j)| (i * 10 + j) as f64);
        let profile = steady_state_temperature(&t, SteadyWindow::SecondHalf).unwrap();
        // rows 2, 3, 4
        for (j, v) in profile.iter().enumerate() {
            assert_relative_eq!(*v, (30 + j + 1) as f64);
        }
    }

    #[test]
    fn profile_fails_fast_on_short_series() {
        let one_row = array![[0.0, 300.0, 290.0]];
        assert!(matches!(
            steady_state_temperature(&one_row, SteadyWindow::SecondHalf),
            Err(NemdError::EmptyWindow(_))
        ));
        let two_rows = array![[0.0, 300.0], [0.0, 301.0]];
        assert!(steady_state_temperature(&two_rows, SteadyWindow::SecondHalf).is_ok());
        assert!(matches!(
            steady_state_temperature(&two_rows, SteadyWindow::AfterMidpoint),
            Err(NemdError::EmptyWindow(_))
        ));
        let one_group = array![[0.0], [1.0], [2.0]];
        assert!(steady_state_temperature(&one_group, SteadyWindow::SecondHalf).is_err());
    }

    #[test]
    fn flux_estimators() {
        let sampling = Sampling::default();
        let ein = array![0.0, -1.0, -2.0, -3.0];
        let eout = array![0.0, 3.0, 6.0, 9.0];
        // elapsed = 2 samples · 1 ps
        let flux = heat_flux(&ein, &eout, &sampling, FluxEstimator::Symmetric).unwrap();
        assert_relative_eq!(flux.inbound, 0.5);
        assert_relative_eq!(flux.outbound, 1.5);
        assert_relative_eq!(flux.value, 1.0);

        let legacy = heat_flux(&ein, &eout, &sampling, FluxEstimator::InboundOnly).unwrap();
        assert_relative_eq!(legacy.value, 0.5);
    }

    #[test]
    fn flux_is_scale_invariant() {
        let sampling = Sampling::default();
        let ein = Array::linspace(0.0, -40.0, 10);
        let eout = Array::linspace(0.0, 40.0, 10);
        let base = heat_flux(&ein, &eout, &sampling, FluxEstimator::Symmetric).unwrap();

        let doubled = Sampling {
            time_step_ps: sampling.time_step_ps * 2.0,
            ..sampling
        };
        let scaled = heat_flux(
            &(&ein * 2.0),
            &(&eout * 2.0),
            &doubled,
            FluxEstimator::Symmetric,
        )
        .unwrap();
        assert_relative_eq!(base.value, scaled.value, max_relative = 1e-12);
    }

    #[test]
    fn flux_rejects_bad_input() {
        let sampling = Sampling::default();
        assert!(matches!(
            heat_flux(&array![0.0, 1.0], &array![0.0], &sampling, FluxEstimator::Symmetric),
            Err(NemdError::LengthMismatch(_))
        ));
        assert!(matches!(
            heat_flux(&array![0.0], &array![0.0], &sampling, FluxEstimator::Symmetric),
            Err(NemdError::EmptyWindow(_))
        ));
    }

    #[test]
    fn conductance_scales_inversely_with_area() {
        let g = thermal_conductance(0.8, 20.0, 100.0);
        assert_relative_eq!(g, 1.6e5 * 0.8 / 20.0 / 100.0);
        for k in [0.5, 2.0, 7.0] {
            assert_relative_eq!(thermal_conductance(0.8, 20.0, 100.0 * k), g / k);
        }
        // inverted profile gives negative conductance, no validation
        assert!(thermal_conductance(0.8, -20.0, 100.0) < 0.0);
    }

    #[test]
    fn spectral_arrays_follow_their_axes() {
        let run = shc_run(7, 11);
        let corr = correlation_time(&run, 2.0).unwrap();
        assert_eq!(corr.len(), run.t.len());
        assert_relative_eq!(corr[3], 3.0);

        let gc = spectral_conductance(&run, 10.0, 4.0).unwrap();
        assert_eq!(gc.len(), run.nu.len());
        assert_relative_eq!(gc[0], 1.6e4 * 4.0 / 10.0 / 4.0);

        let mut broken = run.clone();
        broken.jwo = Array1::zeros(3);
        assert!(matches!(
            spectral_conductance(&broken, 10.0, 4.0),
            Err(NemdError::LengthMismatch(_))
        ));
    }

    #[test]
    fn energy_time_axis_in_ps() {
        let sampling = Sampling::default();
        let t = energy_time_axis(3, &sampling, Parity::Corrected);
        assert_eq!(t.len(), 3);
        assert_relative_eq!(t[0], 1.0);
        assert_relative_eq!(t[2], 3.0);
        let legacy = energy_time_axis(3, &sampling, Parity::Legacy);
        assert_relative_eq!(legacy[2], 0.003);
    }

    #[test]
    fn results_use_spectral_width_not_cell_y() {
        let geometry = CellGeometry {
            lengths: [10.0, 20.0, 30.0],
            spectral_width: 2.0,
        };
        let t = array![[0.0, 310.0, 290.0], [0.0, 310.0, 290.0]];
        let ein = array![0.0, -2.0];
        let eout = array![0.0, 2.0];
        let run = shc_run(3, 4);
        let results = NemdResults::compute(
            &t,
            &ein,
            &eout,
            &run,
            &Sampling::default(),
            &geometry,
            Parity::Corrected,
        )
        .unwrap();
        assert_relative_eq!(results.delta_t, 20.0);
        assert_relative_eq!(results.area, 200.0);
        assert_relative_eq!(results.volume, 6000.0);
        // elapsed = 1 ps; Q_in = Ein[1] - Ein[1] = 0, Q_out = 0
        assert_relative_eq!(results.flux.value, 0.0);
        assert_relative_eq!(results.correlation[0], 6.0 / 2.0);
        assert_relative_eq!(
            results.spectral_conductance[0],
            1.6e4 * 4.0 / (10.0 * 2.0 * 30.0) / 20.0
        );
        assert_eq!(results.energy_time.len(), 2);
    }
}
