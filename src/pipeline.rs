use crate::analysis::NemdResults;
use crate::config::AnalysisConfig;
use crate::data::loader::{self, ShcLayout, COMPUTE_FILE, SHC_FILE};
use crate::data::model::Quantity;
use crate::error::NemdResult;
use crate::output;

/// Load one run directory, derive every quantity and write all outputs.
pub fn run(config: &AnalysisConfig) -> NemdResult<NemdResults> {
    config.validate()?;
    let compute_path = config.run_dir.join(COMPUTE_FILE);
    let compute = loader::load_compute(&compute_path, &[Quantity::Temperature])?;
    log::info!(
        "Loaded {} samples for {} groups from {COMPUTE_FILE}",
        compute.len(),
        compute.groups
    );

    let layout = ShcLayout {
        correlation_steps: config.shc.correlation_steps,
        num_omega: config.shc.num_omega,
    };
    // validate() bounds the run index
    let layouts = vec![layout; config.shc.run + 1];
    let shc = loader::load_shc(&config.run_dir.join(SHC_FILE), &layouts)?;
    let run = shc.run(config.shc.run)?;

    let (ein, eout) = compute.thermostat_energies()?;
    let results = NemdResults::compute(
        compute.temperature()?,
        ein,
        eout,
        run,
        &config.sampling,
        &config.geometry,
        config.parity,
    )?;

    log::info!("Steady-state temperature profile (K): {}", results.temperature_profile);
    log::info!(
        "dT = {:.4} K, Q_in = {:.6e} eV/ps, Q_out = {:.6e} eV/ps, Q = {:.6e} eV/ps",
        results.delta_t,
        results.flux.inbound,
        results.flux.outbound,
        results.flux.value
    );
    log::info!(
        "A = {:.4} A^2, V = {:.4} A^3, G = {:.6} MW/m^2/K",
        results.area,
        results.volume,
        results.conductance
    );

    let written = output::write_all(&config.output_dir, &results)?;
    for path in &written {
        log::info!("Wrote {}", path.display());
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Parity, MAX_SHC_RUNS};
    use crate::error::NemdError;
    use crate::output::{SPECTRAL_FILE, SPECTRAL_NPY_FILE, TEMP_PROFILE_FILE};
    use approx::assert_relative_eq;
    use ndarray::Array1;
    use ndarray_npy::read_npy;
    use std::path::Path;
    use tempfile::tempdir;

    fn stage_run(dir: &Path) {
        // 4 samples × 3 temperature columns, then Ein, Eout
        std::fs::write(
            dir.join(COMPUTE_FILE),
            "0 300 280 0.0 0.0\n\
             1 302 282 -1.0 1.0\n\
             2 304 284 -2.0 2.0\n\
             3 306 286 -3.0 3.0\n",
        )
        .unwrap();
        // Nc = 2: 3 correlation rows, num_omega = 2
        let two_pi = 2.0 * std::f64::consts::PI;
        std::fs::write(
            dir.join(SHC_FILE),
            format!("-1 1 1\n0 2 2\n1 1 1\n0 0.5 0.5\n{two_pi} 1.5 0.5\n"),
        )
        .unwrap();
    }

    fn config_for(dir: &Path) -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.run_dir = dir.to_path_buf();
        config.output_dir = dir.join("out");
        config.shc.correlation_steps = 2;
        config.shc.num_omega = 2;
        config.show_plot = false;
        config
    }

    #[test]
    fn end_to_end_writes_expected_profile() {
        let dir = tempdir().unwrap();
        stage_run(dir.path());
        let config = config_for(dir.path());
        let results = run(&config).unwrap();

        // rows 2 and 3, columns 1 and 2
        let text = std::fs::read_to_string(config.output_dir.join(TEMP_PROFILE_FILE)).unwrap();
        assert_eq!(text, "1 305.0\n2 285.0\n");
        assert_relative_eq!(results.delta_t, 20.0);

        // Q_in = Q_out = (3 - 2) / 2 ps
        assert_relative_eq!(results.flux.value, 0.5);
        let area = config.geometry.area();
        assert_relative_eq!(results.conductance, 1.6e5 * 0.5 / 20.0 / area);

        assert_eq!(results.correlation.len(), 3);
        assert_eq!(results.spectral_conductance.len(), 2);
        assert_relative_eq!(results.frequency[1], 1.0);

        let spectral = std::fs::read_to_string(config.output_dir.join(SPECTRAL_FILE)).unwrap();
        assert_eq!(spectral.lines().count(), 3);

        let saved: Array1<f64> = read_npy(config.output_dir.join(SPECTRAL_NPY_FILE)).unwrap();
        assert_eq!(saved, results.spectral_conductance);
    }

    #[test]
    fn legacy_parity_reproduces_historical_numbers() {
        let dir = tempdir().unwrap();
        stage_run(dir.path());
        let mut config = config_for(dir.path());
        config.parity = Parity::Legacy;
        let results = run(&config).unwrap();

        // only row 3 survives the legacy window
        assert_eq!(results.temperature_profile.to_vec(), vec![306.0, 286.0]);
        assert_relative_eq!(results.flux.value, results.flux.inbound);
        assert_relative_eq!(results.energy_time[0], 0.001);
    }

    #[test]
    fn missing_inputs_propagate() {
        let dir = tempdir().unwrap();
        let config = config_for(dir.path());
        assert!(run(&config).is_err());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn selects_configured_shc_run() {
        let dir = tempdir().unwrap();
        stage_run(dir.path());
        let mut config = config_for(dir.path());
        config.shc.run = 1;
        // file holds a single run
        assert!(run(&config).is_err());
    }

    #[test]
    fn out_of_range_shc_settings_are_rejected() {
        let dir = tempdir().unwrap();
        stage_run(dir.path());

        let mut config = config_for(dir.path());
        config.shc.run = usize::MAX;
        assert!(matches!(run(&config), Err(NemdError::InvalidConfig(_))));

        config.shc.run = MAX_SHC_RUNS - 1;
        config.shc.correlation_steps = usize::MAX / 2 + 1;
        assert!(matches!(run(&config), Err(NemdError::InvalidConfig(_))));
        assert!(!config.output_dir.exists());
    }
}
