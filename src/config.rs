use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NemdError, NemdResult};

/// Optional per-run override file, looked up in the run directory.
pub const CONFIG_FILE: &str = "nemd.json";

/// Upper bound for `Nc` and `num_omega`; GPUMD runs use a few thousand.
pub const MAX_SHC_POINTS: usize = 1 << 24;
/// Upper bound for the `shc.out` run index.
pub const MAX_SHC_RUNS: usize = 1024;

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// Everything the analysis needs besides the simulation output itself.
/// Defaults reproduce the graphene NEMD setup the tool was written for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding `compute.out` and `shc.out`.
    pub run_dir: PathBuf,
    /// Directory the tables and `Gc.npy` are written into.
    pub output_dir: PathBuf,
    pub sampling: Sampling,
    pub geometry: CellGeometry,
    pub shc: ShcWindow,
    pub parity: Parity,
    /// Open the interactive viewer once all files are written.
    pub show_plot: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            run_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            sampling: Sampling::default(),
            geometry: CellGeometry::default(),
            shc: ShcWindow::default(),
            parity: Parity::default(),
            show_plot: true,
        }
    }
}

/// Sampling of the `compute` keyword.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sampling {
    /// MD time step in ps.
    pub time_step_ps: f64,
    /// Number of MD steps between two rows of `compute.out`.
    pub sample_interval: u32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            time_step_ps: 0.001,
            sample_interval: 1000,
        }
    }
}

impl Sampling {
    /// Simulated time covered by one row of `compute.out`, in ps.
    pub fn sample_period_ps(&self) -> f64 {
        self.time_step_ps * f64::from(self.sample_interval)
    }
}

/// Simulation cell, in Å.
///
/// `spectral_width` is the y-extent used for the SHC normalisation. It is
/// deliberately a separate value from `lengths[1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellGeometry {
    pub lengths: [f64; 3],
    pub spectral_width: f64,
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self {
            lengths: [41.948415859093096; 3],
            spectral_width: 4.1948415859093096,
        }
    }
}

impl CellGeometry {
    /// Cross-section normal to the transport direction, Å².
    pub fn area(&self) -> f64 {
        self.lengths[0] * self.lengths[1]
    }

    /// Full cell volume, Å³.
    pub fn volume(&self) -> f64 {
        self.area() * self.lengths[2]
    }

    /// Volume used to normalise the spectral heat current, Å³.
    pub fn spectral_volume(&self) -> f64 {
        self.lengths[0] * self.spectral_width * self.lengths[2]
    }
}

/// Parameters of the `compute_shc` keyword, needed to split `shc.out`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShcWindow {
    /// Maximum number of correlation steps (Nc).
    pub correlation_steps: usize,
    /// Number of frequency points.
    pub num_omega: usize,
    /// Which run of `shc.out` to analyse.
    pub run: usize,
}

impl Default for ShcWindow {
    fn default() -> Self {
        Self {
            correlation_steps: 250,
            num_omega: 1000,
            run: 0,
        }
    }
}

/// Numeric behaviour of the reductions.
///
/// `Legacy` reproduces the numbers of the historical post-processing script:
/// the steady-state window starts one row after the midpoint, the heat flux
/// averages the inbound estimator with itself, and the energy time axis
/// carries an extra factor of 1/1000.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    Corrected,
    Legacy,
}

impl AnalysisConfig {
    /// Read `dir/nemd.json` when present, otherwise use the defaults.
    /// Relative `run_dir` / `output_dir` in the file are resolved against `dir`.
    pub fn discover(dir: &Path) -> NemdResult<Self> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            log::info!("Reading configuration from {}", path.display());
            Self::from_file(&path)?
        } else {
            log::debug!("No {CONFIG_FILE} in {}, using defaults", dir.display());
            Self::default()
        };
        if config.run_dir.is_relative() {
            config.run_dir = dir.join(&config.run_dir);
        }
        if config.output_dir.is_relative() {
            config.output_dir = dir.join(&config.output_dir);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> NemdResult<Self> {
        let text = std::fs::read_to_string(path).map_err(NemdError::io(path))?;
        serde_json::from_str(&text)
            .map_err(|e| NemdError::InvalidConfig(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> NemdResult<()> {
        if !(self.sampling.time_step_ps > 0.0) {
            return Err(NemdError::InvalidConfig(
                "sampling.time_step_ps must be positive".into(),
            ));
        }
        if self.sampling.sample_interval == 0 {
            return Err(NemdError::InvalidConfig(
                "sampling.sample_interval must be positive".into(),
            ));
        }
        let g = &self.geometry;
        if g.lengths.iter().any(|l| !(*l > 0.0)) || !(g.spectral_width > 0.0) {
            return Err(NemdError::InvalidConfig(format!(
                "cell lengths must be positive, got {:?} / {}",
                g.lengths, g.spectral_width
            )));
        }
        let shc = &self.shc;
        let points = 1..=MAX_SHC_POINTS;
        if !points.contains(&shc.correlation_steps) || !points.contains(&shc.num_omega) {
            return Err(NemdError::InvalidConfig(format!(
                "shc.correlation_steps and shc.num_omega must be in 1..={MAX_SHC_POINTS}, \
                 got {} / {}",
                shc.correlation_steps, shc.num_omega
            )));
        }
        if shc.run >= MAX_SHC_RUNS {
            return Err(NemdError::InvalidConfig(format!(
                "shc.run must be below {MAX_SHC_RUNS}, got {}",
                shc.run
            )));
        }
        Ok(())
    }
}
