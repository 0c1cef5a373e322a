use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array1, Array2};

use crate::error::{NemdError, NemdResult};

// ---------------------------------------------------------------------------
// Quantity – one column block of compute.out
// ---------------------------------------------------------------------------

/// Quantities the GPUMD `compute` keyword can record per group.
/// Declaration order is the column order in `compute.out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantity {
    /// Temperature (K).
    Temperature,
    /// Potential energy (eV).
    Potential,
    /// Force (eV/Å), 3 components.
    Force,
    /// Virial (eV).
    Virial,
    /// Potential part of the heat current, 3 components.
    HeatCurrentPotential,
    /// Kinetic part of the heat current, 3 components.
    HeatCurrentKinetic,
}

impl Quantity {
    pub const ALL: [Quantity; 6] = [
        Quantity::Temperature,
        Quantity::Potential,
        Quantity::Force,
        Quantity::Virial,
        Quantity::HeatCurrentPotential,
        Quantity::HeatCurrentKinetic,
    ];

    /// Number of columns per group.
    pub fn components(self) -> usize {
        match self {
            Quantity::Temperature | Quantity::Potential | Quantity::Virial => 1,
            Quantity::Force | Quantity::HeatCurrentPotential | Quantity::HeatCurrentKinetic => 3,
        }
    }

    /// Keyword used by GPUMD and in log output.
    pub fn key(self) -> &'static str {
        match self {
            Quantity::Temperature => "T",
            Quantity::Potential => "U",
            Quantity::Force => "F",
            Quantity::Virial => "W",
            Quantity::HeatCurrentPotential => "jp",
            Quantity::HeatCurrentKinetic => "jk",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// ComputeOutput – grouped time series
// ---------------------------------------------------------------------------

/// Parsed `compute.out`.
#[derive(Debug, Clone)]
pub struct ComputeOutput {
    /// quantity → `[time step, column]`.
    pub series: BTreeMap<Quantity, Array2<f64>>,
    /// Energy exchanged with the heat-source thermostat (eV), if T was recorded.
    pub ein: Option<Array1<f64>>,
    /// Energy exchanged with the heat-sink thermostat (eV), if T was recorded.
    pub eout: Option<Array1<f64>>,
    /// Number of groups.
    pub groups: usize,
}

impl ComputeOutput {
    pub fn get(&self, quantity: Quantity) -> NemdResult<&Array2<f64>> {
        self.series
            .get(&quantity)
            .ok_or_else(|| NemdError::MissingQuantity(quantity.to_string()))
    }

    pub fn temperature(&self) -> NemdResult<&Array2<f64>> {
        self.get(Quantity::Temperature)
    }

    /// `(Ein, Eout)`.
    pub fn thermostat_energies(&self) -> NemdResult<(&Array1<f64>, &Array1<f64>)> {
        match (&self.ein, &self.eout) {
            (Some(ein), Some(eout)) => Ok((ein, eout)),
            _ => Err(NemdError::MissingQuantity("Ein/Eout".into())),
        }
    }

    /// Number of rows (time samples).
    pub fn len(&self) -> usize {
        self.series.values().next().map_or(0, |a| a.nrows())
    }
}

// ---------------------------------------------------------------------------
// ShcRun / ShcOutput – spectral heat current
// ---------------------------------------------------------------------------

/// One run of `shc.out`.
#[derive(Debug, Clone)]
pub struct ShcRun {
    /// Correlation time (ps), `2·Nc − 1` points.
    pub t: Array1<f64>,
    /// Inbound (`Ki`) and outbound (`Ko`) virial-velocity correlation.
    pub ki: Array1<f64>,
    pub ko: Array1<f64>,
    /// Frequency (THz), `num_omega` points.
    pub nu: Array1<f64>,
    /// Inbound (`jwi`) and outbound (`jwo`) spectral heat current.
    pub jwi: Array1<f64>,
    pub jwo: Array1<f64>,
}

/// Parsed `shc.out`, runs in file order.
#[derive(Debug, Clone)]
pub struct ShcOutput {
    pub runs: Vec<ShcRun>,
}

impl ShcOutput {
    pub fn run(&self, index: usize) -> NemdResult<&ShcRun> {
        self.runs.get(index).ok_or_else(|| {
            NemdError::MissingQuantity(format!(
                "shc run{index} (file has {} runs)",
                self.runs.len()
            ))
        })
    }
}
