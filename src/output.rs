use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array1;

use crate::analysis::NemdResults;
use crate::error::{NemdError, NemdResult};

pub const TEMP_PROFILE_FILE: &str = "TempProfile.txt";
pub const ENERGY_FILE: &str = "EnergyAccumulation.txt";
pub const CORRELATION_FILE: &str = "CorrelationTime.txt";
pub const SPECTRAL_FILE: &str = "SpectralConductance.txt";
pub const SPECTRAL_NPY_FILE: &str = "Gc.npy";

const ENERGY_HEADER: &str = "t(ps) Energy-in(Ein) Energy-out(Eout)";
const CORRELATION_HEADER: &str = "correlation time(ps) correlation function(eV/ps)";
const SPECTRAL_HEADER: &str = "frequency(THz) Spectral conductance(GW/m^2/K/THz)";

// ---------------------------------------------------------------------------
// Plain-text tables
// ---------------------------------------------------------------------------

/// Write an optional header line followed by one line per row.
/// The handle is closed when the writer drops, on success and on error.
fn write_table<I>(path: &Path, header: Option<&str>, rows: I) -> NemdResult<()>
where
    I: IntoIterator<Item = String>,
{
    let write = || -> std::io::Result<usize> {
        let mut out = BufWriter::new(File::create(path)?);
        if let Some(header) = header {
            writeln!(out, "{header}")?;
        }
        let mut count = 0usize;
        for row in rows {
            writeln!(out, "{row}")?;
            count += 1;
        }
        out.flush()?;
        Ok(count)
    };
    let count = write().map_err(NemdError::io(path))?;
    log::debug!("Wrote {count} rows to {}", path.display());
    Ok(())
}

fn zip_rows<'a>(a: &'a Array1<f64>, b: &'a Array1<f64>) -> impl Iterator<Item = String> + 'a {
    a.iter().zip(b.iter()).map(|(x, y)| format!("{x:?} {y:?}"))
}

/// `<group> <temperature>` for groups `1..=n`, no header.
pub fn write_temperature_profile(path: &Path, profile: &Array1<f64>) -> NemdResult<()> {
    let rows = profile
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {t:?}", i + 1));
    write_table(path, None, rows)
}

pub fn write_energy_accumulation(
    path: &Path,
    time: &Array1<f64>,
    ein: &Array1<f64>,
    eout: &Array1<f64>,
) -> NemdResult<()> {
    let rows = time
        .iter()
        .zip(ein.iter())
        .zip(eout.iter())
        .map(|((t, i), o)| format!("{t:?} {i:?} {o:?}"));
    write_table(path, Some(ENERGY_HEADER), rows)
}

pub fn write_correlation_time(
    path: &Path,
    time: &Array1<f64>,
    correlation: &Array1<f64>,
) -> NemdResult<()> {
    write_table(path, Some(CORRELATION_HEADER), zip_rows(time, correlation))
}

pub fn write_spectral_conductance(
    path: &Path,
    frequency: &Array1<f64>,
    conductance: &Array1<f64>,
) -> NemdResult<()> {
    write_table(path, Some(SPECTRAL_HEADER), zip_rows(frequency, conductance))
}

// ---------------------------------------------------------------------------
// Binary and CSV exports
// ---------------------------------------------------------------------------

/// Save an array as a NumPy `.npy` file.
pub fn write_npy(path: &Path, values: &Array1<f64>) -> NemdResult<()> {
    ndarray_npy::write_npy(path, values).map_err(|e| NemdError::Npy {
        file: path.to_path_buf(),
        msg: e.to_string(),
    })?;
    log::debug!("Wrote {} values to {}", values.len(), path.display());
    Ok(())
}

/// `frequency_thz,spectral_conductance` with a header row.
pub fn export_spectrum_csv(path: &Path, results: &NemdResults) -> anyhow::Result<()> {
    use anyhow::Context;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["frequency_thz", "spectral_conductance_gw_m2_k_thz"])?;
    for (nu, gc) in results
        .frequency
        .iter()
        .zip(results.spectral_conductance.iter())
    {
        writer.write_record([format!("{nu:?}"), format!("{gc:?}")])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write every table plus `Gc.npy` into `dir`. Returns the written paths.
pub fn write_all(dir: &Path, results: &NemdResults) -> NemdResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(NemdError::io(dir))?;
    let paths: Vec<PathBuf> = [
        TEMP_PROFILE_FILE,
        ENERGY_FILE,
        CORRELATION_FILE,
        SPECTRAL_FILE,
        SPECTRAL_NPY_FILE,
    ]
    .iter()
    .map(|name| dir.join(name))
    .collect();

    write_temperature_profile(&paths[0], &results.temperature_profile)?;
    write_energy_accumulation(&paths[1], &results.energy_time, &results.ein, &results.eout)?;
    write_correlation_time(&paths[2], &results.correlation_t, &results.correlation)?;
    write_spectral_conductance(&paths[3], &results.frequency, &results.spectral_conductance)?;
    write_npy(&paths[4], &results.spectral_conductance)?;
    Ok(paths)
}
