use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::Path;

use ndarray::{s, Array2};

use super::model::{ComputeOutput, Quantity, ShcOutput, ShcRun};
use crate::error::{NemdError, NemdResult};

pub const COMPUTE_FILE: &str = "compute.out";
pub const SHC_FILE: &str = "shc.out";

// ---------------------------------------------------------------------------
// compute.out
// ---------------------------------------------------------------------------

/// Load `compute.out`.
///
/// Layout: one row per sample, quantities in [`Quantity::ALL`] order, each
/// taking `components · groups` columns. When temperature is recorded GPUMD
/// appends the thermostat energies `Ein` and `Eout` as the last two columns.
/// `quantities` must list what the `compute` keyword recorded.
pub fn load_compute(path: &Path, quantities: &[Quantity]) -> NemdResult<ComputeOutput> {
    if quantities.is_empty() {
        return Err(NemdError::InvalidConfig(
            "no compute quantities requested".into(),
        ));
    }
    let data = read_table(path)?;
    let ncol = data.ncols();

    let per_group: usize = Quantity::ALL
        .into_iter()
        .filter(|q| quantities.contains(q))
        .map(Quantity::components)
        .sum();
    let has_temperature = quantities.contains(&Quantity::Temperature);
    let group_cols = if has_temperature {
        ncol.checked_sub(2).ok_or_else(|| NemdError::Format {
            file: path.to_path_buf(),
            msg: format!("{ncol} columns cannot hold Ein and Eout"),
        })?
    } else {
        ncol
    };
    if group_cols == 0 || group_cols % per_group != 0 {
        return Err(NemdError::Format {
            file: path.to_path_buf(),
            msg: format!(
                "{group_cols} group columns is not a multiple of {per_group} \
                 (columns per group for {quantities:?})"
            ),
        });
    }
    let groups = group_cols / per_group;

    let mut series = BTreeMap::new();
    let mut start = 0;
    for quantity in Quantity::ALL {
        if !quantities.contains(&quantity) {
            continue;
        }
        let end = start + quantity.components() * groups;
        series.insert(quantity, data.slice(s![.., start..end]).to_owned());
        start = end;
    }

    let (ein, eout) = if has_temperature {
        (
            Some(data.column(ncol - 2).to_owned()),
            Some(data.column(ncol - 1).to_owned()),
        )
    } else {
        (None, None)
    };

    log::debug!(
        "{}: {} samples, {groups} groups, quantities {:?}",
        path.display(),
        data.nrows(),
        series.keys().map(|q| q.key()).collect::<Vec<_>>()
    );

    Ok(ComputeOutput {
        series,
        ein,
        eout,
        groups,
    })
}

// ---------------------------------------------------------------------------
// shc.out
// ---------------------------------------------------------------------------

/// `(Nc, num_omega)` of one `compute_shc` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShcLayout {
    pub correlation_steps: usize,
    pub num_omega: usize,
}

impl ShcLayout {
    /// `2·Nc − 1`, or `None` when Nc is zero or the count overflows.
    fn correlation_rows(&self) -> Option<usize> {
        self.correlation_steps.checked_mul(2)?.checked_sub(1)
    }

    fn rows(&self) -> Option<usize> {
        self.correlation_rows()?.checked_add(self.num_omega)
    }
}

/// Load `shc.out`.
///
/// Each run is `2·Nc − 1` rows of `t Ki Ko` followed by `num_omega` rows of
/// `ω jwi jwo`; ω is converted to ν = ω / 2π (THz).
pub fn load_shc(path: &Path, layouts: &[ShcLayout]) -> NemdResult<ShcOutput> {
    if let Some(bad) = layouts
        .iter()
        .find(|l| l.correlation_steps == 0 || l.num_omega == 0)
    {
        return Err(NemdError::InvalidConfig(format!(
            "Nc and num_omega must be strictly positive, got {bad:?}"
        )));
    }
    let data = read_table(path)?;
    if data.ncols() < 3 {
        return Err(NemdError::Format {
            file: path.to_path_buf(),
            msg: format!("expected 3 columns, found {}", data.ncols()),
        });
    }
    let needed = layouts
        .iter()
        .try_fold(0usize, |acc, l| acc.checked_add(l.rows()?))
        .ok_or_else(|| {
            NemdError::InvalidConfig(format!("row count of runs {layouts:?} overflows"))
        })?;
    if needed > data.nrows() {
        return Err(NemdError::Format {
            file: path.to_path_buf(),
            msg: format!(
                "runs {layouts:?} need {needed} rows, file has {}",
                data.nrows()
            ),
        });
    }

    let mut runs = Vec::with_capacity(layouts.len());
    let mut start = 0;
    for layout in layouts {
        // bounded by `needed`, which fit in usize
        let split = start + 2 * layout.correlation_steps - 1;
        let end = split + layout.num_omega;
        let corr = data.slice(s![start..split, ..]);
        let omega = data.slice(s![split..end, ..]);
        runs.push(ShcRun {
            t: corr.column(0).to_owned(),
            ki: corr.column(1).to_owned(),
            ko: corr.column(2).to_owned(),
            nu: omega.column(0).mapv(|w| w / (2.0 * PI)),
            jwi: omega.column(1).to_owned(),
            jwo: omega.column(2).to_owned(),
        });
        start = end;
    }
    if start < data.nrows() {
        log::warn!(
            "{}: {} trailing rows not covered by the configured runs",
            path.display(),
            data.nrows() - start
        );
    }
    Ok(ShcOutput { runs })
}

// ---------------------------------------------------------------------------
// Shared table reader
// ---------------------------------------------------------------------------

/// Whitespace-separated numeric table. Blank lines are skipped; every other
/// row must have the same number of columns.
fn read_table(path: &Path) -> NemdResult<Array2<f64>> {
    let text = std::fs::read_to_string(path).map_err(NemdError::io(path))?;
    let mut values = Vec::new();
    let mut ncols = None;
    let mut nrows = 0;

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let before = values.len();
        for tok in line.split_whitespace() {
            let v = tok.parse::<f64>().map_err(|_| NemdError::Parse {
                file: path.to_path_buf(),
                line: i + 1,
                msg: format!("'{tok}' is not a number"),
            })?;
            values.push(v);
        }
        let width = values.len() - before;
        match ncols {
            None => ncols = Some(width),
            Some(n) if n != width => {
                return Err(NemdError::Parse {
                    file: path.to_path_buf(),
                    line: i + 1,
                    msg: format!("expected {n} columns, found {width}"),
                });
            }
            Some(_) => {}
        }
        nrows += 1;
    }

    let ncols = ncols.ok_or_else(|| NemdError::Format {
        file: path.to_path_buf(),
        msg: "file contains no data".into(),
    })?;
    Array2::from_shape_vec((nrows, ncols), values).map_err(|e| NemdError::Format {
        file: path.to_path_buf(),
        msg: e.to_string(),
    })
}
