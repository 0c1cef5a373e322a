use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

const SAMPLES: usize = 1000;
const GROUPS: usize = 10;
const CORRELATION_STEPS: usize = 250;
const NUM_OMEGA: usize = 1000;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// `compute.out` for `compute 0 <interval> <interval> temperature`:
/// group 0 is the frozen layer, groups 1..GROUPS span hot to cold.
fn write_compute(rng: &mut SimpleRng) -> Result<()> {
    let mut out = BufWriter::new(File::create("compute.out").context("creating compute.out")?);
    let flux_per_sample = 0.05;
    for step in 0..SAMPLES {
        let mut row = Vec::with_capacity(GROUPS + 2);
        row.push(0.0);
        for g in 1..GROUPS {
            let frac = (g - 1) as f64 / (GROUPS - 2) as f64;
            row.push(330.0 - 60.0 * frac + rng.gauss(0.0, 1.5));
        }
        let accumulated = flux_per_sample * step as f64;
        row.push(-accumulated + rng.gauss(0.0, 0.01));
        row.push(accumulated + rng.gauss(0.0, 0.01));
        let line: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

/// `shc.out` for one run with Nc = 250 and 1000 frequency points.
fn write_shc(rng: &mut SimpleRng) -> Result<()> {
    let mut out = BufWriter::new(File::create("shc.out").context("creating shc.out")?);
    let dt_corr = 0.01;
    for i in 0..(2 * CORRELATION_STEPS - 1) {
        let t = (i as f64 - (CORRELATION_STEPS - 1) as f64) * dt_corr;
        let k = gaussian(t, 0.0, 0.3, 1.2) * (8.0 * t).cos();
        writeln!(
            out,
            "{t:.6} {:.6e} {:.6e}",
            0.55 * k + rng.gauss(0.0, 1e-4),
            0.45 * k + rng.gauss(0.0, 1e-4)
        )?;
    }
    let peaks = [(5.0, 2.0, 0.6), (15.0, 3.0, 1.0), (45.0, 4.0, 0.3)];
    for i in 0..NUM_OMEGA {
        let nu = 50.0 * i as f64 / NUM_OMEGA as f64;
        let j: f64 = peaks
            .iter()
            .map(|&(mu, sigma, amp)| gaussian(nu, mu, sigma, amp))
            .sum();
        writeln!(
            out,
            "{:.6} {:.6e} {:.6e}",
            2.0 * PI * nu,
            0.5 * j + rng.gauss(0.0, 1e-3),
            0.5 * j + rng.gauss(0.0, 1e-3)
        )?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    write_compute(&mut rng)?;
    write_shc(&mut rng)?;
    println!(
        "Wrote compute.out ({SAMPLES} samples, {GROUPS} groups) and shc.out \
         (Nc = {CORRELATION_STEPS}, {NUM_OMEGA} frequencies)"
    );
    Ok(())
}
