/// Data layer: GPUMD output types and loading.
///
/// Architecture:
/// ```text
///  compute.out        shc.out
///        │               │
///        ▼               ▼
///   ┌──────────────────────┐
///   │  loader               │  parse text → ComputeOutput / ShcOutput
///   └──────────────────────┘
///        │
///        ▼
///   ┌──────────────────────┐
///   │  model                │  named series, ndarray-backed
///   └──────────────────────┘
/// ```

pub mod loader;
pub mod model;
