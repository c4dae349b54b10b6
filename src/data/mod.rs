/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset (+ payload bounds)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, site index, colour attribute
///   └───────────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌───────────┐     ┌──────────┐
///   │ aggregate  │     │  filter   │  site + payload range → record subset
///   └───────────┘     └──────────┘
///   success counts
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
