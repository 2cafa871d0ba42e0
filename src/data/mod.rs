/// Data layer: typed rows, loading, batter filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable → BattedBallDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  batter selection → borrowed events
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  counts / means / points per view
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
