//! Data layer: core types, loading, filtering, and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RowSet
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  RowSet   │  header + Vec<Row>, string cells
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐     ┌───────────┐
//!   │  filter   │ ──▶ │ aggregate │  condition → subset → scalar
//!   └──────────┘     └───────────┘
//! ```

pub mod aggregate;
pub mod condition;
pub mod filter;
pub mod loader;
pub mod model;

pub use aggregate::{calculate_aggregate, AggregateOp, AggregateOutcome, AggregateResult, AggregateSpec};
pub use condition::{parse_condition, Condition, Operator};
pub use filter::apply_filter;
pub use loader::{load_file, load_file_as, SourceFormat};
pub use model::{Row, RowSet};
