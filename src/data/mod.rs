/// Data layer: raw export loading and the raw-to-template pipeline.
///
/// Architecture:
/// ```text
///  raw claim export (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → RawTable (headers + RawRecords)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keep status "R"
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  dedup    │  report colliding claim numbers, keep last occurrence
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ template  │  dates + text normalization → TemplateTable
///   └──────────┘
///        │
///        ▼
///   PipelineOutcome  (table, duplicates, warnings, summary)
/// ```
///
/// The raw layout is described by a [`variant::SchemaVariant`], chosen once
/// per run.

pub mod dates;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod template;
pub mod variant;
