//! # fusion-eval
//!
//! Virtual grasp-quality experiment toolkit. Sweeps (object, camera view,
//! user-input point, fusion method, fusion weight) combinations against an
//! external grasp-evaluation model, persists every attempted combination to a
//! CSV result table, and aggregates persisted tables into per-method
//! comparison charts. A standalone converter turns rendered depth PNGs into
//! the float32 meter arrays the model consumes.
//!
//! ## Components
//!
//! - [`sweep`]: parameter-grid runner with per-object checkpointing
//! - [`evaluator`]: the external-model seam (subprocess bridge or simulator)
//! - [`dataset`]: evaluation-directory layout scanning
//! - [`table`]: result table CSV persistence
//! - [`aggregate`] / [`plot`]: per-method mean summaries and SVG figures
//! - [`depth`]: depth PNG to NPY conversion
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use fusion_eval::config::SweepConfig;
//! use fusion_eval::evaluator::create_evaluator;
//! use fusion_eval::sweep::run_sweep;
//!
//! let config = SweepConfig::load(Path::new("configs/sweep.yaml"))?;
//! let mut evaluator = create_evaluator(&config.evaluator);
//! let table = run_sweep(&config, evaluator.as_mut())?;
//! println!("{} rows ({} fallbacks)", table.len(), table.fallback_count());
//! ```
//!
//! The sweep is strictly sequential: the evaluator call is a synchronous,
//! potentially slow blocking operation, and a single process owns each output
//! path.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod depth;
pub mod error;
pub mod evaluator;
pub mod experiment;
pub mod plot;
pub mod sweep;
pub mod table;

pub use config::{SweepConfig, SweepLimits};
pub use error::{Error, Result};
pub use experiment::{ExperimentRecord, FusionMethod, FusionWeight, GraspMetrics};
pub use table::ResultTable;
