//! Assetflow: IT Asset Lifecycle & Approval Workflow Engine
//!
//! Tracks physical equipment through acquisition, assignment, return and
//! repair, gated by a multi-role approval workflow. The engine is a
//! single-writer, in-memory domain core: an explicit [`Repository`] owns
//! the collections, pure guard and state-machine services decide every
//! transition, and each mutation appends one audit event and snapshots
//! the touched collections to an embedded key-value store.
//!
//! Presentation, import pipelines, routing and authentication live
//! outside; callers hand the engine an already-resolved [`models::Actor`]
//! and branch on the [`models::Decision`] every guarded operation returns.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use models::{Actor, Decision};
pub use repository::Repository;
pub use storage::SnapshotStore;
