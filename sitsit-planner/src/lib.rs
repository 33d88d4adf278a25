//! sitsit-planner library interface
//!
//! Seats sitsit attendees so that people who asked to sit together end up at
//! the same table:
//! - `affinity`: fuzzy matching of group preferences into friend lists
//! - `tables`: greedy depth-first packing into fixed-size tables
//! - `import`: registration CSV ingestion
//! - `graph`: friend graph export (Graphviz DOT)
//! - `report`: seat charts as text or JSON

pub mod affinity;
pub mod graph;
pub mod import;
pub mod report;
pub mod tables;

pub use affinity::{AffinityResolver, FriendMap};
pub use report::SeatingReport;
pub use tables::{IdMap, PersonId, SeatingPlan, Table, TableAssigner, TableSpec, EMPTY_SEAT};
