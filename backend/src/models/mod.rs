//! Domain models for genes, motifs and their binding sites.
//!
//! These types are owned by the persistence layer and are read-only from the
//! point of view of the web application. All of them derive
//! Serialize/Deserialize so they can be loaded from a JSON dataset and handed
//! to views unchanged.

pub mod gene;
pub mod histogram;
pub mod motif;
pub mod user;

pub use gene::*;
pub use histogram::*;
pub use motif::*;
pub use user::*;
