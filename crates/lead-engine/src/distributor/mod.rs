//! Lead distribution: eligibility, weighted selection, and the engine that
//! turns one inbound contact event into one committed contact row.
//!
//! - [`selection`]: pure weighted choice over eligible candidates
//! - [`core`]: the [`DistributionEngine`] orchestration and its
//!   transactional commit path

pub mod core;
pub mod selection;

pub use self::core::{DistributionEngine, NewContact};
pub use self::selection::{select_weighted, Candidate};
