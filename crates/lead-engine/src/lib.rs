//! # Lead Distribution Engine
//!
//! Routes inbound lead-contact events to available human operators,
//! honoring per-source operator assignments, weighted random selection and
//! operator capacity limits.
//!
//! ## Architecture
//!
//! - [`database`]: SQLite entity store (operators, leads, sources,
//!   assignments, contacts) via sqlx
//! - [`distributor`]: eligibility filtering, weighted selection and the
//!   transactional distribution engine
//! - [`api`]: thin axum CRUD/ingestion surface
//! - [`server`]: builder and lifecycle for the HTTP service
//! - [`config`], [`error`], [`logging`]: ambient plumbing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lead_engine::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut server = DistributionServerBuilder::new()
//!         .with_in_memory_database()
//!         .build()
//!         .await?;
//!
//!     server.start().await?;
//!
//!     // Distribute one inbound contact event
//!     let contact = server
//!         .engine()
//!         .create_contact(NewContact {
//!             external_id: "lead-001".to_string(),
//!             source_id: 1,
//!             message: Some("hello".to_string()),
//!             email: None,
//!             phone: None,
//!         })
//!         .await?;
//!     println!("contact {} -> operator {:?}", contact.id, contact.operator_id);
//!
//!     server.stop().await?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;
pub mod config;
pub mod logging;

// Distribution functionality
pub mod distributor;

// External interfaces
pub mod api;
pub mod server;

// Database integration
pub mod database;

// Re-exports for convenience
pub use config::DistributorConfig;
pub use distributor::{DistributionEngine, NewContact};
pub use error::{DistributionError, Result};
pub use server::{DistributionServer, DistributionServerBuilder};

/// Prelude module for convenient imports
pub mod prelude {
    // Core types
    pub use crate::{
        DistributionEngine, DistributionError, DistributionServer, DistributionServerBuilder,
        DistributorConfig, NewContact, Result,
    };

    // Configuration types
    pub use crate::config::{DatabaseConfig, DistributionConfig, GeneralConfig};

    // Logging
    pub use crate::logging::{parse_log_level, setup_logging, LoggingConfig};

    // Distribution types
    pub use crate::distributor::{select_weighted, Candidate};

    // Database types
    pub use crate::database::{
        assignments::Assignment, contacts::Contact, leads::Lead, operators::Operator,
        sources::Source, Database, DistributionStats,
    };

    // Common external types
    pub use chrono::{DateTime, Utc};
}
