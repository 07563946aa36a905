use std::net::SocketAddr;
use serde::{Deserialize, Serialize};

/// Lead distributor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorConfig {
    /// General service settings
    pub general: GeneralConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Distribution engine configuration
    pub distribution: DistributionConfig,
}

/// General service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// HTTP listen address
    pub bind_addr: SocketAddr,

    /// Service name reported in logs
    pub service_name: String,

    /// Default page size for listing endpoints
    pub default_page_size: u32,

    /// Hard cap on the page size a caller may request
    pub max_page_size: u32,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path (empty for in-memory)
    pub database_path: String,

    /// Maximum database connections
    pub max_connections: u32,

    /// SQLite busy timeout in milliseconds
    pub busy_timeout_ms: u64,
}

/// Distribution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// How many times a distribution attempt re-runs candidate selection
    /// after losing an operator slot to a concurrent attempt
    pub max_selection_retries: u32,

    /// Default capacity ceiling for newly created operators
    pub default_max_load: i64,

    /// Default weight for newly created assignments
    pub default_weight: i64,

    /// Status stamped on newly created contacts
    pub new_contact_status: String,
}

impl DistributorConfig {
    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), String> {
        if self.general.service_name.is_empty() {
            return Err("service_name cannot be empty".to_string());
        }

        if self.general.default_page_size == 0 {
            return Err("default_page_size must be greater than 0".to_string());
        }

        if self.general.max_page_size < self.general.default_page_size {
            return Err("max_page_size cannot be below default_page_size".to_string());
        }

        if self.database.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }

        if self.distribution.max_selection_retries == 0 {
            return Err("max_selection_retries must be greater than 0".to_string());
        }

        if self.distribution.default_max_load <= 0 {
            return Err("default_max_load must be greater than 0".to_string());
        }

        if self.distribution.default_weight <= 0 {
            return Err("default_weight must be greater than 0".to_string());
        }

        if self.distribution.new_contact_status.is_empty() {
            return Err("new_contact_status cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            database: DatabaseConfig::default(),
            distribution: DistributionConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            service_name: "lead-engine".to_string(),
            default_page_size: 100,
            max_page_size: 1000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_path: "leads.db".to_string(),
            max_connections: 10,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            max_selection_retries: 8,
            default_max_load: 10,
            default_weight: 1,
            new_contact_status: "new".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DistributorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = DistributorConfig::default();
        config.distribution.max_selection_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_size_ordering_enforced() {
        let mut config = DistributorConfig::default();
        config.general.max_page_size = 10;
        config.general.default_page_size = 50;
        assert!(config.validate().is_err());
    }
}
