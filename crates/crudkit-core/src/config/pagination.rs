//! Page size configuration for list endpoints.

use serde::{Deserialize, Serialize};

/// Page size defaults applied when a request omits or overshoots them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request does not name one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound for a requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    25
}

fn default_max_page_size() -> u64 {
    100
}
