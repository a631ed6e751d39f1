//! Common serde default value functions
//!
//! Used across settings and pattern table definitions to avoid duplication.

/// Default for enabled/tracking fields
pub fn default_true() -> bool {
    true
}

/// Default pattern table format version
pub fn default_version() -> u32 {
    1
}

/// Default crit rank when a table entry omits it
pub fn default_rank() -> u8 {
    1
}
