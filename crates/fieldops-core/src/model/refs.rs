// ── Embedded relation stubs ──
//
// Partial rows returned by embedded selects, e.g. `*,sites(name,code)`.
// Only the columns the listing surfaces actually need.

use serde::{Deserialize, Serialize};

/// `sites(name,code)` embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRef {
    pub name: String,
    pub code: String,
}

/// `equipment(name)` embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRef {
    pub name: String,
}

/// `profiles(full_name)` embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRef {
    pub full_name: String,
}
