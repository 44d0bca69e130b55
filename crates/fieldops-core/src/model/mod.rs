// ── Canonical domain model ──
//
// One module per entity, mirroring the backend tables. Wire names are
// snake_case; the `type` column maps to `kind` on each struct. Embedded
// relations (`sites(name,code)` etc.) land in the `refs` types.

pub mod alert;
pub mod equipment;
pub mod intervention;
pub mod profile;
pub mod refs;
pub mod site;

pub use alert::{Alert, AlertKind, AlertStatus, Severity};
pub use equipment::{Equipment, EquipmentKind, EquipmentStatus};
pub use intervention::{
    Intervention, InterventionKind, InterventionStatus, Priority, duration_from_hours,
};
pub use profile::{Profile, Role};
pub use refs::{EquipmentRef, ProfileRef, SiteRef};
pub use site::{Site, SiteKind, SiteStatus};
