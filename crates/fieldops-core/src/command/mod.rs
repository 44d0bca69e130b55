// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// controller routes each variant through the command processor, which
// serializes mutations per record id -- a second mutation for a record
// that already has one in flight is rejected, not queued.

pub mod requests;

use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{Alert, Equipment, Intervention, Site};

pub use requests::{
    CreateAlertRequest, CreateEquipmentRequest, CreateInterventionRequest, CreateSiteRequest,
    UpdateEquipmentRequest, UpdateInterventionRequest, UpdateSiteRequest,
};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All possible write operations against the backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Sites ────────────────────────────────────────────────────────
    CreateSite(CreateSiteRequest),
    UpdateSite {
        id: Uuid,
        update: UpdateSiteRequest,
    },
    DeleteSite {
        id: Uuid,
    },

    // ── Equipment ────────────────────────────────────────────────────
    CreateEquipment(CreateEquipmentRequest),
    UpdateEquipment {
        id: Uuid,
        update: UpdateEquipmentRequest,
    },
    DeleteEquipment {
        id: Uuid,
    },

    // ── Interventions ────────────────────────────────────────────────
    CreateIntervention(CreateInterventionRequest),
    UpdateIntervention {
        id: Uuid,
        update: UpdateInterventionRequest,
    },
    DeleteIntervention {
        id: Uuid,
    },

    // ── Alerts ───────────────────────────────────────────────────────
    CreateAlert(CreateAlertRequest),
    DeleteAlert {
        id: Uuid,
    },
    /// Mark an active alert as seen. Records the acting user; the alert
    /// stays open.
    AcknowledgeAlert {
        id: Uuid,
    },
    /// Close out an alert. Records the acting user and the resolution time.
    ResolveAlert {
        id: Uuid,
    },
}

impl Command {
    /// The record id this command mutates, if it targets an existing record.
    /// Creates return `None` -- there is nothing to guard yet.
    pub(crate) fn target_id(&self) -> Option<Uuid> {
        match self {
            Command::CreateSite(_)
            | Command::CreateEquipment(_)
            | Command::CreateIntervention(_)
            | Command::CreateAlert(_) => None,
            Command::UpdateSite { id, .. }
            | Command::DeleteSite { id }
            | Command::UpdateEquipment { id, .. }
            | Command::DeleteEquipment { id }
            | Command::UpdateIntervention { id, .. }
            | Command::DeleteIntervention { id }
            | Command::DeleteAlert { id }
            | Command::AcknowledgeAlert { id }
            | Command::ResolveAlert { id } => Some(*id),
        }
    }

    /// Entity name for error messages.
    pub(crate) fn entity_type(&self) -> &'static str {
        match self {
            Command::CreateSite(_) | Command::UpdateSite { .. } | Command::DeleteSite { .. } => {
                "site"
            }
            Command::CreateEquipment(_)
            | Command::UpdateEquipment { .. }
            | Command::DeleteEquipment { .. } => "equipment",
            Command::CreateIntervention(_)
            | Command::UpdateIntervention { .. }
            | Command::DeleteIntervention { .. } => "intervention",
            Command::CreateAlert(_)
            | Command::DeleteAlert { .. }
            | Command::AcknowledgeAlert { .. }
            | Command::ResolveAlert { .. } => "alert",
        }
    }
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    Site(Site),
    Equipment(Equipment),
    Intervention(Intervention),
    Alert(Alert),
}
