// ── Controller abstraction ──
//
// Full lifecycle management for a backend connection. Handles
// authentication, background refresh, command routing, and reactive
// data access through the DataStore.

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use fieldops_api::{RestClient, SelectQuery, TlsMode, TransportConfig};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{AuthCredentials, BackendConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{Alert, AlertStatus, Equipment, Intervention, Profile, Site};
use crate::store::{DataStore, RefreshSnapshot};

const COMMAND_CHANNEL_SIZE: usize = 64;

pub(crate) const SITES_TABLE: &str = "sites";
pub(crate) const EQUIPMENT_TABLE: &str = "equipment";
pub(crate) const INTERVENTIONS_TABLE: &str = "interventions";
pub(crate) const ALERTS_TABLE: &str = "alerts";
pub(crate) const PROFILES_TABLE: &str = "profiles";

/// Column projections used for list fetches. Embedded relations give the
/// listing surfaces their site/equipment/assignee names without N+1 lookups.
const EQUIPMENT_COLUMNS: &str = "*,sites(name,code)";
const INTERVENTION_COLUMNS: &str = "*,sites(name,code),equipment(name),profiles(full_name)";
const ALERT_COLUMNS: &str = "*,sites(name,code),equipment(name)";

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Manages the full
/// connection lifecycle: authentication, background data refresh,
/// command routing, and reactive entity snapshots.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: BackendConfig,
    store: Arc<DataStore>,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: Mutex<mpsc::Sender<CommandEnvelope>>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    client: Mutex<Option<RestClient>>,
    /// Authenticated user id (populated after a password login). Stamped
    /// into acknowledge/resolve mutations.
    user_id: Mutex<Option<Uuid>>,
    /// Record ids with a mutation currently being processed. A second
    /// mutation for the same record is rejected while the first runs.
    in_flight: DashSet<Uuid>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and start
    /// background tasks.
    pub fn new(config: BackendConfig) -> Self {
        let store = Arc::new(DataStore::new());
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Self {
            inner: Arc::new(ControllerInner {
                config,
                store,
                connection_state,
                command_tx: Mutex::new(command_tx),
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                client: Mutex::new(None),
                user_id: Mutex::new(None),
                in_flight: DashSet::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    /// Authenticated user id, if a session exists.
    pub async fn user_id(&self) -> Option<Uuid> {
        *self.inner.user_id.lock().await
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the backend.
    ///
    /// Builds the REST client, authenticates (for password credentials),
    /// performs an initial data refresh, and spawns background tasks
    /// (periodic refresh, command processor).
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        let config = &self.inner.config;
        let transport = build_transport(config);
        let client = RestClient::new(
            config.url.clone(),
            config.anon_key.clone(),
            &transport,
        )
        .map_err(CoreError::from)
        .inspect_err(|_| {
            let _ = self.inner.connection_state.send_replace(ConnectionState::Failed);
        })?;

        match &config.auth {
            AuthCredentials::Password { email, password } => {
                let session = client.login_password(email, password).await.map_err(|e| {
                    let _ = self.inner.connection_state.send_replace(ConnectionState::Failed);
                    CoreError::from(e)
                })?;
                debug!(user_id = %session.user_id, "password authentication successful");
                *self.inner.user_id.lock().await = Some(session.user_id);
            }
            AuthCredentials::Anonymous => {
                debug!("anonymous session: writes will be rejected by row-level security");
            }
        }

        *self.inner.client.lock().await = Some(client);

        // Initial data load
        self.full_refresh().await?;

        // Spawn background tasks
        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }

        let interval_secs = config.refresh_interval_secs;
        if interval_secs > 0 {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(refresh_task(ctrl, interval_secs, cancel)));
        }

        let _ = self.inner.connection_state.send_replace(ConnectionState::Connected);
        info!("connected to backend");
        Ok(())
    }

    /// Disconnect from the backend.
    ///
    /// Cancels background tasks, revokes the session, and resets the
    /// connection state to [`Disconnected`](ConnectionState::Disconnected).
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        // Close the command channel so the processor task drains and exits.
        {
            let (tx, _) = mpsc::channel(COMMAND_CHANNEL_SIZE);
            *self.inner.command_tx.lock().await = tx;
        }

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        if let Some(client) = self.inner.client.lock().await.take() {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
        *self.inner.user_id.lock().await = None;

        let _ = self
            .inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Fetch all tables from the backend and update the DataStore.
    ///
    /// Fetches run concurrently. A failed table fetch logs a warning and
    /// contributes an empty collection; the refresh itself still succeeds
    /// as long as the client is connected.
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let client = self.client().await?;

        let sites_query = SelectQuery::new().order_desc("created_at");
        let equipment_query = SelectQuery::new()
            .columns(EQUIPMENT_COLUMNS)
            .order_desc("created_at");
        let interventions_query = SelectQuery::new()
            .columns(INTERVENTION_COLUMNS)
            .order_desc("created_at");
        let alerts_query = SelectQuery::new()
            .columns(ALERT_COLUMNS)
            .order_desc("created_at");
        let profiles_query = SelectQuery::new();

        let (sites_res, equipment_res, interventions_res, alerts_res, profiles_res) = tokio::join!(
            client.select::<Site>(SITES_TABLE, &sites_query),
            client.select::<Equipment>(EQUIPMENT_TABLE, &equipment_query),
            client.select::<Intervention>(INTERVENTIONS_TABLE, &interventions_query),
            client.select::<Alert>(ALERTS_TABLE, &alerts_query),
            client.select::<Profile>(PROFILES_TABLE, &profiles_query),
        );

        self.inner.store.apply_snapshot(RefreshSnapshot {
            sites: unwrap_or_empty(SITES_TABLE, sites_res),
            equipment: unwrap_or_empty(EQUIPMENT_TABLE, equipment_res),
            interventions: unwrap_or_empty(INTERVENTIONS_TABLE, interventions_res),
            alerts: unwrap_or_empty(ALERTS_TABLE, alerts_res),
            profiles: unwrap_or_empty(PROFILES_TABLE, profiles_res),
        });

        debug!(
            sites = self.inner.store.site_count(),
            equipment = self.inner.store.equipment_count(),
            interventions = self.inner.store.intervention_count(),
            alerts = self.inner.store.alert_count(),
            "data refresh complete"
        );

        Ok(())
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against the backend.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::BackendDisconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        let command_tx = self.inner.command_tx.lock().await.clone();

        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::BackendDisconnected)?;

        rx.await.map_err(|_| CoreError::BackendDisconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Optimized for CLI invocations: periodic refresh is disabled since
    /// we only need a single request-response cycle. The error type is
    /// generic so callers can run closures returning their own error, as
    /// long as it absorbs connection failures.
    pub async fn oneshot<F, Fut, T, E>(config: BackendConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: From<CoreError>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let controller = Controller::new(cfg);
        controller.connect().await.map_err(E::from)?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Ad-hoc queries (bypass the DataStore) ────────────────────

    /// Fetch one site with its full equipment list embedded, straight from
    /// the backend.
    pub async fn site_with_equipment(&self, id: &Uuid) -> Result<serde_json::Value, CoreError> {
        let client = self.client().await?;
        let row = client
            .select_single::<serde_json::Value>(SITES_TABLE, id, "*,equipment(*)")
            .await
            .map_err(|e| not_found_or(e, "site", id))?;
        Ok(row)
    }

    /// Count rows in the sites table without fetching them.
    pub async fn count_sites(&self) -> Result<u64, CoreError> {
        let client = self.client().await?;
        Ok(client.count(SITES_TABLE).await?)
    }

    /// Fetch the authenticated user's profile.
    pub async fn current_profile(&self) -> Result<Profile, CoreError> {
        let user_id = self
            .user_id()
            .await
            .ok_or_else(|| CoreError::AuthenticationFailed {
                message: "no session: sign in with email/password credentials".into(),
            })?;
        let client = self.client().await?;
        client
            .select_single::<Profile>(PROFILES_TABLE, &user_id, "*")
            .await
            .map_err(|e| not_found_or(e, "profile", &user_id))
    }

    // ── Internals ────────────────────────────────────────────────

    async fn client(&self) -> Result<RestClient, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::BackendDisconnected)
    }
}

// ── Command processing ───────────────────────────────────────────

/// Drains the command channel. Each command runs on its own task so
/// mutations against distinct records proceed concurrently; the keyed
/// in-flight set rejects a duplicate mutation for a record whose previous
/// one has not finished.
async fn command_processor_task(ctrl: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = ctrl.inner.cancel.clone();
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(CommandEnvelope { command, response_tx }) = envelope else {
                    break;
                };

                let guard_id = command.target_id();
                if let Some(id) = guard_id {
                    if !ctrl.inner.in_flight.insert(id) {
                        let _ = response_tx.send(Err(CoreError::OperationInFlight {
                            entity_type: command.entity_type().to_owned(),
                            identifier: id.to_string(),
                        }));
                        continue;
                    }
                }

                let ctrl = ctrl.clone();
                tokio::spawn(async move {
                    let result = handle_command(&ctrl, command).await;
                    if let Some(id) = guard_id {
                        ctrl.inner.in_flight.remove(&id);
                    }
                    let _ = response_tx.send(result);
                });
            }
        }
    }
    debug!("command processor stopped");
}

#[allow(clippy::too_many_lines)]
async fn handle_command(ctrl: &Controller, command: Command) -> Result<CommandResult, CoreError> {
    let client = ctrl.client().await?;
    let store = ctrl.store();

    match command {
        // ── Sites ────────────────────────────────────────────────
        Command::CreateSite(req) => {
            let site: Site = client.insert(SITES_TABLE, &req).await?;
            store.sites.upsert(site.id, site.clone());
            Ok(CommandResult::Site(site))
        }
        Command::UpdateSite { id, update } => {
            let site: Site = client
                .update_by_id(SITES_TABLE, &id, &update)
                .await
                .map_err(|e| not_found_or(e, "site", &id))?;
            store.sites.upsert(site.id, site.clone());
            Ok(CommandResult::Site(site))
        }
        Command::DeleteSite { id } => {
            client
                .delete_by_id(SITES_TABLE, &id)
                .await
                .map_err(|e| not_found_or(e, "site", &id))?;
            store.sites.remove(&id);
            Ok(CommandResult::Ok)
        }

        // ── Equipment ────────────────────────────────────────────
        Command::CreateEquipment(req) => {
            let unit: Equipment = client.insert(EQUIPMENT_TABLE, &req).await?;
            store.equipment.upsert(unit.id, unit.clone());
            Ok(CommandResult::Equipment(unit))
        }
        Command::UpdateEquipment { id, update } => {
            let unit: Equipment = client
                .update_by_id(EQUIPMENT_TABLE, &id, &update)
                .await
                .map_err(|e| not_found_or(e, "equipment", &id))?;
            store.equipment.upsert(unit.id, unit.clone());
            Ok(CommandResult::Equipment(unit))
        }
        Command::DeleteEquipment { id } => {
            client
                .delete_by_id(EQUIPMENT_TABLE, &id)
                .await
                .map_err(|e| not_found_or(e, "equipment", &id))?;
            store.equipment.remove(&id);
            Ok(CommandResult::Ok)
        }

        // ── Interventions ────────────────────────────────────────
        Command::CreateIntervention(req) => {
            let task: Intervention = client.insert(INTERVENTIONS_TABLE, &req).await?;
            store.interventions.upsert(task.id, task.clone());
            Ok(CommandResult::Intervention(task))
        }
        Command::UpdateIntervention { id, update } => {
            let task: Intervention = client
                .update_by_id(INTERVENTIONS_TABLE, &id, &update)
                .await
                .map_err(|e| not_found_or(e, "intervention", &id))?;
            store.interventions.upsert(task.id, task.clone());
            Ok(CommandResult::Intervention(task))
        }
        Command::DeleteIntervention { id } => {
            client
                .delete_by_id(INTERVENTIONS_TABLE, &id)
                .await
                .map_err(|e| not_found_or(e, "intervention", &id))?;
            store.interventions.remove(&id);
            Ok(CommandResult::Ok)
        }

        // ── Alerts ───────────────────────────────────────────────
        Command::CreateAlert(req) => {
            let alert: Alert = client.insert(ALERTS_TABLE, &req).await?;
            store.alerts.upsert(alert.id, alert.clone());
            Ok(CommandResult::Alert(alert))
        }
        Command::DeleteAlert { id } => {
            client
                .delete_by_id(ALERTS_TABLE, &id)
                .await
                .map_err(|e| not_found_or(e, "alert", &id))?;
            store.alerts.remove(&id);
            Ok(CommandResult::Ok)
        }
        Command::AcknowledgeAlert { id } => {
            let user_id = require_user(ctrl).await?;
            let body = serde_json::json!({
                "status": AlertStatus::Acknowledged,
                "acknowledged_by": user_id,
            });
            let alert: Alert = client
                .update_by_id(ALERTS_TABLE, &id, &body)
                .await
                .map_err(|e| not_found_or(e, "alert", &id))?;
            store.alerts.upsert(alert.id, alert.clone());
            Ok(CommandResult::Alert(alert))
        }
        Command::ResolveAlert { id } => {
            let user_id = require_user(ctrl).await?;
            let body = serde_json::json!({
                "status": AlertStatus::Resolved,
                "resolved_by": user_id,
                "resolved_at": chrono::Utc::now(),
            });
            let alert: Alert = client
                .update_by_id(ALERTS_TABLE, &id, &body)
                .await
                .map_err(|e| not_found_or(e, "alert", &id))?;
            store.alerts.upsert(alert.id, alert.clone());
            Ok(CommandResult::Alert(alert))
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn refresh_task(ctrl: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ticker.tick().await; // first tick fires immediately; initial load already ran

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = ctrl.full_refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
    debug!("refresh task stopped");
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &BackendConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}

async fn require_user(ctrl: &Controller) -> Result<Uuid, CoreError> {
    ctrl.user_id()
        .await
        .ok_or_else(|| CoreError::AuthenticationFailed {
            message: "this operation requires a signed-in user".into(),
        })
}

/// Map a 404/406 API error onto a typed NotFound for the given entity.
fn not_found_or(err: fieldops_api::Error, entity_type: &str, id: &Uuid) -> CoreError {
    match err {
        fieldops_api::Error::Api { status, .. } if status == 404 || status == 406 => {
            CoreError::NotFound {
                entity_type: entity_type.to_owned(),
                identifier: id.to_string(),
            }
        }
        other => CoreError::from(other),
    }
}

/// Unwrap a fetch result, logging and substituting an empty vec on error.
fn unwrap_or_empty<T>(table: &str, res: Result<Vec<T>, fieldops_api::Error>) -> Vec<T> {
    match res {
        Ok(items) => items,
        Err(e) => {
            warn!(table, error = %e, "table fetch failed (non-fatal)");
            Vec::new()
        }
    }
}
