// ── Reactive data store ──
//
// One `EntityCollection` per backend table plus a timestamp of the last
// full refresh. Snapshots are cheap `Arc` clones; subscribers get push
// notifications through `watch` channels.

mod collection;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::model::{Alert, Equipment, Intervention, Profile, Site};
use collection::EntityCollection;

/// All collections fetched during a single refresh cycle.
pub(crate) struct RefreshSnapshot {
    pub sites: Vec<Site>,
    pub equipment: Vec<Equipment>,
    pub interventions: Vec<Intervention>,
    pub alerts: Vec<Alert>,
    pub profiles: Vec<Profile>,
}

/// Reactive storage for all entity types.
pub struct DataStore {
    pub(crate) sites: EntityCollection<Site>,
    pub(crate) equipment: EntityCollection<Equipment>,
    pub(crate) interventions: EntityCollection<Intervention>,
    pub(crate) alerts: EntityCollection<Alert>,
    pub(crate) profiles: EntityCollection<Profile>,
    pub(crate) last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    pub fn new() -> Self {
        let (last_full_refresh, _) = watch::channel(None);
        Self {
            sites: EntityCollection::new(),
            equipment: EntityCollection::new(),
            interventions: EntityCollection::new(),
            alerts: EntityCollection::new(),
            profiles: EntityCollection::new(),
            last_full_refresh,
        }
    }

    /// Apply a full backend refresh.
    ///
    /// Uses upsert-then-prune: incoming entities are upserted first, then
    /// any ids not present in the incoming set are removed. This avoids the
    /// brief "empty" state that a clear-then-insert approach would cause.
    pub(crate) fn apply_snapshot(&self, snap: RefreshSnapshot) {
        upsert_and_prune(&self.sites, snap.sites.into_iter().map(|s| (s.id, s)));
        upsert_and_prune(
            &self.equipment,
            snap.equipment.into_iter().map(|e| (e.id, e)),
        );
        upsert_and_prune(
            &self.interventions,
            snap.interventions.into_iter().map(|i| (i.id, i)),
        );
        upsert_and_prune(&self.alerts, snap.alerts.into_iter().map(|a| (a.id, a)));
        upsert_and_prune(&self.profiles, snap.profiles.into_iter().map(|p| (p.id, p)));

        let _ = self.last_full_refresh.send(Some(Utc::now()));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn sites_snapshot(&self) -> Arc<Vec<Arc<Site>>> {
        self.sites.snapshot()
    }

    pub fn equipment_snapshot(&self) -> Arc<Vec<Arc<Equipment>>> {
        self.equipment.snapshot()
    }

    pub fn interventions_snapshot(&self) -> Arc<Vec<Arc<Intervention>>> {
        self.interventions.snapshot()
    }

    pub fn alerts_snapshot(&self) -> Arc<Vec<Arc<Alert>>> {
        self.alerts.snapshot()
    }

    pub fn profiles_snapshot(&self) -> Arc<Vec<Arc<Profile>>> {
        self.profiles.snapshot()
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn site(&self, id: &Uuid) -> Option<Arc<Site>> {
        self.sites.get(id)
    }

    pub fn equipment_unit(&self, id: &Uuid) -> Option<Arc<Equipment>> {
        self.equipment.get(id)
    }

    pub fn intervention(&self, id: &Uuid) -> Option<Arc<Intervention>> {
        self.interventions.get(id)
    }

    pub fn alert(&self, id: &Uuid) -> Option<Arc<Alert>> {
        self.alerts.get(id)
    }

    pub fn profile(&self, id: &Uuid) -> Option<Arc<Profile>> {
        self.profiles.get(id)
    }

    // ── Counts ───────────────────────────────────────────────────────

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }

    pub fn intervention_count(&self) -> usize {
        self.interventions.len()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_sites(&self) -> watch::Receiver<Arc<Vec<Arc<Site>>>> {
        self.sites.subscribe()
    }

    pub fn subscribe_equipment(&self) -> watch::Receiver<Arc<Vec<Arc<Equipment>>>> {
        self.equipment.subscribe()
    }

    pub fn subscribe_interventions(&self) -> watch::Receiver<Arc<Vec<Arc<Intervention>>>> {
        self.interventions.subscribe()
    }

    pub fn subscribe_alerts(&self) -> watch::Receiver<Arc<Vec<Arc<Alert>>>> {
        self.alerts.subscribe()
    }

    /// Timestamp of the last completed full refresh.
    pub fn last_full_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_full_refresh.subscribe()
    }
}

/// Upsert all incoming entities, then prune any existing ids not in the
/// incoming set. This avoids the brief empty state that a clear would cause.
fn upsert_and_prune<T: Clone + Send + Sync + 'static>(
    collection: &EntityCollection<T>,
    items: impl Iterator<Item = (Uuid, T)>,
) {
    let mut incoming: HashSet<Uuid> = HashSet::new();
    for (id, entity) in items {
        incoming.insert(id);
        collection.upsert(id, entity);
    }
    for existing in collection.ids() {
        if !incoming.contains(&existing) {
            collection.remove(&existing);
        }
    }
}
