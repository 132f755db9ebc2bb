use crate::error::VrgError;
use crate::snapshot::{
    CreateSnapshotOptions, ListFilter, Snapshot, SnapshotManager, SnapshotRef, SnapshotTenant,
    SnapshotVm,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Polling used by `snapshot create --wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Snapshot command operations on top of a [`SnapshotManager`].
pub struct SnapshotCommandService<'a> {
    manager: &'a dyn SnapshotManager,
    wait: WaitPolicy,
}

impl<'a> SnapshotCommandService<'a> {
    pub fn new(manager: &'a dyn SnapshotManager, wait: WaitPolicy) -> Self {
        Self { manager, wait }
    }

    /// Snapshots newest first. Expired ones are dropped unless
    /// `include_expired`.
    pub async fn list(&self, include_expired: bool, now: i64) -> Result<Vec<Snapshot>, VrgError> {
        let mut snapshots = self.manager.list(None).await?;
        let total = snapshots.len();
        if !include_expired {
            snapshots.retain(|s| !s.is_expired(now));
        }
        debug!(
            total,
            shown = snapshots.len(),
            include_expired,
            "Listed cloud snapshots"
        );
        snapshots.sort_by(|a, b| b.created.cmp(&a.created).then(b.key.cmp(&a.key)));
        Ok(snapshots)
    }

    /// Resolve a key or name to exactly one snapshot.
    pub async fn resolve(&self, reference: &SnapshotRef) -> Result<Snapshot, VrgError> {
        match reference {
            SnapshotRef::Key(key) => self.manager.get(*key).await,
            SnapshotRef::Name(name) => {
                let filter = ListFilter::by_name(name.clone());
                let mut matches: Vec<Snapshot> = self
                    .manager
                    .list(Some(&filter))
                    .await?
                    .into_iter()
                    .filter(|s| s.name == *name)
                    .collect();
                match matches.len() {
                    0 => Err(VrgError::not_found("Snapshot", name.clone())),
                    1 => Ok(matches.remove(0)),
                    n => {
                        let keys: Vec<String> = matches.iter().map(|s| s.key.to_string()).collect();
                        Err(VrgError::Conflict(format!(
                            "{} snapshots are named '{}' (keys: {}); specify the key instead",
                            n,
                            name,
                            keys.join(", ")
                        )))
                    }
                }
            }
        }
    }

    pub async fn get(&self, reference: &SnapshotRef) -> Result<Snapshot, VrgError> {
        self.resolve(reference).await
    }

    /// Create a snapshot. Options are validated before any remote call;
    /// with `wait` set, polls until the snapshot leaves its transitional
    /// status or the wait policy times out.
    pub async fn create(&self, options: &CreateSnapshotOptions) -> Result<Snapshot, VrgError> {
        options.validate()?;

        let created = self.manager.create(options).await?;
        info!(key = created.key, name = %created.name, "Cloud snapshot created");

        if options.wait {
            self.wait_until_ready(created).await
        } else {
            Ok(created)
        }
    }

    async fn wait_until_ready(&self, mut snapshot: Snapshot) -> Result<Snapshot, VrgError> {
        let started = Instant::now();
        while snapshot.is_in_progress() {
            if started.elapsed() >= self.wait.timeout {
                return Err(VrgError::Timeout(format!(
                    "snapshot '{}' (key {}) still {} after {}s",
                    snapshot.name,
                    snapshot.key,
                    snapshot.status.as_deref().unwrap_or("in progress"),
                    self.wait.timeout.as_secs()
                )));
            }
            tokio::time::sleep(self.wait.poll_interval).await;
            snapshot = self.manager.get(snapshot.key).await?;
            debug!(key = snapshot.key, status = ?snapshot.status, "Polled cloud snapshot");
        }
        Ok(snapshot)
    }

    pub async fn delete(&self, snapshot: &Snapshot) -> Result<(), VrgError> {
        self.manager.delete(snapshot.key).await?;
        info!(key = snapshot.key, name = %snapshot.name, "Cloud snapshot deleted");
        Ok(())
    }

    pub async fn vms(&self, reference: &SnapshotRef) -> Result<(Snapshot, Vec<SnapshotVm>), VrgError> {
        let snapshot = self.resolve(reference).await?;
        let vms = self.manager.vms(snapshot.key).await?;
        Ok((snapshot, vms))
    }

    pub async fn tenants(
        &self,
        reference: &SnapshotRef,
    ) -> Result<(Snapshot, Vec<SnapshotTenant>), VrgError> {
        let snapshot = self.resolve(reference).await?;
        let tenants = self.manager.tenants(snapshot.key).await?;
        Ok((snapshot, tenants))
    }
}
