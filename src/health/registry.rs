use super::models::{CompositeResult, ProbeResult};
use super::probe::Probe;
use futures::future::join_all;
use indexmap::IndexMap;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::Instrument;

type ProbeSet = IndexMap<String, Arc<dyn Probe>>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("probe name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

/// Named collection of probes, executed together to produce a [`CompositeResult`].
///
/// Registering a name that is already present replaces the earlier probe (last write
/// wins) so that re-registration during tests or a reload is well defined. The
/// replaced name keeps the position of its first registration.
///
/// The probe set is copy-on-write: every check cycle runs against the snapshot that
/// was current when it started, so concurrent registrations are never half-observed.
pub struct ProbeRegistry {
    probes: RwLock<Arc<ProbeSet>>,
    timeout: Option<Duration>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self {
            probes: RwLock::new(Arc::new(ProbeSet::new())),
            timeout: None,
        }
    }

    /// Ceiling applied to every probe of a check cycle. Probes still running when it
    /// elapses are reported DOWN.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn add_probe<P>(&self, name: &str, probe: P) -> Result<(), RegistryError>
    where
        P: Probe + 'static,
    {
        self.add_shared_probe(name, Arc::new(probe)).await
    }

    pub async fn add_shared_probe(
        &self,
        name: &str,
        probe: Arc<dyn Probe>,
    ) -> Result<(), RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut probes = self.probes.write().await;
        let mut next = ProbeSet::clone(&probes);
        let replaced = next.insert(name.to_string(), probe).is_some();
        *probes = Arc::new(next);

        if replaced {
            tracing::warn!(probe = name, "Replaced previously registered probe");
        } else {
            tracing::info!(probe = name, "Registered probe");
        }

        Ok(())
    }

    pub async fn names(&self) -> Vec<String> {
        self.snapshot().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.snapshot().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshot().await.is_empty()
    }

    /// Runs every registered probe concurrently, bounded by the configured ceiling.
    pub async fn check(&self) -> CompositeResult {
        let deadline = self.timeout.map(|budget| Deadline {
            at: Instant::now() + budget,
            budget,
        });
        self.run(deadline).await
    }

    /// Like [`check`](Self::check), bounded by `budget` or the configured ceiling,
    /// whichever is shorter.
    pub async fn check_within(&self, budget: Duration) -> CompositeResult {
        let budget = match self.timeout {
            Some(ceiling) => ceiling.min(budget),
            None => budget,
        };
        self.run(Some(Deadline {
            at: Instant::now() + budget,
            budget,
        }))
        .await
    }

    async fn snapshot(&self) -> Arc<ProbeSet> {
        self.probes.read().await.clone()
    }

    async fn run(&self, deadline: Option<Deadline>) -> CompositeResult {
        let probes = self.snapshot().await;
        let started = Instant::now();

        // join_all yields outputs in input order, whatever order the probes finish in.
        let pending = probes.iter().map(|(name, probe)| {
            let span = tracing::info_span!("Run health probe", probe = %name);
            execute(probe.clone(), deadline).instrument(span)
        });
        let results = join_all(pending).await;

        let entries = probes.keys().cloned().zip(results).collect();
        let composite = CompositeResult::from_entries(entries);

        tracing::debug!(
            probes = composite.len(),
            down = composite.is_down(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Health check cycle finished"
        );

        composite
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawned probe task, aborted when dropped so that a cancelled check cycle never
/// leaves its probes running.
struct ProbeTask(JoinHandle<ProbeResult>);

impl Drop for ProbeTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn execute(probe: Arc<dyn Probe>, deadline: Option<Deadline>) -> ProbeResult {
    let mut task = ProbeTask(tokio::spawn(
        async move { probe.check().await }.in_current_span(),
    ));

    let joined = match deadline {
        Some(deadline) => match timeout_at(deadline.at, &mut task.0).await {
            Ok(joined) => joined,
            Err(_) => {
                let budget_ms = deadline.budget.as_millis() as u64;
                tracing::warn!(budget_ms, "Probe did not finish before the deadline");
                return ProbeResult::down(format!("timed out after {} ms", budget_ms));
            }
        },
        None => (&mut task.0).await,
    };

    match joined {
        Ok(result) => {
            if result.is_down() {
                tracing::warn!(detail = ?result.detail(), "Probe reported DOWN");
            }
            result
        }
        Err(err) if err.is_panic() => {
            let cause = panic_cause(err.into_panic());
            tracing::error!(cause = %cause, "Probe panicked");
            ProbeResult::down(format!("probe panicked: {}", cause))
        }
        Err(err) => {
            tracing::error!("Probe task failed: {:?}", err);
            ProbeResult::down(format!("probe task failed: {}", err))
        }
    }
}

fn panic_cause(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown cause".to_string()
    }
}
