use crate::domain::model::{ChangeSetDescription, ChangeSetRequest, StartedChangeSet};
use crate::domain::ports::CatalogClient;
use crate::utils::error::{MpError, Result};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_MAX_RECHECKS: u32 = 10;
pub const DEFAULT_CONFLICT_WAIT_PERIOD: Duration = Duration::from_secs(1800);

/// How long to keep trying when another change set holds the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecheckPolicy {
    pub max_rechecks: u32,
    pub conflict_wait_period: Duration,
}

impl Default for RecheckPolicy {
    fn default() -> Self {
        Self {
            max_rechecks: DEFAULT_MAX_RECHECKS,
            conflict_wait_period: DEFAULT_CONFLICT_WAIT_PERIOD,
        }
    }
}

impl RecheckPolicy {
    pub fn new(max_rechecks: Option<u32>, conflict_wait_period: Option<u64>) -> Self {
        let defaults = Self::default();
        Self {
            max_rechecks: max_rechecks.unwrap_or(defaults.max_rechecks),
            conflict_wait_period: conflict_wait_period
                .map(Duration::from_secs)
                .unwrap_or(defaults.conflict_wait_period),
        }
    }
}

pub async fn get_change_set<C: CatalogClient + ?Sized>(
    client: &C,
    change_set_id: &str,
) -> Result<ChangeSetDescription> {
    client.describe_change_set(change_set_id).await
}

pub async fn cancel_change_set<C: CatalogClient + ?Sized>(
    client: &C,
    change_set_id: &str,
) -> Result<StartedChangeSet> {
    client.cancel_change_set(change_set_id).await
}

/// Starts a change set, waiting out conflicting change sets.
///
/// A `ResourceInUseException` means another change set currently locks one
/// of the entities. Each wait of `conflict_wait_period` counts as one
/// recheck. When the locking change set id is present in the error message
/// the waits poll it and the start is retried as soon as it is finished,
/// otherwise the start is retried after every wait.
pub async fn start_mp_change_set<C: CatalogClient + ?Sized>(
    client: &C,
    request: &ChangeSetRequest,
    policy: &RecheckPolicy,
) -> Result<StartedChangeSet> {
    let mut checks = 0u32;

    loop {
        let err = match client.start_change_set(request).await {
            Ok(started) => {
                tracing::info!("Started change set {}", started.change_set_id);
                return Ok(started);
            }
            Err(err) if err.is_resource_in_use() => err,
            Err(err) => return Err(err),
        };

        let message = err.to_string();
        let ongoing = ongoing_change_set_id(&message);
        tracing::info!(
            "Change set conflicts with ongoing change set {}",
            ongoing.as_deref().unwrap_or("<unknown>")
        );

        loop {
            if checks >= policy.max_rechecks {
                return Err(MpError::ChangeSetConflict { checks, message });
            }
            checks += 1;
            tracing::debug!(
                "Waiting {:?} before recheck {}/{}",
                policy.conflict_wait_period,
                checks,
                policy.max_rechecks
            );
            tokio::time::sleep(policy.conflict_wait_period).await;

            let Some(ongoing_id) = ongoing.as_deref() else {
                break;
            };
            match client.describe_change_set(ongoing_id).await {
                Ok(description) if !description.is_finished() => continue,
                Ok(_) => break,
                Err(e) => {
                    tracing::warn!("Unable to check change set {}: {}", ongoing_id, e);
                    break;
                }
            }
        }
    }
}

/// Extracts the id of the change set holding the lock from a
/// `ResourceInUseException` message.
pub fn ongoing_change_set_id(message: &str) -> Option<String> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"change sets?\s*[-:]?\s*\[?([A-Za-z0-9]{20,})").ok())
        .as_ref()?
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}
