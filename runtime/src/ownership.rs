//! Ownership restoration for extracted files.
//!
//! A system-wide Ollama install runs as a dedicated `ollama` user; files
//! dropped into its models directory must belong to that account or the
//! server cannot read them. On machines without that account nothing is
//! changed.

use std::path::Path;

use nix::unistd::{chown, Gid, Group, Uid, User};
use ollie_core::error::{OllieError, Result};

/// Resolved uid/gid pair of the service account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceAccount {
    pub uid: Uid,
    pub gid: Gid,
}

/// Outcome of looking up the service account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    /// Both the user and the group exist
    Found(ServiceAccount),
    /// The user or the group does not exist
    Missing,
    /// The account database could not be queried
    Failed(String),
}

impl ServiceAccount {
    /// Look up a user and a group sharing the same name.
    pub fn lookup(name: &str) -> AccountLookup {
        let user = match User::from_name(name) {
            Ok(Some(user)) => user,
            Ok(None) => return AccountLookup::Missing,
            Err(e) => return AccountLookup::Failed(format!("user {name}: {e}")),
        };

        let group = match Group::from_name(name) {
            Ok(Some(group)) => group,
            Ok(None) => return AccountLookup::Missing,
            Err(e) => return AccountLookup::Failed(format!("group {name}: {e}")),
        };

        AccountLookup::Found(ServiceAccount {
            uid: user.uid,
            gid: group.gid,
        })
    }
}

/// Result of one ownership change attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChownOutcome {
    /// Ownership was set to the service account
    Applied,
    /// No service account; the path keeps its current owner
    SkippedNoAccount,
}

/// Ownership policy for an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Chown every created path to this account
    Apply(ServiceAccount),
    /// Leave ownership alone
    Skip,
}

impl Ownership {
    /// Build the policy from a lookup result.
    ///
    /// A failed lookup is treated like a missing account.
    pub fn from_lookup(lookup: AccountLookup) -> Self {
        match lookup {
            AccountLookup::Found(account) => {
                tracing::debug!(
                    uid = account.uid.as_raw(),
                    gid = account.gid.as_raw(),
                    "Restoring ownership to service account"
                );
                Self::Apply(account)
            }
            AccountLookup::Missing => {
                tracing::debug!("Service account not found, keeping current ownership");
                Self::Skip
            }
            AccountLookup::Failed(reason) => {
                tracing::warn!(%reason, "Service account lookup failed, keeping current ownership");
                Self::Skip
            }
        }
    }

    /// Resolve the policy for a named account.
    pub fn for_account(name: &str) -> Self {
        Self::from_lookup(ServiceAccount::lookup(name))
    }

    /// Set ownership of `path` according to the policy.
    pub fn apply(&self, path: &Path) -> Result<ChownOutcome> {
        match self {
            Self::Skip => Ok(ChownOutcome::SkippedNoAccount),
            Self::Apply(account) => {
                chown(path, Some(account.uid), Some(account.gid)).map_err(|e| {
                    OllieError::ExtractWriteError(format!(
                        "failed to set ownership for {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(ChownOutcome::Applied)
            }
        }
    }
}
