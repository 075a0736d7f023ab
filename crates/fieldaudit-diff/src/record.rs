//! Audit records built from before/after snapshots.

use fieldaudit_types::{ChangeSet, IgnoredFields};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::DiffResult;
use crate::flat_diff::{compute_flat_changes, FlatRecord};

/// A request to audit one change, as submitted by a caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub before: FlatRecord,
    pub after: FlatRecord,
    pub origin: String,
    pub user_agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_fields: Option<IgnoredFields>,
}

/// The audited change: who made it and which fields changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Assigned when the record is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub origin: String,
    pub user_agent: String,
    pub changes: ChangeSet,
}

impl AuditRecord {
    /// Diff the request's snapshots into a record.
    ///
    /// `defaults` are ignored in addition to the request's own ignored fields.
    pub fn create(request: &AuditRequest, defaults: &IgnoredFields) -> DiffResult<Self> {
        let mut ignored = defaults.clone();
        if let Some(fields) = &request.ignored_fields {
            ignored.merge(fields);
        }
        let changes = compute_flat_changes(&request.before, &request.after, &ignored)?;
        info!(origin = %request.origin, changed = changes.len(), "audit record created");
        Ok(Self {
            id: None,
            origin: request.origin.clone(),
            user_agent: request.user_agent.clone(),
            changes,
        })
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Assign a fresh time-ordered id.
    pub fn assign_id(self) -> Self {
        self.with_id(Uuid::now_v7())
    }

    /// Returns `true` if the record holds no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
