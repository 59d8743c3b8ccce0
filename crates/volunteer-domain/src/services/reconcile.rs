//! Assignment reconciliation
//!
//! Computes the add/remove lists that turn a persisted assignee set into a
//! desired one. The caller snapshots `persisted` once per edit session and
//! never re-reads it mid-batch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Add/remove operations for one task, each list sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDiff {
    pub to_add: Vec<UserId>,
    pub to_remove: Vec<UserId>,
}

impl AssignmentDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }

    /// `persisted ∪ to_add − to_remove`
    pub fn apply(&self, persisted: &BTreeSet<UserId>) -> BTreeSet<UserId> {
        let mut result = persisted.clone();
        result.extend(self.to_add.iter().copied());
        for user in &self.to_remove {
            result.remove(user);
        }
        result
    }
}

pub struct AssignmentReconciler;

impl AssignmentReconciler {
    /// `to_add = desired − persisted`, `to_remove = persisted − desired`
    pub fn reconcile(persisted: &BTreeSet<UserId>, desired: &BTreeSet<UserId>) -> AssignmentDiff {
        AssignmentDiff {
            to_add: desired.difference(persisted).copied().collect(),
            to_remove: persisted.difference(desired).copied().collect(),
        }
    }

    /// Same as [`reconcile`](Self::reconcile) for arbitrary id collections;
    /// duplicates are ignored.
    pub fn reconcile_ids<P, D>(persisted: P, desired: D) -> AssignmentDiff
    where
        P: IntoIterator<Item = UserId>,
        D: IntoIterator<Item = UserId>,
    {
        let persisted: BTreeSet<UserId> = persisted.into_iter().collect();
        let desired: BTreeSet<UserId> = desired.into_iter().collect();
        Self::reconcile(&persisted, &desired)
    }
}
