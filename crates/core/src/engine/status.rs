use eyre::eyre;
use tracing::info;
use uuid::Uuid;

use super::record_history;
use crate::errors::{ClinicError, ClinicResult};
use crate::models::{
    appointment::{Appointment, AppointmentStatus},
    history::{HistoryAction, NewHistoryEntry},
};
use crate::store::StoreHandle;

/// Result for one id of a bulk status change.
#[derive(Debug)]
pub struct BulkStatusOutcome {
    pub appointment_id: Uuid,
    pub result: ClinicResult<Appointment>,
}

/// Applies administrator status changes.
#[derive(Clone)]
pub struct StatusManager {
    store: StoreHandle,
}

impl StatusManager {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Marks an appointment `done` or `cancelled`.
    ///
    /// `booked` is never a valid target. Terminal statuses only accept the status
    /// they already have, which returns the record unchanged.
    pub async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> ClinicResult<Appointment> {
        if status == AppointmentStatus::Booked {
            return Err(ClinicError::Validation(
                "Appointments can only be marked done or cancelled".to_string(),
            ));
        }

        let current = self.find(id).await?;
        if !current.status.can_transition_to(status) {
            return Err(ClinicError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }
        if current.status == status {
            return Ok(current);
        }

        let updated = self
            .store
            .run(
                "update_status",
                self.store.inner().update_status(id, current.status, status),
            )
            .await?;

        let updated = match updated {
            Some(updated) => updated,
            None => {
                // Changed or removed by someone else since we read it.
                let latest = self.find(id).await?;
                if latest.status == status {
                    return Ok(latest);
                }
                return Err(ClinicError::InvalidTransition {
                    from: latest.status,
                    to: status,
                });
            }
        };

        info!(appointment_id = %id, from = %current.status, to = %status, "appointment status changed");
        if let Some(action) = HistoryAction::for_status(status) {
            record_history(&self.store, NewHistoryEntry::from_appointment(&updated, action)).await;
        }

        Ok(updated)
    }

    /// Applies [`set_status`](Self::set_status) to every id independently.
    ///
    /// Updates run concurrently; a failure on one id never affects the others.
    /// Results come back in input order.
    pub async fn bulk_set_status(
        &self,
        ids: Vec<Uuid>,
        status: AppointmentStatus,
    ) -> Vec<BulkStatusOutcome> {
        let handles: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let manager = self.clone();
                (id, tokio::spawn(async move { manager.set_status(id, status).await }))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (appointment_id, handle) in handles {
            let result = handle.await.unwrap_or_else(|err| {
                tracing::error!(%appointment_id, error = %err, "status update task failed");
                Err(ClinicError::Store(eyre!(
                    "status update for {} did not complete: {}",
                    appointment_id,
                    err
                )))
            });
            outcomes.push(BulkStatusOutcome {
                appointment_id,
                result,
            });
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(total = outcomes.len(), failed, to = %status, "bulk status change finished");
        outcomes
    }

    async fn find(&self, id: Uuid) -> ClinicResult<Appointment> {
        self.store
            .run("find_by_id", self.store.inner().find_by_id(id))
            .await?
            .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))
    }
}
