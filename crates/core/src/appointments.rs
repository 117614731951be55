//! Appointment status transitions.

use crate::gateway::{Gateway, Transport};
use crate::listing::ResourceList;
use crate::models::{RendezVous, RendezVousStatus};
use crate::{ClinicError, ClinicResult};

const TARGETS: [RendezVousStatus; 2] = [RendezVousStatus::Confirme, RendezVousStatus::Annule];

/// The statuses an appointment in `current` can be moved to.
pub fn available_actions(current: RendezVousStatus) -> Vec<RendezVousStatus> {
    TARGETS.into_iter().filter(|t| *t != current).collect()
}

/// Move appointment `id` to `target`.
///
/// The record in `list` is only touched after the gateway confirms the update. On any
/// error the list is left exactly as it was.
///
/// # Errors
///
/// - [`ClinicError::InvalidInput`] if `target` is `Pending` (not a valid action),
/// - [`ClinicError::NotFound`] if `id` is not in the loaded list,
/// - [`ClinicError::InvalidTransition`] if the appointment already has that status,
/// - any gateway error from the update itself.
pub async fn change_status<T: Transport>(
    gateway: &Gateway<T>,
    list: &mut ResourceList<RendezVous>,
    id: &str,
    target: RendezVousStatus,
) -> ClinicResult<()> {
    if !TARGETS.contains(&target) {
        return Err(ClinicError::InvalidInput(format!(
            "{} n'est pas une action possible sur un rendez-vous",
            target.label()
        )));
    }

    let current = list
        .records()
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.status)
        .ok_or_else(|| ClinicError::NotFound {
            kind: "rendez-vous",
            id: id.to_string(),
        })?;
    if current == target {
        return Err(ClinicError::InvalidTransition(target.label().to_string()));
    }

    if let Err(e) = gateway.update_rendezvous_status(id, target).await {
        tracing::warn!(%id, status = target.as_str(), "status update rejected: {e}");
        return Err(e);
    }

    if let Some(record) = list.record_mut(id) {
        record.status = target;
    }
    tracing::info!(%id, status = target.as_str(), "appointment updated");
    Ok(())
}
