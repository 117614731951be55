//! Landing-page counters.

use crate::gateway::{Gateway, Transport};
use crate::models::{Consultation, Examen, ExamenStatus, Patient, RendezVous, RendezVousStatus};
use crate::ClinicResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsultationCounts {
    pub total: usize,
    pub teleconsultations: usize,
}

impl ConsultationCounts {
    pub fn from_records(records: &[Consultation]) -> Self {
        Self {
            total: records.len(),
            teleconsultations: records.iter().filter(|c| c.teleconsultation).count(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExamenCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub canceled: usize,
}

impl ExamenCounts {
    pub fn from_records(records: &[Examen]) -> Self {
        records.iter().fold(Self::default(), |mut acc, e| {
            acc.total += 1;
            match e.status {
                ExamenStatus::Pending => acc.pending += 1,
                ExamenStatus::Completed => acc.completed += 1,
                ExamenStatus::Canceled => acc.canceled += 1,
            }
            acc
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RendezVousCounts {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub canceled: usize,
}

impl RendezVousCounts {
    pub fn from_records(records: &[RendezVous]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            match r.status {
                RendezVousStatus::Pending => acc.pending += 1,
                RendezVousStatus::Confirme => acc.confirmed += 1,
                RendezVousStatus::Annule => acc.canceled += 1,
            }
            acc
        })
    }
}

/// One result per section; `Err` holds the user-facing message of that section's failure.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub patients: Result<usize, String>,
    pub consultations: Result<ConsultationCounts, String>,
    pub examens: Result<ExamenCounts, String>,
    pub rendezvous: Result<RendezVousCounts, String>,
}

fn section<T>(name: &str, result: ClinicResult<T>) -> Result<T, String> {
    result.map_err(|e| {
        tracing::warn!(section = name, "dashboard section unavailable: {e}");
        e.user_message()
    })
}

async fn examens_across<T: Transport>(
    gateway: &Gateway<T>,
    patients: &[Patient],
) -> ClinicResult<ExamenCounts> {
    let mut all = Vec::new();
    for patient in patients {
        all.extend(gateway.examens_for_patient(&patient.id).await?);
    }
    Ok(ExamenCounts::from_records(&all))
}

/// Fetch every section independently.
///
/// Exams have no collection route, so they are gathered per patient and are only available
/// when the patient list is.
pub async fn load_dashboard<T: Transport>(gateway: &Gateway<T>) -> DashboardSummary {
    let patients = gateway.fetch_list::<Patient>().await;

    let examens = match &patients {
        Ok(patients) => section("examens", examens_across(gateway, patients).await),
        Err(e) => Err(e.user_message()),
    };

    let consultations = gateway
        .fetch_list::<Consultation>()
        .await
        .map(|records| ConsultationCounts::from_records(&records));
    let rendezvous = gateway
        .fetch_list::<RendezVous>()
        .await
        .map(|records| RendezVousCounts::from_records(&records));

    DashboardSummary {
        patients: section("patients", patients.map(|records| records.len())),
        consultations: section("consultations", consultations),
        examens,
        rendezvous: section("rendezvous", rendezvous),
    }
}
