//! Single-record loading and the presentational fields derived from it.

use crate::dates::{format_date, format_datetime_date, format_time};
use crate::gateway::{Gateway, Transport};
use crate::listing::LoadState;
use crate::models::{Consultation, Examen, Patient};
use crate::resource::Detailed;
use crate::ClinicResult;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

/// Age in whole years at `today`, counting only birthdays already reached.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// [`age_on`] against the local calendar date.
pub fn age_today(birth: NaiveDate) -> i32 {
    age_on(birth, Local::now().date_naive())
}

/// Detail controller for one record of a [`Detailed`] resource.
#[derive(Clone, Debug)]
pub struct ResourceDetail<R> {
    id: Option<String>,
    state: LoadState<R>,
}

impl<R: Detailed> Default for ResourceDetail<R> {
    fn default() -> Self {
        Self {
            id: None,
            state: LoadState::Loading,
        }
    }
}

impl<R: Detailed> ResourceDetail<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the record for `id`. A fetch failure and an absent record end in the same
    /// `Failed` state.
    pub async fn load<T: Transport>(&mut self, gateway: &Gateway<T>, id: &str) {
        self.id = Some(id.to_string());
        self.state = LoadState::Loading;
        self.state = match gateway.fetch_one::<R>(id).await {
            Ok(record) => LoadState::Ready(record),
            Err(e) => {
                tracing::warn!(kind = R::KIND, %id, "detail fetch failed: {e}");
                LoadState::Failed(e.user_message())
            }
        };
    }

    /// Load only when `id` differs from the record on display or the last load did not
    /// succeed.
    pub async fn show<T: Transport>(&mut self, gateway: &Gateway<T>, id: &str) {
        let current = self.id.as_deref() == Some(id);
        if !(current && matches!(self.state, LoadState::Ready(_))) {
            self.load(gateway, id).await;
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> &LoadState<R> {
        &self.state
    }

    pub fn record(&self) -> Option<&R> {
        match &self.state {
            LoadState::Ready(record) => Some(record),
            _ => None,
        }
    }
}

/// Display-ready fields of a patient card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientCard {
    pub full_name: String,
    pub age: Option<i32>,
    pub gender: &'static str,
    pub birth_date: Option<String>,
    pub registered_on: Option<String>,
}

impl PatientCard {
    pub fn new(patient: &Patient, today: NaiveDate) -> Self {
        Self {
            full_name: patient.full_name(),
            age: patient.birth_date.map(|birth| age_on(birth, today)),
            gender: patient.gender.label(),
            birth_date: patient.birth_date.map(format_date),
            registered_on: patient.created_at.as_ref().map(format_datetime_date),
        }
    }
}

/// `dd/mm/yyyy à HH:MM`, or `-` when the timestamp is missing.
pub fn format_appointment_time(dt: Option<&DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => format!("{} à {}", format_datetime_date(dt), format_time(dt)),
        None => "-".to_string(),
    }
}

/// A patient with the consultations and exams shown on their page.
#[derive(Clone, Debug)]
pub struct PatientOverview {
    pub patient: Patient,
    pub consultations: Vec<Consultation>,
    pub examens: Vec<Examen>,
    /// One note per sub-fetch that failed and was replaced by an empty list.
    pub degraded: Vec<String>,
}

/// Load a patient page.
///
/// The patient fetch must succeed. The consultation and exam sub-fetches are independent:
/// a failure leaves that section empty and is recorded in [`PatientOverview::degraded`].
pub async fn load_patient_overview<T: Transport>(
    gateway: &Gateway<T>,
    patient_id: &str,
) -> ClinicResult<PatientOverview> {
    let patient = gateway.fetch_one::<Patient>(patient_id).await?;
    let mut degraded = Vec::new();

    let consultations = match gateway.consultations_for_patient(patient_id).await {
        Ok(consultations) => consultations,
        Err(e) => {
            tracing::warn!(%patient_id, "consultations unavailable: {e}");
            degraded.push(format!("consultations indisponibles: {}", e.user_message()));
            Vec::new()
        }
    };

    let examens = match gateway.examens_for_patient(patient_id).await {
        Ok(examens) => examens,
        Err(e) => {
            tracing::warn!(%patient_id, "exams unavailable: {e}");
            degraded.push(format!("examens indisponibles: {}", e.user_message()));
            Vec::new()
        }
    };

    Ok(PatientOverview {
        patient,
        consultations,
        examens,
        degraded,
    })
}
