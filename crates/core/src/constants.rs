//! Constants used throughout the clinic core crate.
//!
//! Gateway endpoints and the literal confirmation messages live here so that the
//! controllers and the HTTP transport agree on them.

/// Fallback gateway origin when `CLINIC_API_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Filter value meaning "no constraint on this dimension".
pub const FILTER_ALL: &str = "all";

/// Default number of articles returned by the "latest" query.
pub const DEFAULT_LATEST_LIMIT: usize = 6;

pub const LOGIN_PATH: &str = "/login";

pub const PATIENT_LIST_PATH: &str = "/get-all-patient";
pub const PATIENT_DETAIL_PATH: &str = "/get-patient";
pub const PATIENT_CONSULTATIONS_PATH: &str = "/get-consultations-patient";
pub const PATIENT_EXAMENS_PATH: &str = "/get-examen-patient";

pub const CONSULTATION_LIST_PATH: &str = "/get-all-consultations";
pub const CONSULTATION_DETAIL_PATH: &str = "/get-consultation";
pub const CONSULTATION_CREATE_PATH: &str = "/create-consultation";

/// The gateway has no "all exams" route; exams are listed per patient.
pub const EXAMEN_DETAIL_PATH: &str = "/get-examen";

pub const RENDEZVOUS_LIST_PATH: &str = "/get-all-rendezvous";
pub const RENDEZVOUS_UPDATE_PATH: &str = "/update-rendezvous";

pub const USER_LIST_PATH: &str = "/get-all-user";

/// Response `message` the gateway sends after creating a consultation.
pub const CONSULTATION_CREATED_MESSAGE: &str = "Consultation créée avec succès";

/// Response `message` the gateway sends after updating an appointment.
pub const RENDEZVOUS_UPDATED_MESSAGE: &str = "Rendez-vous mis à jour avec succès";

/// Shown when neither the gateway nor the transport produced a usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Une erreur est survenue. Veuillez réessayer.";
