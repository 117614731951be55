//! Gateway entity models.
//!
//! Field names follow the gateway's JSON (camelCase, `_id` identifiers). Every field the
//! dashboard can live without is defaulted, so a partially filled record still loads.

pub mod article;
pub mod consultation;
pub mod examen;
pub mod patient;
pub mod rendezvous;
pub mod user;

pub use article::Article;
pub use consultation::{Consultation, NewConsultation};
pub use examen::{Examen, ExamenStatus, NewExamen, EXAMEN_TYPES};
pub use patient::{EmergencyContact, Gender, NewPatient, Patient};
pub use rendezvous::{RendezVous, RendezVousKind, RendezVousStatus};
pub use user::{UserData, UserProfile};

use serde::{Deserialize, Deserializer, Serialize};

/// Reference from a record to its patient.
///
/// The gateway sends either the bare identifier or, on populated routes, a small patient
/// object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatientRef {
    Id(String),
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default, deserialize_with = "null_default")]
        nom: String,
        #[serde(default, deserialize_with = "null_default")]
        prenom: String,
    },
}

impl PatientRef {
    pub fn id(&self) -> &str {
        match self {
            PatientRef::Id(id) => id,
            PatientRef::Populated { id, .. } => id,
        }
    }

    /// "Prénom Nom" when the reference was populated with names.
    pub fn display_name(&self) -> Option<String> {
        match self {
            PatientRef::Id(_) => None,
            PatientRef::Populated { nom, prenom, .. } => {
                let name = format!("{} {}", prenom.trim(), nom.trim());
                let name = name.trim();
                (!name.is_empty()).then(|| name.to_string())
            }
        }
    }

    fn name_parts(&self) -> [&str; 2] {
        match self {
            PatientRef::Id(_) => ["", ""],
            PatientRef::Populated { nom, prenom, .. } => [nom.as_str(), prenom.as_str()],
        }
    }
}

impl Default for PatientRef {
    fn default() -> Self {
        PatientRef::Id(String::new())
    }
}

/// Reads an explicit `null` the same way as a missing key.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Select-filter value for boolean fields (`"true"` / `"false"`).
pub(crate) fn bool_filter_value(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_ref_accepts_both_shapes() {
        let bare: PatientRef = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(bare.id(), "p1");
        assert_eq!(bare.display_name(), None);

        let populated: PatientRef =
            serde_json::from_str(r#"{"_id":"p2","nom":"Dupont","prenom":"Marie"}"#).unwrap();
        assert_eq!(populated.id(), "p2");
        assert_eq!(populated.display_name().as_deref(), Some("Marie Dupont"));
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let consultation: Consultation = serde_json::from_str(
            r#"{"_id": "c2", "patientId": null, "motif": null, "allergies": null}"#,
        )
        .unwrap();
        assert_eq!(consultation.patient_id.id(), "");
        assert!(consultation.motif.is_empty());
        assert!(consultation.allergies.is_empty());

        let patient: Patient = serde_json::from_str(
            r#"{"_id": "p1", "email": null, "gender": null, "emergencycontact": null}"#,
        )
        .unwrap();
        assert!(patient.email.is_empty());
        assert_eq!(patient.gender, Gender::Other);

        let rdv: RendezVous =
            serde_json::from_str(r#"{"_id": "r1", "status": null, "type": null}"#).unwrap();
        assert_eq!(rdv.status, RendezVousStatus::Pending);
        assert_eq!(rdv.kind, RendezVousKind::Presentiel);
    }
}
