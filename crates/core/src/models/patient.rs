use super::null_default;
use crate::constants::{PATIENT_DETAIL_PATH, PATIENT_LIST_PATH};
use crate::dates::{opt_date, opt_datetime};
use crate::resource::{Detailed, Listed, Resource};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// French label shown on patient cards.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Homme",
            Gender::Female => "Femme",
            Gender::Other => "Autre",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default, deserialize_with = "null_default")]
    pub nom: String,
    #[serde(default, deserialize_with = "null_default")]
    pub prenom: String,
    #[serde(default, deserialize_with = "null_default")]
    pub relation: String,
    #[serde(default, deserialize_with = "null_default")]
    pub telephone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub nom: String,
    #[serde(default, deserialize_with = "null_default")]
    pub prenom: String,
    #[serde(default, with = "opt_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_default")]
    pub telephone: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub gender: Gender,
    #[serde(rename = "emergencycontact", default, deserialize_with = "null_default")]
    pub emergency_contacts: Vec<EmergencyContact>,
    #[serde(default, with = "opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom.trim(), self.nom.trim())
            .trim()
            .to_string()
    }
}

impl Resource for Patient {
    const KIND: &'static str = "patient";
    const SELECT_FIELDS: &'static [&'static str] = &["gender"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.nom.as_str(),
            self.prenom.as_str(),
            self.email.as_str(),
            self.telephone.as_str(),
        ]
    }

    fn select_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "gender" => Some(Cow::Borrowed(self.gender.as_str())),
            _ => None,
        }
    }
}

impl Listed for Patient {
    const LIST_PATH: &'static str = PATIENT_LIST_PATH;
}

impl Detailed for Patient {
    const DETAIL_PATH: &'static str = PATIENT_DETAIL_PATH;
}

/// Normalised patient creation payload.
///
/// Produced by [`crate::forms::PatientDraft`]; the gateway exposes no create route for
/// patients, so this is only ever previewed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub nom: String,
    pub prenom: String,
    #[serde(with = "opt_date")]
    pub birth_date: Option<NaiveDate>,
    pub telephone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub gender: Gender,
    #[serde(rename = "emergencycontact")]
    pub emergency_contacts: Vec<EmergencyContact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_gateway_patient() {
        let json = r#"{
            "_id": "665f1c2e9b1d",
            "nom": "Dupont",
            "prenom": "Marie",
            "birthDate": "1985-04-12T00:00:00.000Z",
            "telephone": "0601020304",
            "email": "marie.dupont@example.fr",
            "gender": "female",
            "emergencycontact": [
                {"nom": "Dupont", "prenom": "Paul", "relation": "Époux", "telephone": "0605060708"}
            ],
            "createdAt": "2024-01-10T09:15:00.000Z"
        }"#;

        let patient: Patient = serde_json::from_str(json).expect("valid patient");
        assert_eq!(patient.full_name(), "Marie Dupont");
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(1985, 4, 12));
        assert_eq!(patient.emergency_contacts.len(), 1);
        assert!(patient.emergency_contacts[0].email.is_none());
        assert!(patient.created_at.is_some());
    }

    #[test]
    fn unknown_gender_is_other() {
        let patient: Patient =
            serde_json::from_str(r#"{"id": "1", "gender": "unspecified"}"#).unwrap();
        assert_eq!(patient.gender, Gender::Other);
        assert!(patient.birth_date.is_none());
    }

    #[test]
    fn gender_is_the_only_select_field() {
        let patient: Patient = serde_json::from_str(r#"{"_id": "1", "gender": "male"}"#).unwrap();
        assert_eq!(patient.select_value("gender").as_deref(), Some("male"));
        assert_eq!(patient.select_value("status"), None);
    }
}
