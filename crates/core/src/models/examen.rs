use super::{null_default, PatientRef};
use crate::constants::EXAMEN_DETAIL_PATH;
use crate::dates::opt_datetime;
use crate::resource::{Detailed, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Exam types offered by the creation form.
pub const EXAMEN_TYPES: &[&str] = &[
    "Analyse",
    "Radiographie",
    "Échographie",
    "Scanner",
    "IRM",
    "Opération",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamenStatus {
    Completed,
    Canceled,
    #[default]
    #[serde(other)]
    Pending,
}

impl ExamenStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExamenStatus::Completed => "completed",
            ExamenStatus::Pending => "pending",
            ExamenStatus::Canceled => "canceled",
        }
    }

    /// Badge text shown next to the exam.
    pub fn label(self) -> &'static str {
        match self {
            ExamenStatus::Completed => "Terminé",
            ExamenStatus::Pending => "En attente",
            ExamenStatus::Canceled => "Annulé",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Examen {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub patient_id: PatientRef,
    #[serde(default, deserialize_with = "null_default")]
    pub medecin: String,
    #[serde(default, deserialize_with = "null_default")]
    pub specialite: String,
    #[serde(default, deserialize_with = "null_default")]
    pub type_examen: String,
    #[serde(default, with = "opt_datetime")]
    pub date_examen: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub resultat_examen: String,
    #[serde(default)]
    pub fichier_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: ExamenStatus,
}

impl Resource for Examen {
    const KIND: &'static str = "examen";
    const SELECT_FIELDS: &'static [&'static str] = &["typeExamen", "status"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.medecin.as_str(),
            self.specialite.as_str(),
            self.type_examen.as_str(),
            self.resultat_examen.as_str(),
        ]
    }

    fn select_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "typeExamen" => Some(Cow::Borrowed(self.type_examen.as_str())),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }
}

impl Detailed for Examen {
    const DETAIL_PATH: &'static str = EXAMEN_DETAIL_PATH;
}

/// Normalised exam creation payload (form-only; the gateway has no create route).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExamen {
    pub patient_id: String,
    pub medecin: String,
    pub specialite: String,
    pub type_examen: String,
    #[serde(with = "opt_datetime")]
    pub date_examen: Option<DateTime<Utc>>,
    pub resultat_examen: String,
    pub fichier_url: Option<String>,
    pub status: ExamenStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending() {
        let examen: Examen =
            serde_json::from_str(r#"{"_id": "e1", "typeExamen": "IRM"}"#).unwrap();
        assert_eq!(examen.status, ExamenStatus::Pending);
        assert_eq!(examen.select_value("typeExamen").as_deref(), Some("IRM"));

        let examen: Examen =
            serde_json::from_str(r#"{"_id": "e2", "status": "archived"}"#).unwrap();
        assert_eq!(examen.status, ExamenStatus::Pending);
    }

    #[test]
    fn parses_file_url_and_date() {
        let examen: Examen = serde_json::from_str(
            r#"{
                "_id": "e1",
                "patientId": "p1",
                "typeExamen": "Échographie",
                "dateExamen": "2024-02-20T08:00:00.000Z",
                "fichierUrl": "https://files.example.fr/e1.pdf",
                "status": "completed"
            }"#,
        )
        .unwrap();
        assert_eq!(examen.status.label(), "Terminé");
        assert!(examen.date_examen.is_some());
        assert_eq!(
            examen.fichier_url.as_deref(),
            Some("https://files.example.fr/e1.pdf")
        );
    }
}
