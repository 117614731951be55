use super::{bool_filter_value, null_default, PatientRef};
use crate::constants::{CONSULTATION_DETAIL_PATH, CONSULTATION_LIST_PATH};
use crate::dates::opt_datetime;
use crate::resource::{Detailed, Listed, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub patient_id: PatientRef,
    #[serde(default, with = "opt_datetime")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub motif: String,
    #[serde(default, deserialize_with = "null_default")]
    pub diagnostic: String,
    #[serde(default, deserialize_with = "null_default")]
    pub traitement: String,
    #[serde(default, deserialize_with = "null_default")]
    pub medecin: String,
    #[serde(default, deserialize_with = "null_default")]
    pub specialite: String,

    #[serde(default)]
    pub tension_arterielle: Option<String>,
    #[serde(default)]
    pub taux_glycemie: Option<f64>,
    #[serde(default)]
    pub frequence_cardiaque: Option<f64>,
    #[serde(default)]
    pub poids: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub taille: Option<f64>,

    #[serde(default, deserialize_with = "null_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_default")]
    pub medicaments: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub instructions: String,
    #[serde(default, deserialize_with = "null_default")]
    pub allergies: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub antecedents_medicaux: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub teleconsultation: bool,
    #[serde(default)]
    pub visio_link: Option<String>,
    #[serde(default, with = "opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Consultation {
    /// Body mass index from `poids` (kg) and `taille` (cm), when both are usable.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.poids?;
        let height_m = self.taille? / 100.0;
        (weight > 0.0 && height_m > 0.0).then(|| weight / (height_m * height_m))
    }
}

impl Resource for Consultation {
    const KIND: &'static str = "consultation";
    const SELECT_FIELDS: &'static [&'static str] = &["specialite", "teleconsultation"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let [nom, prenom] = self.patient_id.name_parts();
        vec![
            self.motif.as_str(),
            self.medecin.as_str(),
            self.diagnostic.as_str(),
            self.specialite.as_str(),
            nom,
            prenom,
        ]
    }

    fn select_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "specialite" => Some(Cow::Borrowed(self.specialite.as_str())),
            "teleconsultation" => Some(Cow::Borrowed(bool_filter_value(self.teleconsultation))),
            _ => None,
        }
    }
}

impl Listed for Consultation {
    const LIST_PATH: &'static str = CONSULTATION_LIST_PATH;
}

impl Detailed for Consultation {
    const DETAIL_PATH: &'static str = CONSULTATION_DETAIL_PATH;
}

/// Payload posted to the consultation creation route.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsultation {
    pub patient_id: String,
    #[serde(with = "opt_datetime")]
    pub date: Option<DateTime<Utc>>,
    pub motif: String,
    pub diagnostic: String,
    pub traitement: String,
    pub medecin: String,
    pub specialite: String,
    pub tension_arterielle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taux_glycemie: Option<f64>,
    pub frequence_cardiaque: f64,
    pub poids: f64,
    pub temperature: f64,
    pub taille: f64,
    pub notes: String,
    pub medicaments: Vec<String>,
    pub instructions: String,
    pub allergies: Vec<String>,
    pub antecedents_medicaux: Vec<String>,
    pub teleconsultation: bool,
    pub visio_link: Option<String>,
}
