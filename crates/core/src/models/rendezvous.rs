use super::{null_default, PatientRef};
use crate::constants::RENDEZVOUS_LIST_PATH;
use crate::dates::opt_datetime;
use crate::resource::{Listed, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Appointment status as stored by the gateway.
///
/// Anything other than the two French terminal labels reads as `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendezVousStatus {
    #[serde(rename = "Confirmé")]
    Confirme,
    #[serde(rename = "Annulé")]
    Annule,
    #[default]
    #[serde(rename = "pending", other)]
    Pending,
}

impl RendezVousStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RendezVousStatus::Pending => "pending",
            RendezVousStatus::Confirme => "Confirmé",
            RendezVousStatus::Annule => "Annulé",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RendezVousStatus::Pending => "En attente",
            RendezVousStatus::Confirme => "Confirmé",
            RendezVousStatus::Annule => "Annulé",
        }
    }

    /// Accepts the stored value or a plain ASCII spelling ("confirme", "annule").
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" | "en attente" => Some(RendezVousStatus::Pending),
            "confirmé" | "confirme" | "confirmed" => Some(RendezVousStatus::Confirme),
            "annulé" | "annule" | "cancelled" | "canceled" => Some(RendezVousStatus::Annule),
            _ => None,
        }
    }
}

impl std::fmt::Display for RendezVousStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendezVousKind {
    #[serde(rename = "téléconsultation")]
    Teleconsultation,
    #[default]
    #[serde(rename = "presentiel", other)]
    Presentiel,
}

impl RendezVousKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendezVousKind::Presentiel => "presentiel",
            RendezVousKind::Teleconsultation => "téléconsultation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendezVous {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub patient_id: PatientRef,
    #[serde(default, deserialize_with = "null_default")]
    pub motif: String,
    #[serde(default, deserialize_with = "null_default")]
    pub specialite: String,
    #[serde(default, deserialize_with = "null_default")]
    pub heure: String,
    #[serde(default, with = "opt_datetime")]
    pub date_reservation: Option<DateTime<Utc>>,
    #[serde(default, with = "opt_datetime")]
    pub date_rdv: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: RendezVousStatus,
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    pub kind: RendezVousKind,
    #[serde(default, deserialize_with = "null_default")]
    pub notification: bool,
}

impl Resource for RendezVous {
    const KIND: &'static str = "rendez-vous";
    const SELECT_FIELDS: &'static [&'static str] = &["status", "type"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let [nom, prenom] = self.patient_id.name_parts();
        vec![self.motif.as_str(), self.specialite.as_str(), nom, prenom]
    }

    fn select_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "type" => Some(Cow::Borrowed(self.kind.as_str())),
            _ => None,
        }
    }
}

impl Listed for RendezVous {
    const LIST_PATH: &'static str = RENDEZVOUS_LIST_PATH;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_french_labels() {
        let rdv: RendezVous =
            serde_json::from_str(r#"{"_id": "r1", "status": "Confirmé", "type": "téléconsultation"}"#)
                .unwrap();
        assert_eq!(rdv.status, RendezVousStatus::Confirme);
        assert_eq!(rdv.kind, RendezVousKind::Teleconsultation);

        let json = serde_json::to_value(RendezVousStatus::Annule).unwrap();
        assert_eq!(json, "Annulé");
    }

    #[test]
    fn missing_or_unknown_status_is_pending() {
        let rdv: RendezVous = serde_json::from_str(r#"{"_id": "r1"}"#).unwrap();
        assert_eq!(rdv.status, RendezVousStatus::Pending);

        let rdv: RendezVous =
            serde_json::from_str(r#"{"_id": "r2", "status": "En cours"}"#).unwrap();
        assert_eq!(rdv.status, RendezVousStatus::Pending);
        assert_eq!(rdv.kind, RendezVousKind::Presentiel);
    }

    #[test]
    fn parse_accepts_ascii_spellings() {
        assert_eq!(
            RendezVousStatus::parse("confirme"),
            Some(RendezVousStatus::Confirme)
        );
        assert_eq!(
            RendezVousStatus::parse("Annulé"),
            Some(RendezVousStatus::Annule)
        );
        assert_eq!(RendezVousStatus::parse("later"), None);
    }
}
