//! Creation forms.
//!
//! A draft holds one raw text value per field, exactly as typed. Conversion to the
//! gateway payload (list splitting, number parsing, required-field checks) happens only in
//! `normalize`, at submission time.

use crate::dates::{parse_date, parse_datetime};
use crate::gateway::{Gateway, Transport};
use crate::listing::ResourceList;
use crate::models::{
    Consultation, EmergencyContact, ExamenStatus, Gender, NewConsultation, NewExamen, NewPatient,
    EXAMEN_TYPES,
};
use crate::{ClinicError, ClinicResult};
use chrono::{DateTime, NaiveDate, Utc};
use clinic_types::{EmailAddress, NonEmptyText};

/// Split comma-separated input into trimmed, non-empty entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a required number. A decimal comma is accepted.
pub fn parse_number(field: &'static str, text: &str) -> ClinicResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ClinicError::MissingField(field));
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ClinicError::InvalidNumber {
            field,
            value: text.to_string(),
        })
}

/// Parse an optional number: empty input is absent, not zero.
pub fn parse_optional_number(field: &'static str, text: &str) -> ClinicResult<Option<f64>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_number(field, text).map(Some)
}

fn required(field: &'static str, text: &str) -> ClinicResult<String> {
    NonEmptyText::new(text)
        .map(NonEmptyText::into_inner)
        .map_err(|_| ClinicError::MissingField(field))
}

fn optional_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn optional_datetime(field: &'static str, text: &str) -> ClinicResult<Option<DateTime<Utc>>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_datetime(text)
        .map(Some)
        .ok_or_else(|| ClinicError::InvalidInput(format!("{field} n'est pas une date valide : {text:?}")))
}

fn optional_date(field: &'static str, text: &str) -> ClinicResult<Option<NaiveDate>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_date(text)
        .map(Some)
        .ok_or_else(|| ClinicError::InvalidInput(format!("{field} n'est pas une date valide : {text:?}")))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsultationDraft {
    pub patient_id: String,
    pub date: String,
    pub motif: String,
    pub diagnostic: String,
    pub traitement: String,
    pub medecin: String,
    pub specialite: String,
    pub tension_arterielle: String,
    /// Optional: empty means "not measured".
    pub taux_glycemie: String,
    pub frequence_cardiaque: String,
    pub poids: String,
    pub temperature: String,
    pub taille: String,
    pub notes: String,
    /// Comma-separated.
    pub medicaments: String,
    pub instructions: String,
    /// Comma-separated.
    pub allergies: String,
    /// Comma-separated.
    pub antecedents_medicaux: String,
    pub teleconsultation: bool,
    pub visio_link: String,
}

impl ConsultationDraft {
    /// Build the creation payload.
    ///
    /// # Errors
    ///
    /// - [`ClinicError::MissingField`] for an empty patient, motif, doctor or required
    ///   vital sign,
    /// - [`ClinicError::InvalidNumber`] for a vital sign that does not parse,
    /// - [`ClinicError::InvalidInput`] for an unreadable date.
    pub fn normalize(&self) -> ClinicResult<NewConsultation> {
        Ok(NewConsultation {
            patient_id: required("patientId", &self.patient_id)?,
            date: optional_datetime("date", &self.date)?,
            motif: required("motif", &self.motif)?,
            diagnostic: self.diagnostic.trim().to_string(),
            traitement: self.traitement.trim().to_string(),
            medecin: required("medecin", &self.medecin)?,
            specialite: self.specialite.trim().to_string(),
            tension_arterielle: self.tension_arterielle.trim().to_string(),
            taux_glycemie: parse_optional_number("tauxGlycemie", &self.taux_glycemie)?,
            frequence_cardiaque: parse_number("frequenceCardiaque", &self.frequence_cardiaque)?,
            poids: parse_number("poids", &self.poids)?,
            temperature: parse_number("temperature", &self.temperature)?,
            taille: parse_number("taille", &self.taille)?,
            notes: self.notes.trim().to_string(),
            medicaments: split_list(&self.medicaments),
            instructions: self.instructions.trim().to_string(),
            allergies: split_list(&self.allergies),
            antecedents_medicaux: split_list(&self.antecedents_medicaux),
            teleconsultation: self.teleconsultation,
            visio_link: optional_text(&self.visio_link),
        })
    }
}

/// The "new consultation" dialog.
#[derive(Clone, Debug, Default)]
pub struct ConsultationForm {
    draft: ConsultationDraft,
    open: bool,
    error: Option<String>,
}

impl ConsultationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &ConsultationDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ConsultationDraft {
        &mut self.draft
    }

    /// The message of the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Normalise, post, and on confirmed success reset the form, close the dialog and
    /// re-fetch `list`.
    ///
    /// On any failure the draft is left as typed and the user-facing message is kept in
    /// [`ConsultationForm::error`].
    pub async fn submit<T: Transport>(
        &mut self,
        gateway: &Gateway<T>,
        list: &mut ResourceList<Consultation>,
    ) -> ClinicResult<()> {
        let result = match self.draft.normalize() {
            Ok(payload) => gateway.create_consultation(&payload).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!("consultation created");
                self.draft = ConsultationDraft::default();
                self.error = None;
                self.open = false;
                list.load(gateway).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("consultation submission failed: {e}");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmergencyContactDraft {
    pub nom: String,
    pub prenom: String,
    pub relation: String,
    pub telephone: String,
    pub email: String,
}

impl EmergencyContactDraft {
    fn is_blank(&self) -> bool {
        [
            &self.nom,
            &self.prenom,
            &self.relation,
            &self.telephone,
            &self.email,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }
}

/// Patient form. The gateway has no patient creation route, so this stops at the payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientDraft {
    pub nom: String,
    pub prenom: String,
    pub birth_date: String,
    pub telephone: String,
    pub email: String,
    pub gender: String,
    pub emergency_contacts: Vec<EmergencyContactDraft>,
}

impl PatientDraft {
    pub fn normalize(&self) -> ClinicResult<NewPatient> {
        let gender = match self.gender.trim() {
            "" => Gender::Other,
            value => Gender::parse(value)
                .ok_or_else(|| ClinicError::InvalidInput(format!("genre inconnu : {value:?}")))?,
        };

        let email = match optional_text(&self.email) {
            Some(email) => Some(EmailAddress::parse(email)?.as_str().to_string()),
            None => None,
        };

        let emergency_contacts = self
            .emergency_contacts
            .iter()
            .filter(|c| !c.is_blank())
            .map(|c| {
                Ok(EmergencyContact {
                    nom: required("emergencycontact.nom", &c.nom)?,
                    prenom: c.prenom.trim().to_string(),
                    relation: c.relation.trim().to_string(),
                    telephone: required("emergencycontact.telephone", &c.telephone)?,
                    email: optional_text(&c.email),
                })
            })
            .collect::<ClinicResult<Vec<_>>>()?;

        Ok(NewPatient {
            nom: required("nom", &self.nom)?,
            prenom: required("prenom", &self.prenom)?,
            birth_date: optional_date("birthDate", &self.birth_date)?,
            telephone: self.telephone.trim().to_string(),
            email,
            gender,
            emergency_contacts,
        })
    }
}

/// Exam form. The gateway has no exam creation route, so this stops at the payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExamenDraft {
    pub patient_id: String,
    pub medecin: String,
    pub specialite: String,
    pub type_examen: String,
    pub date_examen: String,
    pub resultat_examen: String,
    pub fichier_url: String,
}

impl ExamenDraft {
    pub fn normalize(&self) -> ClinicResult<NewExamen> {
        let type_examen = required("typeExamen", &self.type_examen)?;
        if !EXAMEN_TYPES.contains(&type_examen.as_str()) {
            return Err(ClinicError::InvalidInput(format!(
                "type d'examen inconnu {type_examen:?} (valeurs possibles : {})",
                EXAMEN_TYPES.join(", ")
            )));
        }

        Ok(NewExamen {
            patient_id: required("patientId", &self.patient_id)?,
            medecin: required("medecin", &self.medecin)?,
            specialite: self.specialite.trim().to_string(),
            type_examen,
            date_examen: optional_datetime("dateExamen", &self.date_examen)?,
            resultat_examen: self.resultat_examen.trim().to_string(),
            fichier_url: optional_text(&self.fichier_url),
            status: ExamenStatus::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CONSULTATION_CREATED_MESSAGE;
    use crate::gateway::Method;
    use crate::test_support::{FakeTransport, Reply};
    use serde_json::json;

    fn filled_draft() -> ConsultationDraft {
        ConsultationDraft {
            patient_id: "p1".into(),
            date: "2024-06-14T09:30:00Z".into(),
            motif: "Toux persistante".into(),
            medecin: "Dr Martin".into(),
            specialite: "Pneumologie".into(),
            tension_arterielle: "12/8".into(),
            frequence_cardiaque: "72".into(),
            poids: "68,5".into(),
            temperature: "37.2".into(),
            taille: "170".into(),
            allergies: "pollen, arachide, ".into(),
            medicaments: "Paracétamol 1g".into(),
            ..ConsultationDraft::default()
        }
    }

    #[test]
    fn list_fields_are_split_trimmed_and_filtered() {
        assert_eq!(split_list("pollen, arachide, "), vec!["pollen", "arachide"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn normalize_builds_payload() {
        let payload = filled_draft().normalize().expect("valid draft");
        assert_eq!(payload.allergies, vec!["pollen", "arachide"]);
        assert_eq!(payload.medicaments, vec!["Paracétamol 1g"]);
        assert!(payload.antecedents_medicaux.is_empty());
        assert_eq!(payload.poids, 68.5);
        assert_eq!(payload.taux_glycemie, None);
        assert_eq!(payload.visio_link, None);
        assert!(payload.date.is_some());
    }

    #[test]
    fn optional_number_parses_when_present() {
        let draft = ConsultationDraft {
            taux_glycemie: "1.05".into(),
            ..filled_draft()
        };
        assert_eq!(draft.normalize().unwrap().taux_glycemie, Some(1.05));
    }

    #[test]
    fn required_number_must_parse() {
        let draft = ConsultationDraft {
            poids: "soixante".into(),
            ..filled_draft()
        };
        assert!(matches!(
            draft.normalize(),
            Err(ClinicError::InvalidNumber { field: "poids", .. })
        ));

        let draft = ConsultationDraft {
            taille: "  ".into(),
            ..filled_draft()
        };
        assert!(matches!(
            draft.normalize(),
            Err(ClinicError::MissingField("taille"))
        ));
    }

    #[test]
    fn required_text_must_be_present() {
        let draft = ConsultationDraft {
            motif: "   ".into(),
            ..filled_draft()
        };
        assert!(matches!(
            draft.normalize(),
            Err(ClinicError::MissingField("motif"))
        ));
    }

    #[tokio::test]
    async fn successful_submit_resets_closes_and_refetches() {
        let fake = FakeTransport::new()
            .on(
                Method::Post,
                "/create-consultation",
                Reply::message(CONSULTATION_CREATED_MESSAGE),
            )
            .on(
                Method::Get,
                "/get-all-consultations",
                Reply::json(json!([{"_id": "c1"}])),
            );
        let gateway = Gateway::new(fake);
        let mut list = ResourceList::<Consultation>::all();

        let mut form = ConsultationForm::new();
        form.open();
        *form.draft_mut() = filled_draft();
        form.submit(&gateway, &mut list).await.expect("submitted");

        assert!(!form.is_open());
        assert_eq!(form.draft(), &ConsultationDraft::default());
        assert!(form.error().is_none());
        assert_eq!(list.records().len(), 1);
        assert_eq!(
            gateway.transport().count(Method::Get, "/get-all-consultations"),
            1
        );

        let sent = gateway.transport().requests();
        assert_eq!(sent[0].body.as_ref().unwrap()["allergies"], json!(["pollen", "arachide"]));
    }

    #[tokio::test]
    async fn unexpected_message_keeps_the_draft() {
        let fake = FakeTransport::new().on(
            Method::Post,
            "/create-consultation",
            Reply::message("Patient inconnu"),
        );
        let gateway = Gateway::new(fake);
        let mut list = ResourceList::<Consultation>::all();

        let mut form = ConsultationForm::new();
        form.open();
        *form.draft_mut() = filled_draft();
        let err = form.submit(&gateway, &mut list).await.unwrap_err();

        assert!(matches!(err, ClinicError::UnexpectedResponse { .. }));
        assert!(form.is_open());
        assert_eq!(form.draft(), &filled_draft());
        assert_eq!(form.error(), Some("Patient inconnu"));
        assert_eq!(gateway.transport().count(Method::Get, "/get-all-consultations"), 0);
    }

    #[tokio::test]
    async fn http_failure_without_message_uses_generic_text() {
        let fake = FakeTransport::new().on(
            Method::Post,
            "/create-consultation",
            Reply::Status(500, None),
        );
        let gateway = Gateway::new(fake);
        let mut list = ResourceList::<Consultation>::all();

        let mut form = ConsultationForm::new();
        *form.draft_mut() = filled_draft();
        assert!(form.submit(&gateway, &mut list).await.is_err());
        assert_eq!(
            form.error(),
            Some(crate::constants::GENERIC_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn invalid_draft_is_not_sent() {
        let gateway = Gateway::new(FakeTransport::new());
        let mut list = ResourceList::<Consultation>::all();
        let mut form = ConsultationForm::new();

        assert!(form.submit(&gateway, &mut list).await.is_err());
        assert!(gateway.transport().requests().is_empty());
        assert_eq!(form.error(), Some("Le champ patientId est obligatoire"));
    }

    #[test]
    fn patient_draft_drops_blank_contacts() {
        let draft = PatientDraft {
            nom: "Dupont".into(),
            prenom: "Marie".into(),
            birth_date: "2000-06-15".into(),
            email: "Marie.Dupont@Example.fr".into(),
            gender: "female".into(),
            emergency_contacts: vec![
                EmergencyContactDraft::default(),
                EmergencyContactDraft {
                    nom: "Dupont".into(),
                    relation: "Époux".into(),
                    telephone: "0605060708".into(),
                    ..EmergencyContactDraft::default()
                },
            ],
            ..PatientDraft::default()
        };

        let payload = draft.normalize().unwrap();
        assert_eq!(payload.emergency_contacts.len(), 1);
        assert_eq!(payload.email.as_deref(), Some("marie.dupont@example.fr"));
        assert_eq!(payload.gender, Gender::Female);
        assert_eq!(payload.birth_date, NaiveDate::from_ymd_opt(2000, 6, 15));
    }

    #[test]
    fn patient_draft_rejects_bad_values() {
        let base = PatientDraft {
            nom: "Dupont".into(),
            prenom: "Marie".into(),
            ..PatientDraft::default()
        };
        assert!(PatientDraft {
            gender: "robot".into(),
            ..base.clone()
        }
        .normalize()
        .is_err());
        assert!(PatientDraft {
            birth_date: "15/06/2000".into(),
            ..base.clone()
        }
        .normalize()
        .is_err());
        assert!(base.normalize().is_ok());
    }

    #[test]
    fn examen_type_must_be_known() {
        let draft = ExamenDraft {
            patient_id: "p1".into(),
            medecin: "Dr Martin".into(),
            type_examen: "IRM".into(),
            ..ExamenDraft::default()
        };
        let payload = draft.normalize().unwrap();
        assert_eq!(payload.status, ExamenStatus::Pending);
        assert!(payload.fichier_url.is_none());

        let draft = ExamenDraft {
            type_examen: "Prise de sang".into(),
            ..draft
        };
        assert!(matches!(
            draft.normalize(),
            Err(ClinicError::InvalidInput(_))
        ));
    }
}
