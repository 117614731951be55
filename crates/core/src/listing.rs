//! Generic list-filter controller.
//!
//! A [`ResourceList`] fetches one collection from the gateway and derives the visible rows
//! from the current [`FilterState`]. The derived view is recomputed from the full
//! collection on every call; nothing is cached between keystrokes.

use crate::constants::{FILTER_ALL, PATIENT_CONSULTATIONS_PATH, PATIENT_EXAMENS_PATH};
use crate::gateway::{Gateway, Transport};
use crate::models::{Consultation, Examen};
use crate::resource::{path_with_id, Listed, Resource};
use crate::{ClinicError, ClinicResult};
use std::collections::BTreeMap;

/// Free-text search plus select filters.
///
/// A select filter set to [`FILTER_ALL`] (or never set) places no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    selects: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn with_select(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.selects.insert(field.into(), value.into());
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// The selected value for `field`, or [`FILTER_ALL`].
    pub fn select(&self, field: &str) -> &str {
        self.selects
            .get(field)
            .map(String::as_str)
            .unwrap_or(FILTER_ALL)
    }

    pub fn set_select(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.selects.insert(field.into(), value.into());
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.selects.clear();
    }

    /// Select filters that currently constrain the list.
    pub fn active_selects(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selects
            .iter()
            .filter(|(_, value)| value.as_str() != FILTER_ALL)
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    /// Whether a record passes both the search and every active select filter.
    pub fn matches<R: Resource>(&self, record: &R) -> bool {
        self.matches_search(record) && self.matches_selects(record)
    }

    fn matches_search<R: Resource>(&self, record: &R) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_selects<R: Resource>(&self, record: &R) -> bool {
        self.active_selects()
            .all(|(field, wanted)| record.select_value(field).is_some_and(|v| v == wanted))
    }
}

/// The records of `records` that pass `filter`, in collection order.
pub fn filter_records<'a, R: Resource>(records: &'a [R], filter: &FilterState) -> Vec<&'a R> {
    records.iter().filter(|r| filter.matches(*r)).collect()
}

/// Fetch lifecycle shared by list and detail controllers.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Loading,
    /// The fetch failed; the string is the user-facing message.
    Failed(String),
    Ready(T),
}

/// What a list page should render.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, R> {
    Loading,
    Failed(&'a str),
    /// The gateway returned no records at all.
    Empty,
    /// Records exist but none pass the filter.
    NoMatch,
    Rows(Vec<&'a R>),
}

#[derive(Clone, Debug)]
pub struct ResourceList<R> {
    source: String,
    state: LoadState<Vec<R>>,
    filter: FilterState,
}

impl<R: Listed> ResourceList<R> {
    /// A list over the resource's own collection route.
    pub fn all() -> Self {
        Self::at(R::LIST_PATH)
    }
}

impl ResourceList<Consultation> {
    pub fn for_patient(patient_id: &str) -> Self {
        Self::at(path_with_id(PATIENT_CONSULTATIONS_PATH, patient_id))
    }
}

impl ResourceList<Examen> {
    pub fn for_patient(patient_id: &str) -> Self {
        Self::at(path_with_id(PATIENT_EXAMENS_PATH, patient_id))
    }
}

impl<R: Resource> ResourceList<R> {
    /// A list over an explicit gateway route.
    pub fn at(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            state: LoadState::Loading,
            filter: FilterState::default(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fetch (or re-fetch) the collection. The filter state is kept.
    pub async fn load<T: Transport>(&mut self, gateway: &Gateway<T>) {
        self.state = LoadState::Loading;
        self.state = match gateway.fetch_collection::<R>(&self.source).await {
            Ok(records) => LoadState::Ready(records),
            Err(e) => {
                tracing::warn!(kind = R::KIND, source = %self.source, "list fetch failed: {e}");
                LoadState::Failed(e.user_message())
            }
        };
    }

    pub fn state(&self) -> &LoadState<Vec<R>> {
        &self.state
    }

    /// Loaded records, or an empty slice while loading or after a failure.
    pub fn records(&self) -> &[R] {
        match &self.state {
            LoadState::Ready(records) => records,
            _ => &[],
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.set_search(text);
    }

    /// Set a select filter.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::InvalidInput`] if the resource has no such filter.
    pub fn set_select(&mut self, field: &str, value: impl Into<String>) -> ClinicResult<()> {
        if !R::SELECT_FIELDS.contains(&field) {
            return Err(ClinicError::InvalidInput(format!(
                "la liste {} n'a pas de filtre {field:?} (filtres possibles : {})",
                R::KIND,
                R::SELECT_FIELDS.join(", ")
            )));
        }
        self.filter.set_select(field, value);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    /// The rows to render for the current collection and filter.
    pub fn view(&self) -> ListView<'_, R> {
        match &self.state {
            LoadState::Loading => ListView::Loading,
            LoadState::Failed(message) => ListView::Failed(message),
            LoadState::Ready(records) if records.is_empty() => ListView::Empty,
            LoadState::Ready(records) => {
                let rows = filter_records(records, &self.filter);
                if rows.is_empty() {
                    ListView::NoMatch
                } else {
                    ListView::Rows(rows)
                }
            }
        }
    }

    pub(crate) fn record_mut(&mut self, id: &str) -> Option<&mut R> {
        match &mut self.state {
            LoadState::Ready(records) => records.iter_mut().find(|r| r.id() == id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;
    use crate::models::{Gender, Patient, RendezVous};
    use crate::test_support::{FakeTransport, Reply};
    use serde_json::json;

    fn patient(id: &str, nom: &str, prenom: &str, gender: Gender) -> Patient {
        Patient {
            id: id.into(),
            nom: nom.into(),
            prenom: prenom.into(),
            birth_date: None,
            telephone: String::new(),
            email: format!("{}@example.fr", prenom.to_lowercase()),
            gender,
            emergency_contacts: vec![],
            created_at: None,
        }
    }

    fn patients() -> Vec<Patient> {
        vec![
            patient("1", "Dupont", "Marie", Gender::Female),
            patient("2", "Martin", "Paul", Gender::Male),
            patient("3", "Bernard", "Lucie", Gender::Female),
        ]
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = patients();
        for text in ["upo", "UPO", "uPo"] {
            let rows = filter_records(&records, &FilterState::new().with_search(text));
            assert_eq!(rows.len(), 1, "search {text:?}");
            assert_eq!(rows[0].nom, "Dupont");
        }
    }

    #[test]
    fn empty_search_keeps_everything() {
        let records = patients();
        assert_eq!(filter_records(&records, &FilterState::new()).len(), 3);
    }

    #[test]
    fn all_sentinel_is_a_no_op() {
        let records = patients();
        let filter = FilterState::new().with_select("gender", FILTER_ALL);
        assert_eq!(filter_records(&records, &filter).len(), 3);
    }

    #[test]
    fn search_and_select_intersect() {
        let records = patients();

        let filter = FilterState::new()
            .with_search("ar")
            .with_select("gender", "female");
        let ids: Vec<&str> = filter_records(&records, &filter)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        // "Marie" and "Bernard" contain "ar"; "Martin" does too but is male.
        assert_eq!(ids, vec!["1", "3"]);

        let filter = FilterState::new()
            .with_search("martin")
            .with_select("gender", "female");
        assert!(filter_records(&records, &filter).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = patients();
        let filter = FilterState::new().with_search("a");
        let first = filter_records(&records, &filter);
        let second = filter_records(&records, &filter);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_select_value_field_never_matches() {
        let records = patients();
        let filter = FilterState::new().with_select("status", "pending");
        assert!(filter_records(&records, &filter).is_empty());
    }

    #[tokio::test]
    async fn view_distinguishes_empty_from_no_match() {
        let gateway = Gateway::new(
            FakeTransport::new().on(Method::Get, "/get-all-patient", Reply::json(json!([]))),
        );
        let mut list = ResourceList::<Patient>::all();
        assert_eq!(list.view(), ListView::Loading);

        list.load(&gateway).await;
        assert_eq!(list.view(), ListView::Empty);

        let gateway = Gateway::new(FakeTransport::new().on(
            Method::Get,
            "/get-all-patient",
            Reply::json(json!([{"_id": "1", "nom": "Dupont"}])),
        ));
        list.load(&gateway).await;
        list.set_search("zzz");
        assert_eq!(list.view(), ListView::NoMatch);

        list.set_search("dup");
        match list.view() {
            ListView::Rows(rows) => assert_eq!(rows[0].id, "1"),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_fetch_exposes_message_and_reload_recovers() {
        let fake = FakeTransport::new().on(
            Method::Get,
            "/get-all-rendezvous",
            Reply::status(503, "Service indisponible"),
        );
        let gateway = Gateway::new(fake);
        let mut list = ResourceList::<RendezVous>::all();
        list.load(&gateway).await;
        assert_eq!(list.view(), ListView::Failed("Service indisponible"));
        assert!(list.records().is_empty());

        gateway.transport().set(
            Method::Get,
            "/get-all-rendezvous",
            Reply::json(json!([{"_id": "r1"}])),
        );
        list.load(&gateway).await;
        assert_eq!(list.records().len(), 1);
        assert_eq!(gateway.transport().count(Method::Get, "/get-all-rendezvous"), 2);
    }

    #[tokio::test]
    async fn network_failure_uses_generic_message() {
        let gateway = Gateway::new(FakeTransport::new().on(
            Method::Get,
            "/get-all-patient",
            Reply::Network,
        ));
        let mut list = ResourceList::<Patient>::all();
        list.load(&gateway).await;
        assert_eq!(
            list.state(),
            &LoadState::Failed(crate::constants::GENERIC_ERROR_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn records_with_null_fields_still_load() {
        let gateway = Gateway::new(
            FakeTransport::new()
                .on(
                    Method::Get,
                    "/get-all-consultations",
                    Reply::json(json!([
                        {"_id": "c1", "patientId": "p1"},
                        {"_id": "c2", "patientId": null}
                    ])),
                )
                .on(
                    Method::Get,
                    "/get-all-patient",
                    Reply::json(json!([{"_id": "p1", "email": null, "gender": null}])),
                ),
        );

        let mut consultations = ResourceList::<Consultation>::all();
        consultations.load(&gateway).await;
        assert_eq!(consultations.records().len(), 2);
        assert_eq!(consultations.records()[1].patient_id.id(), "");

        let mut patients = ResourceList::<Patient>::all();
        patients.load(&gateway).await;
        assert_eq!(patients.records().len(), 1);
        assert_eq!(patients.records()[0].gender, Gender::Other);
    }

    #[test]
    fn rejects_unknown_select_field() {
        let mut list = ResourceList::<Patient>::all();
        assert!(list.set_select("gender", "male").is_ok());
        let err = list.set_select("status", "pending").unwrap_err();
        assert!(err.to_string().contains("gender"));
    }

    #[test]
    fn per_patient_sources() {
        assert_eq!(
            ResourceList::<Examen>::for_patient("p1").source(),
            "/get-examen-patient/p1"
        );
        assert_eq!(
            ResourceList::<Consultation>::for_patient("p1").source(),
            "/get-consultations-patient/p1"
        );
    }
}
