use super::{bool_filter_value, null_default};
use crate::constants::USER_LIST_PATH;
use crate::dates::opt_datetime;
use crate::resource::{Listed, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Staff account as listed on the users page.
///
/// The gateway includes the (hashed) password in list responses. It is accepted so the
/// payload parses, then never shown and never serialised back out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub nom: String,
    #[serde(default, deserialize_with = "null_default")]
    pub prenom: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub specialite: String,
    #[serde(default, deserialize_with = "null_default")]
    pub adresse: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tel: String,
    #[serde(default, with = "opt_datetime")]
    pub date_embauche: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub autorisation: bool,
}

impl UserData {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom.trim(), self.nom.trim())
            .trim()
            .to_string()
    }

    pub fn access_label(&self) -> &'static str {
        if self.autorisation {
            "Actif"
        } else {
            "Désactivé"
        }
    }
}

impl Resource for UserData {
    const KIND: &'static str = "user";
    const SELECT_FIELDS: &'static [&'static str] = &["specialite", "autorisation"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.nom.as_str(),
            self.prenom.as_str(),
            self.email.as_str(),
            self.specialite.as_str(),
        ]
    }

    fn select_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "specialite" => Some(Cow::Borrowed(self.specialite.as_str())),
            "autorisation" => Some(Cow::Borrowed(bool_filter_value(self.autorisation))),
            _ => None,
        }
    }
}

impl Listed for UserData {
    const LIST_PATH: &'static str = USER_LIST_PATH;
}

/// The logged-in staff member, as returned by the login route and kept in the session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub nom: String,
    #[serde(default, deserialize_with = "null_default")]
    pub prenom: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub specialite: String,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.prenom.trim(), self.nom.trim());
        match name.trim() {
            "" => self.email.clone(),
            name => name.to_string(),
        }
    }
}
