//! The per-entity configuration that drives the generic list and detail controllers.
//!
//! Each gateway entity declares where it is fetched from, which text fields the search box
//! looks at, and which fields can be narrowed with a select filter. The controllers in
//! [`crate::listing`] and [`crate::detail`] never know which entity they are handling.

use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// A record type served by the gateway.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular, lower-case name used in messages ("patient", "consultation", ...).
    const KIND: &'static str;

    /// Field names accepted by [`Resource::select_value`].
    const SELECT_FIELDS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Text fields the free-text search matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Current value of a select-filter field, or `None` for unknown fields.
    fn select_value(&self, field: &str) -> Option<Cow<'_, str>>;
}

/// A resource with a gateway route returning the whole collection.
pub trait Listed: Resource {
    const LIST_PATH: &'static str;
}

/// A resource with a gateway route returning one record by identifier.
pub trait Detailed: Resource {
    const DETAIL_PATH: &'static str;
}

/// Join a route prefix and an identifier.
pub(crate) fn path_with_id(prefix: &str, id: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), id.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_id_onto_prefix() {
        assert_eq!(path_with_id("/get-patient", "abc"), "/get-patient/abc");
        assert_eq!(path_with_id("/get-patient/", " abc "), "/get-patient/abc");
    }
}
