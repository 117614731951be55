//! # Clinic Core
//!
//! Client-side logic of the clinic dashboard and the public site.
//!
//! - Gateway entity models and the typed [`gateway::Gateway`] over a [`gateway::Transport`]
//! - List, detail, form and appointment controllers, generic over [`resource::Resource`]
//! - The login session and its route guard
//! - The in-memory article repository behind the public blog
//!
//! **No transport concerns**: the HTTP client lives in `clinic-gateway`, the site server in
//! `clinic-site`.

pub mod appointments;
pub mod articles;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod dates;
pub mod detail;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod listing;
pub mod models;
pub mod resource;
pub mod session;

#[cfg(test)]
mod test_support;

pub use articles::ArticleRepository;
pub use config::CoreConfig;
pub use error::{ClinicError, ClinicResult};
pub use gateway::{ApiRequest, Credentials, Gateway, Method, Transport};
pub use listing::{FilterState, ListView, LoadState, ResourceList};
pub use resource::{Detailed, Listed, Resource};
