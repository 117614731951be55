use crate::constants::GENERIC_ERROR_MESSAGE;
use clinic_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Transport(String),
    #[error("gateway returned HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        message: Option<String>,
    },
    #[error("unexpected gateway response: {}", .message.as_deref().unwrap_or("no message"))]
    UnexpectedResponse { message: Option<String> },
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("failed to decode gateway response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("required field is empty: {0}")]
    MissingField(&'static str),
    #[error("field {field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid text: {0}")]
    Text(#[from] TextError),

    #[error("appointment is already {0}")]
    InvalidTransition(String),

    #[error("not logged in")]
    NotAuthenticated,
    #[error("failed to read session: {0}")]
    SessionRead(std::io::Error),
    #[error("failed to write session: {0}")]
    SessionWrite(std::io::Error),
}

impl ClinicError {
    /// Collapse the error into the single string shown to a user.
    ///
    /// Gateway-provided messages win; transport and decoding problems fall back to
    /// [`GENERIC_ERROR_MESSAGE`]. Local failures get their own French text; `Display` stays
    /// the log form.
    pub fn user_message(&self) -> String {
        match self {
            ClinicError::Http {
                message: Some(message),
                ..
            }
            | ClinicError::UnexpectedResponse {
                message: Some(message),
            } if !message.trim().is_empty() => message.clone(),
            ClinicError::Http { .. }
            | ClinicError::UnexpectedResponse { .. }
            | ClinicError::Transport(_)
            | ClinicError::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
            ClinicError::InvalidInput(detail) => detail.clone(),
            ClinicError::Config(detail) => format!("Configuration invalide : {detail}"),
            ClinicError::NotFound { kind, id } => format!("Élément introuvable ({kind} {id})"),
            ClinicError::MissingField(field) => format!("Le champ {field} est obligatoire"),
            ClinicError::InvalidNumber { field, value } => {
                format!("Le champ {field} doit être un nombre (saisi : {value:?})")
            }
            ClinicError::Text(TextError::Empty) => "Le texte ne peut pas être vide".to_string(),
            ClinicError::Text(TextError::InvalidEmail(email)) => {
                format!("Adresse email invalide : {email}")
            }
            ClinicError::InvalidTransition(status) => format!("Le rendez-vous est déjà {status}"),
            ClinicError::NotAuthenticated => "Veuillez vous connecter".to_string(),
            ClinicError::SessionRead(_) | ClinicError::SessionWrite(_) => {
                "Impossible d'accéder à la session enregistrée".to_string()
            }
        }
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
