use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use clinic_core::constants::{CONSULTATION_CREATED_MESSAGE, RENDEZVOUS_UPDATED_MESSAGE};
use clinic_core::models::{NewConsultation, Patient, RendezVousStatus};
use clinic_core::{ClinicError, Credentials, Gateway};
use clinic_gateway::HttpTransport;
use serde_json::{json, Value};

/// Minimal stand-in for the clinic gateway, bound to an ephemeral port.
async fn spawn_gateway() -> String {
    let app = Router::new()
        .route(
            "/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "secret" {
                    (
                        StatusCode::OK,
                        Json(json!({"token": "t0k", "user": {"_id": "u1", "nom": "Martin"}})),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"message": "Identifiants invalides"})),
                    )
                }
            }),
        )
        .route(
            "/get-all-patient",
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer t0k");
                if authorized {
                    (
                        StatusCode::OK,
                        Json(json!({"patients": [{"_id": "p1", "nom": "Dupont"}]})),
                    )
                } else {
                    (StatusCode::FORBIDDEN, Json(json!({"message": "Token manquant"})))
                }
            }),
        )
        .route(
            "/get-patient/:id",
            get(|Path(id): Path<String>| async move {
                if id == "p1" {
                    (StatusCode::OK, Json(json!({"patient": {"_id": "p1", "nom": "Dupont"}})))
                } else {
                    (StatusCode::NOT_FOUND, Json(json!({"message": "Patient introuvable"})))
                }
            }),
        )
        .route(
            "/create-consultation",
            post(|Json(body): Json<Value>| async move {
                let message = if body["allergies"] == json!(["pollen"]) {
                    CONSULTATION_CREATED_MESSAGE
                } else {
                    "Données invalides"
                };
                Json(json!({ "message": message }))
            }),
        )
        .route(
            "/update-rendezvous/:id",
            put(|Json(body): Json<Value>| async move {
                assert_eq!(body["status"], "Annulé");
                Json(json!({ "message": RENDEZVOUS_UPDATED_MESSAGE }))
            }),
        )
        .route(
            "/get-all-rendezvous",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn consultation(allergies: Vec<String>) -> NewConsultation {
    NewConsultation {
        patient_id: "p1".into(),
        date: None,
        motif: "Contrôle".into(),
        diagnostic: String::new(),
        traitement: String::new(),
        medecin: "Dr Martin".into(),
        specialite: String::new(),
        tension_arterielle: "12/8".into(),
        taux_glycemie: None,
        frequence_cardiaque: 70.0,
        poids: 60.0,
        temperature: 37.0,
        taille: 165.0,
        notes: String::new(),
        medicaments: Vec::new(),
        instructions: String::new(),
        allergies,
        antecedents_medicaux: Vec::new(),
        teleconsultation: false,
        visio_link: None,
    }
}

#[tokio::test]
async fn login_then_authorized_list() {
    let base = spawn_gateway().await;
    let gateway = Gateway::new(HttpTransport::new(&base).unwrap());

    let credentials = Credentials::new("claire.martin@clinique.fr", "secret").unwrap();
    let session = gateway.login(&credentials).await.unwrap();
    assert_eq!(session.token, "t0k");

    let anonymous = gateway.fetch_list::<Patient>().await.unwrap_err();
    assert_eq!(anonymous.user_message(), "Token manquant");

    let gateway = gateway.with_token(session.token);
    let patients: Vec<Patient> = gateway.fetch_list().await.unwrap();
    assert_eq!(patients[0].nom, "Dupont");
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() {
    let base = spawn_gateway().await;
    let gateway = Gateway::new(HttpTransport::new(&base).unwrap());
    let credentials = Credentials::new("claire.martin@clinique.fr", "wrong").unwrap();

    let err = gateway.login(&credentials).await.unwrap_err();
    assert!(matches!(err, ClinicError::Http { status: 401, .. }));
    assert_eq!(err.user_message(), "Identifiants invalides");
}

#[tokio::test]
async fn detail_404_is_not_found() {
    let base = spawn_gateway().await;
    let gateway = Gateway::new(HttpTransport::new(&base).unwrap());

    let patient: Patient = gateway.fetch_one("p1").await.unwrap();
    assert_eq!(patient.id, "p1");

    let err = gateway.fetch_one::<Patient>("p9").await.unwrap_err();
    assert!(matches!(err, ClinicError::NotFound { .. }));
}

#[tokio::test]
async fn creation_requires_the_success_message() {
    let base = spawn_gateway().await;
    let gateway = Gateway::new(HttpTransport::new(&base).unwrap());

    gateway
        .create_consultation(&consultation(vec!["pollen".into()]))
        .await
        .unwrap();

    let err = gateway
        .create_consultation(&consultation(Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Données invalides");
}

#[tokio::test]
async fn status_update_and_bodyless_error() {
    let base = spawn_gateway().await;
    let gateway = Gateway::new(HttpTransport::new(&base).unwrap());

    gateway
        .update_rendezvous_status("r1", RendezVousStatus::Annule)
        .await
        .unwrap();

    let err = gateway
        .fetch_list::<clinic_core::models::RendezVous>()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClinicError::Http {
            status: 500,
            message: None
        }
    ));
    assert_eq!(
        err.user_message(),
        clinic_core::constants::GENERIC_ERROR_MESSAGE
    );
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = Gateway::new(HttpTransport::new(format!("http://{addr}")).unwrap());
    let err = gateway.fetch_list::<Patient>().await.unwrap_err();
    assert!(matches!(err, ClinicError::Transport(_)));
}
