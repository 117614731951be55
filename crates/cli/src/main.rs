mod render;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clinic_core::appointments::{available_actions, change_status};
use clinic_core::config::api_base_url_from_env_value;
use clinic_core::constants::{CONSULTATION_CREATED_MESSAGE, DEFAULT_LATEST_LIMIT};
use clinic_core::dashboard::load_dashboard;
use clinic_core::detail::{load_patient_overview, PatientCard, ResourceDetail};
use clinic_core::forms::{ConsultationForm, EmergencyContactDraft, ExamenDraft, PatientDraft};
use clinic_core::models::{Consultation, Examen, Patient, RendezVous, RendezVousStatus, UserData};
use clinic_core::session::{resolve_route, FileSessionStore, Route, SessionContext};
use clinic_core::{
    ArticleRepository, ClinicError, CoreConfig, Credentials, Gateway, LoadState, Resource,
    ResourceList,
};
use clinic_gateway::HttpTransport;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic dashboard in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in staff member
    Whoami,
    /// Counts per section
    Dashboard,
    /// Patients
    #[command(subcommand)]
    Patients(PatientCommand),
    /// Consultations
    #[command(subcommand)]
    Consultations(ConsultationCommand),
    /// Exams
    #[command(subcommand)]
    Exams(ExamCommand),
    /// Appointments
    #[command(subcommand)]
    Appointments(AppointmentCommand),
    /// Staff accounts
    #[command(subcommand)]
    Users(UserCommand),
    /// Public blog (no login needed)
    #[command(subcommand)]
    Blog(BlogCommand),
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive text search
    #[arg(long, short)]
    search: Option<String>,
    /// Select filter as field=value ("all" clears it); repeatable
    #[arg(long = "filter", short = 'f')]
    filters: Vec<String>,
}

#[derive(Subcommand)]
enum PatientCommand {
    List(ListArgs),
    /// Patient card with consultations and exams
    Show { id: String },
    /// Validate a patient form and print the payload
    Draft {
        #[arg(long)]
        nom: String,
        #[arg(long)]
        prenom: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        birth_date: String,
        #[arg(long, default_value = "")]
        telephone: String,
        #[arg(long, default_value = "")]
        email: String,
        /// male, female or other
        #[arg(long, default_value = "")]
        gender: String,
        /// Emergency contact as nom,relation,telephone
        #[arg(long)]
        contact: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConsultationCommand {
    List(ListArgs),
    Show {
        id: String,
    },
    Create(CreateConsultationArgs),
}

#[derive(Args)]
struct CreateConsultationArgs {
    #[arg(long)]
    patient: String,
    #[arg(long)]
    motif: String,
    #[arg(long)]
    medecin: String,
    /// Date of the consultation (RFC 3339 or YYYY-MM-DD)
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    specialite: String,
    #[arg(long, default_value = "")]
    diagnostic: String,
    #[arg(long, default_value = "")]
    traitement: String,
    #[arg(long, default_value = "")]
    tension: String,
    #[arg(long, default_value = "")]
    glycemie: String,
    #[arg(long, default_value = "")]
    pouls: String,
    #[arg(long, default_value = "")]
    poids: String,
    #[arg(long, default_value = "")]
    temperature: String,
    #[arg(long, default_value = "")]
    taille: String,
    #[arg(long, default_value = "")]
    notes: String,
    /// Comma-separated
    #[arg(long, default_value = "")]
    medicaments: String,
    #[arg(long, default_value = "")]
    instructions: String,
    /// Comma-separated
    #[arg(long, default_value = "")]
    allergies: String,
    /// Comma-separated
    #[arg(long, default_value = "")]
    antecedents: String,
    #[arg(long)]
    teleconsultation: bool,
    #[arg(long, default_value = "")]
    visio_link: String,
}

#[derive(Subcommand)]
enum ExamCommand {
    /// Exams of one patient
    List {
        #[arg(long)]
        patient: String,
        #[command(flatten)]
        args: ListArgs,
    },
    Show {
        id: String,
    },
    /// Validate an exam form and print the payload
    Draft {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        medecin: String,
        #[arg(long = "type")]
        type_examen: String,
        #[arg(long, default_value = "")]
        specialite: String,
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, default_value = "")]
        resultat: String,
        #[arg(long, default_value = "")]
        fichier_url: String,
    },
}

#[derive(Subcommand)]
enum AppointmentCommand {
    List(ListArgs),
    Confirm { id: String },
    Cancel { id: String },
}

#[derive(Subcommand)]
enum UserCommand {
    List(ListArgs),
}

#[derive(Subcommand)]
enum BlogCommand {
    Latest {
        #[arg(long, default_value_t = DEFAULT_LATEST_LIMIT)]
        limit: usize,
    },
    Featured,
    Show {
        slug: String,
    },
    Category {
        name: String,
    },
    Categories,
}

impl Commands {
    fn route(&self) -> Route {
        match self {
            Commands::Login { .. } => Route::Login,
            Commands::Patients(_) => Route::Patients,
            Commands::Consultations(_) => Route::Consultations,
            Commands::Exams(_) => Route::Examens,
            Commands::Appointments(_) => Route::RendezVous,
            Commands::Users(_) => Route::Users,
            Commands::Logout | Commands::Whoami | Commands::Dashboard | Commands::Blog(_) => {
                Route::Dashboard
            }
        }
    }
}

type HttpGateway = Gateway<HttpTransport>;

/// Turn a core error into the message shown to the user.
fn user_facing(e: ClinicError) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}

fn session_file() -> anyhow::Result<PathBuf> {
    if let Some(path) = std::env::var_os("CLINIC_SESSION_FILE") {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir().context("no configuration directory for this user")?;
    Ok(dir.join("clinic").join("session.json"))
}

fn apply_filters<R: Resource>(list: &mut ResourceList<R>, args: &ListArgs) -> anyhow::Result<()> {
    if let Some(search) = &args.search {
        list.set_search(search.as_str());
    }
    for filter in &args.filters {
        let (field, value) = filter
            .split_once('=')
            .with_context(|| format!("filter must be field=value, got {filter:?}"))?;
        list.set_select(field.trim(), value.trim())
            .map_err(user_facing)?;
    }
    Ok(())
}

async fn show_list<R: Resource>(
    gateway: &HttpGateway,
    mut list: ResourceList<R>,
    args: &ListArgs,
    row: impl Fn(&R) -> String,
) -> anyhow::Result<()> {
    apply_filters(&mut list, args)?;
    list.load(gateway).await;
    if let LoadState::Failed(message) = list.state() {
        anyhow::bail!("{message}");
    }
    render::list(&list, row);
    Ok(())
}

async fn set_appointment_status(
    gateway: &HttpGateway,
    id: &str,
    target: RendezVousStatus,
) -> anyhow::Result<()> {
    let mut list = ResourceList::<RendezVous>::all();
    list.load(gateway).await;
    if let LoadState::Failed(message) = list.state() {
        anyhow::bail!("{message}");
    }

    change_status(gateway, &mut list, id, target)
        .await
        .map_err(user_facing)?;
    println!("Rendez-vous {id}: {}", target.label());
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn blog(command: BlogCommand) -> anyhow::Result<()> {
    let articles = ArticleRepository::seeded()?;
    let print_all = |list: Vec<&clinic_core::models::Article>| {
        if list.is_empty() {
            println!("Aucun article.");
        }
        for article in list {
            println!("{}", render::article_row(article));
        }
    };

    match command {
        BlogCommand::Latest { limit } => print_all(articles.latest(limit)),
        BlogCommand::Featured => print_all(articles.featured()),
        BlogCommand::Category { name } => print_all(articles.by_category(&name)),
        BlogCommand::Categories => {
            for category in articles.categories() {
                println!("{category}");
            }
        }
        BlogCommand::Show { slug } => {
            let article = articles
                .by_slug(&slug)
                .with_context(|| format!("no article with slug {slug:?}"))?;
            render::article(article, &articles.related(&slug, 3));
        }
    }
    Ok(())
}

async fn run(command: Commands, config: &CoreConfig) -> anyhow::Result<()> {
    let mut session = SessionContext::open(FileSessionStore::new(config.session_file()))
        .map_err(user_facing)?;
    let gateway = Gateway::new(HttpTransport::from_config(config).map_err(user_facing)?);

    let requested = command.route();
    let route = resolve_route(requested, session.current().is_some());
    if route == Route::Login && requested != Route::Login {
        anyhow::bail!("Veuillez vous connecter: clinic login <email> --password <mot de passe>");
    }

    // Anything past the guard has a session, except a fresh login.
    let authorized = match session.current() {
        Some(current) => gateway.clone().with_token(current.token.clone()),
        None => gateway.clone(),
    };

    match command {
        Commands::Login { email, password } => {
            if route == Route::Dashboard {
                if let Some(current) = session.current() {
                    println!("Déjà connecté en tant que {}", current.user.display_name());
                }
                render::dashboard(&load_dashboard(&authorized).await);
                return Ok(());
            }
            let credentials = Credentials::new(&email, password).map_err(user_facing)?;
            let current = session
                .login(&gateway, &credentials)
                .await
                .map_err(user_facing)?;
            println!("Connecté en tant que {}", current.user.display_name());
        }
        Commands::Logout => {
            session.logout().map_err(user_facing)?;
            println!("Déconnecté.");
        }
        Commands::Whoami => {
            let current = session.require().map_err(user_facing)?;
            println!("{} <{}>", current.user.display_name(), current.user.email);
            if !current.user.specialite.is_empty() {
                println!("{}", current.user.specialite);
            }
        }
        Commands::Dashboard => render::dashboard(&load_dashboard(&authorized).await),
        Commands::Patients(command) => match command {
            PatientCommand::List(args) => {
                show_list(&authorized, ResourceList::<Patient>::all(), &args, render::patient_row)
                    .await?
            }
            PatientCommand::Show { id } => {
                let overview = load_patient_overview(&authorized, &id)
                    .await
                    .map_err(user_facing)?;
                let card = PatientCard::new(&overview.patient, chrono::Local::now().date_naive());
                render::patient_overview(&overview, &card);
            }
            PatientCommand::Draft {
                nom,
                prenom,
                birth_date,
                telephone,
                email,
                gender,
                contact,
            } => {
                let emergency_contacts = contact
                    .iter()
                    .map(|raw| {
                        let mut parts = raw.splitn(3, ',').map(str::trim);
                        EmergencyContactDraft {
                            nom: parts.next().unwrap_or_default().to_string(),
                            relation: parts.next().unwrap_or_default().to_string(),
                            telephone: parts.next().unwrap_or_default().to_string(),
                            ..EmergencyContactDraft::default()
                        }
                    })
                    .collect();
                let draft = PatientDraft {
                    nom,
                    prenom,
                    birth_date,
                    telephone,
                    email,
                    gender,
                    emergency_contacts,
                };
                print_json(&draft.normalize().map_err(user_facing)?)?;
            }
        },
        Commands::Consultations(command) => match command {
            ConsultationCommand::List(args) => {
                show_list(
                    &authorized,
                    ResourceList::<Consultation>::all(),
                    &args,
                    render::consultation_row,
                )
                .await?
            }
            ConsultationCommand::Show { id } => {
                let mut detail = ResourceDetail::<Consultation>::new();
                detail.show(&authorized, &id).await;
                match detail.state() {
                    LoadState::Ready(consultation) => render::consultation(consultation),
                    LoadState::Failed(message) => anyhow::bail!("{message}"),
                    LoadState::Loading => {}
                }
            }
            ConsultationCommand::Create(args) => {
                let mut form = ConsultationForm::new();
                form.open();
                let draft = form.draft_mut();
                draft.patient_id = args.patient;
                draft.date = args.date;
                draft.motif = args.motif;
                draft.medecin = args.medecin;
                draft.specialite = args.specialite;
                draft.diagnostic = args.diagnostic;
                draft.traitement = args.traitement;
                draft.tension_arterielle = args.tension;
                draft.taux_glycemie = args.glycemie;
                draft.frequence_cardiaque = args.pouls;
                draft.poids = args.poids;
                draft.temperature = args.temperature;
                draft.taille = args.taille;
                draft.notes = args.notes;
                draft.medicaments = args.medicaments;
                draft.instructions = args.instructions;
                draft.allergies = args.allergies;
                draft.antecedents_medicaux = args.antecedents;
                draft.teleconsultation = args.teleconsultation;
                draft.visio_link = args.visio_link;

                let mut list = ResourceList::<Consultation>::all();
                if form.submit(&authorized, &mut list).await.is_err() {
                    anyhow::bail!("{}", form.error().unwrap_or_default());
                }
                println!("{CONSULTATION_CREATED_MESSAGE}");
                render::list(&list, render::consultation_row);
            }
        },
        Commands::Exams(command) => match command {
            ExamCommand::List { patient, args } => {
                show_list(
                    &authorized,
                    ResourceList::<Examen>::for_patient(&patient),
                    &args,
                    render::examen_row,
                )
                .await?
            }
            ExamCommand::Show { id } => {
                let mut detail = ResourceDetail::<Examen>::new();
                detail.show(&authorized, &id).await;
                match detail.state() {
                    LoadState::Ready(examen) => render::examen(examen),
                    LoadState::Failed(message) => anyhow::bail!("{message}"),
                    LoadState::Loading => {}
                }
            }
            ExamCommand::Draft {
                patient,
                medecin,
                type_examen,
                specialite,
                date,
                resultat,
                fichier_url,
            } => {
                let draft = ExamenDraft {
                    patient_id: patient,
                    medecin,
                    specialite,
                    type_examen,
                    date_examen: date,
                    resultat_examen: resultat,
                    fichier_url,
                };
                print_json(&draft.normalize().map_err(user_facing)?)?;
            }
        },
        Commands::Appointments(command) => match command {
            AppointmentCommand::List(args) => {
                show_list(
                    &authorized,
                    ResourceList::<RendezVous>::all(),
                    &args,
                    |r: &RendezVous| {
                        let actions: Vec<&str> =
                            available_actions(r.status).into_iter().map(|a| a.label()).collect();
                        format!("{}  -> {}", render::rendezvous_row(r), actions.join(" / "))
                    },
                )
                .await?
            }
            AppointmentCommand::Confirm { id } => {
                set_appointment_status(&authorized, &id, RendezVousStatus::Confirme).await?
            }
            AppointmentCommand::Cancel { id } => {
                set_appointment_status(&authorized, &id, RendezVousStatus::Annule).await?
            }
        },
        Commands::Users(UserCommand::List(args)) => {
            show_list(&authorized, ResourceList::<UserData>::all(), &args, render::user_row)
                .await?
        }
        Commands::Blog(command) => blog(command)?,
    }

    Ok(())
}

/// Entry point of the terminal dashboard.
///
/// # Environment Variables
/// - `CLINIC_API_URL`: gateway origin (default: `http://localhost:8000`)
/// - `CLINIC_SESSION_FILE`: session file (default: `<config dir>/clinic/session.json`)
/// - `RUST_LOG`: log filter (default: warnings only)
///
/// # Errors
/// Returns an error if configuration is invalid or the command fails; the message is the
/// one a user should see.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_cli=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    // Public pages need neither the gateway nor a session.
    if let Commands::Blog(command) = command {
        return blog(command);
    }

    let api_base_url =
        api_base_url_from_env_value(std::env::var("CLINIC_API_URL").ok()).map_err(user_facing)?;
    let config = CoreConfig::new(api_base_url, session_file()?).map_err(user_facing)?;
    tracing::debug!(api = config.api_base_url(), "configuration resolved");

    run(command, &config).await
}
