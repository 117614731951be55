//! Plain-text output for the terminal dashboard.

use clinic_core::dashboard::DashboardSummary;
use clinic_core::dates::{format_date, format_datetime_date, format_time};
use clinic_core::detail::{format_appointment_time, PatientCard, PatientOverview};
use clinic_core::models::{Article, Consultation, Examen, Patient, RendezVous, UserData};
use clinic_core::{ListView, Resource, ResourceList};

const NO_RECORDS: &str = "Aucun élément.";
const NO_MATCH: &str = "Aucun résultat pour ces filtres.";

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Print the current view of `list`, one line per row.
pub fn list<R: Resource>(list: &ResourceList<R>, row: impl Fn(&R) -> String) {
    match list.view() {
        ListView::Loading => println!("Chargement..."),
        ListView::Failed(message) => eprintln!("{message}"),
        ListView::Empty => println!("{NO_RECORDS}"),
        ListView::NoMatch => println!("{NO_MATCH}"),
        ListView::Rows(rows) => {
            let shown = rows.len();
            for record in rows {
                println!("{}", row(record));
            }
            println!("({shown} / {})", list.records().len());
        }
    }
}

pub fn patient_row(p: &Patient) -> String {
    format!(
        "{:<26} {:<28} {:<30} {:<14} {}",
        p.id,
        p.full_name(),
        or_dash(&p.email),
        or_dash(&p.telephone),
        p.gender.label()
    )
}

pub fn consultation_row(c: &Consultation) -> String {
    let date = c.date.as_ref().map(format_datetime_date).unwrap_or_default();
    format!(
        "{:<26} {:<10} {:<30} {:<20} {:<16}{}",
        c.id,
        or_dash(&date),
        or_dash(&c.motif),
        or_dash(&c.medecin),
        or_dash(&c.specialite),
        if c.teleconsultation { " [visio]" } else { "" }
    )
}

pub fn examen_row(e: &Examen) -> String {
    let date = e
        .date_examen
        .as_ref()
        .map(format_datetime_date)
        .unwrap_or_default();
    format!(
        "{:<26} {:<10} {:<14} {:<20} {}",
        e.id,
        or_dash(&date),
        or_dash(&e.type_examen),
        or_dash(&e.medecin),
        e.status.label()
    )
}

pub fn rendezvous_row(r: &RendezVous) -> String {
    let patient = r
        .patient_id
        .display_name()
        .unwrap_or_else(|| r.patient_id.id().to_string());
    format!(
        "{:<26} {:<20} {:<24} {:<26} {}",
        r.id,
        format_appointment_time(r.date_rdv.as_ref()),
        or_dash(&patient),
        or_dash(&r.motif),
        r.status.label()
    )
}

pub fn user_row(u: &UserData) -> String {
    format!(
        "{:<26} {:<28} {:<30} {:<16} {}",
        u.id,
        u.full_name(),
        or_dash(&u.email),
        or_dash(&u.specialite),
        u.access_label()
    )
}

pub fn patient_overview(overview: &PatientOverview, card: &PatientCard) {
    let patient = &overview.patient;
    println!("{}", card.full_name);
    println!(
        "  Né(e) le {} ({}) | {}",
        card.birth_date.as_deref().unwrap_or("-"),
        card.age.map(|a| format!("{a} ans")).unwrap_or_else(|| "âge inconnu".into()),
        card.gender
    );
    println!("  Téléphone: {}", or_dash(&patient.telephone));
    println!("  Email: {}", or_dash(&patient.email));
    if let Some(registered) = &card.registered_on {
        println!("  Inscrit le {registered}");
    }
    for contact in &patient.emergency_contacts {
        println!(
            "  Contact d'urgence: {} {} ({}) {}",
            contact.prenom,
            contact.nom,
            or_dash(&contact.relation),
            contact.telephone
        );
    }

    println!("\nConsultations ({})", overview.consultations.len());
    for c in &overview.consultations {
        println!("  {}", consultation_row(c));
    }
    println!("\nExamens ({})", overview.examens.len());
    for e in &overview.examens {
        println!("  {}", examen_row(e));
    }
    for note in &overview.degraded {
        eprintln!("! {note}");
    }
}

pub fn consultation(c: &Consultation) {
    println!("Consultation {}", c.id);
    if let Some(date) = &c.date {
        println!("  Date: {} {}", format_datetime_date(date), format_time(date));
    }
    println!("  Motif: {}", or_dash(&c.motif));
    println!("  Médecin: {} ({})", or_dash(&c.medecin), or_dash(&c.specialite));
    println!("  Diagnostic: {}", or_dash(&c.diagnostic));
    println!("  Traitement: {}", or_dash(&c.traitement));

    let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
    println!(
        "  Tension: {} | Glycémie: {} | Pouls: {} | Température: {}",
        c.tension_arterielle.as_deref().unwrap_or("-"),
        number(c.taux_glycemie),
        number(c.frequence_cardiaque),
        number(c.temperature)
    );
    println!(
        "  Poids: {} kg | Taille: {} cm | IMC: {}",
        number(c.poids),
        number(c.taille),
        c.bmi().map(|b| format!("{b:.1}")).unwrap_or_else(|| "-".into())
    );
    println!("  Médicaments: {}", or_dash(&c.medicaments.join(", ")));
    println!("  Allergies: {}", or_dash(&c.allergies.join(", ")));
    println!("  Antécédents: {}", or_dash(&c.antecedents_medicaux.join(", ")));
    println!("  Instructions: {}", or_dash(&c.instructions));
    println!("  Notes: {}", or_dash(&c.notes));
    if c.teleconsultation {
        println!("  Téléconsultation: {}", c.visio_link.as_deref().unwrap_or("-"));
    }
}

pub fn examen(e: &Examen) {
    println!("Examen {} [{}]", e.id, e.status.label());
    println!("  Type: {}", or_dash(&e.type_examen));
    if let Some(date) = &e.date_examen {
        println!("  Date: {}", format_datetime_date(date));
    }
    println!("  Médecin: {} ({})", or_dash(&e.medecin), or_dash(&e.specialite));
    println!("  Résultat: {}", or_dash(&e.resultat_examen));
    if let Some(url) = &e.fichier_url {
        println!("  Fichier: {url}");
    }
}

pub fn dashboard(summary: &DashboardSummary) {
    match &summary.patients {
        Ok(total) => println!("Patients: {total}"),
        Err(message) => println!("Patients: indisponible ({message})"),
    }
    match &summary.consultations {
        Ok(c) => println!(
            "Consultations: {} dont {} téléconsultations",
            c.total, c.teleconsultations
        ),
        Err(message) => println!("Consultations: indisponible ({message})"),
    }
    match &summary.examens {
        Ok(e) => println!(
            "Examens: {} (en attente {}, terminés {}, annulés {})",
            e.total, e.pending, e.completed, e.canceled
        ),
        Err(message) => println!("Examens: indisponible ({message})"),
    }
    match &summary.rendezvous {
        Ok(r) => println!(
            "Rendez-vous: {} (en attente {}, confirmés {}, annulés {})",
            r.total, r.pending, r.confirmed, r.canceled
        ),
        Err(message) => println!("Rendez-vous: indisponible ({message})"),
    }
}

pub fn article_row(a: &Article) -> String {
    format!(
        "{}  {:<44} {:<14} {} min",
        format_date(a.published_at.date_naive()),
        a.slug,
        a.category,
        a.read_time
    )
}

pub fn article(a: &Article, related: &[&Article]) {
    println!("{}", a.title);
    println!(
        "{} | {} | {} | {} min",
        a.author,
        format_date(a.published_at.date_naive()),
        a.category,
        a.read_time
    );
    println!("\n{}\n", a.content);
    if !a.tags.is_empty() {
        let tags: Vec<&str> = a.tags.iter().map(String::as_str).collect();
        println!("Tags: {}", tags.join(", "));
    }
    if !related.is_empty() {
        println!("\nÀ lire aussi:");
        for r in related {
            println!("  {}", article_row(r));
        }
    }
}
