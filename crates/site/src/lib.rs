//! # Clinic Site
//!
//! JSON API behind the clinic's public website.
//!
//! Handles:
//! - blog endpoints over the seeded [`ArticleRepository`]
//! - the static list of clinic services
//! - OpenAPI/Swagger documentation

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clinic_core::constants::DEFAULT_LATEST_LIMIT;
use clinic_core::models::Article;
use clinic_core::ArticleRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Related articles listed under a full article.
const RELATED_LIMIT: usize = 3;

#[derive(Clone)]
struct AppState {
    articles: Arc<ArticleRepository>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
}

/// Article without its body, as shown on cards and lists.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummaryRes {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub author: String,
    /// RFC 3339 timestamp.
    pub published_at: String,
    pub category: String,
    pub image_url: String,
    pub featured: bool,
    pub read_time: u32,
    pub tags: Vec<String>,
}

impl From<&Article> for ArticleSummaryRes {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            slug: article.slug.clone(),
            excerpt: article.excerpt.clone(),
            author: article.author.clone(),
            published_at: article.published_at.to_rfc3339(),
            category: article.category.clone(),
            image_url: article.image_url.clone(),
            featured: article.featured,
            read_time: article.read_time,
            tags: article.tags.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleListRes {
    pub articles: Vec<ArticleSummaryRes>,
}

impl ArticleListRes {
    fn new(articles: Vec<&Article>) -> Self {
        Self {
            articles: articles.into_iter().map(ArticleSummaryRes::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleRes {
    pub article: ArticleSummaryRes,
    pub content: String,
    pub related: Vec<ArticleSummaryRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoriesRes {
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceRes {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServicesRes {
    pub services: Vec<ServiceRes>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LatestQuery {
    /// Maximum number of articles (default 6).
    pub limit: Option<usize>,
}

const SERVICES: [(&str, &str, &str); 6] = [
    (
        "consultation",
        "Consultations générales",
        "Suivi médical, bilans de santé et orientation vers les spécialistes.",
    ),
    (
        "cardiologie",
        "Cardiologie",
        "Dépistage et suivi des maladies cardiovasculaires.",
    ),
    (
        "teleconsultation",
        "Téléconsultation",
        "Consultation vidéo avec un médecin de la clinique.",
    ),
    (
        "analyses",
        "Analyses médicales",
        "Prélèvements et résultats d'analyses disponibles en ligne.",
    ),
    (
        "imagerie",
        "Imagerie médicale",
        "Radiographie, échographie, scanner et IRM.",
    ),
    (
        "pediatrie",
        "Pédiatrie",
        "Suivi de la croissance et vaccination des enfants.",
    ),
];

fn services() -> Vec<ServiceRes> {
    SERVICES
        .iter()
        .map(|(id, name, description)| ServiceRes {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        latest_articles,
        featured_articles,
        article_by_slug,
        list_categories,
        articles_by_category,
        list_services,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        ArticleSummaryRes,
        ArticleListRes,
        ArticleRes,
        CategoriesRes,
        ServiceRes,
        ServicesRes,
    ))
)]
pub struct ApiDoc;

/// Build the site router over `articles`, with Swagger UI and permissive CORS.
pub fn router(articles: Arc<ArticleRepository>) -> Router {
    let state = AppState { articles };

    Router::new()
        .route("/health", get(health))
        .route("/articles", get(latest_articles))
        .route("/articles/featured", get(featured_articles))
        .route("/articles/:slug", get(article_by_slug))
        .route("/categories", get(list_categories))
        .route("/categories/:category/articles", get(articles_by_category))
        .route("/services", get(list_services))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Clinic site API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/articles",
    params(LatestQuery),
    responses(
        (status = 200, description = "Newest articles first", body = ArticleListRes)
    )
)]
/// Latest articles, newest first.
#[axum::debug_handler]
async fn latest_articles(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Json<ArticleListRes> {
    let limit = query.limit.unwrap_or(DEFAULT_LATEST_LIMIT);
    Json(ArticleListRes::new(state.articles.latest(limit)))
}

#[utoipa::path(
    get,
    path = "/articles/featured",
    responses(
        (status = 200, description = "Featured articles, newest first", body = ArticleListRes)
    )
)]
#[axum::debug_handler]
async fn featured_articles(State(state): State<AppState>) -> Json<ArticleListRes> {
    Json(ArticleListRes::new(state.articles.featured()))
}

#[utoipa::path(
    get,
    path = "/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Full article with related articles", body = ArticleRes),
        (status = 404, description = "No article with this slug", body = ErrorRes)
    )
)]
/// One article by slug.
///
/// # Errors
/// Returns `404 Not Found` if no article has this slug.
#[axum::debug_handler]
async fn article_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleRes>, (StatusCode, Json<ErrorRes>)> {
    let Some(article) = state.articles.by_slug(&slug) else {
        tracing::debug!(%slug, "article not found");
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorRes {
                message: format!("Article introuvable: {slug}"),
            }),
        ));
    };

    Ok(Json(ArticleRes {
        article: ArticleSummaryRes::from(article),
        content: article.content.clone(),
        related: state
            .articles
            .related(&slug, RELATED_LIMIT)
            .into_iter()
            .map(ArticleSummaryRes::from)
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Distinct categories in first-seen order", body = CategoriesRes)
    )
)]
#[axum::debug_handler]
async fn list_categories(State(state): State<AppState>) -> Json<CategoriesRes> {
    Json(CategoriesRes {
        categories: state
            .articles
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

#[utoipa::path(
    get,
    path = "/categories/{category}/articles",
    params(("category" = String, Path, description = "Category name, case-insensitive")),
    responses(
        (status = 200, description = "Articles of the category, newest first", body = ArticleListRes)
    )
)]
#[axum::debug_handler]
async fn articles_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<ArticleListRes> {
    Json(ArticleListRes::new(state.articles.by_category(&category)))
}

#[utoipa::path(
    get,
    path = "/services",
    responses(
        (status = 200, description = "Services offered by the clinic", body = ServicesRes)
    )
)]
#[axum::debug_handler]
async fn list_services(State(_state): State<AppState>) -> Json<ServicesRes> {
    Json(ServicesRes {
        services: services(),
    })
}
