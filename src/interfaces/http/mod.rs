use crate::application::CareerCoachUseCase;
use crate::domain::career::{DiscoverRequest, RoadmapRequest, StreamAnalysisRequest};
use crate::domain::error::{AppError, Result};
use crate::domain::extraction::ExtractedResult;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::LLMClient;
use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;
use validator::Validate;

pub struct HttpState {
    pub career_coach: Arc<CareerCoachUseCase>,
    pub llm_client: Arc<dyn LLMClient + Send + Sync>,
    pub llm_config: Arc<LLMConfig>,
}

#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorDetail {
        detail: err.to_string(),
    };
    match err {
        AppError::ValidationError(_) => HttpResponse::UnprocessableEntity().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn result_response(endpoint: &str, outcome: Result<ExtractedResult>) -> HttpResponse {
    match outcome {
        Ok(result) => {
            if result.is_parsed() {
                info!(endpoint, "Structured result returned");
            } else {
                warn!(endpoint, "Returning failure payload after exhausted retries");
            }
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            error!(endpoint, error = %e, "Request failed");
            error_response(&e)
        }
    }
}

#[get("/")]
async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({"message": "CareerCoach AI Backend Running"}))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "OK"}))
}

#[get("/models")]
async fn list_models(data: web::Data<HttpState>) -> impl Responder {
    info!(provider = ?data.llm_config.provider, "Fetching models");

    match data.llm_client.list_models(&data.llm_config).await {
        Ok(models) => HttpResponse::Ok().json(models),
        Err(e) => {
            error!(error = %e, "Failed to list models");
            HttpResponse::BadGateway().json(ErrorDetail {
                detail: e.to_string(),
            })
        }
    }
}

#[post("/generate-discover")]
async fn generate_discover(
    data: web::Data<HttpState>,
    req: web::Json<DiscoverRequest>,
) -> HttpResponse {
    let span = info_span!("generate_discover", request_id = %Uuid::new_v4());
    async move {
        if let Err(err) = req.validate() {
            return error_response(&AppError::from(err));
        }
        result_response("generate-discover", data.career_coach.discover(&req).await)
    }
    .instrument(span)
    .await
}

#[post("/generate-stream-analysis")]
async fn generate_stream_analysis(
    data: web::Data<HttpState>,
    req: web::Json<StreamAnalysisRequest>,
) -> HttpResponse {
    let span = info_span!("generate_stream_analysis", request_id = %Uuid::new_v4());
    async move {
        if let Err(err) = req.validate() {
            return error_response(&AppError::from(err));
        }
        result_response(
            "generate-stream-analysis",
            data.career_coach.stream_analysis(&req).await,
        )
    }
    .instrument(span)
    .await
}

#[post("/generate-roadmap")]
async fn generate_roadmap(
    data: web::Data<HttpState>,
    req: web::Json<RoadmapRequest>,
) -> HttpResponse {
    let span = info_span!("generate_roadmap", request_id = %Uuid::new_v4());
    async move {
        if let Err(err) = req.validate() {
            return error_response(&AppError::from(err));
        }
        result_response("generate-roadmap", data.career_coach.roadmap(&req).await)
    }
    .instrument(span)
    .await
}

/// Malformed bodies get the same `{"detail": ...}` shape as other errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::UnprocessableEntity().json(ErrorDetail {
            detail: err.to_string(),
        });
        InternalError::from_response(err, response).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(root)
        .service(health)
        .service(list_models)
        .service(generate_discover)
        .service(generate_stream_analysis)
        .service(generate_roadmap);
}

pub fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials();
    for origin in origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }
    cors
}

pub fn start_server(state: HttpState, config: &AppConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);
    let origins = config.cors_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&origins))
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run();

    Ok(server)
}
