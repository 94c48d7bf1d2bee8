use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{RankError, Ranker};
use crate::models::{ErrorResponse, HealthResponse, RankHospitalsRequest, RankHospitalsResponse, Weights};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ranker: Ranker,
    pub default_weights: Weights,
}

/// Configure all hospital-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/hospitals/rank", web::post().to(rank_hospitals));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let data = state.ranker.data();

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        hospitals: data.hospitals().len(),
        zip_codes: data.zip_codes().len(),
    })
}

fn rank_error_response(err: &RankError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: err.code().to_string(),
        message: err.to_string(),
        status_code: 400,
    })
}

/// Rank hospitals endpoint
///
/// POST /api/v1/hospitals/rank
///
/// Request body:
/// ```json
/// {
///   "zipCode": "19104",
///   "maxDistanceMiles": 25,
///   "weights": { "closeness": 5, "cSection": 5, "vbac": 5, "nicu": 5 }
/// }
/// ```
async fn rank_hospitals(
    state: web::Data<AppState>,
    req: web::Json<RankHospitalsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let query = match req.to_query(&state.default_weights) {
        Ok(query) => query,
        Err(e) => {
            tracing::info!("Rejected rank request for zip {:?}: {}", req.zip_code, e);
            return rank_error_response(&e);
        }
    };

    tracing::info!(
        "Ranking hospitals within {} miles of {} (weights: {:?})",
        query.max_distance_miles,
        query.origin_zip,
        query.weights
    );

    match state.ranker.rank(&query) {
        Ok(result) => {
            tracing::info!(
                "Returning {} hospitals for {} (from {} candidates)",
                result.hospitals.len(),
                query.origin_zip,
                result.total_candidates
            );
            HttpResponse::Ok().json(RankHospitalsResponse::new(result.hospitals))
        }
        Err(e) => {
            tracing::info!("Rank request for {} failed: {}", query.origin_zip, e);
            rank_error_response(&e)
        }
    }
}
