use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{GeometryError, QueryComposer};
use crate::models::{
    AddressPath, ErrorResponse, HealthResponse, PolygonQueryRequest, PolygonQueryResponse,
    RegionListResponse, RegionQueryParams, RegionSelector, UpdateCoordsRequest, UpdateCoordsResponse,
};
use crate::services::AddressStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<AddressStore>,
    pub composer: QueryComposer,
    pub region_defaults: RegionSelector,
}

/// Configure all address routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/addresses/in-polygon", web::post().to(find_in_polygon))
        .route("/addresses", web::get().to(list_by_region))
        .route("/address/{mgtNo}/coords", web::post().to(update_coords));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Wire code for a geometry error
///
/// Point values rejected at the HTTP boundary are reported as
/// `invalid_coordinate_value`; every other case uses the error's own code.
pub fn geometry_error_code(err: &GeometryError) -> &'static str {
    match err {
        GeometryError::InvalidCoordinate(_) => "invalid_coordinate_value",
        _ => err.code(),
    }
}

fn geometry_error_response(err: &GeometryError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(geometry_error_code(err), err.to_string(), 400))
}

fn validation_error_response(errors: &validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("validation_failed", errors.to_string(), 400))
}

/// Find addresses inside a polygon
///
/// POST /api/addresses/in-polygon
///
/// Request body:
/// ```json
/// {
///   "coordinates": [{"lat": 37.2, "lng": 126.8}, ...],
///   "sidonm": "경기도",
///   "sggnm": "화성시",
///   "emdnm": "남양읍",
///   "onlyMissing": false,
///   "limit": 1000
/// }
/// ```
async fn find_in_polygon(
    state: web::Data<AppState>,
    req: web::Json<PolygonQueryRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for in-polygon request: {}", errors);
        return validation_error_response(&errors);
    }

    let plan = match req
        .points()
        .and_then(|points| state.composer.plan_polygon_query(&points, &req.filter(), req.requested_limit()))
    {
        Ok(plan) => plan,
        Err(e) => {
            tracing::info!("Rejected polygon request: {}", e);
            return geometry_error_response(&e);
        }
    };

    tracing::debug!(params = plan.params.len(), "Running polygon query: {}", plan.predicates.join(" AND "));

    match state.store.fetch_in_polygon(&plan).await {
        Ok(items) => {
            tracing::info!("Returning {} addresses inside polygon", items.len());
            HttpResponse::Ok().json(PolygonQueryResponse::from(items))
        }
        Err(e) => {
            tracing::error!("Polygon query failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "failed_to_fetch_in_polygon",
                e.to_string(),
                500,
            ))
        }
    }
}

/// List the addresses of one administrative region
///
/// GET /api/addresses?sidonm={sido}&sggnm={sgg}&emdnm={emd}&onlyMissing=true
///
/// Omitted region names fall back to the configured defaults.
async fn list_by_region(
    state: web::Data<AppState>,
    query: web::Query<RegionQueryParams>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error_response(&errors);
    }

    let region = query.selector(&state.region_defaults);
    let plan = state.composer.compose_region(&region, query.only_missing());

    match state.store.fetch_by_region(&plan).await {
        Ok(records) => {
            tracing::info!(
                "Returning {} addresses for {} {} {}",
                records.len(),
                region.sido_nm,
                region.sgg_nm,
                region.emd_nm
            );
            HttpResponse::Ok().json(RegionListResponse::from(records))
        }
        Err(e) => {
            tracing::error!("Region query failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("failed_to_fetch", e.to_string(), 500))
        }
    }
}

/// Overwrite one address's coordinates
///
/// POST /api/address/{mgtNo}/coords
///
/// Request body:
/// ```json
/// { "lat": 37.2, "lng": 126.8 }
/// ```
async fn update_coords(
    state: web::Data<AppState>,
    path: web::Path<AddressPath>,
    req: web::Json<UpdateCoordsRequest>,
) -> impl Responder {
    if let Err(errors) = path.validate() {
        return validation_error_response(&errors);
    }

    let Some(point) = req.point() else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "lat_lng_must_be_numbers",
            "lat and lng must both be JSON numbers",
            400,
        ));
    };

    match state.store.update_coordinates(&path.mgt_no, point).await {
        Ok(true) => HttpResponse::Ok().json(UpdateCoordsResponse {
            mgt_no: path.mgt_no.clone(),
            lat: point.lat,
            lng: point.lng,
        }),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("No address with management number {}", path.mgt_no),
            404,
        )),
        Err(e) => {
            tracing::error!("Failed to update coordinates of {}: {}", path.mgt_no, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("failed_to_update", e.to_string(), 500))
        }
    }
}
