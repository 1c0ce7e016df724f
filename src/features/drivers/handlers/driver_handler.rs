use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::drivers::dtos::{
    CreateDriverResponseDto, DriverRequestDto, DriverResponseDto, ListDriversQuery,
    NearbyDriverDto, NearbyDriversQuery, UpdateDriverResponseDto,
};
use crate::features::drivers::services::DriverService;
use crate::shared::types::{ApiResponse, Meta};

/// Register a new driver
#[utoipa::path(
    post,
    path = "/drivers",
    request_body = DriverRequestDto,
    responses(
        (status = 201, description = "Driver created", body = ApiResponse<CreateDriverResponseDto>),
        (status = 400, description = "Malformed body or invalid coordinates"),
        (status = 500, description = "Store failure")
    ),
    tag = "drivers"
)]
pub async fn create_driver(
    State(service): State<Arc<DriverService>>,
    AppJson(dto): AppJson<DriverRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<CreateDriverResponseDto>>)> {
    let id = service.create_driver(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(CreateDriverResponseDto { id }),
            None,
            None,
        )),
    ))
}

/// Update an existing driver
///
/// Overwrites name, plate, taxi type and location. Car brand and model are
/// set at creation only.
#[utoipa::path(
    put,
    path = "/drivers/{id}",
    params(
        ("id" = String, Path, description = "Driver ID")
    ),
    request_body = DriverRequestDto,
    responses(
        (status = 200, description = "Driver updated", body = ApiResponse<UpdateDriverResponseDto>),
        (status = 400, description = "Malformed body or driver id"),
        (status = 404, description = "Driver not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "drivers"
)]
pub async fn update_driver(
    State(service): State<Arc<DriverService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<DriverRequestDto>,
) -> Result<Json<ApiResponse<UpdateDriverResponseDto>>> {
    service.update_driver(&id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(UpdateDriverResponseDto::updated()),
        None,
        None,
    )))
}

/// List drivers, newest first
#[utoipa::path(
    get,
    path = "/drivers",
    params(ListDriversQuery),
    responses(
        (status = 200, description = "One page of drivers", body = ApiResponse<Vec<DriverResponseDto>>),
        (status = 500, description = "Store failure")
    ),
    tag = "drivers"
)]
pub async fn list_drivers(
    State(service): State<Arc<DriverService>>,
    Query(query): Query<ListDriversQuery>,
) -> Result<Json<ApiResponse<Vec<DriverResponseDto>>>> {
    let (page, page_size) = service.effective_page(query.page(), query.page_size());
    let drivers = service.list_drivers(page, page_size).await?;
    let meta = Meta::page(drivers.len(), page, page_size);

    Ok(Json(ApiResponse::success(Some(drivers), None, Some(meta))))
}

/// Find drivers near a point
///
/// Returns drivers within the configured radius (6km by default), sorted
/// by distance ascending.
#[utoipa::path(
    get,
    path = "/drivers/nearby",
    params(NearbyDriversQuery),
    responses(
        (status = 200, description = "Nearby drivers, nearest first", body = ApiResponse<Vec<NearbyDriverDto>>),
        (status = 400, description = "Missing or invalid lat/lon"),
        (status = 500, description = "Store failure")
    ),
    tag = "drivers"
)]
pub async fn find_nearby(
    State(service): State<Arc<DriverService>>,
    Query(query): Query<NearbyDriversQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyDriverDto>>>> {
    let results = service.find_nearby(&query).await?;
    let meta = Meta::total(results.len());

    Ok(Json(ApiResponse::success(Some(results), None, Some(meta))))
}
