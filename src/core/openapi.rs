use utoipa::{Modify, OpenApi};

use crate::features::drivers::{dtos as drivers_dtos, handlers as drivers_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        drivers_handlers::create_driver,
        drivers_handlers::update_driver,
        drivers_handlers::list_drivers,
        drivers_handlers::find_nearby,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Drivers
            drivers_dtos::LocationDto,
            drivers_dtos::DriverRequestDto,
            drivers_dtos::DriverResponseDto,
            drivers_dtos::NearbyDriverDto,
            drivers_dtos::CreateDriverResponseDto,
            drivers_dtos::UpdateDriverResponseDto,
            ApiResponse<drivers_dtos::CreateDriverResponseDto>,
            ApiResponse<drivers_dtos::UpdateDriverResponseDto>,
            ApiResponse<Vec<drivers_dtos::DriverResponseDto>>,
            ApiResponse<Vec<drivers_dtos::NearbyDriverDto>>,
        )
    ),
    tags(
        (name = "drivers", description = "Driver registry and nearby-driver search"),
    ),
    info(
        title = "Taxi Driver Service API",
        version = "0.1.0",
        description = "Driver registry and nearby-driver search",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
