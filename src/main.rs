use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Router};
use taxi_driver_registry::core::config::{Config, StoreBackend};
use taxi_driver_registry::core::openapi::{ApiDoc, SwaggerInfoModifier};
use taxi_driver_registry::core::{database, middleware, server};
use taxi_driver_registry::features::drivers::{
    routes as drivers_routes, DriverService, DriverStore, InMemoryDriverStore, PgDriverStore,
};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    let (runtime, worker_threads) = server::build_runtime()?;
    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    server::init_tracing();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let store: Arc<dyn DriverStore> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = database::create_pool(&config.database).await?;
            tracing::info!(
                "Database connection pool created: {}",
                config.database.redacted_url()
            );

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            Arc::new(PgDriverStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory driver store; data is lost on restart");
            Arc::new(InMemoryDriverStore::new())
        }
    };

    let driver_service = Arc::new(DriverService::new(store, &config.registry));
    tracing::info!(
        "Driver service initialized (nearby radius {}km, default page size {})",
        config.registry.nearby_radius_km,
        config.registry.default_page_size
    );

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let app = Router::new()
        .merge(swagger)
        .merge(drivers_routes::routes(driver_service))
        .route("/health", get(server::health_check));
    let app = server::with_http_layers(app, config.app.cors_allowed_origins.clone());

    let addr = config.app.server_address();
    let listener = server::bind_listener(&addr)?;
    tracing::info!("Driver service listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
