use std::sync::Arc;

use axum::{routing::get, Router};
use taxi_driver_registry::core::config::GatewayConfig;
use taxi_driver_registry::core::server;
use taxi_driver_registry::features::gateway::{routes as gateway_routes, AuthService, TokenService};
use taxi_driver_registry::modules::proxy::{ReverseProxy, RoundRobinBalancer};

fn main() -> anyhow::Result<()> {
    let (runtime, _) = server::build_runtime()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    server::init_tracing();

    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Gateway configuration loaded successfully");

    let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.jwt_ttl));
    let auth_service = Arc::new(AuthService::new(
        config.admin_username.clone(),
        config.admin_password.clone(),
        Arc::clone(&tokens),
    ));
    tracing::info!(
        "Token service initialized (ttl {}h)",
        config.jwt_ttl.as_secs() / 3600
    );

    let balancer = RoundRobinBalancer::new(config.upstream_urls.clone())?;
    tracing::info!(
        "Proxying /drivers to {} upstream(s): {}",
        balancer.targets().len(),
        balancer.targets().join(", ")
    );
    let proxy = Arc::new(ReverseProxy::new(balancer, config.upstream_timeout)?);

    let app = Router::new()
        .merge(gateway_routes::public_routes(auth_service))
        .merge(gateway_routes::protected_routes(proxy, tokens))
        .route("/health", get(server::health_check));
    let app = server::with_http_layers(app, config.cors_allowed_origins.clone());

    let addr = config.server_address();
    let listener = server::bind_listener(&addr)?;
    tracing::info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
