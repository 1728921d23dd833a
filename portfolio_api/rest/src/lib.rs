use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_core_health_contracts::HealthFeatureService;
use portfolio_di::Build;
use portfolio_utils::Apply;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
};
use tracing::info;

mod middlewares;
mod models;
mod routes;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    /// The only origin browsers may call the api from.
    pub allowed_origin: HeaderValue,
    pub body_limit: usize,
    /// Directory of the frontend bundle, served for all paths not handled by
    /// the api.
    pub static_dir: Option<PathBuf>,
    pub real_ip_config: Option<Arc<RealIpConfig>>,
}

/// Forwarded client address header, honoured only for requests from one of
/// the `trusted_proxies`.
///
/// The client is the right-most hop of the header that is not a trusted
/// proxy. Behind a single trusted proxy this is the address the proxy saw,
/// and any hops the client put in front of it are ignored.
#[derive(Debug)]
pub struct RealIpConfig {
    pub header: HeaderName,
    pub trusted_proxies: Vec<IpAddr>,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.addr).await?;
        self.serve_on(listener).await
    }

    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        info!("Starting REST API server on {}", listener.local_addr()?);
        let router = self.router();
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let RestServerConfig {
            allowed_origin,
            body_limit,
            static_dir,
            real_ip_config,
            ..
        } = self.config;

        Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()))
            .apply_map(static_dir, |router, dir| {
                let index = ServeFile::new(dir.join("index.html"));
                router.fallback_service(ServeDir::new(dir).fallback(index))
            })
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(cors(allowed_origin))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::trace::add)
            .apply(middlewares::client_ip::add(real_ip_config))
            .apply(middlewares::request_id::add)
    }
}

fn cors(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(600))
}
