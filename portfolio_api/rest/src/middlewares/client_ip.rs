use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderValue,
    middleware::{from_fn, Next},
    Router,
};
use portfolio_models::client::ClientAddress;
use tracing::{debug, warn};

use crate::RealIpConfig;

pub fn add<S: Clone + Send + Sync + 'static>(
    real_ip_config: Option<Arc<RealIpConfig>>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |mut request: Request, next: Next| {
            let client = client_address(&request, real_ip_config.as_deref());
            request.extensions_mut().insert(client);
            next.run(request)
        }))
    }
}

fn client_address(request: &Request, real_ip_config: Option<&RealIpConfig>) -> ClientAddress {
    let Some(peer) = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_canonical())
    else {
        warn!("peer address not available");
        return ClientAddress::Unknown;
    };

    let Some(RealIpConfig {
        header,
        trusted_proxies,
    }) = real_ip_config
    else {
        return peer.into();
    };

    let header_value = request.headers().get(header);

    if !trusted_proxies.contains(&peer) {
        if let Some(header_value) = header_value {
            debug!(%peer, ?header_value, "ignoring forwarded header from untrusted peer");
        }
        return peer.into();
    }

    let Some(header_value) = header_value else {
        warn!(%peer, "forwarded header not found");
        return peer.into();
    };

    match forwarded_client(header_value, trusted_proxies) {
        Some(ip) => ip.into(),
        None => {
            warn!(%peer, ?header_value, "failed to parse forwarded header");
            peer.into()
        }
    }
}

/// Returns the right-most hop that is not a trusted proxy, falling back to
/// the left-most hop if the whole chain is trusted.
fn forwarded_client(header_value: &HeaderValue, trusted_proxies: &[IpAddr]) -> Option<IpAddr> {
    let hops = header_value
        .to_str()
        .ok()?
        .split(',')
        .map(|hop| hop.trim().parse::<IpAddr>().map(|ip| ip.to_canonical()))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    hops.iter()
        .rev()
        .find(|ip| !trusted_proxies.contains(ip))
        .or(hops.first())
        .copied()
}
