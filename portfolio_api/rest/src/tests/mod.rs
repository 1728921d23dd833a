use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use portfolio_core_contact_contracts::{ContactSendMessageError, MockContactFeatureService};
use portfolio_core_health_contracts::{HealthStatus, MockHealthFeatureService};
use portfolio_models::{client::ClientAddress, contact::ContactSubmission};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{
    routes::contact::{
        INVALID_EMAIL, MESSAGE_SENT, MISSING_FIELDS, SEND_FAILED, TOO_MANY_REQUESTS,
    },
    RealIpConfig, RestServer, RestServerConfig,
};


type Sut = RestServer<MockHealthFeatureService, MockContactFeatureService>;

const ORIGIN: &str = "http://localhost:5173";

fn config() -> RestServerConfig {
    RestServerConfig {
        addr: (Ipv4Addr::LOCALHOST, 0).into(),
        allowed_origin: HeaderValue::from_static(ORIGIN),
        body_limit: 50 * 1024,
        static_dir: None,
        real_ip_config: None,
    }
}

fn make_sut(
    health: MockHealthFeatureService,
    contact: MockContactFeatureService,
    config: RestServerConfig,
) -> Sut {
    RestServer {
        health,
        contact,
        config,
    }
}

/// Serve `sut` on an ephemeral port and return its base url.
async fn serve(sut: Sut) -> String {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(sut.serve_on(listener));
    format!("http://{addr}")
}

fn localhost() -> ClientAddress {
    ClientAddress::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn submission() -> ContactSubmission {
    ContactSubmission {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        subject: "Hello".into(),
        message: "Hi there".into(),
    }
}

fn submission_json() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "subject": "Hello",
        "message": "Hi there",
    })
}

fn expected(success: bool, message: &str) -> Value {
    json!({ "success": success, "message": message })
}

async fn post_contact(base: &str, body: &Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/contact"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    (status, response.json().await.unwrap())
}
