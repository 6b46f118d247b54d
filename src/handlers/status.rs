// src/handlers/status.rs
use actix_web::{web, HttpRequest, HttpResponse};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::RateLimiter;
use log::{debug, error};
use serde::Deserialize;
use std::net::IpAddr;
use std::str::FromStr;

use crate::aggregator::StatusAggregator;
use crate::config::{Config, ServerId};
use crate::utils::{peer_ip, RequestError};

#[derive(Deserialize)]
pub struct StatusQuery {
    server: Option<String>,
}

/// `GET /api/server-status?server={id}`. An unknown id is the only client
/// error; for known ids the aggregator guarantees a 200 with a renderable
/// record, mock-flagged or not.
pub async fn server_status(
    req: HttpRequest,
    query: web::Query<StatusQuery>,
    config: web::Data<Config>,
    aggregator: web::Data<StatusAggregator>,
    rate_limiter: web::Data<RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>>,
) -> Result<HttpResponse, RequestError> {
    let peer_ip = peer_ip(&req)?;

    if rate_limiter.check_key(&peer_ip).is_err() {
        error!("Rate limit exceeded for server status for ip: {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    let identity = query
        .server
        .as_deref()
        .and_then(|s| ServerId::from_str(s).ok())
        .and_then(|id| config.identity(id))
        .ok_or(RequestError::UnknownServer)?;

    let record = aggregator.status(identity).await;
    debug!(
        "Returning {:?} status for {} (mock: {})",
        record.status, identity.id, record.is_mock_data
    );

    Ok(HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .json(record))
}

/// CORS preflight for the status route.
pub async fn server_status_options() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "GET, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use crate::config::ServerIdentity;

    fn test_config() -> Config {
        Config {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            application_id: "test-app".to_string(),
            application_secret: "test-secret".to_string(),
            upstream_timeout_secs: 1,
            enrichment_min_interval_secs: 60,
            status_period_secs: 60,
            status_burst_limit: 1,
            servers: vec![ServerIdentity {
                id: ServerId::Chernarus,
                resource_id: None,
                address: "127.0.0.1".to_string(),
                port: 2302,
                map_name: "Chernarus",
                max_players: 60,
            }],
        }
    }

    macro_rules! test_app {
        ($config:expr) => {{
            let config = $config;
            let aggregator = StatusAggregator::new(&config).unwrap();
            let rate_limiter: web::Data<
                RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
            > = web::Data::new(RateLimiter::keyed(config.status_quota()));

            test::init_service(
                App::new()
                    .app_data(web::Data::new(config))
                    .app_data(web::Data::new(aggregator))
                    .app_data(rate_limiter)
                    .route("/api/server-status", web::get().to(server_status))
                    .route(
                        "/api/server-status",
                        web::method(actix_web::http::Method::OPTIONS).to(server_status_options),
                    ),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn unknown_server_is_rejected_with_400() {
        let app = test_app!(test_config());

        let req = test::TestRequest::get()
            .uri("/api/server-status?server=takistan")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid server type");
    }

    #[actix_web::test]
    async fn missing_server_parameter_is_rejected() {
        let app = test_app!(test_config());

        let req = test::TestRequest::get()
            .uri("/api/server-status")
            .peer_addr("127.0.0.1:40001".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn known_server_always_gets_a_renderable_200() {
        // unconfigured resource id: the response must still be a valid record
        let app = test_app!(test_config());

        let req = test::TestRequest::get()
            .uri("/api/server-status?server=chernarus")
            .peer_addr("127.0.0.1:40002".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["isMockData"], true);
        assert_eq!(body["map"], "Chernarus");
    }

    #[actix_web::test]
    async fn second_request_over_burst_is_throttled() {
        let app = test_app!(test_config());
        let peer: std::net::SocketAddr = "127.0.0.1:40003".parse().unwrap();

        let req = test::TestRequest::get()
            .uri("/api/server-status?server=chernarus")
            .peer_addr(peer)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/server-status?server=chernarus")
            .peer_addr(peer)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn preflight_advertises_permissive_cors() {
        let app = test_app!(test_config());

        let req = test::TestRequest::with_uri("/api/server-status")
            .method(actix_web::http::Method::OPTIONS)
            .peer_addr("127.0.0.1:40004".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers.get("Access-Control-Allow-Origin").unwrap(), "*");
        assert_eq!(
            headers.get("Access-Control-Allow-Methods").unwrap(),
            "GET, OPTIONS"
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Headers").unwrap(),
            "Content-Type"
        );
    }
}
