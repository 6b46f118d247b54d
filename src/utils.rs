// src/utils.rs
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use std::fmt;
use std::net::IpAddr;

/// Errors that cross the HTTP boundary. Everything upstream-related is
/// absorbed by the aggregator and never appears here.
#[derive(Debug)]
pub enum RequestError {
    UnknownServer,
    MissingPeerIp,
    RateLimitExceeded,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownServer => write!(f, "Invalid server type"),
            Self::MissingPeerIp => write!(f, "Failed to extract client IP"),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
        }
    }
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::UnknownServer => HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": self.to_string() })),
            Self::RateLimitExceeded => HttpResponse::TooManyRequests().body(self.to_string()),
            Self::MissingPeerIp => HttpResponse::BadRequest().body(self.to_string()),
        }
    }
}

pub fn peer_ip(req: &HttpRequest) -> Result<IpAddr, RequestError> {
    req.peer_addr()
        .map(|addr| addr.ip())
        .ok_or(RequestError::MissingPeerIp)
}

/// Renders an uptime in seconds the way the dashboard displays it: whole
/// hours and leftover minutes, seconds dropped.
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}
