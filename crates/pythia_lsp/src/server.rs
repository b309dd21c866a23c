//! Route table over the HTTP transport: `POST /completion`,
//! `POST /diagnostic`, permissive CORS, JSON bodies in and out.

use std::net::SocketAddr;
use std::sync::Arc;

use pythia_http_server::{
    start_server, Handler, HttpRequest, HttpResponse, HttpServerError, ServerHandle,
};
use serde::Serialize;

use crate::backend::Backend;
use crate::protocol::{CompletionParams, ErrorBody, TextDocument};

pub fn serve(addr: SocketAddr, backend: Arc<Backend>) -> Result<ServerHandle, HttpServerError> {
    start_server(addr, router(backend))
}

pub fn router(backend: Arc<Backend>) -> Handler {
    Arc::new(move |request| {
        let backend = Arc::clone(&backend);
        Box::pin(async move { Ok(dispatch(&backend, request)) })
    })
}

pub(crate) fn dispatch(backend: &Backend, request: HttpRequest) -> HttpResponse {
    let path = request.path.split('?').next().unwrap_or("/");
    match (request.method.as_str(), path) {
        ("OPTIONS", "/completion" | "/diagnostic") => preflight_response(),
        ("POST", "/completion") => {
            match serde_json::from_slice::<CompletionParams>(&request.body) {
                Ok(params) => match backend.completion(&params) {
                    Ok(response) => json_response(200, &response),
                    Err(err) => error_response(500, err.to_string()),
                },
                Err(err) => error_response(400, format!("invalid request body: {err}")),
            }
        }
        ("POST", "/diagnostic") => match serde_json::from_slice::<TextDocument>(&request.body) {
            Ok(document) => match backend.diagnostics(&document) {
                Ok(response) => json_response(200, &response),
                Err(err) => error_response(500, err.to_string()),
            },
            Err(err) => error_response(400, format!("invalid request body: {err}")),
        },
        _ => error_response(404, "not found".to_string()),
    }
}

/// Development CORS policy, mirrored on every response: any origin,
/// any method, any header, credentials allowed.
fn cors_headers() -> Vec<(String, String)> {
    [
        ("access-control-allow-origin", "*"),
        ("access-control-allow-methods", "*"),
        ("access-control-allow-headers", "*"),
        ("access-control-allow-credentials", "true"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

fn preflight_response() -> HttpResponse {
    HttpResponse {
        status: 204,
        headers: cors_headers(),
        body: Vec::new(),
    }
}

fn json_response<T: Serialize>(status: u16, value: &T) -> HttpResponse {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut headers = cors_headers();
            headers.push(("content-type".to_string(), "application/json".to_string()));
            HttpResponse {
                status,
                headers,
                body,
            }
        }
        Err(err) => error_response(500, format!("failed to encode response: {err}")),
    }
}

fn error_response(status: u16, detail: String) -> HttpResponse {
    let body = serde_json::to_vec(&ErrorBody { detail }).unwrap_or_default();
    let mut headers = cors_headers();
    headers.push(("content-type".to_string(), "application/json".to_string()));
    HttpResponse {
        status,
        headers,
        body,
    }
}
