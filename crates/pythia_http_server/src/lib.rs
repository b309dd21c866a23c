//! Minimal HTTP transport: a hyper server on a dedicated runtime thread,
//! driving an opaque request handler. The handler sees plain
//! request/response values and never touches hyper types.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::thread;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::oneshot;

pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub remote_addr: Option<String>,
}

pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HttpServerError {
    pub message: String,
}

impl HttpServerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpServerError>> + Send>>;
pub type Handler = Arc<dyn Fn(HttpRequest) -> HandlerFuture + Send + Sync>;

pub struct ServerHandle {
    runtime: Arc<Runtime>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    join_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl ServerHandle {
    pub fn runtime_handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn stop(&self) -> Result<(), HttpServerError> {
        if let Ok(mut guard) = self.shutdown_tx.lock() {
            if let Some(tx) = guard.take() {
                let _ = tx.send(());
            }
        }
        if let Ok(mut guard) = self.join_handle.lock() {
            if let Some(handle) = guard.take() {
                handle
                    .join()
                    .map_err(|_| HttpServerError::new("server thread panicked"))?;
            }
        }
        Ok(())
    }
}

pub fn start_server(addr: SocketAddr, handler: Handler) -> Result<ServerHandle, HttpServerError> {
    let worker_threads = std::thread::available_parallelism()
        .map(|value| value.get())
        .unwrap_or(1);
    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .enable_all()
            .build()
            .map_err(|err| HttpServerError::new(err.to_string()))?,
    );
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let runtime_clone = runtime.clone();
    let join_handle = thread::spawn(move || {
        let handler = handler.clone();
        let server_future = async move {
            let listener = match TcpListener::bind(addr).await {
                Ok(value) => value,
                Err(err) => {
                    tracing::error!(%addr, error = %err, "failed to bind listener");
                    return;
                }
            };
            let mut shutdown_rx = shutdown_rx;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accept = listener.accept() => {
                        let (stream, remote_addr) = match accept {
                            Ok(value) => value,
                            Err(err) => {
                                tracing::debug!(error = %err, "accept failed");
                                continue;
                            }
                        };
                        let handler = handler.clone();
                        let service = service_fn(move |req| {
                            let handler = handler.clone();
                            async move { handle_request(req, remote_addr, handler).await }
                        });
                        tokio::spawn(async move {
                            let mut builder = auto::Builder::new(TokioExecutor::new());
                            builder.http1().keep_alive(true);
                            let conn = builder.serve_connection(TokioIo::new(stream), service);
                            let _ = conn.await;
                        });
                    }
                }
            }
        };

        runtime_clone.block_on(server_future);
    });

    Ok(ServerHandle {
        runtime,
        shutdown_tx: Mutex::new(Some(shutdown_tx)),
        join_handle: Mutex::new(Some(join_handle)),
    })
}

async fn handle_request(
    req: Request<Incoming>,
    remote_addr: SocketAddr,
    handler: Handler,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let (parts, body) = req.into_parts();
    let body_bytes = body.collect().await?.to_bytes();

    let request = match build_request(&parts, body_bytes, Some(remote_addr.to_string())) {
        Ok(value) => value,
        Err(err) => return Ok(plain_response(StatusCode::BAD_REQUEST, err.message)),
    };
    match handler(request).await {
        Ok(response) => match convert_response(response) {
            Ok(response) => Ok(response),
            Err(err) => Ok(plain_response(StatusCode::INTERNAL_SERVER_ERROR, err.message)),
        },
        Err(err) => Ok(plain_response(StatusCode::INTERNAL_SERVER_ERROR, err.message)),
    }
}

fn plain_response(status: StatusCode, message: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::from(Bytes::from(message)));
    *response.status_mut() = status;
    response
}

fn build_request(
    parts: &hyper::http::request::Parts,
    body: Bytes,
    remote_addr: Option<String>,
) -> Result<HttpRequest, HttpServerError> {
    let method = parts.method.as_str().to_string();
    let path = parts
        .uri
        .path_and_query()
        .map(|value| value.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let headers = headers_to_vec(&parts.headers)?;
    Ok(HttpRequest {
        method,
        path,
        headers,
        body: body.to_vec(),
        remote_addr,
    })
}

fn headers_to_vec(
    headers: &hyper::HeaderMap<hyper::header::HeaderValue>,
) -> Result<Vec<(String, String)>, HttpServerError> {
    let mut out = Vec::new();
    for (name, value) in headers.iter() {
        let value = value
            .to_str()
            .map_err(|_| HttpServerError::new("invalid header value"))?;
        out.push((name.as_str().to_string(), value.to_string()));
    }
    Ok(out)
}

fn convert_response(response: HttpResponse) -> Result<Response<Full<Bytes>>, HttpServerError> {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    {
        let headers = builder
            .headers_mut()
            .ok_or_else(|| HttpServerError::new("failed to access headers"))?;
        for (name, value) in response.headers {
            let name = hyper::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HttpServerError::new("invalid header name"))?;
            let value = hyper::header::HeaderValue::from_str(&value)
                .map_err(|_| HttpServerError::new("invalid header value"))?;
            headers.append(name, value);
        }
    }
    builder
        .body(Full::from(Bytes::from(response.body)))
        .map_err(|_| HttpServerError::new("invalid response body"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_response_keeps_status_and_headers() {
        let response = convert_response(HttpResponse {
            status: 204,
            headers: vec![("x-test".to_string(), "yes".to_string())],
            body: Vec::new(),
        })
        .expect("response converts");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get("x-test").and_then(|v| v.to_str().ok()),
            Some("yes")
        );
    }

    #[test]
    fn convert_response_rejects_bad_header_names() {
        let result = convert_response(HttpResponse {
            status: 200,
            headers: vec![("bad name".to_string(), "x".to_string())],
            body: Vec::new(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn unknown_status_codes_become_internal_errors() {
        let response = convert_response(HttpResponse {
            status: 0,
            headers: Vec::new(),
            body: Vec::new(),
        })
        .expect("response converts");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
