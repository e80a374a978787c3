//! Serving the site over HTTP/1 with hyper.

use std::convert::Infallible;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::handlers::App;
use crate::http::{Method, Request, Response};

/// Accepts connections until the listener fails.
pub async fn serve(listener: TcpListener, app: Arc<App>) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "formsite listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let app = Arc::clone(&app);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let app = Arc::clone(&app);
                async move { handle_request(req, &app).await }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(peer = %peer, error = %err, "error serving connection");
            }
        });
    }
}

async fn handle_request(
    req: HyperRequest<Incoming>,
    app: &App,
) -> Result<HyperResponse<Full<Bytes>>, Infallible> {
    let response = match Method::parse(req.method().as_str()) {
        Some(method) => match into_request(method, req).await {
            Some(request) => app.handle(request).await,
            None => Response::text("Bad Request").status(400),
        },
        None => {
            debug!(method = %req.method(), path = %req.uri().path(), "unsupported method");
            Response::text("Method Not Allowed").status(405)
        }
    };
    Ok(into_hyper(response))
}

async fn into_request(method: Method, req: HyperRequest<Incoming>) -> Option<Request> {
    let mut request = Request::new(method, req.uri().path());
    for (key, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request.headers.insert(key.to_string(), v.to_string());
        }
    }

    match req.into_body().collect().await {
        Ok(body) => {
            request.body = body.to_bytes().to_vec();
            Some(request)
        }
        Err(err) => {
            warn!(error = %err, "failed to read request body");
            None
        }
    }
}

fn into_hyper(response: Response) -> HyperResponse<Full<Bytes>> {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HyperResponse::builder().status(status);
    for (key, value) in &response.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
        .body(Full::new(Bytes::from(response.body)))
        .unwrap_or_else(|err| {
            warn!(error = %err, "invalid response headers");
            let mut fallback = HyperResponse::new(Full::new(Bytes::from_static(
                b"Internal Server Error",
            )));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_hyper_copies_status_and_headers() {
        let res = into_hyper(Response::csv("a.csv", b"x".to_vec()).status(200));
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()["content-disposition"],
            "attachment; filename=\"a.csv\""
        );
    }

    #[test]
    fn test_into_hyper_rejects_bad_status() {
        let res = into_hyper(Response::new(42));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
