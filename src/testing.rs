//! Test helpers

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};

use crate::backend::MockBackend;
use crate::config::Config;
use crate::html::Templates;
use crate::remote::MockRepository;
use crate::state::AppState;

const BOUNDARY: &str = "otu-loader-test-boundary";

/// Serve `app` on an ephemeral local port, returning its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn test_state(remote: Arc<MockRepository>, backend: Arc<MockBackend>) -> AppState {
    AppState::with_parts(Config::default(), remote, backend, Templates::default())
}

/// One part of a multipart form body
pub struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content: &'a str,
}

impl<'a> Part<'a> {
    pub fn text(name: &'a str, content: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content,
        }
    }

    pub fn file(name: &'a str, filename: &'a str, content: &'a str) -> Self {
        Self {
            name,
            filename: Some(filename),
            content,
        }
    }
}

/// POST `parts` to `uri` as `multipart/form-data`
pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = String::new();
    for part in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match part.filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                part.name, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.name
            )),
        }
        body.push_str(part.content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
