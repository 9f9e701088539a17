//! HTTP responses for the dev server.

use std::fs;
use std::path::Path;

use tiny_http::{Header, Request, Response, StatusCode};

use crate::{debug, embed, utils::mime};

use super::roots::ServeRoots;

/// Serve one request against the resolved roots.
///
/// `ws_port` is the live reload WebSocket port; when set, served HTML
/// gets the reload client injected.
pub fn handle(request: Request, roots: &ServeRoots, ws_port: Option<u16>) {
    if crate::core::is_shutdown() {
        respond_status(request, 503);
        return;
    }

    let url = request.url().to_string();
    match roots.resolve(&url) {
        Some(path) => respond_file(request, &path, ws_port),
        None => {
            debug!("serve"; "404 {url}");
            respond_status(request, 404);
        }
    }
}

fn respond_file(request: Request, path: &Path, ws_port: Option<u16>) {
    let mime = mime::from_path(path);

    let body = match fs::read(path) {
        Ok(body) => body,
        Err(err) => {
            debug!("serve"; "read failed for {}: {err}", path.display());
            respond_status(request, 404);
            return;
        }
    };

    let body = match ws_port {
        Some(port) if mime::is_html(mime) => embed::inject_livereload(&body, port),
        _ => body,
    };

    let mut response = Response::from_data(body);
    if let Some(header) = content_type(mime) {
        response = response.with_header(header);
    }
    request.respond(response).ok();
}

fn respond_status(request: Request, code: u16) {
    let response = Response::empty(StatusCode(code));
    request.respond(response).ok();
}

fn content_type(mime: &str) -> Option<Header> {
    Header::from_bytes(&b"Content-Type"[..], mime.as_bytes()).ok()
}
