//! HTTP replies and their conversion to `tiny_http` responses.

use std::io;

use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::embed::serve::{NOT_FOUND_HTML, NotFoundVars};
use crate::utils::html::escape;
use crate::utils::mime::types::HTML;

/// A fully materialized response, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    /// Custom 404 page, explaining when `path` fell outside `outside_base`.
    pub fn not_found(path: &str, outside_base: Option<&str>) -> Self {
        let body = NOT_FOUND_HTML.render(&NotFoundVars { path, outside_base });
        Self {
            status: 404,
            content_type: HTML,
            body: body.into_bytes(),
        }
    }

    /// 500 page for a render or read failure.
    pub fn server_error(what: &str, error: &io::Error) -> Self {
        let body = format!(
            "<html><body><h1>Internal Server Error</h1><p>{}</p><pre>{}</pre></body></html>",
            escape(what),
            escape(&error.to_string()),
        );
        Self {
            status: 500,
            content_type: HTML,
            body: body.into_bytes(),
        }
    }

    /// Body as UTF-8 text, lossy.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Send `reply` for `request`; HEAD requests get headers only.
pub fn send(request: Request, reply: Reply) -> io::Result<()> {
    if is_head_request(&request) {
        let response = Response::empty(StatusCode(reply.status));
        return request.respond(with_content_type(response, reply.content_type));
    }

    let response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
    request.respond(with_content_type(response, reply.content_type))
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn with_content_type<R: io::Read>(response: Response<R>, value: &str) -> Response<R> {
    match Header::from_bytes(&b"Content-Type"[..], value.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
