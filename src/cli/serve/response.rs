//! HTTP response handlers.

use crate::feed::FeedResponse;
use crate::utils::mime::types::PLAIN;
use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

/// Send a feed response; `head` drops the body.
pub fn respond_feed(request: Request, feed: FeedResponse, head: bool) -> Result<()> {
    let headers = feed
        .headers
        .iter()
        .map(|(name, value)| make_header(name, value))
        .collect::<Result<Vec<_>>>()?;

    let body = if head { Vec::new() } else { feed.body.into_bytes() };
    let mut response = Response::from_data(body).with_status_code(StatusCode(feed.status));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_plain(request, 404, "404 Not Found")
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_plain(request, 405, "405 Method Not Allowed")
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_plain(request, 503, "503 Service Unavailable")
}

fn send_plain(request: Request, status: u16, body: &str) -> Result<()> {
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_header() {
        let header = make_header("ETag", "\"abc\"").unwrap();
        assert_eq!(header.value.as_str(), "\"abc\"");
        assert!(make_header("Übel", "x").is_err());
    }
}
