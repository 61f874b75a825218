//! Where a session lives: HTTP base, WebSocket endpoint and session id.

use crate::error::ConnectionError;

/// Default HTTP base of the server
pub const DEFAULT_SERVER: &str = "http://localhost:8269";

const WEBSOCKET_PATH: &str = "/websocket";

/// Extract the session id from a session address.
///
/// The id is the last non-empty path segment, so both
/// `http://host/sessions/AbC123xy` and a bare `AbC123xy` work.
pub fn session_id_from_path(path: &str) -> Result<String, ConnectionError> {
    let without_query = path.split(['?', '#']).next().unwrap_or_default();
    without_query
        .rsplit('/')
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .filter(|segment| !segment.contains(':'))
        .map(str::to_string)
        .ok_or_else(|| ConnectionError::InvalidAddress(path.to_string()))
}

/// WebSocket endpoint derived from an HTTP base (`http` → `ws`, `https` → `wss`)
pub fn websocket_url(server: &str) -> Result<String, ConnectionError> {
    let server = server.trim_end_matches('/');
    let rest = if let Some(rest) = server.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = server.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(ConnectionError::InvalidAddress(server.to_string()));
    };
    Ok(format!("{rest}{WEBSOCKET_PATH}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAddress {
    /// HTTP base, no trailing slash (`http://localhost:8269`)
    pub server: String,
    /// WebSocket endpoint (`ws://localhost:8269/websocket`)
    pub websocket: String,
    pub session_id: String,
}

impl SessionAddress {
    /// Build from a server base and a session URL or id. `websocket`
    /// overrides the endpoint derived from `server`.
    pub fn new(
        server: &str,
        session: &str,
        websocket: Option<&str>,
    ) -> Result<Self, ConnectionError> {
        let server = server.trim_end_matches('/').to_string();
        let websocket = match websocket {
            Some(url) => url.to_string(),
            None => websocket_url(&server)?,
        };
        Ok(Self {
            session_id: session_id_from_path(session)?,
            server,
            websocket,
        })
    }

    pub fn session_url(&self) -> String {
        format!("{}/sessions/{}", self.server, self.session_id)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload/{}", self.server, self.session_id)
    }

    pub fn import_url(&self) -> String {
        format!("{}/import/{}", self.server, self.session_id)
    }

    pub fn download_url(&self) -> String {
        format!("{}/download/{}", self.server, self.session_id)
    }

    pub fn landing_url(&self, path: &str) -> String {
        format!("{}{}", self.server, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_last_path_segment() {
        assert_eq!(
            session_id_from_path("http://localhost:8269/sessions/AbC123xy").unwrap(),
            "AbC123xy"
        );
        assert_eq!(session_id_from_path("/sessions/AbC123xy/").unwrap(), "AbC123xy");
        assert_eq!(session_id_from_path("AbC123xy").unwrap(), "AbC123xy");
        assert_eq!(
            session_id_from_path("http://h/sessions/q1w2e3r4?tab=classes").unwrap(),
            "q1w2e3r4"
        );
    }

    #[test]
    fn empty_address_has_no_session() {
        assert!(session_id_from_path("").is_err());
        assert!(session_id_from_path("///").is_err());
        assert!(session_id_from_path("http://").is_err());
    }

    #[test]
    fn websocket_endpoint_follows_scheme() {
        assert_eq!(
            websocket_url("http://localhost:8269/").unwrap(),
            "ws://localhost:8269/websocket"
        );
        assert_eq!(
            websocket_url("https://rdfs.example.org").unwrap(),
            "wss://rdfs.example.org/websocket"
        );
        assert!(websocket_url("ftp://nope").is_err());
    }

    #[test]
    fn derives_per_session_urls() {
        let addr = SessionAddress::new(
            "http://localhost:8269/",
            "http://localhost:8269/sessions/AbC123xy",
            None,
        )
        .unwrap();
        assert_eq!(addr.websocket, "ws://localhost:8269/websocket");
        assert_eq!(addr.session_url(), "http://localhost:8269/sessions/AbC123xy");
        assert_eq!(addr.upload_url(), "http://localhost:8269/upload/AbC123xy");
        assert_eq!(addr.import_url(), "http://localhost:8269/import/AbC123xy");
        assert_eq!(addr.download_url(), "http://localhost:8269/download/AbC123xy");
        assert_eq!(
            addr.landing_url("/?session_closed"),
            "http://localhost:8269/?session_closed"
        );
    }
}
