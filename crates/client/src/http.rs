//! One-shot HTTP actions against a session: create, close, upload,
//! import, download. These do not go through the WebSocket; the server reflects
//! their effect on the ontology model with a fresh `init` push.

use std::path::Path;

use reqwest::header::LOCATION;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};

use crate::address::{session_id_from_path, SessionAddress};
use crate::error::HttpError;
use crate::transition::Landing;

/// Prompt shown before a session is destroyed
pub const CLOSE_PROMPT: &str =
    "Closing the session deletes the ontology being edited on the server. Continue?";

/// Multipart field the server reads uploads from
const FILE_FIELD: &str = "file";

/// Asks the user for confirmation.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    /// The session is gone; `landing` is where the client should go.
    Closed { landing: String },
}

#[derive(Debug, Clone)]
pub struct SessionApi {
    client: Client,
    address: SessionAddress,
}

impl SessionApi {
    pub fn new(address: SessionAddress) -> Self {
        Self {
            client: Client::new(),
            address,
        }
    }

    pub fn address(&self) -> &SessionAddress {
        &self.address
    }

    /// Ask `server` for a fresh session. The server answers with a redirect
    /// to `/sessions/{id}`; the redirect is read, not followed.
    pub async fn create_session(
        server: &str,
        websocket: Option<&str>,
    ) -> Result<SessionAddress, HttpError> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        let url = format!("{}/sessions", server.trim_end_matches('/'));
        let response = client.post(&url).send().await?;

        let status = response.status();
        if !(status.is_redirection() || status.is_success()) {
            return Err(HttpError::Status { status, url });
        }
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| HttpError::MissingRedirect(url.clone()))?;

        let session_id = session_id_from_path(location)?;
        let address = SessionAddress::new(server, &session_id, websocket)?;
        info!(
            component = "http",
            event = "session.create.done",
            session_id = %address.session_id,
            "Session created"
        );
        Ok(address)
    }

    /// Destroy the session after confirmation. A session the server no
    /// longer knows counts as closed.
    pub async fn close_session(&self, confirm: &impl Confirm) -> Result<CloseOutcome, HttpError> {
        if !confirm.confirm(CLOSE_PROMPT) {
            debug!(
                component = "http",
                event = "session.close.cancelled",
                session_id = %self.address.session_id,
                "Close cancelled by user"
            );
            return Ok(CloseOutcome::Cancelled);
        }

        let url = self.address.session_url();
        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        if !(status.is_success() || status == StatusCode::NOT_FOUND) {
            return Err(HttpError::Status { status, url });
        }

        info!(
            component = "http",
            event = "session.close.done",
            session_id = %self.address.session_id,
            status = status.as_u16(),
            "Session closed"
        );
        Ok(CloseOutcome::Closed {
            landing: self.address.landing_url(Landing::SessionClosed.path()),
        })
    }

    /// Replace the session's ontology with a Turtle file.
    pub async fn upload(&self, path: &Path) -> Result<(), HttpError> {
        self.post_file(self.address.upload_url(), path).await
    }

    /// Add a Turtle file to the session as an additional ontology.
    pub async fn import(&self, path: &Path) -> Result<(), HttpError> {
        self.post_file(self.address.import_url(), path).await
    }

    /// Current user ontology serialized as Turtle.
    pub async fn download(&self) -> Result<String, HttpError> {
        let url = self.address.download_url();
        let response = self.client.get(&url).send().await?;
        let response = self.check(response, url)?;
        let body = response.text().await?;
        info!(
            component = "http",
            event = "session.download.done",
            session_id = %self.address.session_id,
            bytes = body.len(),
            "Ontology downloaded"
        );
        Ok(body)
    }

    async fn post_file(&self, url: String, path: &Path) -> Result<(), HttpError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ontology.ttl".to_string());
        let size = bytes.len();
        let form = Form::new().part(FILE_FIELD, Part::bytes(bytes).file_name(file_name.clone()));

        let response = self.client.post(&url).multipart(form).send().await?;
        self.check(response, url)?;
        info!(
            component = "http",
            event = "session.file.posted",
            session_id = %self.address.session_id,
            file = %file_name,
            bytes = size,
            "File sent"
        );
        Ok(())
    }

    /// Unknown sessions show up either as 404 or as a redirect to the
    /// landing page carrying `session_not_found`.
    fn check(&self, response: Response, url: String) -> Result<Response, HttpError> {
        let status = response.status();
        let redirected_away = response
            .url()
            .query()
            .is_some_and(|q| q.contains("session_not_found"));
        if status == StatusCode::NOT_FOUND || redirected_away {
            return Err(HttpError::NotFound(self.address.session_id.clone()));
        }
        if !status.is_success() {
            return Err(HttpError::Status { status, url });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Multipart, Path as UrlPath, State};
    use axum::response::Redirect;
    use axum::routing::{delete, get, post};
    use axum::Router;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Posted {
        route: &'static str,
        session: String,
        field: Option<String>,
        file_name: Option<String>,
        body: Vec<u8>,
    }

    type Seen = Arc<Mutex<Vec<Posted>>>;

    async fn close(UrlPath(id): UrlPath<String>) -> StatusCode {
        if id == "known" {
            StatusCode::NO_CONTENT
        } else if id == "broken" {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::NOT_FOUND
        }
    }

    async fn record(
        route: &'static str,
        session: String,
        seen: Seen,
        mut multipart: Multipart,
    ) -> StatusCode {
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let body = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            seen.lock().unwrap().push(Posted {
                route,
                session: session.clone(),
                field: name,
                file_name,
                body,
            });
        }
        StatusCode::OK
    }

    async fn upload(
        UrlPath(id): UrlPath<String>,
        State(seen): State<Seen>,
        multipart: Multipart,
    ) -> StatusCode {
        record("upload", id, seen, multipart).await
    }

    async fn import(
        UrlPath(id): UrlPath<String>,
        State(seen): State<Seen>,
        multipart: Multipart,
    ) -> StatusCode {
        record("import", id, seen, multipart).await
    }

    async fn download(UrlPath(id): UrlPath<String>) -> Result<String, Redirect> {
        if id == "known" {
            Ok("@prefix ex: <http://ex.org/> .\n".to_string())
        } else {
            Err(Redirect::to("/?session_not_found"))
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_server() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/", get(|| async { "landing" }))
            .route("/sessions", post(|| async { Redirect::to("/sessions/q1W2e3R4") }))
            .route("/sessions/{id}", delete(close))
            .route("/upload/{id}", post(upload))
            .route("/import/{id}", post(import))
            .route("/download/{id}", get(download))
            .with_state(seen.clone());
        (serve(app).await, seen)
    }

    fn api(server: &str, session: &str) -> SessionApi {
        SessionApi::new(SessionAddress::new(server, session, None).unwrap())
    }

    #[tokio::test]
    async fn create_session_reads_the_redirect() {
        let (server, _) = spawn_server().await;
        let address = SessionApi::create_session(&server, None).await.unwrap();
        assert_eq!(address.session_id, "q1W2e3R4");
        assert_eq!(address.server, server);
        assert_eq!(
            address.websocket,
            format!("{}/websocket", server.replacen("http://", "ws://", 1))
        );
        assert_eq!(address.session_url(), format!("{server}/sessions/q1W2e3R4"));
    }

    #[tokio::test]
    async fn create_session_without_redirect_fails() {
        let server = serve(Router::new().route("/sessions", post(|| async { "no session" }))).await;
        let err = SessionApi::create_session(&server, None).await.unwrap_err();
        assert!(matches!(err, HttpError::MissingRedirect(ref url) if url.ends_with("/sessions")));
    }

    #[tokio::test]
    async fn close_declined_sends_nothing() {
        // Nothing listens on this address; a request would fail.
        let api = api("http://127.0.0.1:9", "known");
        let outcome = api.close_session(&|_: &str| false).await.unwrap();
        assert_eq!(outcome, CloseOutcome::Cancelled);
    }

    #[tokio::test]
    async fn close_confirmed_lands_on_closed_page() {
        let (server, _) = spawn_server().await;
        let asked = Mutex::new(None);
        let outcome = api(&server, "known")
            .close_session(&|prompt: &str| {
                *asked.lock().unwrap() = Some(prompt.to_string());
                true
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CloseOutcome::Closed {
                landing: format!("{server}/?session_closed")
            }
        );
        assert_eq!(asked.lock().unwrap().as_deref(), Some(CLOSE_PROMPT));
    }

    #[tokio::test]
    async fn close_of_unknown_session_still_lands() {
        let (server, _) = spawn_server().await;
        let outcome = api(&server, "gone").close_session(&|_: &str| true).await.unwrap();
        assert!(matches!(outcome, CloseOutcome::Closed { .. }));
    }

    #[tokio::test]
    async fn close_server_error_is_reported() {
        let (server, _) = spawn_server().await;
        let err = api(&server, "broken")
            .close_session(&|_: &str| true)
            .await
            .unwrap_err();
        match err {
            HttpError::Status { status, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn upload_and_import_send_one_file_field() {
        let (server, seen) = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.ttl");
        std::fs::write(&path, "@prefix dev: <http://dev.org/> .\n").unwrap();

        let api = api(&server, "known");
        api.upload(&path).await.unwrap();
        api.import(&path).await.unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].route, "upload");
        assert_eq!(seen[1].route, "import");
        for posted in &seen {
            assert_eq!(posted.session, "known");
            assert_eq!(posted.field.as_deref(), Some("file"));
            assert_eq!(posted.file_name.as_deref(), Some("devices.ttl"));
            assert_eq!(posted.body, b"@prefix dev: <http://dev.org/> .\n");
        }
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails_before_sending() {
        let (server, seen) = spawn_server().await;
        let err = api(&server, "known")
            .upload(Path::new("/definitely/not/here.ttl"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Io(_)));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn download_returns_turtle() {
        let (server, _) = spawn_server().await;
        let body = api(&server, "known").download().await.unwrap();
        assert!(body.starts_with("@prefix ex:"));
    }

    #[tokio::test]
    async fn download_of_unknown_session_is_not_found() {
        let (server, _) = spawn_server().await;
        let err = api(&server, "gone").download().await.unwrap_err();
        assert!(matches!(err, HttpError::NotFound(ref id) if id == "gone"));
    }
}
