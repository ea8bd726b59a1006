//! Loopback redirect receiver for the OAuth authorization-code flow.
//!
//! The browser is redirected to `http://127.0.0.1:<port>/callback?code=..&state=..`.
//! A one-route axum server answers that request with a small HTML page and
//! hands the parameters back to the provider, then shuts itself down.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use log::{debug, warn};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};

use super::AuthError;

pub const CALLBACK_PATH: &str = "/callback";

const SUCCESS_PAGE: &str = "<html><body><h2>Signed in.</h2>\
    <p>You can close this tab and return to chirp.</p></body></html>";
const FAILURE_PAGE: &str = "<html><body><h2>Sign-in failed.</h2>\
    <p>Return to chirp and try again.</p></body></html>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// Query string of the redirect. Google sends `error` instead of `code`
/// when the user declines.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

impl CallbackQuery {
    pub fn into_params(self) -> Result<CallbackParams, AuthError> {
        if let Some(error) = self.error {
            return Err(AuthError::Callback(error));
        }
        match (self.code, self.state) {
            (Some(code), Some(state)) => Ok(CallbackParams { code, state }),
            _ => Err(AuthError::Callback(
                "redirect is missing code or state".to_string(),
            )),
        }
    }
}

type Outcome = Result<CallbackParams, AuthError>;

#[derive(Clone)]
struct CallbackState {
    // Taken by the first redirect; later hits are answered but ignored
    result_tx: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

fn router(state: CallbackState) -> Router {
    Router::new()
        .route(CALLBACK_PATH, get(handle_callback))
        .with_state(state)
}

/// GET /callback
async fn handle_callback(
    State(state): State<CallbackState>,
    Query(query): Query<CallbackQuery>,
) -> (StatusCode, Html<&'static str>) {
    let outcome = query.into_params();
    let response = match &outcome {
        Ok(_) => (StatusCode::OK, Html(SUCCESS_PAGE)),
        Err(e) => {
            warn!("OAuth redirect rejected: {e}");
            (StatusCode::BAD_REQUEST, Html(FAILURE_PAGE))
        }
    };

    match state.result_tx.lock().await.take() {
        Some(tx) => {
            let _ = tx.send(outcome);
        }
        None => debug!("Ignoring repeated OAuth redirect"),
    }
    response
}

/// Serves the listener until the callback request arrives.
///
/// Dropping the returned future (e.g. on timeout) also stops the server.
pub async fn await_callback(listener: TcpListener) -> Result<CallbackParams, AuthError> {
    let (result_tx, result_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app = router(CallbackState {
        result_tx: Arc::new(Mutex::new(Some(result_tx))),
    });

    if let Ok(addr) = listener.local_addr() {
        debug!("Waiting for OAuth redirect on {addr}");
    }
    tokio::spawn(async move {
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
        if let Err(e) = served {
            warn!("OAuth callback server stopped: {e}");
        }
    });

    let outcome = result_rx
        .await
        .map_err(|_| AuthError::Io("callback server exited before the redirect".to_string()));
    let _ = shutdown_tx.send(());
    outcome?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> CallbackQuery {
        CallbackQuery {
            code: code.map(str::to_string),
            state: state.map(str::to_string),
            error: error.map(str::to_string),
        }
    }

    async fn spawn_server() -> (u16, tokio::task::JoinHandle<Outcome>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (port, tokio::spawn(await_callback(listener)))
    }

    #[test]
    fn test_query_with_code_and_state() {
        let params = query(Some("4/abc"), Some("xyz"), None).into_params().unwrap();
        assert_eq!(params.code, "4/abc");
        assert_eq!(params.state, "xyz");
    }

    #[test]
    fn test_provider_error_is_reported() {
        let err = query(None, Some("s"), Some("access_denied"))
            .into_params()
            .unwrap_err();
        assert_eq!(err, AuthError::Callback("access_denied".to_string()));
    }

    #[test]
    fn test_missing_code_is_an_error() {
        let err = query(None, Some("s"), None).into_params().unwrap_err();
        assert!(matches!(err, AuthError::Callback(_)));
    }

    #[tokio::test]
    async fn test_await_callback_decodes_query() {
        let (port, server) = spawn_server().await;

        let response = reqwest::get(format!(
            "http://127.0.0.1:{port}/callback?code=4%2Fabc&state=xyz"
        ))
        .await
        .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert!(response.text().await.unwrap().contains("Signed in."));

        let params = server.await.unwrap().unwrap();
        assert_eq!(
            params,
            CallbackParams {
                code: "4/abc".to_string(),
                state: "xyz".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_await_callback_skips_unrelated_requests() {
        let (port, server) = spawn_server().await;

        let favicon = reqwest::get(format!("http://127.0.0.1:{port}/favicon.ico"))
            .await
            .unwrap();
        assert_eq!(favicon.status().as_u16(), 404);

        let callback = reqwest::get(format!("http://127.0.0.1:{port}/callback?code=c1&state=s1"))
            .await
            .unwrap();
        assert_eq!(callback.status().as_u16(), 200);

        let params = server.await.unwrap().unwrap();
        assert_eq!(params.code, "c1");
        assert_eq!(params.state, "s1");
    }

    #[tokio::test]
    async fn test_await_callback_reports_denied_consent() {
        let (port, server) = spawn_server().await;

        let response = reqwest::get(format!(
            "http://127.0.0.1:{port}/callback?error=access_denied&state=s1"
        ))
        .await
        .unwrap();
        assert_eq!(response.status().as_u16(), 400);

        let err = server.await.unwrap().unwrap_err();
        assert_eq!(err, AuthError::Callback("access_denied".to_string()));
    }
}
