//! Local preview server.
//!
//! Serves the site root as static files so generated pages can be checked
//! in a browser before publishing. `/XFiles` redirects to `/XFiles/` and
//! directories resolve to their `index.html`, as on the published site.

use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::Y1ThemesError;

/// Default preview address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Parses a bind address into a socket address.
///
/// Accepts:
/// - `:8000` → `0.0.0.0:8000`
/// - `8000` → `0.0.0.0:8000`
/// - `127.0.0.1:8000` → as-is
///
/// # Errors
///
/// Returns [`Y1ThemesError::Usage`] if the result is not a valid socket
/// address.
pub fn parse_bind_addr(input: &str) -> Result<SocketAddr, Y1ThemesError> {
    let addr = if input.starts_with(':') {
        format!("0.0.0.0{input}")
    } else if input.parse::<u16>().is_ok() {
        format!("0.0.0.0:{input}")
    } else {
        input.to_string()
    };
    addr.parse::<SocketAddr>()
        .map_err(|e| Y1ThemesError::Usage(format!("invalid bind address \"{input}\": {e}")))
}

/// Builds the static file router for `root`.
pub fn build_router(root: &Path) -> Router {
    let files = ServeDir::new(root).append_index_html_on_directories(true);
    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Serves `root` on `addr` until Ctrl+C.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound.
pub async fn serve(root: &Path, addr: SocketAddr) -> Result<(), Y1ThemesError> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, root = %root.display(), "preview server listening");
    eprintln!("Serving {} at http://{local}/ (Ctrl+C to stop)", root.display());

    axum::serve(listener, build_router(root))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    #[test]
    fn parse_bind_addr_colon_port() {
        assert_eq!(parse_bind_addr(":8000").unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn parse_bind_addr_port_only() {
        assert_eq!(parse_bind_addr("8000").unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn parse_bind_addr_full() {
        assert_eq!(
            parse_bind_addr("127.0.0.1:9000").unwrap().to_string(),
            "127.0.0.1:9000"
        );
    }

    #[test]
    fn parse_bind_addr_invalid() {
        let err = parse_bind_addr("localhost").unwrap_err();
        assert!(matches!(err, Y1ThemesError::Usage(_)));
    }

    fn site() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("index.html"), "<h1>gallery</h1>").unwrap();
        std::fs::create_dir(root.path().join("XFiles")).unwrap();
        std::fs::write(root.path().join("XFiles/index.html"), "<h1>xfiles</h1>").unwrap();
        root
    }

    async fn get(root: &Path, uri: &str) -> (StatusCode, String) {
        let response = build_router(root)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn serves_root_index() {
        let root = site();
        let (status, body) = get(root.path(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>gallery</h1>");
    }

    #[tokio::test]
    async fn serves_theme_index() {
        let root = site();
        let (status, body) = get(root.path(), "/XFiles/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>xfiles</h1>");
    }

    #[tokio::test]
    async fn theme_without_slash_redirects() {
        let root = site();
        let (status, _) = get(root.path(), "/XFiles").await;
        assert!(status.is_redirection());
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let root = site();
        let (status, _) = get(root.path(), "/nope.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
