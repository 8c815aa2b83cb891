use axum::{
    Router,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};

use crate::config::PL_ROUTE_PREFIX;

/// Routes for the stylesheet account pages embed. Mount under [`PL_ROUTE_PREFIX`].
pub fn assets_router() -> Router {
    Router::new().route("/account.css", get(serve_account_css))
}

async fn serve_account_css() -> impl IntoResponse {
    let css_content = include_str!("../static/account.css");
    (
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=86400"),
        ],
        css_content,
    )
}

pub fn account_stylesheet_url() -> String {
    format!("{}/account.css", PL_ROUTE_PREFIX.as_str())
}

/// `<link>` tag for the `<head>` of an account page
pub fn account_stylesheet_link() -> String {
    format!(
        r#"<link rel="stylesheet" href="{}">"#,
        account_stylesheet_url()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt as _;

    #[tokio::test]
    async fn test_serve_account_css() {
        let response = assets_router()
            .oneshot(
                Request::builder()
                    .uri("/account.css")
                    .body(Body::empty())
                    .expect("request builds successfully"),
            )
            .await
            .expect("router call succeeds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"text/css"[..])
        );
    }

    #[test]
    fn test_account_stylesheet_link() {
        let link = account_stylesheet_link();
        assert!(link.starts_with(r#"<link rel="stylesheet" href=""#));
        assert!(link.contains(&account_stylesheet_url()));
        assert!(account_stylesheet_url().ends_with("/account.css"));
    }
}
