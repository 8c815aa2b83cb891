use std::sync::Arc;

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

use persistent_login::{
    CookieNames, MemorySessionProvider, ProviderUser, SESSION_COOKIE_MAX_AGE, cookie_value,
    expire_cookie_header, set_cookie_header,
};
use persistent_login_axum::account_stylesheet_link;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) provider: Arc<MemorySessionProvider>,
    pub(crate) names: CookieNames,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    message: &'a str,
    logged_in: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    stylesheet_link: &'a str,
}

#[derive(Template)]
#[template(path = "account.html")]
struct AccountTemplate<'a> {
    stylesheet_link: &'a str,
    user_id: &'a str,
    roles: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    user_id: String,
}

fn render<T: Template>(template: T) -> Result<Html<String>, (StatusCode, String)> {
    template
        .render()
        .map(Html)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<ProviderUser> {
    let session_cookie = cookie_value(headers, &state.names.session)?;
    state.provider.session_user(&session_cookie).await
}

pub(crate) async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, (StatusCode, String)> {
    let user = current_user(&state, &headers).await;
    let message = match &user {
        Some(u) => format!("Hey {}!", u.id),
        None => "You are not logged in.".to_string(),
    };
    render(IndexTemplate {
        message: &message,
        logged_in: user.is_some(),
    })
}

pub(crate) async fn login_form() -> Result<Html<String>, (StatusCode, String)> {
    let stylesheet_link = account_stylesheet_link();
    render(LoginTemplate {
        stylesheet_link: &stylesheet_link,
    })
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .provider
        .login(&form.user_id, *SESSION_COOKIE_MAX_AGE)
        .await
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let mut headers = HeaderMap::new();
    set_cookie_header(
        &mut headers,
        &state.names.session,
        &session.value,
        session.max_age,
    )
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!("User {} logged in", form.user_id);
    Ok((headers, Redirect::to("/")))
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(session_cookie) = cookie_value(&headers, &state.names.session) {
        state.provider.logout(&session_cookie).await;
    }

    let mut response_headers = HeaderMap::new();
    expire_cookie_header(&mut response_headers, &state.names.session)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok((response_headers, Redirect::to("/")))
}

pub(crate) async fn account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let Some(user) = current_user(&state, &headers).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    let stylesheet_link = account_stylesheet_link();
    let roles = user.roles.join(", ");
    let html = render(AccountTemplate {
        stylesheet_link: &stylesheet_link,
        user_id: &user.id,
        roles: &roles,
    })?;
    Ok(html.into_response())
}
