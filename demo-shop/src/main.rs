use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use dotenvy::dotenv;

use persistent_login_axum::{
    CookieNames, MemorySessionProvider, PL_ROUTE_PREFIX, PersistentLogin, ProviderUser,
    assets_router, extend_customer_session,
};

mod handlers;
mod server;

use crate::{
    handlers::{AppState, account, index, login, login_form, logout},
    server::{init_tracing, spawn_http_server},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("demo_shop");

    let provider = Arc::new(MemorySessionProvider::new());
    for user in [
        ProviderUser::new("alice", ["customer"]),
        ProviderUser::new("carol", ["customer", "subscriber"]),
        ProviderUser::new("admin", ["administrator", "customer"]),
    ] {
        provider.register_user(user).await;
    }

    let persistent_login = PersistentLogin::new(Arc::clone(&provider));

    let state = AppState {
        provider,
        names: CookieNames::from_env(),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
        .route("/account", get(account))
        .with_state(state)
        .layer(from_fn_with_state(
            persistent_login,
            extend_customer_session::<MemorySessionProvider>,
        ))
        .nest(PL_ROUTE_PREFIX.as_str(), assets_router());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    spawn_http_server(port, app).await?;
    Ok(())
}
