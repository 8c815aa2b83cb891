use std::sync::LazyLock;

/// Route prefix the asset router is mounted under
/// Default: "/persistent-login"
pub static PL_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("PL_ROUTE_PREFIX").unwrap_or_else(|_| "/persistent-login".to_string())
});
