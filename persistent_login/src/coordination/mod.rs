mod errors;
mod extension;

pub use errors::PersistentLoginError;
pub use extension::{ExtensionOutcome, extend_session, resolve_request_context};
