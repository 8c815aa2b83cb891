mod errors;
mod memory;
mod traits;

pub use errors::ProviderError;
pub use memory::{MemorySessionProvider, ProviderUser, SUPERSEDED_GRACE_SECONDS};
pub use traits::{IdentitySessionProvider, IssuedSession};
