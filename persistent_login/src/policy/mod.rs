mod duration;
mod evaluate;
mod types;

pub use duration::{
    LONG_DURATION_SECONDS, LONG_DURATION_YEARS, OVERFLOW_MARGIN_SECONDS, compute_long_duration,
    is_clamped,
};
pub use evaluate::{Plan, SessionExtensionPolicy};
pub use types::{CookieInstruction, RequestContext, TimestampBound};
