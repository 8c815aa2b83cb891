mod errors;
mod transport;

pub use errors::CookieError;
pub use transport::{
    apply_instructions, cookie_value, expire_cookie_header, marker_present, set_cookie_header,
};
