pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{canonicalize, is_valid_url};
