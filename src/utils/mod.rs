pub mod ip;
pub mod text;
pub mod time;
pub mod web_url;

pub use text::{escape_html, is_blank, is_valid_email};
pub use time::format_duration_human;
pub use web_url::validate_http_url;
