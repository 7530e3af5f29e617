//! MIME types of served payloads.

pub mod types {
    pub const CSS: &str = "text/css";
    pub const JAVASCRIPT: &str = "application/javascript";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
}
