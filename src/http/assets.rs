//! Static payloads compiled into the binary.

pub const INDEX_CONTENT_TYPE: &str = "text/html";
pub const FAVICON_CONTENT_TYPE: &str = "image/vnd.microsoft.icon";

pub static INDEX_HTML: &[u8] = include_bytes!("../../static/index.html");
pub static FAVICON: &[u8] = include_bytes!("../../static/favicon.ico");
