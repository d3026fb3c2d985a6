//! Content-Type lookup for served files

/// MIME Content-Type for a file extension (case-insensitive)
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let ext = extension.map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",

        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_types() {
        assert_eq!(get_content_type(Some("png")), "image/png");
        assert_eq!(get_content_type(Some("JPG")), "image/jpeg");
        assert_eq!(get_content_type(Some("jpeg")), "image/jpeg");
        assert_eq!(get_content_type(Some("gif")), "image/gif");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(get_content_type(None), "application/octet-stream");
    }
}
