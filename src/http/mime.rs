/// Fallback type for unknown or missing extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a file path to a content-type string.
///
/// The lookup uses the suffix after the final `.` in the path, matched
/// case-sensitively against a fixed table. Paths with no extension, or an
/// unrecognized one, fall back to `application/octet-stream`.
pub fn content_type(path: &str) -> &'static str {
    let Some(dot) = path.rfind('.') else {
        return OCTET_STREAM;
    };

    match &path[dot + 1..] {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        _ => OCTET_STREAM,
    }
}
