use crate::domain::Attachment;

/// Turn an attachment path into something fetchable.
///
/// Absolute URLs pass through, root-relative paths get the backend origin
/// prefixed, and an empty path resolves to nothing.
pub fn resolve_file_url(origin: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http") {
        return Some(path.to_string());
    }

    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{origin}{path}"))
    } else {
        Some(format!("{origin}/{path}"))
    }
}

pub fn attachment_url(origin: &str, attachment: &Attachment) -> Option<String> {
    attachment
        .file
        .as_deref()
        .and_then(|path| resolve_file_url(origin, path))
}
