//! Minimal `multipart/form-data` encoding for attachment uploads.

const BOUNDARY_PREFIX: &str = "----treemirror-boundary-";

/// An encoded form with a single `file` part.
pub(crate) struct Multipart {
    pub boundary: String,
    pub body: Vec<u8>,
}

impl Multipart {
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Encode `data` as the `file` field of a form.
pub(crate) fn encode_file(file_name: &str, data: &[u8]) -> Multipart {
    let boundary = choose_boundary(data);
    let mime = mime_for(file_name);
    let file_name = file_name.replace(['"', '\r', '\n'], "_");

    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Multipart { boundary, body }
}

fn choose_boundary(data: &[u8]) -> String {
    let mut n = 0u32;
    loop {
        let candidate = format!("{BOUNDARY_PREFIX}{n:08x}");
        if !contains(data, candidate.as_bytes()) {
            return candidate;
        }
        n += 1;
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "puml" | "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
