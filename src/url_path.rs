//! Location URL decoding.
//!
//! Shell windows report where they are as a URL. Only `file:///` URLs name a
//! directory on disk; everything else (`::{GUID}` views, `shell:` folders,
//! search results, remote locations) is a virtual window and yields `None`.

/// The only scheme prefix that denotes a local filesystem location.
pub const FILE_URL_PREFIX: &str = "file:///";

/// Directory separator used for decoded paths.
pub const PATH_SEPARATOR: char = '\\';

/// Convert a shell location URL into a native path.
///
/// Returns `None` when the URL is not a local file URL or decodes to an empty
/// path. Callers treat `None` as "skip this window", never as an error.
///
/// `/` becomes `\` and `%XX` escapes are decoded in a single left-to-right
/// pass. A `%` that is not followed by two hex digits is copied as-is.
pub fn file_url_to_path(url: &str) -> Option<String> {
    let rest = url.strip_prefix(FILE_URL_PREFIX)?;

    // Escapes normally carry UTF-8 bytes. If they don't form valid UTF-8,
    // fall back to one character per escaped byte.
    let path = match String::from_utf8(decode(rest, |byte, out| out.push(byte))) {
        Ok(path) => path,
        Err(_) => {
            let bytes = decode(rest, |byte, out| {
                let mut buf = [0u8; 4];
                out.extend_from_slice(char::from(byte).encode_utf8(&mut buf).as_bytes());
            });
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Walk `rest` once, mapping separators and handing decoded escape bytes to
/// `push_escaped`.
fn decode(rest: &str, push_escaped: impl Fn(u8, &mut Vec<u8>)) -> Vec<u8> {
    let mut out = Vec::with_capacity(rest.len());
    let mut chars = rest.char_indices().peekable();
    let mut buf = [0u8; 4];

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '/' => out.extend_from_slice(PATH_SEPARATOR.encode_utf8(&mut buf).as_bytes()),
            '%' => match hex_pair(&rest[idx + 1..]) {
                Some(byte) => {
                    push_escaped(byte, &mut out);
                    chars.next();
                    chars.next();
                }
                None => out.push(b'%'),
            },
            other => out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes()),
        }
    }

    out
}

fn hex_pair(s: &str) -> Option<u8> {
    let digits = s.as_bytes().get(..2)?;
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    // Both bytes are ASCII, so this slice is on a char boundary.
    u8::from_str_radix(&s[..2], 16).ok()
}
