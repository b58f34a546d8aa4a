//! JSON Pointer helpers (RFC 6901).

/// Escape one reference token (`~` -> `~0`, `/` -> `~1`)
pub fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Undo [`escape`]
pub fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Append one unescaped token to a pointer
pub fn append(base: &str, token: &str) -> String {
    format!("{}/{}", base, escape(token))
}

/// Append an array index to a pointer
pub fn append_index(base: &str, index: usize) -> String {
    format!("{}/{}", base, index)
}

/// Canonical form: URI-fragment prefix `#` removed, trailing `/` kept
pub fn normalize(pointer: &str) -> &str {
    pointer.strip_prefix('#').unwrap_or(pointer)
}

/// The pointer itself followed by each of its ancestors up to the root
pub fn self_and_ancestors(pointer: &str) -> Vec<&str> {
    let mut chain = vec![normalize(pointer)];
    let mut current = normalize(pointer);
    while let Some(idx) = current.rfind('/') {
        current = &current[..idx];
        chain.push(current);
    }
    if chain.last() != Some(&"") {
        chain.push("");
    }
    chain
}
