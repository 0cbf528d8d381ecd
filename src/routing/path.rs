//! Path normalization and root-prefix handling.
//!
//! Route keys are always absolute: one leading slash, no trailing slash
//! (except the root route "/"), and prefixed with the configured root path.

/// Collapse leading and trailing slashes: `"home/1/"` → `"/home/1"`, `""` → `"/"`.
///
/// An escaped trailing slash (`\/`) is part of the pattern and is kept.
pub fn normalize(path: &str) -> String {
    let mut body = path.trim_start_matches('/');
    while let Some(rest) = body.strip_suffix('/') {
        if ends_with_escape(rest) {
            break;
        }
        body = rest;
    }
    format!("/{body}")
}

// odd run of trailing backslashes
fn ends_with_escape(text: &str) -> bool {
    text.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}

/// Normalize a configured root path: `"app"` → `"/app/"`, `"/"` stays `"/"`.
pub fn normalize_root(root: &str) -> String {
    let trimmed = root.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Prefix `path` with `root`. Input is always relative to the root, so
/// `/app/x` under root `/app/` becomes `/app/app/x`.
pub fn qualify(root: &str, path: &str) -> String {
    let normalized = normalize(path);
    match root_base(root) {
        None => normalized,
        Some(base) if normalized == "/" => base.to_string(),
        Some(base) => format!("{base}{normalized}"),
    }
}

/// Strip `root` from a location, or `None` when the location lies outside it.
pub fn strip_root(root: &str, location: &str) -> Option<String> {
    let normalized = normalize(location);
    let Some(base) = root_base(root) else {
        return Some(normalized);
    };

    if is_under(base, &normalized) {
        Some(normalize(&normalized[base.len()..]))
    } else {
        None
    }
}

// "/app/" → Some("/app"); "/" → None
fn root_base(root: &str) -> Option<&str> {
    let base = root.trim_end_matches('/');
    if base.is_empty() {
        None
    } else {
        Some(base)
    }
}

fn is_under(base: &str, path: &str) -> bool {
    match path.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}
