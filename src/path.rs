//! Path grammar and string utilities.
//!
//! A valid path matches `/(<name>/)*`: it starts and ends with `/`, and
//! every `<name>` in between is 1..=[`MAX_NAME`] characters drawn from
//! `[a-zA-Z]`. `/` alone names the root. These rules, and the
//! `MAX_NAME`/`MAX_PATH` constants below, mirror the grammar of the
//! original C implementation this protocol was distilled from.

/// Maximum length, in bytes, of a single path segment.
pub const MAX_NAME: usize = 255;

/// Maximum length, in bytes, of a full path string.
pub const MAX_PATH: usize = 4095;

/// Returns whether `path` is a syntactically valid folder path under the
/// default [`MAX_NAME`]/[`MAX_PATH`] limits.
pub fn is_path_valid(path: &str) -> bool {
    is_path_valid_within(path, MAX_NAME, MAX_PATH)
}

/// Returns whether `path` is a syntactically valid folder path under a
/// caller-supplied pair of limits, as configured by [`crate::tree::TreeLimits`].
pub fn is_path_valid_within(path: &str, max_name: usize, max_path: usize) -> bool {
    if path.is_empty() || path.len() > max_path {
        return false;
    }
    if !path.starts_with('/') || !path.ends_with('/') {
        return false;
    }
    if path == "/" {
        return true;
    }
    // Split the interior (without the leading/trailing '/') on '/' without
    // filtering: a consecutive "//" yields an empty segment here, which
    // must be rejected rather than silently dropped, or "/a//b/" would be
    // accepted as if it were "/a/b/".
    path[1..path.len() - 1].split('/').all(|segment| {
        !segment.is_empty()
            && segment.len() <= max_name
            && segment.chars().all(|c| c.is_ascii_alphabetic())
    })
}

/// Splits the first segment off `path`, returning `(name, rest)` where
/// `rest` is the remaining subpath (itself starting and ending with `/`,
/// equal to `/` when `name` was the last segment). Returns `None` when
/// `path` is already `/` (no more segments to peel off).
///
/// `path` is assumed to be valid (a leading/trailing `/`, as produced by
/// [`is_path_valid`] or by a previous call to `split_path`).
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return None;
    }
    let end = rest.find('/').expect("valid path: segment terminated by '/'");
    let (name, after) = rest.split_at(end);
    Some((name, after))
}

/// Splits a non-root path into its parent path and leaf name.
///
/// Returns `None` when `path == "/"`, which has no parent.
pub fn make_path_to_parent(path: &str) -> Option<(String, String)> {
    if path == "/" {
        return None;
    }
    let trimmed = &path[..path.len() - 1]; // drop the trailing '/'
    let split_at = trimmed.rfind('/').expect("valid path starts with '/'");
    let parent = &trimmed[..=split_at];
    let leaf = &trimmed[split_at + 1..];
    Some((parent.to_owned(), leaf.to_owned()))
}

/// Returns the longest common prefix of `a` and `b`, truncated to the
/// nearest directory boundary (a `/`). Both arguments are assumed valid
/// paths.
pub fn make_path_to_lca(a: &str, b: &str) -> String {
    let common = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    let prefix = &a[..common];
    match prefix.rfind('/') {
        Some(idx) => prefix[..=idx].to_owned(),
        None => "/".to_owned(),
    }
}

/// Returns the subpath of `full` relative to `base`, where `base` is
/// assumed to be a directory-boundary prefix of `full` (as produced by
/// [`make_path_to_lca`]). The result starts with `/`; it is `/` itself
/// when `full == base`.
pub fn relative_to<'a>(base: &str, full: &'a str) -> &'a str {
    debug_assert!(full.starts_with(base));
    &full[base.len() - 1..]
}

/// Returns whether `maybe_descendant` is a strict descendant of
/// `ancestor` (i.e. `ancestor` is a proper directory-boundary prefix of
/// `maybe_descendant`, not equal to it).
pub fn is_strict_descendant(ancestor: &str, maybe_descendant: &str) -> bool {
    ancestor != maybe_descendant && maybe_descendant.starts_with(ancestor)
}
