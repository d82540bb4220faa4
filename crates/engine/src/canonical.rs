//! Canonical suffix enforcement.

use lectern_persistence::types::{CanonicalPolicy, SEPARATOR};

use crate::path::{RequestPath, SuffixForm};

/// Returns the suffix form a policy requires.
pub fn required_form(policy: CanonicalPolicy) -> SuffixForm {
    match policy {
        CanonicalPolicy::RequireSlash => SuffixForm::Slash,
        CanonicalPolicy::RequireExtension => SuffixForm::Extension,
        CanonicalPolicy::RequireNeither => SuffixForm::Bare,
    }
}

/// Builds the canonical path for `path` under `policy`.
pub fn canonical_path(path: &RequestPath, policy: CanonicalPolicy, extension: &str) -> String {
    if path.is_root() {
        return SEPARATOR.to_string();
    }

    let base = path.key();
    match policy {
        CanonicalPolicy::RequireSlash => format!("{}{}", base, SEPARATOR),
        CanonicalPolicy::RequireExtension => match path.language() {
            Some(language) => format!("{}.{}.{}", base, extension, language),
            None => format!("{}.{}", base, extension),
        },
        CanonicalPolicy::RequireNeither => base,
    }
}

/// Returns the target a request must be permanently redirected to, or
/// `None` if it already has the required suffix.
///
/// The query string, when present, is carried over. The site root is never
/// redirected.
pub fn enforce(
    path: &RequestPath,
    policy: CanonicalPolicy,
    extension: &str,
    query: Option<&str>,
) -> Option<String> {
    if path.is_root() || path.suffix() == required_form(policy) {
        return None;
    }

    let mut target = canonical_path(path, policy, extension);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    Some(target)
}
