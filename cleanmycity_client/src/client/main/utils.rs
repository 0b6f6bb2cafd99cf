/// Join a request path onto the base URL.
///
/// `Url::join` resolves relative references, which silently drops the `/api`
/// prefix from bases like `http://localhost:3000/api`. Plain concatenation
/// with normalized slashes keeps the prefix intact.
pub(super) fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
