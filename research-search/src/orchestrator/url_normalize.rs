//! URL normalisation used to spot the same page returned by two providers.

use url::Url;

/// Query parameters that only carry tracking state.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "msclkid", "ref", "ref_src"];

/// Normalise a URL into a comparison key.
///
/// - lowercases scheme and host, drops a leading `www.`
/// - treats `http` and `https` alike
/// - removes the fragment, tracking parameters and `utm_*` parameters
/// - sorts the remaining query parameters
/// - strips a trailing slash from non-root paths
///
/// Unparseable input is returned trimmed and lowercased.
pub fn normalize_url(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return raw.trim().to_lowercase();
    };

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_owned();

    let mut path = parsed.path().to_owned();
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| {
            !key.starts_with("utm_") && !TRACKING_PARAMS.contains(&key.as_ref())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    let mut key = match parsed.port() {
        Some(port) => format!("{host}:{port}{path}"),
        None => format!("{host}{path}"),
    };
    if !params.is_empty() {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        key.push('?');
        key.push_str(&query.join("&"));
    }
    key
}
