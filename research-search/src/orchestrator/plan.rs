//! Provider preference planning.
//!
//! Builds the ordered list of web providers to try for one request: an
//! explicit caller preference first, then the static priority order
//! filtered by configured credentials, with DuckDuckGo always last.

use crate::config::ProviderCredentials;
use crate::types::SearchProvider;

/// Keyed web providers in static priority order.
pub const PRIORITY_ORDER: [SearchProvider; 4] = [
    SearchProvider::Google,
    SearchProvider::Serper,
    SearchProvider::Tavily,
    SearchProvider::Brave,
];

/// Parse a caller-supplied preference string.
///
/// `None`, empty and `auto` mean "no explicit preference". Unknown names
/// are logged and ignored rather than failing the request.
pub fn parse_preference(raw: Option<&str>) -> Option<SearchProvider> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        return None;
    }
    match raw.parse::<SearchProvider>() {
        Ok(provider) if provider.is_web() => Some(provider),
        Ok(provider) => {
            tracing::warn!(%provider, "academic provider ignored as web preference");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unknown search provider preference");
            None
        }
    }
}

/// Ordered web providers to try for a request.
///
/// The result never contains duplicates and always ends with
/// [`SearchProvider::DuckDuckGo`].
pub fn provider_plan(
    preference: Option<SearchProvider>,
    credentials: &ProviderCredentials,
) -> Vec<SearchProvider> {
    let mut plan = Vec::with_capacity(PRIORITY_ORDER.len() + 1);

    if let Some(preferred) = preference {
        if preferred.is_web()
            && preferred != SearchProvider::DuckDuckGo
            && credentials.has_credentials(preferred)
        {
            plan.push(preferred);
        } else if preferred != SearchProvider::DuckDuckGo {
            tracing::debug!(%preferred, "preferred provider unavailable, using priority order");
        }
    }

    for provider in PRIORITY_ORDER {
        if credentials.has_credentials(provider) && !plan.contains(&provider) {
            plan.push(provider);
        }
    }

    plan.push(SearchProvider::DuckDuckGo);
    plan
}
