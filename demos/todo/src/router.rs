//! Maps location fragments such as `#/active` to a [`Filter`].

use crate::types::Filter;

/// Route shown when the program starts
pub const DEFAULT_ROUTE: &str = "#/all";

/// Parse a fragment (`#/active`, `/completed`, `active`, `#/`) into a filter.
///
/// Anything unrecognised shows every item.
#[must_use]
pub fn parse_route(fragment: &str) -> Filter {
    let path = fragment.trim();
    let path = path.strip_prefix('#').unwrap_or(path);
    let path = path.trim_matches('/');

    if path.is_empty() {
        return Filter::All;
    }
    path.parse().unwrap_or_else(|_| {
        tracing::debug!(route = fragment, "Unknown route, showing all items");
        Filter::All
    })
}

/// Fragment that selects `filter`
#[must_use]
pub const fn route_for(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "#/all",
        Filter::Active => "#/active",
        Filter::Completed => "#/completed",
    }
}
