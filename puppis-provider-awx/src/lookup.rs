//! Unified selector resolution for collection lookups
//!
//! Every data source funnels through the same two checks so empty and
//! ambiguous results behave identically across resource families.

use puppis_awx::models::{ListResponse, Selector};
use puppis_core::provider::{ProviderError, ProviderResult};
use puppis_core::resource::Resource;

/// Build a selector from the id/name attributes of a data-source block
pub fn selector_from(resource: &Resource) -> Selector {
    Selector {
        id: resource.attr_int("id"),
        name: resource.attr_str("name").map(str::to_string),
    }
}

/// Reject selectors with no filter keys before any network call
pub fn require_filter(kind: &str, selector: &Selector) -> ProviderResult<()> {
    if selector.is_empty() {
        return Err(
            ProviderError::new(format!("Missing selector for {}", kind))
                .with_detail("set at least one of id or name"),
        );
    }
    Ok(())
}

/// Pick exactly one object out of a filtered list response.
///
/// Zero matches is a not-found error and two or more is an ambiguity
/// error reporting the count; neither path touches state.
pub fn select_one<T>(
    kind: &str,
    selector: &Selector,
    list: ListResponse<T>,
) -> ProviderResult<T> {
    let mut results = list.results;
    match results.len() {
        1 => Ok(results.remove(0)),
        0 => Err(ProviderError::new(format!("{} not found", kind)).with_detail(format!(
            "no {} matches {}",
            kind,
            selector.describe()
        ))),
        n => Err(
            ProviderError::new(format!("Ambiguous {} selection", kind)).with_detail(format!(
                "{} objects match {}; narrow the selector",
                n,
                selector.describe()
            )),
        ),
    }
}
