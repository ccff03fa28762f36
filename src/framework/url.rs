//! Path construction for content-management endpoints.

use tracing::warn;

/// API namespace every lifecycle action lives under.
pub const API_BASE: &str = "/rhn/manager/api/contentmanagement";

/// Builds the endpoint path for a resource, an optional id and an optional
/// nested resource.
///
/// A nested resource is only addressable through an id. Passing one without an
/// id is a caller bug; debug builds assert, release builds ignore the nested
/// part.
pub fn build(resource: &str, nested_resource: Option<&str>, id: Option<&str>) -> String {
    // Empty strings count as absent.
    let id = id.filter(|id| !id.is_empty());
    let nested_resource = nested_resource.filter(|nested| !nested.is_empty());
    match (id, nested_resource) {
        (None, nested) => {
            debug_assert!(
                nested.is_none(),
                "nested resource {nested:?} requires an id"
            );
            if nested.is_some() {
                warn!(resource, ?nested, "Nested resource without id, ignoring");
            }
            format!("{API_BASE}/{resource}")
        }
        (Some(id), None) => format!("{API_BASE}/{resource}/{id}"),
        (Some(id), Some(nested)) => format!("{API_BASE}/{resource}/{id}/{nested}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path() {
        assert_eq!(
            build("projects", None, None),
            "/rhn/manager/api/contentmanagement/projects"
        );
    }

    #[test]
    fn test_item_path() {
        assert_eq!(
            build("projects", None, Some("7")),
            "/rhn/manager/api/contentmanagement/projects/7"
        );
    }

    #[test]
    fn test_nested_path() {
        assert_eq!(
            build("projects", Some("filters"), Some("7")),
            "/rhn/manager/api/contentmanagement/projects/7/filters"
        );
    }

    #[test]
    fn test_empty_id_is_absent() {
        assert_eq!(
            build("filters", None, Some("")),
            "/rhn/manager/api/contentmanagement/filters"
        );
    }

    #[test]
    #[should_panic(expected = "requires an id")]
    #[cfg(debug_assertions)]
    fn test_nested_without_id_asserts() {
        build("projects", Some("filters"), None);
    }
}
