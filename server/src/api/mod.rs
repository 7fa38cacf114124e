pub mod activity;
pub mod notifications;
pub mod public;
pub mod recipes;
pub mod sharing;
pub mod users;

use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// `limit`/`offset` query parameters shared by list endpoints, with defaults
/// and bounds applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(components(schemas(
        ErrorResponse,
        PaginationMetadata,
        recipebox_core::Recipe,
        recipebox_core::RecipeLocation,
        recipebox_core::RecipeIngredient,
        recipebox_core::RecipeInstruction,
        recipebox_core::DietaryRestriction,
        recipebox_core::Meal,
        recipebox_core::RecipeType,
        recipebox_core::NavigateTo,
        recipebox_core::PushPermission,
        recipebox_core::ShareStatus,
    )))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        sharing::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        activity::ApiDoc::openapi(),
        notifications::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        let page = Page::default();
        assert_eq!((page.limit(), page.offset()), (20, 0));

        let page = Page {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!((page.limit(), page.offset()), (100, 0));

        let page = Page {
            limit: Some(0),
            offset: Some(40),
        };
        assert_eq!((page.limit(), page.offset()), (1, 40));
    }

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = openapi();
        for path in [
            "/auth/register",
            "/auth/login",
            "/recipes",
            "/recipes/{id}",
            "/recipes/recommendation",
            "/recipes/filter-options",
            "/recipes/made-up",
            "/recipes/cookbook",
            "/recipes/online",
            "/recipes/{id}/share",
            "/sharing",
            "/sharing/accept",
            "/sharing/{id}",
            "/users/me",
            "/users/search",
            "/users/friends",
            "/users/friend-requests",
            "/users/friend-request",
            "/users/friend-request/{request_from_user_id}/accept",
            "/users/push-token",
            "/activity",
            "/activity/{recipe_id}",
            "/notifications",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
