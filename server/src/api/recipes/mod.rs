pub mod delete;
pub mod filter_options;
pub mod get;
pub mod ingest;
pub mod list;
pub mod recommendation;
pub mod share;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /recipes endpoints (mounted at /recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes))
        .route("/recommendation", get(recommendation::recommend_recipe))
        .route("/filter-options", get(filter_options::list_filter_options))
        .route("/made-up", post(ingest::create_made_up_recipe))
        .route("/cookbook", post(ingest::create_cookbook_recipe))
        .route("/online", post(ingest::create_online_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/share", post(share::share_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        recommendation::recommend_recipe,
        filter_options::list_filter_options,
        ingest::create_made_up_recipe,
        ingest::create_cookbook_recipe,
        ingest::create_online_recipe,
        share::share_recipe,
    ),
    components(schemas(
        list::ListRecipesResponse,
        list::SortBy,
        list::Direction,
        update::UpdateRecipeRequest,
        filter_options::FilterOptionsResponse,
        ingest::CookbookUpload,
        ingest::OnlineRecipeRequest,
        recipebox_core::extract::MadeUpRecipe,
        share::ShareRecipeRequest,
    ))
)]
pub struct ApiDoc;
