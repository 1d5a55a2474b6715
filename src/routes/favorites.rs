use askama::Template;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::db::models::Artwork;
use crate::db::{catalog, favorites};
use crate::error::AppResult;
use crate::extractors::{CurrentUser, Layout};
use crate::flash::{self, Flash};
use crate::state::AppState;
use crate::views::page;

#[derive(Template)]
#[template(path = "pages/favorites.html")]
pub struct FavoritesTemplate<'a> {
    pub layout: &'a Layout,
    pub artworks: Vec<Artwork>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list))
        .route("/add_favorite/{art_id}", get(add))
        .route("/remove_favorite/{art_id}", get(remove))
}

async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    layout: Layout,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let artworks = favorites::list_artworks(&conn, user.id)?;
    Ok(page(&layout, FavoritesTemplate { layout: &layout, artworks }))
}

async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(art_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    if !catalog::artwork_exists(&conn, art_id)? {
        return Ok(flash::redirect("/", Flash::warning("Artwork not found")));
    }

    favorites::add(&conn, user.id, art_id)?;
    Ok(flash::redirect("/favorites", Flash::success("Added to favorites")))
}

async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(art_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let flash = if favorites::remove_one(&conn, user.id, art_id)? {
        Flash::success("Removed from favorites")
    } else {
        Flash::warning("Item not found in favorites")
    };
    Ok(flash::redirect("/favorites", flash))
}
