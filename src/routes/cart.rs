use askama::Template;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::db::models::CartLine;
use crate::db::{cart, catalog};
use crate::error::AppResult;
use crate::extractors::{CurrentUser, Layout};
use crate::flash::{self, Flash};
use crate::state::AppState;
use crate::views::page;

#[derive(Template)]
#[template(path = "pages/cart.html")]
pub struct CartTemplate<'a> {
    pub layout: &'a Layout,
    pub items: Vec<CartLine>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(list))
        .route("/add_to_cart/{art_id}", get(add))
        .route("/remove_from_cart/{art_id}", get(remove))
}

async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    layout: Layout,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let items = cart::list_lines(&conn, user.id)?;
    Ok(page(&layout, CartTemplate { layout: &layout, items }))
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

    cart::add(&conn, user.id, art_id)?;
    Ok(flash::redirect("/cart", Flash::success("Added to cart")))
}

async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(art_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let flash = if cart::remove_one(&conn, user.id, art_id)? {
        Flash::success("Removed from cart")
    } else {
        Flash::warning("Item not found in cart")
    };
    Ok(flash::redirect("/cart", flash))
}
