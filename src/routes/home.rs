use askama::Template;
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::db::catalog;
use crate::db::models::{Artwork, News};
use crate::error::AppResult;
use crate::extractors::Layout;
use crate::state::AppState;
use crate::views::page;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate<'a> {
    pub layout: &'a Layout,
    pub artworks: Vec<Artwork>,
    pub author_name: &'a str,
}

#[derive(Template)]
#[template(path = "pages/news.html")]
pub struct NewsTemplate<'a> {
    pub layout: &'a Layout,
    pub items: Vec<News>,
}

#[derive(Template)]
#[template(path = "pages/draw_yourself.html")]
pub struct DrawYourselfTemplate<'a> {
    pub layout: &'a Layout,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/news", get(news))
        .route("/draw_yourself", get(draw_yourself))
}

/// Every artwork, unfiltered.
pub async fn index(State(state): State<AppState>, layout: Layout) -> AppResult<Response> {
    let conn = state.db.get()?;
    let artworks = catalog::list_artworks(&conn)?;

    Ok(page(
        &layout,
        HomeTemplate {
            layout: &layout,
            artworks,
            author_name: &state.config.site.author_name,
        },
    ))
}

pub async fn news(State(state): State<AppState>, layout: Layout) -> AppResult<Response> {
    let conn = state.db.get()?;
    let items = catalog::list_news(&conn)?;
    Ok(page(&layout, NewsTemplate { layout: &layout, items }))
}

pub async fn draw_yourself(layout: Layout) -> Response {
    page(&layout, DrawYourselfTemplate { layout: &layout })
}
