use askama::Template;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::{password, session};
use crate::error::AppResult;
use crate::extractors::Layout;
use crate::flash::{cookie_value, Flash};
use crate::state::AppState;
use crate::views::page;

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate<'a> {
    pub layout: &'a Layout,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login
pub async fn login_page(layout: Layout) -> Response {
    page(&layout, LoginTemplate { layout: &layout })
}

/// POST /login — verify credentials and start a session.
/// Admins land on the dashboard, everyone else on the home page.
pub async fn login(
    State(state): State<AppState>,
    layout: Layout,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(user) = password::authenticate(&conn, form.username.trim(), &form.password)? else {
        tracing::warn!("Failed login attempt for {:?}", form.username);
        let layout = layout.with_flash(Flash::danger("Invalid username or password"));
        return Ok(page(&layout, LoginTemplate { layout: &layout }));
    };

    let auth = &state.config.auth;
    let token = session::create_session(&conn, user.id, auth.session_hours)?;
    tracing::info!("User {} logged in", user.username);

    let target = if user.is_admin() { "/admin" } else { "/" };
    Ok((
        AppendHeaders([
            (
                header::SET_COOKIE,
                session::session_cookie(&auth.cookie_name, &token, auth.session_hours),
            ),
            (header::SET_COOKIE, Flash::success("Logged in").set_cookie()),
        ]),
        Redirect::to(target),
    )
        .into_response())
}

/// GET /logout — drop the server-side session and expire the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let cookie_name = &state.config.auth.cookie_name;

    if let Some(token) = cookie_value(&headers, cookie_name) {
        let conn = state.db.get()?;
        session::delete_session(&conn, token)?;
    }

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session::clear_session_cookie(cookie_name)),
            (header::SET_COOKIE, Flash::info("You have been logged out").set_cookie()),
        ]),
        Redirect::to("/"),
    )
        .into_response())
}
