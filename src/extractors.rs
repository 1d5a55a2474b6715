use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::session;
use crate::db::models::Role;
use crate::error::AppError;
use crate::flash::{cookie_value, Flash};
use crate::state::AppState;

/// Represents the currently authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Who is making the request, resolved from the session cookie.
#[derive(Debug, Clone)]
pub enum Principal {
    Guest,
    User(CurrentUser),
    Admin(CurrentUser),
}

impl Principal {
    fn from_user(user: Option<CurrentUser>) -> Self {
        match user {
            None => Principal::Guest,
            Some(user) if user.is_admin() => Principal::Admin(user),
            Some(user) => Principal::User(user),
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            Principal::Guest => None,
            Principal::User(user) | Principal::Admin(user) => Some(user),
        }
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Several extractors on one handler share a single lookup
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        let principal = match cookie_value(&parts.headers, &state.config.auth.cookie_name) {
            Some(token) if !token.is_empty() => {
                let conn = state.db.get()?;
                Principal::from_user(session::lookup(&conn, token)?)
            }
            _ => Principal::Guest,
        };

        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}

/// Extractor that requires a logged-in user (any role).
/// Guests are redirected to the login page.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Principal::from_request_parts(parts, state).await? {
            Principal::Guest => Err(AppError::LoginRequired),
            Principal::User(user) | Principal::Admin(user) => Ok(user),
        }
    }
}

/// Extractor that requires the admin role. Guests and ordinary users are
/// both redirected to the login page; there is no separate forbidden response.
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Principal::from_request_parts(parts, state).await? {
            Principal::Admin(user) => Ok(AdminUser(user)),
            Principal::Guest | Principal::User(_) => Err(AppError::AdminRequired),
        }
    }
}

/// Everything the shared page chrome needs: site title, navigation state
/// and the pending flash message.
#[derive(Debug, Clone)]
pub struct Layout {
    pub site_title: String,
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    /// A flash cookie arrived with the request and must be expired
    pub(crate) flash_cookie: bool,
}

impl Layout {
    /// Show `flash` on this render instead of whatever was queued.
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(CurrentUser::is_admin)
    }
}

impl FromRequestParts<AppState> for Layout {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        let flash = Flash::from_headers(&parts.headers);
        Ok(Layout {
            site_title: state.config.site.title.clone(),
            user: principal.user().cloned(),
            flash_cookie: flash.is_some(),
            flash,
        })
    }
}
