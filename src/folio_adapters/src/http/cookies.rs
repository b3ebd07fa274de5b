use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::REFRESH_COOKIE_NAME;

/// HTTP-only refresh cookie for browser clients.
pub fn create_refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build((*REFRESH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn create_refresh_removal_cookie() -> Cookie<'static> {
    let mut cookie = create_refresh_cookie(String::new());
    cookie.make_removal();
    cookie
}
