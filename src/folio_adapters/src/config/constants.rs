use std::sync::LazyLock;

use crate::config::settings::Settings;

pub static REFRESH_COOKIE_NAME: LazyLock<&'static str> = LazyLock::new(|| {
    let cookie_name = Settings::load().auth.jwt.refresh_cookie_name.clone();
    Box::leak(cookie_name.into_boxed_str())
});

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
    }
}

pub mod test {
    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "test@folio.dev";
        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}
