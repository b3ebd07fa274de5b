use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::{get, post},
};
use folio_adapters::{
    config::AllowedOrigins,
    http::routes::{
        forgot_password, login, logout, refresh, resend_verification, reset_password, signup,
        verify_email, verify_token,
    },
};
use folio_core::{
    Clock, EmailClient, JwtBlacklistStore, PasswordHasher, RefreshTokenStore, TokenSigner,
    UserStore, VerificationTokenStore,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// Authentication service router. Each route gets exactly the state it
/// needs; the collaborators are Clone (Arc-backed or pool-backed) so the
/// per-route tuples share one underlying instance.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    #[allow(clippy::too_many_arguments)]
    pub fn new<U, P, S, V, R, B, E>(
        user_store: U,
        password_hasher: P,
        token_signer: S,
        verification_tokens: V,
        refresh_token_store: R,
        jwt_blacklist: B,
        email_client: E,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserStore + Clone + 'static,
        P: PasswordHasher + Clone + 'static,
        S: TokenSigner + Clone + 'static,
        V: VerificationTokenStore + Clone + 'static,
        R: RefreshTokenStore + Clone + 'static,
        B: JwtBlacklistStore + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let router = Router::new()
            .route("/signup", post(signup::<U, P, V, E>))
            .with_state((
                user_store.clone(),
                password_hasher.clone(),
                verification_tokens.clone(),
                email_client.clone(),
            ))
            .route("/resend-verification", post(resend_verification::<U, V, E>))
            .with_state((
                user_store.clone(),
                verification_tokens.clone(),
                email_client.clone(),
            ))
            .route("/verify-email", get(verify_email::<V, U>))
            .with_state((verification_tokens.clone(), user_store.clone()))
            .route("/login", post(login::<U, P, S, R>))
            .with_state((
                user_store.clone(),
                password_hasher.clone(),
                token_signer.clone(),
                refresh_token_store.clone(),
            ))
            .route("/logout", post(logout::<S, B, R>))
            .with_state((
                token_signer.clone(),
                jwt_blacklist.clone(),
                refresh_token_store.clone(),
            ))
            .route("/refresh", post(refresh::<S, R, U>))
            .with_state((
                token_signer.clone(),
                refresh_token_store.clone(),
                user_store.clone(),
                clock,
            ))
            .route("/forgot-password", post(forgot_password::<U, V, E>))
            .with_state((
                user_store.clone(),
                verification_tokens.clone(),
                email_client,
            ))
            .route("/reset-password", post(reset_password::<V, U, P, R>))
            .with_state((
                verification_tokens,
                user_store,
                password_hasher,
                refresh_token_store,
            ))
            .route("/verify-token", post(verify_token::<S, B>))
            .with_state((token_signer, jwt_blacklist));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert into a router that can be nested under another application.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run as a standalone server on the given listener.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
