use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    response::{IntoResponseParts, ResponseParts},
};
use cookie::{Cookie, SameSite, time::Duration};

use crate::{
    db::UserStore,
    error::{AppError, Result},
    models::User,
    services::{
        SessionService,
        session_service::{SESSION_COOKIE, SessionClaims},
    },
};

/// Per-request authentication state.
///
/// Extracted from the session cookie at the start of a request and handed
/// to the handler explicitly. Returning it as part of the response writes
/// any change back to the client.
pub struct SessionContext {
    service: Arc<SessionService>,
    username: Option<String>,
    nonce: Option<String>,
    flash: Option<String>,
    changed: bool,
}

impl SessionContext {
    pub fn new(service: Arc<SessionService>) -> Self {
        Self {
            service,
            username: None,
            nonce: None,
            flash: None,
            changed: false,
        }
    }

    /// Decode the session cookie without consulting the user store
    fn from_headers(service: Arc<SessionService>, headers: &HeaderMap) -> Self {
        let claims = session_token(headers)
            .and_then(|token| service.read(&token))
            .unwrap_or_default();

        Self {
            service,
            username: claims.sub,
            nonce: claims.nonce,
            flash: claims.flash,
            changed: false,
        }
    }

    /// Drop the identity unless it still names the account it was issued for
    async fn verify_account(&mut self, users: &UserStore) -> Result<()> {
        let Some(username) = self.username.as_deref() else {
            return Ok(());
        };

        let current = users.session_nonce(username).await?;
        if current.is_none() || current != self.nonce {
            tracing::debug!("Discarding session of a removed account {}", username);
            self.username = None;
            self.nonce = None;
            self.changed = true;
        }
        Ok(())
    }

    /// Record `user` as the authenticated identity
    pub fn login(&mut self, user: &User) {
        self.username = Some(user.username.clone());
        self.nonce = Some(user.session_nonce.clone());
        self.changed = true;
    }

    pub fn current_user(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Forget the authenticated identity. Safe to call when logged out.
    pub fn logout(&mut self) {
        self.username = None;
        self.nonce = None;
        self.changed = true;
    }

    pub fn is_owner(&self, username: &str) -> bool {
        !username.is_empty() && self.current_user() == Some(username)
    }

    /// Gate for owner-only actions
    pub fn require_owner(&self, username: &str) -> Result<()> {
        if self.is_owner(username) {
            return Ok(());
        }
        if let Some(current) = self.current_user() {
            tracing::warn!("User {} tried to act on behalf of {}", current, username);
        }
        Err(AppError::Unauthorized)
    }

    /// Queue a message for the next rendered page
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
        self.changed = true;
    }

    /// Consume the pending flash message, if any
    pub fn take_flash(&mut self) -> Option<String> {
        let flash = self.flash.take();
        if flash.is_some() {
            self.changed = true;
        }
        flash
    }

    fn cookie(&self) -> Result<Cookie<'static>> {
        let builder = |value: String| {
            Cookie::build((SESSION_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
        };

        if self.username.is_none() && self.flash.is_none() {
            let mut removal = builder(String::new()).build();
            removal.make_removal();
            return Ok(removal);
        }

        let token = self.service.issue(SessionClaims {
            sub: self.username.clone(),
            nonce: self.nonce.clone(),
            flash: self.flash.clone(),
            ..Default::default()
        })?;
        Ok(builder(token)
            .max_age(Duration::seconds(self.service.ttl_secs()))
            .build())
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

impl<S> FromRequestParts<S> for SessionContext
where
    Arc<SessionService>: FromRef<S>,
    UserStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let service = Arc::<SessionService>::from_ref(state);
        let mut session = Self::from_headers(service, &parts.headers);
        session.verify_account(&UserStore::from_ref(state)).await?;
        Ok(session)
    }
}

impl IntoResponseParts for SessionContext {
    type Error = AppError;

    fn into_response_parts(
        self,
        mut res: ResponseParts,
    ) -> std::result::Result<ResponseParts, Self::Error> {
        if !self.changed {
            return Ok(res);
        }

        let cookie = self.cookie()?;
        let value = HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| AppError::Session(e.to_string()))?;
        res.headers_mut().append(header::SET_COOKIE, value);
        Ok(res)
    }
}
