use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    error::{AppError, Result},
    forms::{FormErrors, LoginForm, RegisterForm},
    handlers::{AppState, user_path},
    session::SessionContext,
    views,
};

/// Landing page
pub async fn home() -> Redirect {
    Redirect::to("/register")
}

/// Show the registration form
pub async fn register_form(mut session: SessionContext) -> Result<(SessionContext, Html<String>)> {
    let flash = session.take_flash();
    let page = views::register_page(&RegisterForm::default(), &FormErrors::new(), flash.as_deref())?;
    Ok((session, page))
}

/// Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    mut session: SessionContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let new_user = match form.clean() {
        Ok(new_user) => new_user,
        Err(errors) => {
            return Ok((StatusCode::BAD_REQUEST, views::register_page(&form, &errors, None)?)
                .into_response());
        }
    };

    match state.users.register(new_user).await {
        Ok(user) => {
            session.login(&user);
            Ok((session, Redirect::to(&user_path(&user.username))).into_response())
        }
        // Duplicates stay on the form with the message next to the field
        Err(err @ AppError::DuplicateUsername) => {
            let mut errors = FormErrors::new();
            errors.add("username", err.to_string());
            Ok((StatusCode::BAD_REQUEST, views::register_page(&form, &errors, None)?).into_response())
        }
        Err(err @ AppError::DuplicateEmail) => {
            let mut errors = FormErrors::new();
            errors.add("email", err.to_string());
            Ok((StatusCode::BAD_REQUEST, views::register_page(&form, &errors, None)?).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Show the login form
pub async fn login_form(mut session: SessionContext) -> Result<(SessionContext, Html<String>)> {
    let flash = session.take_flash();
    let page =
        views::login_page(&LoginForm::default(), &FormErrors::new(), None, flash.as_deref())?;
    Ok((session, page))
}

/// Check credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    mut session: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = match form.clean() {
        Ok(credentials) => credentials,
        Err(errors) => {
            return Ok((StatusCode::BAD_REQUEST, views::login_page(&form, &errors, None, None)?)
                .into_response());
        }
    };

    match state
        .users
        .authenticate(&credentials.username, &credentials.password)
        .await
    {
        Ok(user) => {
            tracing::info!("User {} logged in", user.username);
            session.login(&user);
            Ok((session, Redirect::to(&user_path(&user.username))).into_response())
        }
        Err(err @ AppError::InvalidCredentials) => {
            let page =
                views::login_page(&form, &FormErrors::new(), Some(&err.to_string()), None)?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Clear the session, whoever was logged in
pub async fn logout(mut session: SessionContext) -> (SessionContext, Redirect) {
    if let Some(username) = session.current_user() {
        tracing::info!("User {} logged out", username);
    }
    session.logout();
    session.flash("See you later!");
    (session, Redirect::to("/"))
}
