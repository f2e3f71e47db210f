use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};

use crate::{
    error::Result,
    handlers::AppState,
    models::user::UserProfile,
    session::SessionContext,
    views,
};

/// Profile page with the user's feedback
pub async fn show_user(
    State(state): State<AppState>,
    mut session: SessionContext,
    Path(username): Path<String>,
) -> Result<(SessionContext, Html<String>)> {
    session.require_owner(&username)?;

    let user = state.users.find_by_username(&username).await?;
    let feedback = state.feedback.list_by_owner(&username).await?;

    let profile = UserProfile::from(user);
    let flash = session.take_flash();
    let page = views::user_page(&profile, &feedback, flash.as_deref())?;
    Ok((session, page))
}

/// Delete the account along with all of its feedback
pub async fn delete_user(
    State(state): State<AppState>,
    mut session: SessionContext,
    Path(username): Path<String>,
) -> Result<(SessionContext, Redirect)> {
    session.require_owner(&username)?;

    let removed = state.users.delete_with_feedback(&username).await?;
    tracing::info!("Deleted user {} and {} feedback entries", username, removed);

    session.logout();
    session.flash("Your account has been deleted");
    Ok((session, Redirect::to("/")))
}
