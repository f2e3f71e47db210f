use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    error::{AppError, Result},
    forms::{FeedbackForm, FormErrors},
    handlers::{AppState, user_path},
    models::Feedback,
    session::SessionContext,
    views,
};

/// Owner check against the stored row, never a client-supplied name
fn require_feedback_owner(session: &SessionContext, feedback: &Feedback) -> Result<()> {
    session.require_owner(feedback.username.as_deref().unwrap_or_default())
}

/// Feedback ids in paths are plain non-negative integers; anything else
/// names no feedback.
fn parse_feedback_id(raw: &str) -> Result<i64> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::FeedbackNotFound);
    }
    raw.parse().map_err(|_| AppError::FeedbackNotFound)
}

/// Public list of every feedback entry
pub async fn list_feedback(
    State(state): State<AppState>,
    mut session: SessionContext,
) -> Result<(SessionContext, Html<String>)> {
    let feedback = state.feedback.list_all().await?;
    let flash = session.take_flash();
    let page = views::feedback_list_page(&feedback, flash.as_deref())?;
    Ok((session, page))
}

/// Show the add-feedback form
pub async fn add_feedback_form(
    session: SessionContext,
    Path(username): Path<String>,
) -> Result<Html<String>> {
    session.require_owner(&username)?;
    views::add_feedback_page(&username, &FeedbackForm::default(), &FormErrors::new())
}

/// Create feedback owned by the user in the path
pub async fn add_feedback(
    State(state): State<AppState>,
    session: SessionContext,
    Path(username): Path<String>,
    Form(form): Form<FeedbackForm>,
) -> Result<Response> {
    session.require_owner(&username)?;

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => {
            let page = views::add_feedback_page(&username, &form, &errors)?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    state.feedback.create(input, &username).await?;
    Ok(Redirect::to(&user_path(&username)).into_response())
}

/// Show the edit form prefilled with the stored values
pub async fn edit_feedback_form(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let id = parse_feedback_id(&id)?;
    let feedback = state.feedback.find_by_id(id).await?;
    require_feedback_owner(&session, &feedback)?;

    let form = FeedbackForm {
        title: feedback.title,
        content: feedback.content,
    };
    views::edit_feedback_page(id, &form, &FormErrors::new())
}

/// Replace the title and content of a feedback entry
pub async fn update_feedback(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    Form(form): Form<FeedbackForm>,
) -> Result<Response> {
    let id = parse_feedback_id(&id)?;
    let feedback = state.feedback.find_by_id(id).await?;
    require_feedback_owner(&session, &feedback)?;

    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => {
            let page = views::edit_feedback_page(id, &form, &errors)?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    let updated = state.feedback.update(id, input).await?;
    let owner = updated.username.unwrap_or_default();
    tracing::info!("User {} updated feedback {}", owner, id);
    Ok(Redirect::to(&user_path(&owner)).into_response())
}

/// Delete a single feedback entry
pub async fn delete_feedback(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_feedback_id(&id)?;
    let feedback = state.feedback.find_by_id(id).await?;
    require_feedback_owner(&session, &feedback)?;

    state.feedback.delete_by_id(id).await?;
    let owner = feedback.username.unwrap_or_default();
    tracing::info!("User {} deleted feedback {}", owner, id);
    Ok(Redirect::to(&user_path(&owner)))
}
