//! HTML pages rendered from the askama templates under `templates/`.
//! Template output is HTML-escaped.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    error::Result,
    forms::{FeedbackForm, FormErrors, LoginForm, RegisterForm},
    models::{Feedback, user::UserProfile},
};

/// One input of a form page
struct Field<'a> {
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    value: &'a str,
    error: Option<&'a str>,
}

impl<'a> Field<'a> {
    fn new(
        errors: &'a FormErrors,
        name: &'static str,
        label: &'static str,
        kind: &'static str,
        value: &'a str,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            value,
            error: errors.get(name),
        }
    }

    fn is_textarea(&self) -> bool {
        self.kind == "textarea"
    }
}

#[derive(Template)]
#[template(path = "form.html")]
struct FormPage<'a> {
    title: &'a str,
    flash: Option<&'a str>,
    message: Option<&'a str>,
    action: String,
    submit: &'a str,
    fields: Vec<Field<'a>>,
}

#[derive(Template)]
#[template(path = "user.html")]
struct UserPage<'a> {
    title: &'a str,
    flash: Option<&'a str>,
    user: &'a UserProfile,
    feedback: &'a [Feedback],
}

#[derive(Template)]
#[template(path = "feedback_list.html")]
struct FeedbackListPage<'a> {
    title: &'a str,
    flash: Option<&'a str>,
    feedback: &'a [Feedback],
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    title: &'a str,
    flash: Option<&'a str>,
    message: &'a str,
}

fn render(template: impl Template) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}

pub fn register_page(
    form: &RegisterForm,
    errors: &FormErrors,
    flash: Option<&str>,
) -> Result<Html<String>> {
    render(FormPage {
        title: "Register",
        flash,
        message: None,
        action: "/register".to_string(),
        submit: "Register",
        fields: vec![
            Field::new(errors, "username", "Username", "text", &form.username),
            // Never echo a submitted password back
            Field::new(errors, "password", "Password", "password", ""),
            Field::new(errors, "email", "Email", "email", &form.email),
            Field::new(errors, "first_name", "First Name", "text", &form.first_name),
            Field::new(errors, "last_name", "Last Name", "text", &form.last_name),
        ],
    })
}

pub fn login_page(
    form: &LoginForm,
    errors: &FormErrors,
    message: Option<&str>,
    flash: Option<&str>,
) -> Result<Html<String>> {
    render(FormPage {
        title: "Login",
        flash,
        message,
        action: "/login".to_string(),
        submit: "Login",
        fields: vec![
            Field::new(errors, "username", "Username", "text", &form.username),
            Field::new(errors, "password", "Password", "password", ""),
        ],
    })
}

fn feedback_fields<'a>(form: &'a FeedbackForm, errors: &'a FormErrors) -> Vec<Field<'a>> {
    vec![
        Field::new(errors, "title", "Title", "text", &form.title),
        Field::new(errors, "content", "Content", "textarea", &form.content),
    ]
}

pub fn add_feedback_page(
    username: &str,
    form: &FeedbackForm,
    errors: &FormErrors,
) -> Result<Html<String>> {
    render(FormPage {
        title: "Add Feedback",
        flash: None,
        message: None,
        action: format!("/users/{}/feedback/add", username),
        submit: "Add",
        fields: feedback_fields(form, errors),
    })
}

pub fn edit_feedback_page(id: i64, form: &FeedbackForm, errors: &FormErrors) -> Result<Html<String>> {
    render(FormPage {
        title: "Edit Feedback",
        flash: None,
        message: None,
        action: format!("/feedback/{}/update", id),
        submit: "Save",
        fields: feedback_fields(form, errors),
    })
}

pub fn user_page(
    user: &UserProfile,
    feedback: &[Feedback],
    flash: Option<&str>,
) -> Result<Html<String>> {
    render(UserPage {
        title: &user.username,
        flash,
        user,
        feedback,
    })
}

pub fn feedback_list_page(feedback: &[Feedback], flash: Option<&str>) -> Result<Html<String>> {
    render(FeedbackListPage {
        title: "All Feedback",
        flash,
        feedback,
    })
}

/// Error body; falls back to a bare status if the page itself fails
pub fn error_page(status: StatusCode, message: &str) -> Response {
    let page = ErrorPage {
        title: status.canonical_reason().unwrap_or("Error"),
        flash: None,
        message,
    };
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            status.into_response()
        }
    }
}
