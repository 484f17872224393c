//! Alert system for displaying error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element of the base page.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An alert message to show the user.
#[derive(Debug, Clone)]
pub enum Alert {
    /// An error message with details on how the user can fix the problem.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                message,
                details,
            ),
        };

        html! {
            div class=(container_style) role="alert"
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    span { (details) }
                }

                button
                    type="button"
                    class="ms-auto underline"
                    onclick="document.getElementById('alert-container').classList.add('hidden')"
                {
                    "Dismiss"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
