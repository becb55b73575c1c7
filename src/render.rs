//! Terminal rendering of the form view.
//!
//! Sections appear in page order: heading, inputs, action buttons, status
//! message (only when present), users list (only when non-empty).

use time::macros::format_description;
use time::UtcOffset;

use crate::controller::FormView;
use crate::net::types::User;
use crate::state::form::FormField;

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

pub const HEADING: &str = "Форма регистрации";
pub const USERS_HEADING: &str = "Зарегистрированные пользователи:";

/// One of the three action buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Submit,
    Fetch,
    Delete,
}

impl Button {
    pub const ALL: [Self; 3] = [Self::Submit, Self::Fetch, Self::Delete];

    /// Label for the current loading state; every button switches while a request runs.
    #[must_use]
    pub fn label(self, loading: bool) -> &'static str {
        match (self, loading) {
            (Self::Submit, false) => "Добавить пользователя",
            (Self::Submit, true) => "Отправка...",
            (Self::Fetch, false) => "Получить всех пользователей",
            (Self::Fetch, true) => "Загрузка...",
            (Self::Delete, false) => "Удалить всех пользователей",
            (Self::Delete, true) => "Удаление...",
        }
    }
}

/// Render the whole view. Timestamps are shown in `offset`.
#[must_use]
pub fn render(view: &FormView, offset: UtcOffset) -> String {
    let mut out = format!("{HEADING}\n\n");

    for field in FormField::ALL {
        let value = view.form.value(field);
        let shown = match field {
            FormField::Username => value.to_owned(),
            FormField::Password => mask(value),
        };
        out.push_str(&format!("{} {shown}\n", field.label()));
    }
    out.push('\n');

    for button in Button::ALL {
        let marker = if view.loading { " (disabled)" } else { "" };
        out.push_str(&format!("[ {} ]{marker}\n", button.label(view.loading)));
    }

    if let Some(message) = view.message.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(&format!("\n{message}\n"));
    }

    if !view.users.is_empty() {
        out.push_str(&format!("\n{USERS_HEADING}\n"));
        for user in &view.users {
            out.push_str(&render_user(user, offset));
        }
    }

    out
}

fn render_user(user: &User, offset: UtcOffset) -> String {
    format!(
        "- ID: {}\n  Username: {}\n  Created: {}\n",
        user.id,
        user.username,
        format_created(user, offset)
    )
}

fn format_created(user: &User, offset: UtcOffset) -> String {
    let format = format_description!("[day].[month].[year], [hour]:[minute]:[second]");
    user.created_at
        .to_offset(offset)
        .format(&format)
        .unwrap_or_else(|_| user.created_at.to_string())
}

fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}
