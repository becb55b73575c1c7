#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use serde::Serialize;

/// Current values of the registration form. Also the create request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormData {
    pub username: String,
    pub password: String,
}

impl FormData {
    /// Write `value` into `field`, leaving the other field untouched.
    pub fn on_field_change(&mut self, field: FormField, value: impl Into<String>) {
        match field {
            FormField::Username => self.username = value.into(),
            FormField::Password => self.password = value.into(),
        }
    }

    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Username => &self.username,
            FormField::Password => &self.password,
        }
    }

    /// First required field that is still empty, in form order.
    #[must_use]
    pub fn missing_field(&self) -> Option<FormField> {
        FormField::ALL
            .into_iter()
            .find(|field| self.value(*field).is_empty())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Named inputs of the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Username,
    Password,
}

impl FormField {
    pub const ALL: [Self; 2] = [Self::Username, Self::Password];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    /// Label shown next to the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Имя пользователя:",
            Self::Password => "Пароль:",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field `{0}` (expected `username` or `password`)")]
    Unknown(String),
}

impl std::str::FromStr for FormField {
    type Err = FieldError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "username" => Ok(Self::Username),
            "password" => Ok(Self::Password),
            other => Err(FieldError::Unknown(other.to_owned())),
        }
    }
}
