//! Form controller — the three user-triggered actions.
//!
//! DESIGN
//! ======
//! `FormController` owns the form fields, the last fetched users, the
//! status notifier, and a handle to the loading gate. Every action raises
//! the gate for the span of its single request, maps the outcome to a fixed
//! status message, and logs failure detail. Errors stop here; nothing is
//! returned to the caller except the outcome kind.
//!
//! Created records are not merged into `users`, and delete-all does not
//! refetch. The list only changes through `fetch_all` and `delete_all`.

use tracing::{error, info};

use crate::net::api::UsersApi;
use crate::net::types::User;
use crate::state::form::{FormData, FormField};
use crate::state::loading::LoadingGate;
use crate::state::notifier::StatusNotifier;

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

pub const MSG_USER_ADDED: &str = "Пользователь успешно добавлен!";
pub const MSG_ADD_FAILED: &str = "Ошибка при добавлении пользователя";
pub const MSG_USERS_LOADED: &str = "Пользователи загружены";
pub const MSG_USERS_NOT_FOUND: &str = "Пользователи не найдены";
pub const MSG_LOAD_FAILED: &str = "Ошибка при загрузке пользователей";
pub const MSG_USERS_DELETED: &str = "Все пользователи удалены";
pub const MSG_DELETE_FAILED: &str = "Ошибка при удалении пользователей";

/// Outcome of one action, for callers that need more than the message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Read-only snapshot of everything the view renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormView {
    pub form: FormData,
    pub users: Vec<User>,
    pub message: Option<String>,
    pub loading: bool,
}

pub struct FormController<A> {
    api: A,
    form: FormData,
    users: Vec<User>,
    notifier: StatusNotifier,
    loading: LoadingGate,
}

impl<A: UsersApi> FormController<A> {
    #[must_use]
    pub fn new(api: A, notifier: StatusNotifier, loading: LoadingGate) -> Self {
        Self { api, form: FormData::default(), users: Vec::new(), notifier, loading }
    }

    #[must_use]
    pub fn form(&self) -> &FormData {
        &self.form
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.notifier.current()
    }

    #[must_use]
    pub fn loading_gate(&self) -> &LoadingGate {
        &self.loading
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    #[must_use]
    pub fn view(&self) -> FormView {
        FormView {
            form: self.form.clone(),
            users: self.users.clone(),
            message: self.notifier.current(),
            loading: self.loading.is_loading(),
        }
    }

    pub fn on_field_change(&mut self, field: FormField, value: impl Into<String>) {
        self.form.on_field_change(field, value);
    }

    /// Create a user from the current form. Required-field presence is the
    /// input layer's job and is not re-checked here.
    pub async fn submit(&mut self) -> Outcome {
        let _loading = self.loading.begin();
        self.notifier.clear();

        match self.api.create_user(&self.form).await {
            Ok(created) => {
                match created {
                    Some(user) => info!(id = user.id, username = %user.username, "user added"),
                    None => info!(username = %self.form.username, "user added"),
                }
                self.notifier.set(MSG_USER_ADDED);
                self.form.reset();
                Outcome::Succeeded
            }
            Err(e) => {
                error!(error = %e, detail = %e.detail(), "user create failed");
                self.notifier.set(MSG_ADD_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Replace the local list with the server's current users.
    pub async fn fetch_all(&mut self) -> Outcome {
        let _loading = self.loading.begin();

        match self.api.list_users().await {
            Ok(users) => {
                info!(count = users.len(), "users loaded");
                self.users = users;
                if self.users.is_empty() {
                    self.notifier.set(MSG_USERS_NOT_FOUND);
                } else {
                    self.notifier.set(MSG_USERS_LOADED);
                }
                Outcome::Succeeded
            }
            Err(e) => {
                error!(error = %e, detail = %e.detail(), "users fetch failed");
                self.notifier.set(MSG_LOAD_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Delete every user on the server and empty the local list.
    pub async fn delete_all(&mut self) -> Outcome {
        let _loading = self.loading.begin();

        match self.api.delete_users().await {
            Ok(()) => {
                info!(cleared = self.users.len(), "users deleted");
                self.users.clear();
                self.notifier.set(MSG_USERS_DELETED);
                Outcome::Succeeded
            }
            Err(e) => {
                error!(error = %e, detail = %e.detail(), "users delete failed");
                self.notifier.set(MSG_DELETE_FAILED);
                Outcome::Failed
            }
        }
    }
}
