use url::Url;

use super::MitakeError;
use crate::domain::{Password, Username};

/// Environment variable consulted for the username when none is given.
pub const USERNAME_ENV: &str = "MITAKE_USERNAME";
/// Environment variable consulted for the password when none is given.
pub const PASSWORD_ENV: &str = "MITAKE_PASSWORD";

#[derive(Debug, Clone)]
/// Mitake account credentials, resolved once and then read-only.
///
/// Each half is taken from the explicit value when one is given (and not blank),
/// otherwise from its environment variable. If either half is still missing,
/// resolution fails with [`MitakeError::Authentication`].
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Use exactly these values; the environment is not consulted.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, MitakeError> {
        Self::resolve_with(Some(username.into()), Some(password.into()), |_| None)
    }

    /// Read both values from `MITAKE_USERNAME` / `MITAKE_PASSWORD`.
    pub fn from_env() -> Result<Self, MitakeError> {
        Self::resolve(None, None)
    }

    /// Explicit values first, then the process environment.
    pub fn resolve(
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, MitakeError> {
        Self::resolve_with(username, password, |key| std::env::var(key).ok())
    }

    /// Explicit values first, then `lookup` (called with the variable name).
    pub fn resolve_with<F>(
        username: Option<String>,
        password: Option<String>,
        lookup: F,
    ) -> Result<Self, MitakeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = pick(username, USERNAME_ENV, &lookup);
        let password = pick(password, PASSWORD_ENV, &lookup);

        match (username, password) {
            (Some(username), Some(password)) => Ok(Self {
                username: Username::new(username).map_err(|_| missing_credentials())?,
                password: Password::new(password).map_err(|_| missing_credentials())?,
            }),
            _ => Err(missing_credentials()),
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub(crate) fn push_form_params(&self, params: &mut Vec<(String, String)>) {
        params.push((Username::FIELD.to_owned(), self.username.as_str().to_owned()));
        params.push((Password::FIELD.to_owned(), self.password.as_str().to_owned()));
    }

    pub(crate) fn push_query_params(&self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair(Username::FIELD, self.username.as_str())
            .append_pair(Password::FIELD, self.password.as_str());
    }
}

fn pick<F>(explicit: Option<String>, key: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|value| !value.trim().is_empty())
        .or_else(|| lookup(key).filter(|value| !value.trim().is_empty()))
}

fn missing_credentials() -> MitakeError {
    MitakeError::Authentication {
        message: format!(
            "username and password are required; pass them explicitly or set {USERNAME_ENV}/{PASSWORD_ENV}"
        ),
        status_code: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let creds = Credentials::resolve_with(
            Some("user".to_owned()),
            Some("pass".to_owned()),
            env(&[(USERNAME_ENV, "env_user"), (PASSWORD_ENV, "env_pass")]),
        )
        .unwrap();
        assert_eq!(creds.username().as_str(), "user");
        assert_eq!(creds.password().as_str(), "pass");
    }

    #[test]
    fn environment_fills_missing_values() {
        let creds = Credentials::resolve_with(
            None,
            None,
            env(&[(USERNAME_ENV, "env_user"), (PASSWORD_ENV, "env_pass")]),
        )
        .unwrap();
        assert_eq!(creds.username().as_str(), "env_user");
        assert_eq!(creds.password().as_str(), "env_pass");

        let creds = Credentials::resolve_with(
            Some("user".to_owned()),
            Some("   ".to_owned()),
            env(&[(PASSWORD_ENV, "env_pass")]),
        )
        .unwrap();
        assert_eq!(creds.username().as_str(), "user");
        assert_eq!(creds.password().as_str(), "env_pass");
    }

    #[test]
    fn missing_credentials_is_authentication_error() {
        let err = Credentials::resolve_with(None, None, env(&[])).unwrap_err();
        assert!(matches!(
            err,
            MitakeError::Authentication {
                status_code: None,
                ..
            }
        ));
        assert!(err.to_string().contains(USERNAME_ENV));

        let err =
            Credentials::resolve_with(None, None, env(&[(USERNAME_ENV, "env_user")])).unwrap_err();
        assert!(err.is_authentication());

        assert!(Credentials::new("", "pass").unwrap_err().is_authentication());
        assert!(Credentials::new("user", "").unwrap_err().is_authentication());
    }

    #[test]
    fn form_params_carry_both_halves() {
        let creds = Credentials::new("user", "pass").unwrap();
        let mut params = Vec::new();
        creds.push_form_params(&mut params);
        assert_eq!(
            params,
            vec![
                ("username".to_owned(), "user".to_owned()),
                ("password".to_owned(), "pass".to_owned()),
            ]
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::new("user", "hunter2").unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
