//! Decision logic for getting a usable login

use super::{Credentials, LoginInput};
use crate::error::Result;

/// Source of a fresh login when none is stored or the stored one is rejected
pub trait CredentialPrompt {
    /// Ask for a username and a (masked) password
    fn prompt_login(&self) -> Result<LoginInput>;
}

/// What to do with whatever the credential file gave us
#[derive(Debug, PartialEq, Eq)]
pub enum Bootstrap {
    UseStored(Credentials),
    Register,
}

/// Stored credentials are used as-is; no file means the user must register
pub fn plan_bootstrap(stored: Option<Credentials>) -> Bootstrap {
    match stored {
        Some(credentials) => Bootstrap::UseStored(credentials),
        None => Bootstrap::Register,
    }
}
