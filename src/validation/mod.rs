//! Checks proposed account edits before the registry applies them.

pub use self::error::{ValidationError, ValidationErrorType};
pub use self::validator::{AccountUpdate, AccountValidator};
pub(crate) use self::validator::ValidUpdate;

mod error;
mod validator;
mod rules {
    pub mod names;
    pub mod numbers;
}
