pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::identity::{Identity, editable_identities};
pub use models::permission::Permission;
pub use models::role::Role;

#[cfg(test)]
mod tests;
