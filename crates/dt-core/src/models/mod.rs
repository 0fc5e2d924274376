pub mod identity;
pub mod permission;
pub mod role;
