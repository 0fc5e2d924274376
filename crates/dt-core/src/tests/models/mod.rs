mod identity;
mod permission;
mod role;
