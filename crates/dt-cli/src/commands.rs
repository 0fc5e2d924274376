use clap::Subcommand;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        /// Account email address
        identifier: String,
        secret: String,
    },

    /// Sign out and erase the persisted session
    Logout,

    /// Create an account locally and sign it in
    Register {
        email: String,
        secret: String,
        /// Display name
        name: String,
        /// admin, secretary, user or patient
        #[arg(long, default_value = "user")]
        role: String,
    },

    /// Show the current session state
    Whoami,

    /// List known identities
    Users {
        /// Only those the signed-in administrator may edit
        #[arg(long)]
        editable: bool,
    },

    /// Replace an identity's permission set
    Permissions {
        identity_id: String,
        /// Permission names, e.g. view_patients (none clears the set)
        permissions: Vec<String>,
    },

    /// Decide what navigating to a path would do for the current session
    Check { path: String },
}
