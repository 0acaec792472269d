//! CLI argument definitions using clap
//!
//! Commands:
//! - whm-provisioner test-connection
//! - whm-provisioner list-packages [--json]
//! - whm-provisioner remove-orphan <username>
//! - whm-provisioner describe

use clap::{Args, Parser, Subcommand};
use whm_provisioner_client::{CredentialValidationError, Credentials};

/// Operator tool for the WHM provisioning adapter
#[derive(Parser, Debug)]
#[command(name = "whm-provisioner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings, from flags or the environment.
#[derive(Args, Debug)]
pub struct ServerArgs {
    /// WHM base URL including scheme and port
    #[arg(long, env = "WHM_HOSTNAME", global = true)]
    pub hostname: Option<String>,

    /// WHM API user
    #[arg(long = "user", env = "WHM_API_USER", global = true, default_value = "root")]
    pub api_user: String,

    /// WHM API token
    #[arg(long = "token", env = "WHM_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,
}

impl ServerArgs {
    /// Validated credentials; a missing flag reports the same error as an
    /// empty one.
    pub fn credentials(&self) -> Result<Credentials, CredentialValidationError> {
        Credentials::new(
            self.hostname.as_deref().unwrap_or_default(),
            &self.api_user,
            self.api_token.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the server is reachable and accepts the token
    TestConnection,

    /// List the plans configured on the server
    ListPackages {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a control-panel account left behind by a failed provisioning
    RemoveOrphan {
        /// Control-panel username
        username: String,
    },

    /// Print the extension metadata and server setup fields as JSON
    Describe,
}
