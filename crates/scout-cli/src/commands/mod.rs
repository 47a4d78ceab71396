use scout_config::ScoutConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod auth;
pub mod extract;
pub mod profile;
pub mod research;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    config: &ScoutConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Research(args) => research::handle(&args, config, flags).await,
        Commands::Profile(args) => profile::handle(&args, config, flags).await,
        Commands::Extract(args) => extract::handle(&args, config, flags).await,
        Commands::Auth { action } => auth::handle(&action, config, flags).await,
    }
}
