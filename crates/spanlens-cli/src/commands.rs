use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::config::{Config, resolve_data_dir};
use crate::handlers;
use crate::logging;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let config = Config::load_from(&Config::path_in(&data_dir))?;
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    match cli.command {
        Commands::Compare {
            path,
            session,
            context_chars,
        } => handlers::compare::handle(
            &path,
            session.as_deref(),
            context_chars,
            &config,
            cli.format,
        ),

        Commands::Analyze { path, backend } => handlers::analyze::handle(
            path.as_deref(),
            &data_dir,
            backend.map(Into::into).or(config.backend),
            cli.format,
        ),

        Commands::Reconstruct {
            path,
            output,
            backend,
        } => handlers::reconstruct::handle(
            path.as_deref(),
            output,
            &data_dir,
            backend.map(Into::into).or(config.backend),
            cli.format,
        ),
    }
}
