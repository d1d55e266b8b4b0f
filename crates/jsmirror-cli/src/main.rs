//! CLI entry point - the composition root.
//!
//! Infrastructure is wired together via bootstrap; command dispatch routes
//! to handlers which build pipelines from the `CliContext`.

use std::process::ExitCode;

use clap::Parser;

use jsmirror_cli::{Cli, CliConfig, Commands, bootstrap, exit_code_for, handlers, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

async fn run(mut cli: Cli) -> anyhow::Result<ExitCode> {
    let Some(command) = cli.command.take() else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = CliConfig::from_cli(&cli)?;
    let ctx = bootstrap(config)?;

    match command {
        Commands::Sync {
            libraries,
            libs_file,
            manifest,
            upload,
        } => {
            let args = handlers::sync::SyncArgs {
                libraries,
                libs_file,
                manifest,
                upload,
            };
            let report = handlers::sync::execute(&ctx, args).await?;
            if !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Query { library, manifest } => {
            handlers::query::execute(&ctx, &library, manifest.as_deref()).await?;
        }
        Commands::Manifest => {
            handlers::manifest::execute(&ctx).await?;
        }
        Commands::Upload { config } => {
            handlers::upload::execute(&ctx, &config).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
