use clap::Parser;
use screen_schema::cli::commands::{cmd_discover, cmd_run};
use screen_schema::cli::config::{Cli, Commands, init_logging, load_config, resolve_settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());
    let settings = resolve_settings(&cli, &config);

    match cli.command {
        Commands::Discover {
            transaction,
            window,
            format,
            keep_open,
        } => {
            cmd_discover(&settings, &transaction, window, &format, keep_open)?;
        }
        Commands::Run { job, format } => {
            let all_passed = cmd_run(&settings, &job, &format)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
