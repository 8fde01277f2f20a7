use anyhow::Result;
use techradar::cli::{self, Commands};
use techradar::commands::{self, DeltaConfig, RunConfig, SensitivityConfig};

fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    match cli.command {
        Commands::Run {
            input,
            period,
            previous,
            as_of,
            output,
            no_sensitivity,
            top,
        } => commands::handle_run(RunConfig {
            config_path: cli.config,
            input,
            period,
            previous,
            as_of,
            output,
            sensitivity: !no_sensitivity,
            top,
        }),
        Commands::Delta {
            current,
            previous,
            output,
        } => commands::handle_delta(DeltaConfig {
            current,
            previous,
            output,
        }),
        Commands::Sensitivity { snapshot, output } => {
            commands::handle_sensitivity(SensitivityConfig {
                config_path: cli.config,
                snapshot,
                output,
            })
        }
        Commands::Init { force } => commands::init_config(&cli.config, force),
    }
}
