mod bot;
mod module_list;
mod register;
mod tester;

use clap::{Parser, Subcommand};
use log::error;

#[derive(Parser, Debug)]
#[command(version, about = "Community autorole bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Connect to Discord and run the bot (the default)
    Bot,
    /// Validate the configuration and modules without connecting
    Tester,
    /// Print the loaded modules as JSON
    Modules,
    /// Register slash commands in the configured guild over HTTP, then exit
    Register,
}

pub async fn cmd_loader() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Bot) {
        Command::Bot => bot::start().await,
        Command::Tester => tester::run_tester(),
        Command::Modules => module_list::print_modules(),
        Command::Register => register::register_poise_commands().await,
    }
}

/// Reads the logging options, exiting on invalid values
fn load_log_config() -> config::LogConfig {
    let _ = dotenvy::dotenv();

    match config::LogConfig::from_env() {
        Ok(log_config) => log_config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Loads the bot config, logging the error and exiting with status 1 if it is missing or invalid
fn load_config() -> config::Config {
    match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Loads and validates every module, exiting with status 1 on the first failure
fn load_modules(config: &config::Config) -> ::modules::cache::ModuleCache {
    let module_cache = match ::modules::cache::ModuleCache::new(bot_modules_default::modules()) {
        Ok(module_cache) => module_cache,
        Err(e) => {
            error!("Failed to load modules: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = module_cache.validate(config) {
        error!("Failed to load modules: {}", e);
        std::process::exit(1);
    }

    module_cache
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_running_the_bot() {
        let cli = Cli::try_parse_from(["autorole_bot"]).unwrap();
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["autorole_bot", "tester"]).unwrap();
        assert_eq!(cli.command, Some(Command::Tester));

        assert!(Cli::try_parse_from(["autorole_bot", "migrate"]).is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
