use std::io::Write;

use config::LogConfig;
use log::{error, warn, LevelFilter};
use modules::{Context, Data, Error};

use crate::logfile::{rolling_file, Tee};

const DEFAULT_FILTER: &str = "serenity=error,poise=warn,tracing=warn,autorole_bot=info,modules=info,bot_modules_core=info,bot_modules_autoroles=info";

/// Standard error handler
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error,);

            let err = ctx
                .send(
                    poise::CreateReply::default()
                        .embed(
                            serenity::all::CreateEmbed::new()
                                .color(serenity::all::Color::RED)
                                .title("An error has occurred")
                                .description(error.to_string()),
                        )
                        .ephemeral(true),
                )
                .await;

            if let Err(e) = err {
                error!("Message send error for FrameworkError::Command: {}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            let description = match error {
                Some(error) => {
                    error!(
                        "Check failed for command `{}`: {:?}",
                        ctx.command().qualified_name,
                        error,
                    );
                    error.to_string()
                }
                None => "You do not have permission to use this command".to_string(),
            };

            let err = ctx
                .send(
                    poise::CreateReply::default()
                        .embed(
                            serenity::all::CreateEmbed::new()
                                .color(serenity::all::Color::RED)
                                .title("Command Check Failed")
                                .description(description),
                        )
                        .ephemeral(true),
                )
                .await;

            if let Err(e) = err {
                error!(
                    "Message send error for FrameworkError::CommandCheckFailed: {}",
                    e
                );
            }
        }
        poise::FrameworkError::CommandPanic { payload, ctx, .. } => {
            error!(
                "Command `{}` panicked: {:?}",
                ctx.command().qualified_name,
                payload,
            );

            let err = ctx
                .send(
                    poise::CreateReply::default()
                        .embed(
                            serenity::all::CreateEmbed::new()
                                .color(serenity::all::Color::RED)
                                .title("Command Panic")
                                .description(format!(
                                    "The command panicked.\n\n```{}```",
                                    payload.unwrap_or("No payload provided".to_string())
                                )),
                        )
                        .ephemeral(true),
                )
                .await;

            if let Err(e) = err {
                error!("Message send error for FrameworkError::CommandPanic: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Runs the permission check the owning module registered for the invoked command
pub async fn command_check(ctx: Context<'_>) -> Result<bool, Error> {
    if modules::permission_checks::is_from_dm(ctx) {
        return Err("This command can only be run from servers".into());
    }

    let member_perms = modules::permission_checks::member_permissions(ctx).await?;

    modules::permission_checks::check_command(
        &ctx.data().modules,
        &ctx.command().qualified_name,
        ctx.author().id,
        member_perms,
    )?;

    Ok(true)
}

/// Parses `DEBUG_OPTS` (`target=level,target,...`). A bare target means `debug`.
///
/// Returns the parsed filters and the entries that could not be parsed.
pub fn parse_debug_opts(debug_opts: &str) -> (Vec<(String, LevelFilter)>, Vec<String>) {
    let mut filters = Vec::new();
    let mut invalid = Vec::new();

    for opt in debug_opts.split(',') {
        let opt = opt.trim();

        if opt.is_empty() {
            continue;
        }

        let (target, level) = match opt.split_once('=') {
            Some((target, level)) => (target.trim(), level.trim()),
            None => (opt, "debug"),
        };

        let level = match level {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => {
                invalid.push(opt.to_string());
                continue;
            }
        };

        if target.is_empty() {
            invalid.push(opt.to_string());
            continue;
        }

        filters.push((target.to_string(), level));
    }

    (filters, invalid)
}

/// Sets up env_logger to write to stderr and the rotating log file
pub fn setup_logging(log_config: &LogConfig) -> Result<(), Error> {
    let mut env_builder = env_logger::builder();

    env_builder
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{}] ({}) {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .parse_filters(DEFAULT_FILTER)
        .filter(None, LevelFilter::Info);

    // Set custom log levels
    let (filters, invalid) = parse_debug_opts(&log_config.debug_opts);

    for (target, level) in filters {
        env_builder.filter(Some(&target), level);
    }

    if log_config.debug {
        env_builder.filter(None, LevelFilter::Debug);
    } else {
        env_builder.filter(None, LevelFilter::Error);
    }

    let file = rolling_file(&log_config.file, log_config.retention_days).map_err(|e| {
        format!(
            "Could not open log file {}: {}",
            log_config.file.display(),
            e
        )
    })?;

    env_builder
        .target(env_logger::Target::Pipe(Box::new(Tee::new(file))))
        .try_init()?;

    for opt in invalid {
        warn!("Ignoring invalid DEBUG_OPTS entry: {}", opt);
    }

    Ok(())
}
