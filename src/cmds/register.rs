use log::{error, info};
use serenity::all::HttpBuilder;

/// Registers the slash commands in the configured guild without opening a gateway connection
pub async fn register_poise_commands() {
    let log_config = super::load_log_config();

    if let Err(e) = crate::binutils::setup_logging(&log_config) {
        eprintln!("Could not set up logging: {}", e);
        std::process::exit(1);
    }

    let config = super::load_config();
    let module_cache = super::load_modules(&config);

    info!("Registering poise commands");

    let commands = module_cache.commands();
    let http = HttpBuilder::new(&config.token).build();

    let app = match http.get_current_application_info().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to get application info: {}", e);
            std::process::exit(1);
        }
    };
    http.set_application_id(app.id);

    let commands_builder = poise::builtins::create_application_commands(&commands);
    let num_commands = commands_builder.len();

    info!(
        "Registering {} commands in guild {}",
        num_commands, config.guild_id
    );

    if let Err(e) = config
        .guild_id
        .set_commands(&http, commands_builder)
        .await
    {
        error!("Failed to set guild commands: {}", e);
        std::process::exit(1);
    }
}
