use log::info;

/// Validates the config and the modules without connecting to Discord
pub fn run_tester() {
    let log_config = super::load_log_config();

    env_logger::builder()
        .filter(None, log::LevelFilter::Info)
        .parse_filters(&log_config.debug_opts)
        .init();

    let config = super::load_config();

    info!(
        "Config OK: {} autorole message(s) in channel {}",
        config.autoroles.len(),
        config.autoroles_channel_id
    );

    for (message_id, roles) in config.autoroles.messages() {
        info!("Message {} maps {} emoji", message_id, roles.len());
    }

    let module_cache = super::load_modules(&config);

    info!(
        "Modules OK: {} module(s), {} command(s)",
        module_cache.module_cache.len(),
        module_cache.command_id_permission_check_map.len()
    );
}
