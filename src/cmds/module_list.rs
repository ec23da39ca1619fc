use modules::summary::ModuleSummary;

/// Prints every module and its commands as JSON, without needing any config
pub fn print_modules() {
    let Ok(module_cache) = modules::cache::ModuleCache::new(bot_modules_default::modules()) else {
        eprintln!("Failed to load modules");
        std::process::exit(1);
    };

    let summaries = module_cache
        .modules()
        .map(|module| ModuleSummary::of(module.as_ref()))
        .collect::<Vec<_>>();

    match serde_json::to_string_pretty(&summaries) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize modules: {}", e);
            std::process::exit(1);
        }
    }
}
