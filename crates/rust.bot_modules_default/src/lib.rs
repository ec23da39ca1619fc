use modules::Module;

/// List of modules to load, in registration order
pub fn modules() -> Vec<Box<dyn Module>> {
    vec![
        Box::new(bot_modules_core::Module),
        Box::new(bot_modules_autoroles::Module),
    ]
}
