use std::sync::Arc;

use crate::cache::ModuleCache;

/// Shared state handed to every command and event listener
pub struct Data {
    pub config: Arc<config::Config>,
    pub modules: Arc<ModuleCache>,
}

/// A single gateway event as seen by a module
pub struct EventHandlerContext<'a> {
    pub serenity_context: &'a serenity::all::Context,
    pub event: &'a serenity::all::FullEvent,
    pub data: &'a Data,
}
