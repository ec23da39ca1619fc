pub mod cache;
pub mod data;
pub mod modules;
pub mod permission_checks;
pub mod summary;

pub use crate::modules::Module;
pub use data::{Data, EventHandlerContext};

pub type Error = Box<dyn std::error::Error + Send + Sync>; // This is constant and should be copy pasted
pub type Command = poise::Command<Data, Error>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
