use std::sync::{Arc, LazyLock};

use log::{debug, error, info};
use modules::{Data, Error, EventHandlerContext};
use serenity::all::FullEvent;

pub struct ConnectState {
    pub ready: dashmap::DashMap<serenity::all::ShardId, bool>,
}

pub static CONNECT_STATE: LazyLock<ConnectState> = LazyLock::new(|| ConnectState {
    ready: dashmap::DashMap::new(),
});

async fn event_listener(
    ctx: &serenity::all::Context,
    event: &FullEvent,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::InteractionCreate { interaction } => {
            if !CONNECT_STATE.ready.contains_key(&ctx.shard_id) {
                return Ok(()); // Ignore interactions if the bot is not ready
            }

            debug!("Interaction received: {:?}", interaction.id());
        }
        FullEvent::Ready { data_about_bot } => {
            info!(
                "Logged in as {} (ID: {}) on shard {}",
                data_about_bot.user.name, data_about_bot.user.id, ctx.shard_id
            );

            CONNECT_STATE.ready.insert(ctx.shard_id, true);
        }
        _ => {}
    }

    let ectx = EventHandlerContext {
        serenity_context: ctx,
        event,
        data,
    };

    for module in data.modules.modules() {
        if let Err(e) = module.event_listener(&ectx).await {
            error!("Error in event listener of module {}: {}", module.id(), e);
        }
    }

    Ok(())
}

/// Hands the user data to the framework whatever the registration result.
///
/// A setup error would leave poise without user data, stalling every event listener.
fn after_registration<T, E: std::fmt::Display>(
    data: T,
    registration: Result<(), E>,
    guild_id: serenity::all::GuildId,
) -> T {
    if let Err(e) = registration {
        error!(
            "Failed to register commands in guild {}, continuing without them: {}",
            guild_id, e
        );
    }

    data
}

pub async fn start() {
    let log_config = super::load_log_config();

    if let Err(e) = crate::binutils::setup_logging(&log_config) {
        eprintln!("Could not set up logging: {}", e);
        std::process::exit(1);
    }

    let config = super::load_config();
    info!("{:#?}", config);

    let module_cache = super::load_modules(&config);

    for module in module_cache.modules() {
        info!("Loaded module {}", module.id());
    }

    let guild_id = config.guild_id;
    let token = config.token.clone();

    let data = Data {
        config: Arc::new(config),
        modules: Arc::new(module_cache),
    };

    let mut intents = serenity::all::GatewayIntents::all();

    // Remove the really spammy intents
    intents.remove(serenity::all::GatewayIntents::GUILD_PRESENCES); // Don't even have the privileged gateway intent for this
    intents.remove(serenity::all::GatewayIntents::GUILD_MESSAGE_TYPING); // Don't care about typing
    intents.remove(serenity::all::GatewayIntents::DIRECT_MESSAGE_TYPING); // Don't care about typing
    intents.remove(serenity::all::GatewayIntents::DIRECT_MESSAGES); // Don't care about DMs

    let framework_opts = poise::FrameworkOptions {
        event_handler: |ctx, event, _framework, data| Box::pin(event_listener(ctx, event, data)),
        commands: data.modules.commands(),
        command_check: Some(|ctx| Box::pin(crate::binutils::command_check(ctx))),
        pre_command: |ctx| {
            Box::pin(async move {
                info!(
                    "Executing command {} for user {} ({})...",
                    ctx.command().qualified_name,
                    ctx.author().name,
                    ctx.author().id
                );
            })
        },
        post_command: |ctx| {
            Box::pin(async move {
                info!(
                    "Done executing command {} for user {} ({})...",
                    ctx.command().qualified_name,
                    ctx.author().name,
                    ctx.author().id
                );
            })
        },
        on_error: |error| Box::pin(crate::binutils::on_error(error)),
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .options(framework_opts)
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!(
                    "Registering {} commands in guild {}",
                    framework.options().commands.len(),
                    guild_id
                );

                let registration = poise::builtins::register_in_guild(
                    ctx,
                    &framework.options().commands,
                    guild_id,
                )
                .await;

                Ok(after_registration(data, registration, guild_id))
            })
        })
        .build();

    let client = serenity::all::ClientBuilder::new(token, intents)
        .framework(framework)
        .await;

    let mut client = match client {
        Ok(client) => client,
        Err(e) => {
            error!("Error creating client: {}", e);
            std::process::exit(1);
        }
    };

    info!("Connecting to Discord");

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
        std::process::exit(1); // Clean exit with status code of 1
    }
}
