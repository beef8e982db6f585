mod bot_config;
mod command_groups;
mod guild_activation;
mod member_queue;
mod permissions;
mod presence;
mod queue_engine;

use command_groups::*;

use std::env;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use serenity::prelude::*;
use serenity::model::prelude::*;
use serenity::async_trait;
use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::client::{Client, Context, EventHandler};
use serenity::model::{channel::Message, gateway::Ready};
use serenity::framework::standard::{StandardFramework, Configuration, CommandResult, Args, CommandGroup, HelpOptions};
use serenity::framework::standard::{macros::{help, hook}, help_commands};
use serenity::http::Http;
use bot_config::BotConfig;
use queue_engine::QueueEngine;
use presence::Presence;

const CONFIG_PATH_VAR: &str = "QUEUE_BOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

struct Handler {
    is_seeded: AtomicBool
}

impl Handler {
    /// Seed guild state on the first ready only, reconnects deliver ready again and
    /// queue state must survive them. Returns the presence matching the queues.
    fn prepare_ready(&self, engine: &mut QueueEngine, guilds: impl IntoIterator<Item = GuildId>) -> Presence {
        if !self.is_seeded.swap(true, Ordering::Relaxed) {
            engine.seed_all(guilds);
            info!("Seeded queue state for {} guild(s)", engine.known_guilds());
        }
        Presence::for_queues(engine.any_enabled())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected as {}", ready.user.name);
        let presence = match queue_engine(&ctx).await {
            Ok(engine) => {
                let mut engine = engine.lock().await;
                self.prepare_ready(&mut engine, ready.guilds.iter().map(|guild| guild.id))
            }
            Err(why) => {
                error!("Failed to seed guilds: {}", why);
                Presence::Idle
            }
        };
        presence.show(&ctx);
    }
}

#[help]
#[command_not_found_text = "Could not find command: {}"]
#[max_levenshtein_distance(3)]
#[lacking_role = "hide"]
#[lacking_ownership = "hide"]
#[lacking_permissions = "hide"]
#[lacking_conditions = "strike"]
async fn my_help(ctx: &Context, msg: &Message, args: Args, hopt: &'static HelpOptions, groups: &[&'static CommandGroup], owners: HashSet<UserId>) -> CommandResult {
    let _ = help_commands::with_embeds(ctx, msg, args, hopt, groups, owners).await;
    Ok(())
}

#[hook]
async fn after(ctx: &Context, msg: &Message, command_name: &str, command_result: CommandResult) {
    if let Err(why) = command_result {
        error!("Command '{}' returned error {}", command_name, why);
        let embed = CreateEmbed::new()
            .color((255, 15, 15))
            .title("Error during running a command")
            .description(format!("Error occured while running command `{}`:\n{}", command_name, why))
            .footer(CreateEmbedFooter::new("Please contact the bot maintainer if this keeps happening"));
        if let Err(why_echo) = msg.channel_id.send_message(&ctx.http, CreateMessage::new().embed(embed)).await {
            error!("Error sending command error report: {}", why_echo);
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(why) = SimpleLogger::new().with_level(LevelFilter::Info).env().init() {
        eprintln!("Failed to initialize logger: {}", why);
    }

    let config_path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let config = match BotConfig::load(&config_path) {
        Ok(config) => config,
        Err(why) => {
            error!("Could not load config from {}: {}", config_path, why);
            return
        }
    };

    let http = Http::new(&config.token);
    let bot_id = match http.get_current_user().await {
        Ok(user) => user.id,
        Err(why) => {
            error!("Could not access the bot id: {:?}", why);
            return
        }
    };

    let framework = StandardFramework::new()
        .after(after)
        .help(&MY_HELP)
        .group(&TUTOR_GROUP)
        .group(&QUEUE_GROUP);
    framework.configure(Configuration::new()
        .on_mention(Some(bot_id))
        .prefix(config.prefix.as_str()));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = match Client::builder(&config.token, intents)
        .event_handler(Handler{
            is_seeded: AtomicBool::new(false)
        })
        .framework(framework)
        .await {
        Ok(client) => client,
        Err(why) => {
            error!("Err creating client: {:?}", why);
            return
        }
    };

    {
        let mut client_data = client.data.write().await;
        client_data.insert::<QueueEngine>(Arc::new(Mutex::new(QueueEngine::new(config.roles, config.prefix))));
    }

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::bot_config::{RoleSet, TUTOR_ROLE};
    use crate::member_queue::Participant;
    use crate::permissions::RoleName;
    use crate::queue_engine::{Actor, QueueCommand};

    const GUILD: GuildId = GuildId::new(1);

    fn engine_with_open_queue() -> QueueEngine {
        let mut roles = HashMap::new();
        roles.insert(TUTOR_ROLE.to_string(), vec![RoleName::from("Tutor")]);
        let mut engine = QueueEngine::new(RoleSet::new(roles), "$");
        let tutor = Actor{
            participant: Participant::new(UserId::new(10), "tutor"),
            roles: HashSet::from([RoleName::from("Tutor")]),
            voice_channel: None
        };
        engine.dispatch(GUILD, &tutor, QueueCommand::Start, &HashMap::<UserId, String>::new());
        engine
    }

    #[test]
    fn first_ready_seeds_and_goes_idle() {
        let handler = Handler{is_seeded: AtomicBool::new(false)};
        let mut engine = engine_with_open_queue();
        assert_eq!(handler.prepare_ready(&mut engine, [GUILD, GuildId::new(2)]), Presence::Idle);
        assert_eq!(engine.known_guilds(), 2);
        assert!(!engine.any_enabled());
    }

    #[test]
    fn reconnect_keeps_open_queues_and_watching() {
        let handler = Handler{is_seeded: AtomicBool::new(true)};
        let mut engine = engine_with_open_queue();
        assert_eq!(handler.prepare_ready(&mut engine, [GUILD, GuildId::new(2)]), Presence::Watching);
        assert!(engine.any_enabled());
        assert_eq!(engine.known_guilds(), 1);
    }
}
