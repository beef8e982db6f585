use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use log::warn;
use serenity::prelude::*;
use serenity::model::prelude::*;
use serenity::framework::standard::CommandResult;
use thiserror::Error;
use crate::member_queue::Participant;
use crate::permissions::RoleName;
use crate::presence::Presence;
use crate::queue_engine::{Actor, QueueCommand, QueueEngine, Response, SideEffect};

#[derive(Debug, Error)]
pub enum QueueCommandError {
    #[error("Queue commands only work on a server")]
    NotInGuild,
    #[error("Can't move {0}: you are not connected to a voice channel")]
    NotInVoiceChannel(String),
    #[error("Queue state is not initialized")]
    EngineMissing
}

pub async fn queue_engine(ctx: &Context) -> Result<Arc<Mutex<QueueEngine>>, QueueCommandError> {
    let data = ctx.data.read().await;
    data.get::<QueueEngine>().map(Arc::clone).ok_or(QueueCommandError::EngineMissing)
}

/// Nickname on the server, falling back to the account name
fn display_name(msg: &Message) -> String {
    msg.member.as_ref()
        .and_then(|member| member.nick.clone())
        .unwrap_or_else(|| msg.author.name.clone())
}

/// Collect role names and voice channel of the author from the cache
fn actor_from_message(ctx: &Context, msg: &Message, guild_id: GuildId) -> Actor {
    let role_ids = msg.member.as_ref().map(|member| member.roles.as_slice()).unwrap_or_default();
    let (roles, voice_channel) = match guild_id.to_guild_cached(&ctx.cache) {
        Some(guild) => (
            role_ids.iter()
                .filter_map(|role_id| guild.roles.get(role_id))
                .map(|role| RoleName::new(role.name.clone()))
                .collect::<HashSet<RoleName>>(),
            guild.voice_states.get(&msg.author.id).and_then(|state| state.channel_id)
        ),
        None => {
            warn!("Guild {} is not cached, treating {} as having no roles", guild_id, msg.author.id);
            (HashSet::new(), None)
        }
    };
    Actor{participant: Participant::new(msg.author.id, display_name(msg)), roles, voice_channel}
}

/// Current names of the guild's cached members, for rendering the queue
fn cached_names(ctx: &Context, guild_id: GuildId) -> HashMap<UserId, String> {
    guild_id.to_guild_cached(&ctx.cache)
        .map(|guild| guild.members.iter()
            .map(|(user_id, member)| (*user_id, member.nick.clone().unwrap_or_else(|| member.user.name.clone())))
            .collect())
        .unwrap_or_default()
}

/// Run a queue command for the message author and deliver the response
pub async fn run_queue_command(ctx: &Context, msg: &Message, command: QueueCommand) -> CommandResult {
    let guild_id = msg.guild_id.ok_or(QueueCommandError::NotInGuild)?;
    let actor = actor_from_message(ctx, msg, guild_id);
    let names = match command {
        QueueCommand::Next | QueueCommand::Ls => cached_names(ctx, guild_id),
        _ => HashMap::new()
    };
    let engine = queue_engine(ctx).await?;
    // State is read and written in one step, before anything is sent
    let (response, any_enabled) = {
        let mut engine = engine.lock().await;
        let response = engine.dispatch(guild_id, &actor, command, &names);
        (response, engine.any_enabled())
    };
    let Some(response) = response else {
        return Ok(())
    };
    if matches!(command, QueueCommand::Start | QueueCommand::Stop) {
        Presence::for_queues(any_enabled).show(ctx);
    }
    deliver(ctx, msg, guild_id, response).await
}

async fn deliver(ctx: &Context, msg: &Message, guild_id: GuildId, response: Response) -> CommandResult {
    msg.channel_id.say(&ctx.http, &response.text).await?;
    if let Some(SideEffect::MoveParticipant{participant, to_channel}) = response.side_effect {
        let channel = to_channel.ok_or_else(|| QueueCommandError::NotInVoiceChannel(participant.display_name.clone()))?;
        guild_id.move_member(ctx, participant.user_id, channel).await?;
    }
    Ok(())
}
