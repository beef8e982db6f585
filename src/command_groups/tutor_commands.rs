use serenity::client::Context;
use serenity::framework::standard::macros::{command, group};
use serenity::framework::standard::CommandResult;
use serenity::model::channel::Message;
use crate::queue_engine::QueueCommand;
use super::invocation::run_queue_command;

/// Open the queue on this server
#[command]
async fn start(ctx: &Context, msg: &Message) -> CommandResult {
    run_queue_command(ctx, msg, QueueCommand::Start).await
}

/// Close the queue and send everyone waiting home
#[command]
async fn stop(ctx: &Context, msg: &Message) -> CommandResult {
    run_queue_command(ctx, msg, QueueCommand::Stop).await
}

/// Move the next member into your voice channel
#[command]
async fn next(ctx: &Context, msg: &Message) -> CommandResult {
    run_queue_command(ctx, msg, QueueCommand::Next).await
}

/// List everyone waiting
#[command]
async fn ls(ctx: &Context, msg: &Message) -> CommandResult {
    run_queue_command(ctx, msg, QueueCommand::Ls).await
}

/// Queue moderation, for tutors only
#[group]
#[only_in(guilds)]
#[commands(start, stop, next, ls)]
#[summary("Queue moderation")]
struct Tutor;
