use serenity::client::Context;
use serenity::framework::standard::macros::{command, group};
use serenity::framework::standard::CommandResult;
use serenity::model::channel::Message;
use crate::queue_engine::QueueCommand;
use super::invocation::run_queue_command;

/// Whether the queue is open right now
#[command]
async fn status(ctx: &Context, msg: &Message) -> CommandResult {
    run_queue_command(ctx, msg, QueueCommand::Status).await
}

/// Join the queue, or show your position if you already did
#[command]
async fn wait(ctx: &Context, msg: &Message) -> CommandResult {
    run_queue_command(ctx, msg, QueueCommand::Wait).await
}

/// Leave the queue
#[command]
async fn leave(ctx: &Context, msg: &Message) -> CommandResult {
    run_queue_command(ctx, msg, QueueCommand::Leave).await
}

#[group]
#[only_in(guilds)]
#[commands(status, wait, leave)]
#[summary("Waiting in line")]
struct Queue;
