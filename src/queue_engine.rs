use std::collections::HashSet;
use std::sync::Arc;
use log::{debug, info};
use serenity::prelude::*;
use serenity::model::prelude::*;
use strum::AsRefStr;
use thiserror::Error;
use crate::bot_config::{RoleSet, TUTOR_ROLE};
use crate::guild_activation::GuildActivation;
use crate::member_queue::{DisplayNames, Participant, QueueStore};
use crate::permissions::{has_access, RoleName};

/// Queue commands by the name they are invoked with
#[derive(Debug, AsRefStr, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "lowercase")]
pub enum QueueCommand {
    Start,
    Stop,
    Next,
    Ls,
    Status,
    Wait,
    Leave
}

/// Member invoking a command, as seen at the time of invocation
#[derive(Debug, Clone)]
pub struct Actor {
    pub participant: Participant,
    pub roles: HashSet<RoleName>,
    pub voice_channel: Option<ChannelId>,
}

impl Actor {
    pub fn name(&self) -> &str {
        &self.participant.display_name
    }
}

/// Something the transport has to carry out after sending the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// `to_channel` is the admin's voice channel at command time, if they were connected to one
    MoveParticipant {
        participant: Participant,
        to_channel: Option<ChannelId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub side_effect: Option<SideEffect>,
}

impl Response {
    fn text(text: impl Into<String>) -> Self {
        Self{text: text.into(), side_effect: None}
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Hello {name}. The queue is currently closed. It can be opened with `{prefix}{}`.", QueueCommand::Start.as_ref())]
    QueueClosed { name: String, prefix: String },
    #[error("Hello {name}, you are not in the queue right now. You can join it with `{prefix}{}`.", QueueCommand::Wait.as_ref())]
    NotInQueue { name: String, prefix: String },
    #[error("The queue is empty :(")]
    EmptyQueue,
    #[error("Access denied")]
    AccessDenied
}

/// Owns all queue state of the process
pub struct QueueEngine {
    activation: GuildActivation,
    queues: QueueStore,
    roles: RoleSet,
    prefix: String,
}

impl TypeMapKey for QueueEngine {
    type Value = Arc<Mutex<QueueEngine>>;
}

impl QueueEngine {
    pub fn new(roles: RoleSet, prefix: impl Into<String>) -> Self {
        Self{activation: GuildActivation::new(), queues: QueueStore::new(), roles, prefix: prefix.into()}
    }

    /// Startup hook: every listed guild starts with a disabled queue
    pub fn seed_all(&mut self, guilds: impl IntoIterator<Item = GuildId>) {
        self.activation.seed_all(guilds, false);
    }

    pub fn any_enabled(&self) -> bool {
        self.activation.any_enabled()
    }

    pub fn known_guilds(&self) -> usize {
        self.activation.len()
    }

    /// Run a command. `None` means the actor was silently refused.
    /// Waiting members are rendered under the names `names` resolves for them.
    pub fn dispatch(&mut self, guild_id: GuildId, actor: &Actor, command: QueueCommand, names: &impl DisplayNames) -> Option<Response> {
        debug!("Running `{}` for {} in guild {}", command.as_ref(), actor.participant.user_id, guild_id);
        let result = match command {
            QueueCommand::Start => self.open(guild_id, actor),
            QueueCommand::Stop => self.close(guild_id, actor),
            QueueCommand::Next => self.advance(guild_id, actor, names),
            QueueCommand::Ls => self.list(guild_id, actor, names),
            QueueCommand::Status => Ok(self.status(guild_id)),
            QueueCommand::Wait => self.enqueue(guild_id, actor),
            QueueCommand::Leave => self.dequeue(guild_id, actor)
        };
        match result {
            Ok(response) => Some(response),
            Err(QueueError::AccessDenied) => None,
            Err(why) => Some(Response::text(why.to_string()))
        }
    }

    fn require_tutor(&self, actor: &Actor) -> Result<(), QueueError> {
        if has_access(&actor.roles, self.roles.required(TUTOR_ROLE)) {
            Ok(())
        } else {
            Err(QueueError::AccessDenied)
        }
    }

    fn require_open(&mut self, guild_id: GuildId, actor: &Actor) -> Result<(), QueueError> {
        if self.activation.is_enabled(guild_id) {
            Ok(())
        } else {
            Err(QueueError::QueueClosed{name: actor.name().into(), prefix: self.prefix.clone()})
        }
    }

    pub fn open(&mut self, guild_id: GuildId, actor: &Actor) -> Result<Response, QueueError> {
        self.require_tutor(actor)?;
        self.activation.set_enabled(guild_id, true);
        info!("Queue opened in guild {} by {}", guild_id, actor.participant.user_id);
        Ok(Response::text("The queue is now open."))
    }

    pub fn close(&mut self, guild_id: GuildId, actor: &Actor) -> Result<Response, QueueError> {
        self.require_tutor(actor)?;
        self.activation.set_enabled(guild_id, false);
        let had_queue = self.queues.drop_queue(guild_id);
        info!("Queue closed in guild {} by {}", guild_id, actor.participant.user_id);
        Ok(Response::text(if had_queue {
            "The queue is now closed."
        } else {
            "The queue is now closed. It had not been opened yet."
        }))
    }

    pub fn advance(&mut self, guild_id: GuildId, actor: &Actor, names: &impl DisplayNames) -> Result<Response, QueueError> {
        self.require_tutor(actor)?;
        self.require_open(guild_id, actor)?;
        let advanced = self.queues.advance(guild_id).ok_or(QueueError::EmptyQueue)?;
        let next_up = match &advanced.next_up {
            Some(next) => next.user_id.mention().to_string(),
            None => "nobody".into()
        };
        info!("Serving {} in guild {}", advanced.served.user_id, guild_id);
        Ok(Response{
            text: format!("{} is being served, next up: {}", advanced.served.current_name(names), next_up),
            side_effect: Some(SideEffect::MoveParticipant{participant: advanced.served, to_channel: actor.voice_channel})
        })
    }

    pub fn list(&mut self, guild_id: GuildId, actor: &Actor, names: &impl DisplayNames) -> Result<Response, QueueError> {
        self.require_tutor(actor)?;
        self.require_open(guild_id, actor)?;
        let lines = self.queues.members(guild_id)
            .enumerate()
            .map(|(index, participant)| format!("{}. {}", index + 1, participant.current_name(names)))
            .collect::<Vec<String>>();
        if lines.is_empty() {
            Ok(Response::text("Nobody is waiting in the queue right now!"))
        } else {
            Ok(Response::text(lines.join("\n")))
        }
    }

    pub fn status(&mut self, guild_id: GuildId) -> Response {
        Response::text(if self.activation.is_enabled(guild_id) {
            "The queue is open"
        } else {
            "The queue is closed"
        })
    }

    pub fn enqueue(&mut self, guild_id: GuildId, actor: &Actor) -> Result<Response, QueueError> {
        self.require_open(guild_id, actor)?;
        let position = self.queues.enqueue(guild_id, actor.participant.clone());
        debug!("{} member(s) waiting in guild {}", self.queues.len(guild_id), guild_id);
        Ok(Response::text(format!("Hello {}, you are currently at position {}. Use `{}{}` to see your position again.",
            actor.name(), position, self.prefix, QueueCommand::Wait.as_ref())))
    }

    pub fn dequeue(&mut self, guild_id: GuildId, actor: &Actor) -> Result<Response, QueueError> {
        self.require_open(guild_id, actor)?;
        if self.queues.remove(guild_id, actor.participant.user_id) {
            Ok(Response::text(format!("Hello {}, you have left the queue.", actor.name())))
        } else {
            Err(QueueError::NotInQueue{name: actor.name().into(), prefix: self.prefix.clone()})
        }
    }
}
