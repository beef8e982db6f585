use std::collections::{HashMap, VecDeque};
use serenity::model::prelude::*;

/// Reference to a guild member waiting in a queue. Equality only looks at the user id.
#[derive(Debug, Clone)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: String,
}

impl Participant {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self{user_id, display_name: display_name.into()}
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}

impl Eq for Participant {}

/// Current display names, looked up when a queue is rendered
pub trait DisplayNames {
    fn display_name(&self, user_id: UserId) -> Option<&str>;
}

impl DisplayNames for HashMap<UserId, String> {
    fn display_name(&self, user_id: UserId) -> Option<&str> {
        self.get(&user_id).map(String::as_str)
    }
}

impl Participant {
    /// Name as it is now, or as it was on joining if it can't be resolved
    pub fn current_name<'a>(&'a self, names: &'a impl DisplayNames) -> &'a str {
        names.display_name(self.user_id).unwrap_or(&self.display_name)
    }
}

/// Result of serving the front of a queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advanced {
    pub served: Participant,
    pub next_up: Option<Participant>,
}

/// Waiting lines, one per guild. A guild only gets a line on its first enqueue.
#[derive(Default)]
pub struct QueueStore {
    queues: HashMap<GuildId, VecDeque<Participant>>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the participant unless already waiting. Returns the 1-based position either way.
    pub fn enqueue(&mut self, guild_id: GuildId, participant: Participant) -> usize {
        if let Some(position) = self.position(guild_id, participant.user_id) {
            return position
        }
        let queue = self.queues.entry(guild_id).or_default();
        queue.push_back(participant);
        queue.len()
    }

    /// Remove the user from any position. Returns false if they were not waiting.
    pub fn remove(&mut self, guild_id: GuildId, user_id: UserId) -> bool {
        let Some(queue) = self.queues.get_mut(&guild_id) else {
            return false
        };
        match queue.iter().position(|p| p.user_id == user_id) {
            Some(index) => queue.remove(index).is_some(),
            None => false
        }
    }

    /// Pop the front participant and report who is waiting behind them.
    /// The new front stays in the queue.
    pub fn advance(&mut self, guild_id: GuildId) -> Option<Advanced> {
        let queue = self.queues.get_mut(&guild_id)?;
        let served = queue.pop_front()?;
        let next_up = queue.front().cloned();
        Some(Advanced{served, next_up})
    }

    pub fn position(&self, guild_id: GuildId, user_id: UserId) -> Option<usize> {
        self.queues.get(&guild_id)?
            .iter()
            .position(|p| p.user_id == user_id)
            .map(|index| index + 1)
    }

    /// Waiting participants in order. Absent and empty lines look the same.
    pub fn members(&self, guild_id: GuildId) -> impl Iterator<Item = &Participant> {
        self.queues.get(&guild_id).into_iter().flatten()
    }

    pub fn len(&self, guild_id: GuildId) -> usize {
        self.queues.get(&guild_id).map_or(0, VecDeque::len)
    }

    /// Drop the guild's whole line. Returns whether one existed.
    pub fn drop_queue(&mut self, guild_id: GuildId) -> bool {
        self.queues.remove(&guild_id).is_some()
    }
}
