use serenity::client::Context;
use serenity::gateway::ActivityData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Idle,
    /// Shown while at least one server has an open queue
    Watching
}

impl Presence {
    pub fn for_queues(any_enabled: bool) -> Self {
        if any_enabled {
            Self::Watching
        } else {
            Self::Idle
        }
    }

    fn activity(self) -> ActivityData {
        match self {
            Self::Idle => ActivityData::playing("with other bots"),
            Self::Watching => ActivityData::watching("whether students are waiting")
        }
    }

    pub fn show(self, ctx: &Context) {
        ctx.set_activity(Some(self.activity()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watching_while_any_queue_is_open() {
        assert_eq!(Presence::for_queues(true), Presence::Watching);
        assert_eq!(Presence::for_queues(false), Presence::Idle);
    }
}
