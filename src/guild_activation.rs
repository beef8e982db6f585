use std::collections::HashMap;
use serenity::model::prelude::*;

/// Per-guild switch deciding whether the queue accepts commands.
/// Guilds that were never seen count as disabled and are recorded as such on first access.
#[derive(Default)]
pub struct GuildActivation {
    guilds: HashMap<GuildId, bool>,
}

impl GuildActivation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-default accessor shared by every read and write path
    fn state_mut(&mut self, guild_id: GuildId) -> &mut bool {
        self.guilds.entry(guild_id).or_insert(false)
    }

    pub fn is_enabled(&mut self, guild_id: GuildId) -> bool {
        *self.state_mut(guild_id)
    }

    pub fn set_enabled(&mut self, guild_id: GuildId, enabled: bool) {
        *self.state_mut(guild_id) = enabled;
    }

    /// Initialize every listed guild to `enabled`, overwriting previous state
    pub fn seed_all(&mut self, guilds: impl IntoIterator<Item = GuildId>, enabled: bool) {
        self.guilds.extend(guilds.into_iter().map(|guild_id| (guild_id, enabled)));
    }

    pub fn any_enabled(&self) -> bool {
        self.guilds.values().any(|enabled| *enabled)
    }

    pub fn len(&self) -> usize {
        self.guilds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_guild_is_disabled_and_materialized() {
        let mut activation = GuildActivation::new();
        let guild = GuildId::new(7);
        assert_eq!(activation.len(), 0);
        assert!(!activation.is_enabled(guild));
        assert_eq!(activation.len(), 1);
    }

    #[test]
    fn set_enabled_toggles() {
        let mut activation = GuildActivation::new();
        let guild = GuildId::new(7);
        activation.set_enabled(guild, true);
        assert!(activation.is_enabled(guild));
        assert!(activation.any_enabled());
        activation.set_enabled(guild, false);
        assert!(!activation.is_enabled(guild));
        assert!(!activation.any_enabled());
    }

    #[test]
    fn seeding_overwrites_known_guilds() {
        let mut activation = GuildActivation::new();
        activation.set_enabled(GuildId::new(1), true);
        activation.seed_all([GuildId::new(1), GuildId::new(2), GuildId::new(3)], false);
        assert_eq!(activation.len(), 3);
        assert!(!activation.any_enabled());
        assert!(!activation.is_enabled(GuildId::new(1)));
    }
}
