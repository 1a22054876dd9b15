//! Type-specific state carried inline by each entity.
//!
//! One case per [`EntityKind`](super::EntityKind); zeroing the entity drops
//! the payload with it.

/// State owned by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerData {
    /// Seconds until the next automatic shot.
    pub shoot_timer: f32,
    /// Current cooldown between shots (shrinks over time).
    pub shoot_time: f32,
    /// Current movement speed in pixels per second (grows over time).
    pub speed: f32,
}

/// State owned by an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnemyData {
    /// Chase speed in pixels per second.
    pub speed: f32,
    /// Health removed from the target on contact.
    pub contact_damage: f32,
}

/// State owned by a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectileData {
    /// Seconds left before the projectile expires.
    pub ttl: f32,
}

/// Closed tagged payload.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Payload {
    /// No type-specific state.
    #[default]
    None,
    /// Player state.
    Player(PlayerData),
    /// Enemy state.
    Enemy(EnemyData),
    /// Projectile state.
    Projectile(ProjectileData),
}

impl Payload {
    /// Returns the player state, if this is a player payload.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerData> {
        match self {
            Self::Player(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the enemy state, if this is an enemy payload.
    #[must_use]
    pub fn as_enemy(&self) -> Option<&EnemyData> {
        match self {
            Self::Enemy(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the projectile state, if this is a projectile payload.
    #[must_use]
    pub fn as_projectile_mut(&mut self) -> Option<&mut ProjectileData> {
        match self {
            Self::Projectile(data) => Some(data),
            _ => None,
        }
    }
}
