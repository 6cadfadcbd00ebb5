//! Shared battlefield primitives: teams, positions, bodies and damage dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a unit or projectile within one match.
///
/// Ids are allocated monotonically and never reused, so a stale id simply
/// fails to resolve instead of aliasing a newer entity.
pub type EntityId = u32;

/// Side of the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Left base, marches right.
    Player,
    /// Right base, marches left.
    Ai,
}

impl Team {
    /// Both teams in index order.
    pub const ALL: [Team; 2] = [Team::Player, Team::Ai];

    /// Movement sign along the lane: +1 for the player, -1 for the AI.
    #[must_use]
    pub const fn direction(self) -> f64 {
        match self {
            Team::Player => 1.0,
            Team::Ai => -1.0,
        }
    }

    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Ai,
            Team::Ai => Team::Player,
        }
    }

    /// Stable index for per-team arrays.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::Player => 0,
            Team::Ai => 1,
        }
    }

    /// Lowercase name used in logs and output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Team::Player => "player",
            Team::Ai => "ai",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A point on the battlefield in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate along the lane.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Physical extent shared by castles, units and projectiles.
///
/// The anchor is the horizontal centre of the footprint at ground level, so
/// `position.y` is the bottom edge and the body extends upward by `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Owning team.
    pub team: Team,
    /// Anchor point (bottom centre).
    pub position: Position,
    /// Horizontal size.
    pub width: f64,
    /// Vertical size.
    pub height: f64,
}

impl Body {
    /// Create a new body.
    #[must_use]
    pub const fn new(team: Team, position: Position, width: f64, height: f64) -> Self {
        Self {
            team,
            position,
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.position.x - self.width / 2.0
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.position.x + self.width / 2.0
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.position.y - self.height
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.position.y
    }

    /// Geometric centre of the body.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.position.x, self.position.y - self.height / 2.0)
    }

    /// The x coordinate of this body's horizontal extent closest to `x`.
    ///
    /// Returns `x` itself when it lies inside the body.
    #[must_use]
    pub fn nearest_x(&self, x: f64) -> f64 {
        let (left, right) = (self.left(), self.right());
        if x < left {
            left
        } else if x > right {
            right
        } else {
            x
        }
    }

    /// Axis-aligned overlap test. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Typed reference to something that can be damaged.
///
/// Holding a `TargetRef` never keeps the target alive; it must be resolved
/// against the match arena each time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRef {
    /// A unit by id.
    Unit(EntityId),
    /// A team's castle.
    Castle(Team),
}

/// Outcome of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// The target was already dead; nothing changed.
    Ignored,
    /// The target lost hp and survived.
    Wounded {
        /// Hit points left.
        remaining: u32,
    },
    /// This hit brought the target to zero. Reported at most once per target.
    Killed,
}

impl DamageResult {
    /// Whether this hit was the killing blow.
    #[must_use]
    pub const fn is_kill(self) -> bool {
        matches!(self, DamageResult::Killed)
    }
}

/// Anything with a hit-point pool.
pub trait Damageable {
    /// Current hit points.
    fn hp(&self) -> u32;

    /// Maximum hit points.
    fn max_hp(&self) -> u32;

    /// Apply damage, clamping at zero.
    fn take_damage(&mut self, amount: u32) -> DamageResult;

    /// Whether the entity still has hit points.
    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Remaining hp as a fraction of maximum, for health bars.
    fn hp_ratio(&self) -> f64 {
        let max = self.max_hp();
        if max == 0 {
            return 0.0;
        }
        f64::from(self.hp()) / f64::from(max)
    }
}
