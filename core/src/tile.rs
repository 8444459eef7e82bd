//! Tile vocabulary stored in world cells and its glyph mapping.

use crate::Direction;

/// Glyph bytes understood by the tile atlas.
///
/// Bytes `0x20..=0x7E` are ASCII text. World tiles occupy the upper half of the
/// atlas and interface glyphs the last row.
pub mod glyph {
    /// Bare floor.
    pub const FLOOR: u8 = 0x00;
    /// First of four wall textures.
    pub const WALL: u8 = 0x80;
    /// Wall fully surrounded by other walls.
    pub const SOLID_WALL: u8 = 0x84;
    /// Grass.
    pub const GRASS: u8 = 0x85;
    /// Breakable ruin.
    pub const RUIN: u8 = 0x86;
    /// Pushable boulder.
    pub const BOULDER: u8 = 0x87;
    /// Teleporter pad.
    pub const TELEPORTER: u8 = 0x88;
    /// Locked door.
    pub const DOOR: u8 = 0x89;
    /// First of two water frames.
    pub const WATER: u8 = 0x8A;
    /// First of four monster tiers.
    pub const MONSTER: u8 = 0x90;
    /// First of four player poses.
    pub const PLAYER: u8 = 0x94;
    /// First of four arrow headings.
    pub const ARROW: u8 = 0x98;
    /// First of four bolt headings.
    pub const BOLT: u8 = 0x9C;
    /// First of four submerged arrow headings.
    pub const ARROW_SUBMERGED: u8 = 0xA0;
    /// First of four submerged bolt headings.
    pub const BOLT_SUBMERGED: u8 = 0xA4;
    /// Idle bolt trap.
    pub const TRAP_IDLE: u8 = 0xA8;
    /// Armed bolt trap.
    pub const TRAP_ARMED: u8 = 0xA9;
    /// First of four shrine phases.
    pub const SHRINE: u8 = 0xAC;
    /// First of four explosion phases.
    pub const EXPLOSION: u8 = 0xB0;
    /// First of four monster spawn phases.
    pub const SPAWN: u8 = 0xB8;
    /// First of four player spawn phases.
    pub const PLAYER_SPAWN: u8 = 0xBC;
    /// First pickup; ordered life, ammo, flask, key, gold.
    pub const PICKUP: u8 = 0xC0;
    /// Minimap region that is mostly open.
    pub const MAP_FLOOR: u8 = 0xF0;
    /// Minimap region that is mostly wall.
    pub const MAP_WALL: u8 = 0xF1;
    /// Minimap marker for the player's screen.
    pub const MAP_CURSOR: u8 = 0xF2;
    /// Background of overlay banners.
    pub const BANNER: u8 = 0xF3;
}

/// Animation phase of a four-step cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Phase(u8);

impl Phase {
    /// First phase of every cycle.
    pub const FIRST: Phase = Phase(0);
    /// Last phase of every cycle.
    pub const LAST: Phase = Phase(3);

    /// Creates a phase, keeping only the two low bits.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value & 3)
    }

    /// Following phase, or `None` once the cycle is complete.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.0 < Self::LAST.0 {
            Some(Self(self.0 + 1))
        } else {
            None
        }
    }

    /// Zero-based index of the phase.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Texture variant of an ordinary wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallTexture(u8);

impl WallTexture {
    /// Picks a texture from the two low bits of a random byte.
    #[must_use]
    pub const fn from_bits(byte: u8) -> Self {
        Self(byte & 3)
    }

    /// Zero-based index of the texture.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Monster strength, from tier 0 (weakest) to tier 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonsterTier(u8);

impl MonsterTier {
    /// Weakest tier; destroyed by a single projectile.
    pub const WEAKEST: MonsterTier = MonsterTier(0);
    /// Strongest tier.
    pub const STRONGEST: MonsterTier = MonsterTier(3);

    /// Creates a tier, keeping only the two low bits.
    #[must_use]
    pub const fn new(level: u8) -> Self {
        Self(level & 3)
    }

    /// Zero-based tier level.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Tier one step weaker, or `None` for the weakest tier.
    #[must_use]
    pub const fn weaker(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else {
            Some(Self(self.0 - 1))
        }
    }
}

/// Animation pose of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Waiting for input.
    Stand,
    /// Recovering after firing.
    Shoot,
    /// Action pressed without a direction.
    Magic,
    /// Recovering after taking a hit.
    Defend,
}

/// Collectible items and the counters they feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pickup {
    /// Restores one life point.
    Life,
    /// One arrow.
    Ammo,
    /// One flask.
    Flask,
    /// Opens one locked door.
    Key,
    /// One gold coin.
    Gold,
}

/// Which party fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Player-fired; breaks terrain and never harms the player.
    Arrow,
    /// Trap-fired; harms the player and ignores terrain.
    Bolt,
}

/// Directional projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Projectile {
    /// Arrow or bolt.
    pub kind: ProjectileKind,
    /// Direction of travel.
    pub heading: Direction,
    /// Whether the projectile currently occupies a water cell.
    pub submerged: bool,
}

impl Projectile {
    /// Creates a dry projectile.
    #[must_use]
    pub const fn new(kind: ProjectileKind, heading: Direction) -> Self {
        Self {
            kind,
            heading,
            submerged: false,
        }
    }

    /// Same projectile, flagged as in or out of water.
    #[must_use]
    pub const fn with_submerged(self, submerged: bool) -> Self {
        Self {
            kind: self.kind,
            heading: self.heading,
            submerged,
        }
    }
}

/// Two-phase state of a bolt trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrapState {
    /// Cooling down.
    Idle,
    /// About to discharge.
    Armed,
}

/// Semantic content of a world cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Open floor.
    #[default]
    Empty,
    /// Ordinary wall.
    Wall(WallTexture),
    /// Wall whose whole neighbourhood is wall; also returned outside the grid.
    SolidWall,
    /// Grass; cut by the player, burnt by arrows.
    Grass,
    /// Breakable ruin; destroyed by arrows.
    Ruin,
    /// Boulder the player can push.
    Boulder,
    /// Teleporter pad, paired by scanning along the travel direction.
    Teleporter,
    /// Door that consumes a key.
    Door,
    /// Animated water.
    Water {
        /// Which of the two frames is showing.
        ripple: bool,
    },
    /// Collectible item.
    Pickup(Pickup),
    /// Chasing monster.
    Monster(MonsterTier),
    /// The player.
    Player(Pose),
    /// Arrow or bolt in flight.
    Projectile(Projectile),
    /// Periodic four-way bolt emitter.
    BoltTrap(TrapState),
    /// Periodic monster spawner.
    Shrine(Phase),
    /// Explosion animation.
    Explosion {
        /// Current animation phase.
        phase: Phase,
        /// Whether water is restored when the animation ends.
        over_water: bool,
    },
    /// Monster materialising.
    Spawn(Phase),
    /// Player materialising.
    PlayerSpawn(Phase),
}

impl Tile {
    /// Reports whether the tile is open floor.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Tile::Empty)
    }

    /// Reports whether the tile is any kind of wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Tile::Wall(_) | Tile::SolidWall)
    }

    /// Glyph byte drawn for this tile.
    #[must_use]
    pub const fn glyph(self) -> u8 {
        match self {
            Tile::Empty => glyph::FLOOR,
            Tile::Wall(texture) => glyph::WALL + texture.index(),
            Tile::SolidWall => glyph::SOLID_WALL,
            Tile::Grass => glyph::GRASS,
            Tile::Ruin => glyph::RUIN,
            Tile::Boulder => glyph::BOULDER,
            Tile::Teleporter => glyph::TELEPORTER,
            Tile::Door => glyph::DOOR,
            Tile::Water { ripple } => glyph::WATER + ripple as u8,
            Tile::Pickup(pickup) => {
                glyph::PICKUP
                    + match pickup {
                        Pickup::Life => 0,
                        Pickup::Ammo => 1,
                        Pickup::Flask => 2,
                        Pickup::Key => 3,
                        Pickup::Gold => 4,
                    }
            }
            Tile::Monster(tier) => glyph::MONSTER + tier.level(),
            Tile::Player(pose) => {
                glyph::PLAYER
                    + match pose {
                        Pose::Stand => 0,
                        Pose::Shoot => 1,
                        Pose::Magic => 2,
                        Pose::Defend => 3,
                    }
            }
            Tile::Projectile(projectile) => {
                let base = match (projectile.kind, projectile.submerged) {
                    (ProjectileKind::Arrow, false) => glyph::ARROW,
                    (ProjectileKind::Bolt, false) => glyph::BOLT,
                    (ProjectileKind::Arrow, true) => glyph::ARROW_SUBMERGED,
                    (ProjectileKind::Bolt, true) => glyph::BOLT_SUBMERGED,
                };
                base + projectile.heading.index() as u8
            }
            Tile::BoltTrap(TrapState::Idle) => glyph::TRAP_IDLE,
            Tile::BoltTrap(TrapState::Armed) => glyph::TRAP_ARMED,
            Tile::Shrine(phase) => glyph::SHRINE + phase.index(),
            Tile::Explosion { phase, .. } => glyph::EXPLOSION + phase.index(),
            Tile::Spawn(phase) => glyph::SPAWN + phase.index(),
            Tile::PlayerSpawn(phase) => glyph::PLAYER_SPAWN + phase.index(),
        }
    }
}
