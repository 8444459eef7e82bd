use xorx_core::{
    Buttons, Command, Direction, Event, InputSnapshot, MonsterTier, Phase, Pose, Position,
    Projectile, ProjectileKind, SoundEffect, SoundSet, Tile, VIEW_COLUMNS,
};
use xorx_world::{self as world, query, LoadError, World, WorldImage};

const PLAYER: u32 = 0xFF_FF_FF;
const WALL: u32 = 0x80_80_80;
const WATER: u32 = 0x00_00_FF;
const BOULDER: u32 = 0xC0_C0_C0;
const TELEPORTER: u32 = 0xFF_00_FF;
const WEAK_MONSTER: u32 = 0xFF_00_00;
const STRONG_MONSTER: u32 = 0x40_00_00;
const SHRINE: u32 = 0x00_FF_FF;
const AMMO: u32 = 0x80_80_FF;

struct Session {
    world: World,
    previous: Buttons,
    events: Vec<Event>,
    sounds: SoundSet,
}

impl Session {
    fn load(pixels: &[(Position, u32)]) -> Self {
        let image = pixels
            .iter()
            .fold(WorldImage::filled(0), |image, (position, color)| {
                image.with_pixel(*position, *color)
            });
        Self {
            world: World::from_image(image).expect("valid world"),
            previous: Buttons::empty(),
            events: Vec::new(),
            sounds: SoundSet::new(),
        }
    }

    fn step(&mut self, down: Buttons) {
        let input = InputSnapshot::new(down, self.previous);
        self.previous = down;
        self.events.clear();
        world::apply(&mut self.world, Command::Step { input }, &mut self.events);
        self.sounds = world::take_sounds(&mut self.world);
    }

    /// Steps without input until the player stands and acts on the next step.
    fn settle(&mut self) -> usize {
        for steps in 1..=64 {
            self.step(Buttons::empty());
            let player = query::player(&self.world).expect("player present");
            let cell = query::cell(&self.world, player);
            if cell.tile == Tile::Player(Pose::Stand) && cell.due == query::local_tick(&self.world)
            {
                return steps;
            }
        }
        panic!("player never materialised");
    }

    fn tile(&self, x: i32, y: i32) -> Tile {
        query::tile(&self.world, Position::new(x, y))
    }
}

fn at(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

#[test]
fn single_white_pixel_materialises_the_player() {
    let mut session = Session::load(&[(at(10, 10), PLAYER)]);
    assert_eq!(query::player(&session.world), Some(at(10, 10)));
    assert_eq!(query::view_origin(&session.world), at(0, 0));
    assert_eq!(session.tile(10, 10), Tile::PlayerSpawn(Phase::FIRST));

    assert_eq!(session.settle(), 14);
    assert_eq!(session.tile(10, 10), Tile::Player(Pose::Stand));

    session.step(Buttons::RIGHT);
    assert_eq!(query::player(&session.world), Some(at(11, 10)));
    assert!(session.sounds.contains(SoundEffect::Step));
}

#[test]
fn several_player_starts_are_rejected() {
    let image = WorldImage::filled(0)
        .with_pixel(at(1, 1), PLAYER)
        .with_pixel(at(2, 1), PLAYER);
    assert!(matches!(
        World::from_image(image),
        Err(LoadError::MultiplePlayerStarts { .. })
    ));
}

#[test]
fn world_without_player_still_runs() {
    let mut session = Session::load(&[(at(3, 3), WATER)]);
    for _ in 0..100 {
        session.step(Buttons::RIGHT);
    }
    assert_eq!(query::player(&session.world), None);
    assert_eq!(query::view_origin(&session.world), at(0, 0));
    assert!(matches!(session.tile(3, 3), Tile::Water { .. }));
    assert_eq!(query::local_tick(&session.world).value(), 100);
}

#[test]
fn pushing_a_boulder_into_a_monster_destroys_the_monster() {
    let mut session = Session::load(&[
        (at(10, 10), PLAYER),
        (at(11, 10), BOULDER),
        (at(12, 10), WEAK_MONSTER),
    ]);
    let _ = session.settle();
    assert_eq!(session.tile(12, 10), Tile::Monster(MonsterTier::WEAKEST));

    session.step(Buttons::RIGHT);

    assert!(matches!(session.tile(12, 10), Tile::Explosion { .. }));
    assert_eq!(session.tile(11, 10), Tile::Boulder);
    assert_eq!(query::player(&session.world), Some(at(10, 10)));
    assert!(session.sounds.contains(SoundEffect::Explode));
}

#[test]
fn bumping_a_strong_monster_hurts() {
    let mut session = Session::load(&[(at(10, 10), PLAYER), (at(11, 10), STRONG_MONSTER)]);
    let _ = session.settle();
    let before = query::counters(&session.world).life;

    session.step(Buttons::RIGHT);

    assert_eq!(query::counters(&session.world).life, before - 4);
    assert_eq!(session.tile(10, 10), Tile::Player(Pose::Defend));
    assert!(session.sounds.contains(SoundEffect::Hurt));
}

#[test]
fn arrows_travel_one_cell_every_two_ticks() {
    let mut session = Session::load(&[(at(10, 10), PLAYER)]);
    let _ = session.settle();

    session.step(Buttons::A | Buttons::RIGHT);
    let arrow = Tile::Projectile(Projectile::new(ProjectileKind::Arrow, Direction::East));
    assert_eq!(session.tile(11, 10), arrow);
    assert_eq!(session.tile(10, 10), Tile::Player(Pose::Shoot));
    assert_eq!(query::counters(&session.world).ammo, 9);

    for _ in 0..6 {
        session.step(Buttons::empty());
    }
    assert_eq!(session.tile(14, 10), arrow);
    assert_eq!(session.tile(11, 10), Tile::Empty);
}

#[test]
fn water_is_restored_after_an_arrow_crosses_it() {
    let mut session = Session::load(&[(at(10, 10), PLAYER), (at(12, 10), WATER)]);
    let _ = session.settle();

    session.step(Buttons::A | Buttons::RIGHT);
    session.step(Buttons::empty());
    session.step(Buttons::empty());
    assert!(matches!(
        session.tile(12, 10),
        Tile::Projectile(Projectile {
            submerged: true,
            ..
        })
    ));

    session.step(Buttons::empty());
    session.step(Buttons::empty());
    assert!(matches!(session.tile(12, 10), Tile::Water { .. }));
    assert_eq!(
        session.tile(13, 10),
        Tile::Projectile(Projectile::new(ProjectileKind::Arrow, Direction::East))
    );
}

#[test]
fn walled_in_shrine_cycles_without_spawning() {
    let shrine = at(5, 5);
    let mut pixels = vec![(shrine, SHRINE)];
    pixels.extend(Direction::ALL.map(|direction| (shrine.step(direction), WALL)));
    let mut session = Session::load(&pixels);

    let mut phases = Vec::new();
    let mut last = session.tile(5, 5);
    for _ in 0..400 {
        session.step(Buttons::empty());
        let tile = session.tile(5, 5);
        if tile != last {
            let Tile::Shrine(phase) = tile else {
                panic!("shrine replaced by {tile:?}");
            };
            phases.push(phase.index());
            last = tile;
        }
        for direction in Direction::ALL {
            let neighbour = query::tile(&session.world, shrine.step(direction));
            assert!(neighbour.is_wall(), "neighbour became {neighbour:?}");
        }
    }
    assert!(phases.starts_with(&[1, 2, 3, 0, 1]), "phases {phases:?}");
}

#[test]
fn collecting_ammo_increments_the_counter() {
    let mut session = Session::load(&[(at(10, 10), PLAYER), (at(10, 11), AMMO)]);
    let _ = session.settle();

    session.step(Buttons::DOWN);

    assert_eq!(query::counters(&session.world).ammo, 11);
    assert_eq!(query::player(&session.world), Some(at(10, 11)));
    assert!(session.sounds.contains(SoundEffect::Pickup));
}

#[test]
fn pause_freezes_the_simulation() {
    let mut session = Session::load(&[(at(10, 10), PLAYER)]);
    let _ = session.settle();
    let tick = query::local_tick(&session.world);

    session.step(Buttons::X);
    assert_eq!(session.events, vec![Event::PauseToggled { paused: true }]);
    assert!(session.sounds.contains(SoundEffect::Pause));
    session.step(Buttons::empty());
    session.step(Buttons::RIGHT);
    assert!(query::is_paused(&session.world));
    assert_eq!(query::local_tick(&session.world), tick);
    assert_eq!(query::player(&session.world), Some(at(10, 10)));

    session.step(Buttons::X);
    assert!(!query::is_paused(&session.world));
    assert_eq!(query::local_tick(&session.world), tick.next());
}

#[test]
fn crossing_the_screen_edge_scrolls_the_view() {
    let mut session = Session::load(&[(at(VIEW_COLUMNS - 1, 10), PLAYER)]);
    let _ = session.settle();

    session.step(Buttons::RIGHT);
    assert_eq!(
        session.events,
        vec![Event::ScreenChanged {
            from: at(0, 0),
            to: at(VIEW_COLUMNS, 0)
        }]
    );
    assert_eq!(query::local_tick(&session.world).value(), 0);

    let mut scrolls = 0;
    loop {
        session.step(Buttons::empty());
        match session.events.as_slice() {
            [Event::ViewScrolled { .. }] => scrolls += 1,
            _ => break,
        }
        assert_eq!(query::local_tick(&session.world).value(), 0);
    }
    assert_eq!(scrolls, 16);
    assert_eq!(query::view_origin(&session.world), at(VIEW_COLUMNS, 0));
    assert!(query::is_visible(&session.world, at(VIEW_COLUMNS, 10)));
}

#[test]
fn teleporting_snaps_the_view() {
    let mut session = Session::load(&[
        (at(10, 10), PLAYER),
        (at(11, 10), TELEPORTER),
        (at(100, 10), TELEPORTER),
    ]);
    let _ = session.settle();

    session.step(Buttons::RIGHT);

    assert_eq!(query::player(&session.world), Some(at(101, 10)));
    assert_eq!(query::view_origin(&session.world), at(96, 0));
    assert!(session.events.contains(&Event::PlayerTeleported {
        from: at(10, 10),
        to: at(101, 10)
    }));
    assert!(session.sounds.contains(SoundEffect::Teleport));
}

#[test]
fn restart_rebuilds_the_loaded_world() {
    let mut session = Session::load(&[(at(10, 10), PLAYER), (at(10, 11), AMMO)]);
    let _ = session.settle();
    session.step(Buttons::DOWN);
    assert_eq!(session.tile(10, 11), Tile::Player(Pose::Stand));

    let mut events = Vec::new();
    world::apply(&mut session.world, Command::Restart, &mut events);

    assert_eq!(events, vec![Event::GameRestarted]);
    assert_eq!(query::player(&session.world), Some(at(10, 10)));
    assert_eq!(session.tile(10, 10), Tile::PlayerSpawn(Phase::FIRST));
    assert!(matches!(session.tile(10, 11), Tile::Pickup(_)));
    assert_eq!(query::counters(&session.world).ammo, 10);
    assert_eq!(query::local_tick(&session.world).value(), 0);
}
