//! Headless demo: two actors dash head-on through a field of enemies.
//!
//! Runs the authoritative simulation at the fixed timestep with a scripted
//! input sequence and logs the skill events as they happen. Useful for
//! eyeballing tuning changes without a client attached.

use glam::Vec2;

use twindash::consts::SIM_DT;
use twindash::sim::{Actor, Enemy};
use twindash::{ActorId, DashEngine, DashTuning, EnemyId, SkillEvent, TickInput, World};

const LEFT: ActorId = ActorId(1);
const RIGHT: ActorId = ActorId(2);

fn main() {
    env_logger::init();

    let tuning = DashTuning::default();
    let mut world = World::new();
    world.spawn_actor(Actor::new(LEFT, Vec2::new(-6.0, 0.0)));
    world.spawn_actor(Actor::new(RIGHT, Vec2::new(6.0, 0.0)));
    for i in 0..4u32 {
        let y = -1.5 + i as f32;
        world.spawn_enemy(Enemy::new(EnemyId(100 + i), Vec2::new(0.0, y), 30.0));
    }

    let mut engine = DashEngine::new(0xDA5B, tuning);
    engine.activate(LEFT);
    engine.activate(RIGHT);

    let input = TickInput::default()
        .with_intent(LEFT, Vec2::X)
        .with_intent(RIGHT, Vec2::NEG_X);

    let mut total_damage = 0.0;
    for _ in 0..1800 {
        for event in engine.tick(&mut world, &input, SIM_DT) {
            match event {
                SkillEvent::EnemyHit { actor, enemy, damage } => {
                    total_damage += damage;
                    log::info!("{actor:?} hit {enemy:?} for {damage}");
                }
                SkillEvent::SelfPunish { actor, damage, .. } => {
                    log::info!("{actor:?} rammed a cooling-down target, took {damage}");
                }
                SkillEvent::FrontCollision { initiator, partner, count } => {
                    log::info!("front collision {initiator:?} + {partner:?}, count now {count}");
                }
                SkillEvent::FinalEnhancement { actor } => {
                    log::info!("{actor:?} reached final enhancement");
                }
                SkillEvent::Ended { actor, reason } => {
                    log::info!("skill ended for {actor:?}: {reason:?}");
                }
            }
        }
        if !engine.is_active(LEFT) && !engine.is_active(RIGHT) {
            break;
        }
    }

    let survivors = world.enemies.values().filter(|e| e.alive).count();
    log::info!(
        "done after {} ticks: {total_damage} total damage, {survivors} enemies left",
        engine.time_ticks()
    );
}
