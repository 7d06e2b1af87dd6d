//! Per-frame simulation step
//!
//! One call to [`advance_frame`] per rendered frame. Game speed is measured
//! in frames; there is no timestep.

use glam::Vec3;
use rand::Rng;

use super::collision::first_hit;
use super::entity::{Body, Collidable, FrameContext, Updatable};
use super::state::{GameEvent, GamePhase, World};
use crate::consts::*;
use crate::random_between;

/// Polled input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Horizontal bias from the tilt provider, in `[-1, 1]`
    pub tilt: f32,
}

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No session running; nothing simulated
    Idle,
    /// Update and collision ran
    Simulated,
    /// The last target was lost before this frame; the session ended
    Ended,
}

/// Advance the world by one frame
pub fn advance_frame(world: &mut World, input: &TickInput) -> FrameOutcome {
    match world.phase {
        GamePhase::Idle | GamePhase::GameOver => FrameOutcome::Idle,
        GamePhase::Playing if world.active_targets.is_empty() => {
            game_over(world);
            FrameOutcome::Ended
        }
        GamePhase::Playing => {
            tick(world, input);
            FrameOutcome::Simulated
        }
    }
}

/// Run the update pipeline: hazards (with collisions), fragments, targets,
/// spawn cadence, then the player
pub fn tick(world: &mut World, input: &TickInput) {
    let ctx = FrameContext {
        ratio: world.ratio,
        tilt: input.tilt,
    };

    resolve_hazards(world, &ctx);
    update_fragments(world, &ctx);
    update_targets(world, &ctx);

    if world.spawner.advance() {
        world.spawn_hazard();
    }

    world.player.update(&ctx);
}

/// Collide, move and prune every active hazard, front to back.
///
/// Player first: a smashed hazard is done for the frame. Otherwise the first
/// overlapping target is lost. The motion update runs for any hazard still
/// alive, and an out-of-range hazard is removed only if it hit nothing.
fn resolve_hazards(world: &mut World, ctx: &FrameContext) {
    let player = world.player.circle();
    let mut i = 0;

    while i < world.active_hazards.len() {
        let slot = world.active_hazards[i];
        let circle = world.hazards.get(slot).circle();

        if circle.overlaps(&player) {
            world.score.record_destroyed();
            let parent = world.hazards.get(slot).body.clone();
            break_hazard(world, &parent);
            world.hazards.kill(slot);
            world.active_hazards.remove(i);
            world.events.push(GameEvent::HazardDestroyed {
                destroyed: world.score.destroyed,
                combo: world.score.combo,
            });
            continue;
        }

        let hit_target = first_hit(&circle, &world.targets, &world.active_targets);
        if let Some(index) = hit_target {
            world.score.record_target_lost();
            let target = world.active_targets.remove(index);
            world.targets.kill(target);
            world.events.push(GameEvent::TargetLost {
                remaining: world.active_targets.len(),
            });
        }

        let in_range = world.hazards.get_mut(slot).update(ctx);
        if hit_target.is_none() && !in_range {
            world.hazards.kill(slot);
            world.active_hazards.remove(i);
            continue;
        }

        i += 1;
    }
}

fn update_fragments(world: &mut World, ctx: &FrameContext) {
    let World {
        fragments,
        active_fragments,
        ..
    } = world;
    active_fragments.retain(|&slot| {
        let alive = fragments.get_mut(slot).update(ctx);
        if !alive {
            fragments.kill(slot);
        }
        alive
    });
}

fn update_targets(world: &mut World, ctx: &FrameContext) {
    let World {
        targets,
        active_targets,
        ..
    } = world;
    active_targets.retain(|&slot| {
        let alive = targets.get_mut(slot).update(ctx);
        if !alive {
            targets.kill(slot);
        }
        alive
    });
}

/// Position and velocity for each piece of a broken hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentSeed {
    pub position: Vec3,
    pub velocity: Vec3,
    pub scale: f32,
}

/// Lay out the debris burst for a broken hazard.
///
/// Pieces rise by 1/4, 1/2, 1, 1/2, 1/4 of the parent's height. The middle
/// piece falls straight; the first two drift left and the last two right.
/// Fall speed is the parent's, slowed by up to 20%.
pub fn fragment_burst<R: Rng + ?Sized>(
    parent: &Body,
    rng: &mut R,
) -> [FragmentSeed; FRAGMENTS_PER_BREAK] {
    let height = parent.scale.y;
    let lift = [height / 4.0, height / 2.0, height, height / 2.0, height / 4.0];
    let scale = parent.scale.x / 4.0;

    std::array::from_fn(|i| {
        let mut position = parent.position;
        position.y += lift[i];
        let mut velocity = Vec3::ZERO;
        velocity.y = parent.velocity.y * random_between(rng, 0.8, 1.0);

        match i {
            0 | 1 => {
                position.x -= random_between(rng, 0.0, FRAGMENT_MAX_SPREAD);
                velocity.x = -random_between(rng, 0.0, FRAGMENT_MAX_DRIFT);
            }
            2 => {}
            _ => {
                position.x += random_between(rng, 0.0, FRAGMENT_MAX_SPREAD);
                velocity.x = random_between(rng, 0.0, FRAGMENT_MAX_DRIFT);
            }
        }

        FragmentSeed {
            position,
            velocity,
            scale,
        }
    })
}

/// Replace a hazard with its debris
pub fn break_hazard(world: &mut World, parent: &Body) {
    let seeds = fragment_burst(parent, world.rng());
    for seed in seeds {
        world.spawn_fragment(seed.position, seed.velocity, seed.scale);
    }
}

/// End the session: bank the result, shatter every remaining hazard
pub fn game_over(world: &mut World) {
    world.phase = GamePhase::GameOver;

    while let Some(slot) = world.active_hazards.pop() {
        let parent = world.hazards.get(slot).body.clone();
        break_hazard(world, &parent);
        world.hazards.kill(slot);
    }

    let score = world.score.score();
    let rank = world.score.rank();
    world.events.push(GameEvent::SessionEnded { score, rank });
    log::info!(
        "Game over: destroyed {}, best combo {}, score {} (rank {})",
        world.score.destroyed,
        world.score.best_combo,
        score,
        rank
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Entity;
    use crate::sim::score::Rank;
    use crate::sim::SlotId;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_world() -> World {
        let mut world = World::new(Tuning::default(), 42);
        world.start_session();
        world.events.clear();
        world
    }

    /// Put a still hazard of the given size at (x, y)
    fn place_hazard(world: &mut World, x: f32, y: f32, scale: f32) -> SlotId {
        let slot = world.spawn_hazard();
        let body = &mut world.hazards.get_mut(slot).body;
        body.position = Vec3::new(x, y, 0.0);
        body.velocity = Vec3::new(0.0, -0.005, 0.0);
        body.scale = Vec2::splat(scale);
        slot
    }

    /// Move every target far left so tests can place hazards freely
    fn park_targets(world: &mut World) {
        for (i, &slot) in world.active_targets.iter().enumerate() {
            let body = world.targets.get_mut(slot).body_mut();
            body.position.x = -0.9 + i as f32 * 0.001;
            body.velocity = Vec3::ZERO;
        }
    }

    #[test]
    fn test_player_hit_destroys_hazard_and_spawns_fragments() {
        let mut world = playing_world();
        park_targets(&mut world);
        let player = world.player.body.position;
        place_hazard(&mut world, player.x, player.y, 0.08);

        tick(&mut world, &TickInput::default());

        assert!(world.active_hazards.is_empty());
        assert_eq!(world.hazards.in_use_count(), 0);
        assert_eq!(world.active_fragments.len(), 5);
        assert_eq!(world.score.destroyed, 1);
        assert_eq!(world.score.combo, 1);
        assert_eq!(
            world.events,
            vec![GameEvent::HazardDestroyed {
                destroyed: 1,
                combo: 1
            }]
        );
    }

    #[test]
    fn test_target_hit_kills_one_target_and_resets_combo() {
        let mut world = playing_world();
        world.score.record_destroyed();
        world.score.record_destroyed();
        // Stack two targets under one hazard
        let first = world.active_targets[0];
        let second = world.active_targets[1];
        for slot in [first, second] {
            let body = world.targets.get_mut(slot).body_mut();
            body.position.x = 0.5;
            body.velocity = Vec3::ZERO;
        }
        let target_y = world.targets.get(first).body.position.y;
        let hazard = place_hazard(&mut world, 0.5, target_y, 0.08);

        tick(&mut world, &TickInput::default());

        assert_eq!(world.active_targets.len(), 4);
        assert_eq!(world.targets.in_use_count(), 4);
        assert!(!world.active_targets.contains(&first));
        assert!(world.active_targets.contains(&second));
        assert_eq!(world.score.combo, 0);
        assert_eq!(world.score.best_combo, 2);
        // The hazard itself survives the target hit
        assert!(world.active_hazards.contains(&hazard));
        assert_eq!(world.events, vec![GameEvent::TargetLost { remaining: 4 }]);
    }

    #[test]
    fn test_player_checked_before_targets() {
        let mut world = playing_world();
        let target = world.active_targets[0];
        let player = world.player.body.position;
        {
            let body = world.targets.get_mut(target).body_mut();
            body.position = player;
            body.velocity = Vec3::ZERO;
        }
        place_hazard(&mut world, player.x, player.y, 0.08);

        tick(&mut world, &TickInput::default());

        assert_eq!(world.active_targets.len(), 5);
        assert_eq!(world.score.destroyed, 1);
    }

    #[test]
    fn test_offscreen_hazard_is_removed() {
        let mut world = playing_world();
        park_targets(&mut world);
        let below = -world.ratio - 0.2;
        place_hazard(&mut world, 0.5, below, 0.05);

        tick(&mut world, &TickInput::default());

        assert!(world.active_hazards.is_empty());
        assert_eq!(world.hazards.in_use_count(), 0);
        assert_eq!(world.score, Default::default());
    }

    #[test]
    fn test_fragments_expire_and_return_to_pool() {
        let mut world = playing_world();
        park_targets(&mut world);
        let parent = Body {
            position: Vec3::new(0.5, 0.5, 0.0),
            scale: Vec2::splat(0.1),
            ..Default::default()
        };
        break_hazard(&mut world, &parent);
        assert_eq!(world.fragments.in_use_count(), 5);

        for _ in 0..world.tuning.fragment_lifetime_frames {
            tick(&mut world, &TickInput::default());
        }
        assert!(world.active_fragments.is_empty());
        assert_eq!(world.fragments.in_use_count(), 0);
    }

    #[test]
    fn test_fragment_burst_pattern() {
        let mut rng = Pcg32::seed_from_u64(3);
        let parent = Body {
            position: Vec3::new(0.2, 0.4, 0.0),
            velocity: Vec3::new(0.001, -0.01, 0.0),
            scale: Vec2::new(0.08, 0.12),
            ..Default::default()
        };
        let seeds = fragment_burst(&parent, &mut rng);
        assert_eq!(seeds.len(), 5);

        let lifts: Vec<f32> = seeds.iter().map(|s| s.position.y - 0.4).collect();
        let expected = [0.03, 0.06, 0.12, 0.06, 0.03];
        for (lift, want) in lifts.iter().zip(expected) {
            assert!((lift - want).abs() < 1e-6);
        }

        for seed in &seeds {
            assert!((seed.scale - 0.02).abs() < 1e-6);
            assert!(seed.velocity.y <= -0.008 + 1e-6 && seed.velocity.y >= -0.01 - 1e-6);
        }
        assert!(seeds[0].velocity.x <= 0.0 && seeds[1].velocity.x <= 0.0);
        assert_eq!(seeds[2].velocity.x, 0.0);
        assert_eq!(seeds[2].position.x, 0.2);
        assert!(seeds[3].velocity.x >= 0.0 && seeds[4].velocity.x >= 0.0);
        assert!(seeds.iter().all(|s| s.velocity.x.abs() <= FRAGMENT_MAX_DRIFT));
    }

    #[test]
    fn test_empty_targets_ends_session_without_update() {
        let mut world = playing_world();
        park_targets(&mut world);
        let hazard = place_hazard(&mut world, 0.5, 0.5, 0.08);
        let before = world.hazards.get(hazard).body.position;
        let frame = world.spawner.frame_count;
        world.targets.clear();
        world.active_targets.clear();

        let outcome = advance_frame(&mut world, &TickInput { tilt: 1.0 });

        assert_eq!(outcome, FrameOutcome::Ended);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.spawner.frame_count, frame);
        assert!(world.active_hazards.is_empty());
        assert_eq!(world.hazards.in_use_count(), 0);
        // The sweep breaks the hazard where it stood
        assert_eq!(world.active_fragments.len(), 5);
        let center = world.fragments.get(world.active_fragments[2]).body.position;
        assert_eq!(center.x, before.x);
        assert_eq!(
            world.events.last(),
            Some(&GameEvent::SessionEnded {
                score: 0,
                rank: Rank::F
            })
        );
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut world = playing_world();
        world.targets.clear();
        world.active_targets.clear();
        advance_frame(&mut world, &TickInput::default());
        world.events.clear();
        for _ in 0..10 {
            assert_eq!(
                advance_frame(&mut world, &TickInput::default()),
                FrameOutcome::Idle
            );
        }
        assert!(world.events.is_empty());
    }

    #[test]
    fn test_session_reset_after_game_over() {
        let mut world = playing_world();
        for _ in 0..500 {
            tick(&mut world, &TickInput::default());
        }
        world.score.record_destroyed();
        world.targets.clear();
        world.active_targets.clear();
        advance_frame(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::GameOver);

        assert!(world.start_session());
        let session = world.session();
        assert!(session.playing);
        assert_eq!(session.hazards_destroyed, 0);
        assert_eq!(session.combo, 0);
        assert_eq!(session.best_combo, 0);
        assert_eq!(session.frame_count, 0);
        assert_eq!(session.spawn_interval, 64);
        assert_eq!(world.active_targets.len(), 5);
        assert!(world.active_hazards.is_empty());
        assert!(world.active_fragments.is_empty());
    }

    #[test]
    fn test_spawner_adds_hazard_on_cadence() {
        let mut world = playing_world();
        park_targets(&mut world);
        for _ in 0..63 {
            tick(&mut world, &TickInput::default());
        }
        assert!(world.active_hazards.is_empty());
        tick(&mut world, &TickInput::default());
        assert_eq!(world.active_hazards.len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_pools_stay_consistent(seed in any::<u64>(), frames in 1usize..3000, tilt in -1.0f32..1.0) {
            let mut world = World::new(Tuning::default(), seed);
            world.start_session();
            let mut best = 0;
            for _ in 0..frames {
                advance_frame(&mut world, &TickInput { tilt });
                prop_assert_eq!(world.active_hazards.len(), world.hazards.in_use_count());
                prop_assert_eq!(world.active_fragments.len(), world.fragments.in_use_count());
                prop_assert_eq!(world.active_targets.len(), world.targets.in_use_count());
                prop_assert!(world.hazards.in_use_count() <= world.hazards.capacity());
                prop_assert!(world.score.best_combo >= best);
                best = world.score.best_combo;
                for &slot in &world.active_hazards {
                    prop_assert!(world.hazards.get(slot).body.alive);
                }
            }
        }
    }
}
