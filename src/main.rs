//! Headless demo driver
//!
//! Stands in for the out-of-scope collaborators (rendering, input, the
//! frame loop): builds the classic 800x600 scene, steers the paddle
//! with a trivial ball-tracking policy and advances the simulation a
//! fixed number of ticks, logging how the run ends.

use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use brick_breaker::consts::{
    BALL_RADIUS, BALL_START_SPEED, BORDER_THICKNESS, FIELD_HEIGHT, FIELD_WIDTH, PADDLE_SPEED,
};
use brick_breaker::sim::{
    random_point_in, Ball, CollisionWorld, ObstacleKind, Rect, Steer, Velocity,
};

const GRAY: u32 = 0x80_8080;
const SILVER: u32 = 0xC0_C0C0;
const ROW_COLORS: [u32; 5] = [0xE0_5050, 0xE0_A050, 0xE0_E050, 0x50_C050, 0x50_80E0];

const MAX_TICKS: u64 = 5000;
const POINTS_PER_BLOCK: u32 = 5;

fn main() {
    env_logger::init();
    log::info!("brick-breaker demo starting");

    let mut world = CollisionWorld::new();

    // Frame the field; the bottom strip is a sink that swallows balls
    world.add_obstacle(
        Rect::new(DVec2::ZERO, FIELD_WIDTH, BORDER_THICKNESS, GRAY),
        ObstacleKind::Block,
    );
    world.add_obstacle(
        Rect::new(
            DVec2::new(0.0, BORDER_THICKNESS),
            BORDER_THICKNESS,
            FIELD_HEIGHT - BORDER_THICKNESS,
            GRAY,
        ),
        ObstacleKind::Block,
    );
    world.add_obstacle(
        Rect::new(
            DVec2::new(FIELD_WIDTH - BORDER_THICKNESS, BORDER_THICKNESS),
            BORDER_THICKNESS,
            FIELD_HEIGHT - BORDER_THICKNESS,
            GRAY,
        ),
        ObstacleKind::Block,
    );
    let sink = world.add_obstacle(
        Rect::new(
            DVec2::new(0.0, FIELD_HEIGHT - BORDER_THICKNESS),
            FIELD_WIDTH,
            BORDER_THICKNESS,
            GRAY,
        ),
        ObstacleKind::Block,
    );
    world.add_hit_listener(sink, |_, _, ball| {
        ball.mark_removed();
        log::info!("ball lost through the bottom");
    });

    // Block grid; each block scores once and disappears on its hit
    let score = Rc::new(Cell::new(0u32));
    let blocks_left = Rc::new(Cell::new(0u32));

    for (row, &color) in ROW_COLORS.iter().enumerate() {
        for col in 0..10 {
            let rect = Rect::new(
                DVec2::new(170.0 + col as f64 * 50.0, 150.0 + row as f64 * 25.0),
                50.0,
                25.0,
                color,
            );
            let id = world.add_obstacle(rect, ObstacleKind::Block);
            blocks_left.set(blocks_left.get() + 1);

            let score_hook = score.clone();
            let blocks_left_hook = blocks_left.clone();
            world.add_hit_listener(id, move |world, struck, _| {
                world.remove_obstacle(struck);
                score_hook.set(score_hook.get() + POINTS_PER_BLOCK);
                blocks_left_hook.set(blocks_left_hook.get() - 1);
            });
        }
    }

    let paddle = world.add_obstacle(
        Rect::new(DVec2::new(375.0, 550.0), 100.0, 10.0, SILVER),
        ObstacleKind::Paddle {
            speed: PADDLE_SPEED,
        },
    );

    // Two fixed serves plus one scattered by the seeded generator
    let mut rng = Pcg32::seed_from_u64(17);
    let scatter = random_point_in(&mut rng, 300, 100);
    let mut balls = vec![
        Ball::new(DVec2::new(400.0, 400.0), BALL_RADIUS),
        Ball::new(DVec2::new(300.0, 300.0), BALL_RADIUS),
        Ball::new(DVec2::new(250.0 + scatter.x, 350.0 + scatter.y), BALL_RADIUS),
    ];
    balls[0].set_velocity(Velocity::from_angle_and_speed(90.0, BALL_START_SPEED));
    balls[1].set_velocity(Velocity::from_angle_and_speed(70.0, BALL_START_SPEED));
    balls[2].set_velocity(Velocity::from_angle_and_speed(80.0, BALL_START_SPEED));

    for tick in 0..MAX_TICKS {
        // Track the ball closest to the paddle's row
        let target_x = balls
            .iter()
            .max_by(|a, b| a.y().partial_cmp(&b.y()).unwrap_or(Ordering::Equal))
            .map(|ball| ball.x());

        if let (Some(target_x), Some(p)) = (target_x, world.obstacle_mut(paddle)) {
            let paddle_center = p.rect.left() + p.rect.width / 2.0;
            if target_x < paddle_center - PADDLE_SPEED {
                p.steer(Steer::Left);
            } else if target_x > paddle_center + PADDLE_SPEED {
                p.steer(Steer::Right);
            }
        }

        for ball in &mut balls {
            ball.step(&mut world);
        }
        balls.retain(|ball| !ball.is_removed());

        if balls.is_empty() {
            log::info!("tick {}: all balls lost", tick);
            break;
        }
        if blocks_left.get() == 0 {
            log::info!("tick {}: field cleared", tick);
            break;
        }
    }

    log::info!(
        "final score: {}, blocks left: {}, balls left: {}",
        score.get(),
        blocks_left.get(),
        balls.len()
    );
}
