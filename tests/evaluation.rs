//! End-to-end scenarios through the public API.

use stigmergy::prelude::*;
use stigmergy::world::{BASELINE_SCORE, DROPOFF_REWARD, MOVE_REWARD, PICKUP_REWARD};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// An interior cell next to `target` and the heading that faces it.
fn approach(world: &StigmergyWorld, target: Pos) -> (Pos, Heading) {
    for h in Heading::ALL {
        let (dx, dy) = h.forward();
        if let Some(src) = world.grid().offset(target, -dx, -dy) {
            if world.grid().is_interior(src) {
                return (src, h);
            }
        }
    }
    panic!("no interior neighbour of {target:?}");
}

#[test]
fn idle_agent_keeps_the_baseline() {
    let cfg = WorldConfig::default()
        .with_dims(15, 15)
        .with_wall_percent(0.0)
        .with_life_time(1);
    let mut world = StigmergyWorld::from_config(&cfg).unwrap();
    let mut org = Organism::new(0, BitBrain::waiting(world.layout()));
    org.evaluate(&mut world).unwrap();
    assert_eq!(org.data.get(SCORE_FIELD), &[1.0]);
}

#[test]
fn hundred_unobstructed_steps_score_one_point_one() {
    let cfg = WorldConfig::default()
        .with_dims(103, 5)
        .with_wall_percent(1.0)
        .with_seed(11);
    let mut world = StigmergyWorld::from_config(&cfg).unwrap();
    assert_eq!(world.grid().count(Cell::Wall), 2 * 103 + 2 * 3);

    // Any interior row without food is a straight 101-cell corridor.
    let food_row = world.food().pos.y;
    let row = (1..=3).find(|&y| y != food_row).unwrap();
    assert!(world.place_agent(Pos::new(1, row), Heading::East));

    let mut brain = BitBrain::forward(world.layout());
    for _ in 0..100 {
        let ev = world.step(&mut brain).unwrap();
        assert!(ev.moved);
    }
    assert_eq!(world.agent().pos, Pos::new(101, row));
    assert!(approx(world.score(), 1.1));

    let ev = world.step(&mut brain).unwrap();
    assert!(ev.bumped);
    assert!(approx(world.score(), 1.1));
}

#[test]
fn written_signal_is_read_back_on_the_next_tick() {
    let cfg = WorldConfig::default().with_seed(5).with_stigmergy_bits(3);
    let mut world = StigmergyWorld::from_config(&cfg).unwrap();
    let write_and_read = ActuatorFrame {
        write: true,
        content: 0b101,
        movement: MoveAction::Wait,
        read: true,
    };
    let mut brain = ScriptedBrain::new(world.layout(), vec![write_and_read, ActuatorFrame::wait()]);

    let ev = world.step(&mut brain).unwrap();
    assert_eq!(ev.wrote, Some(0b101));
    world.step(&mut brain).unwrap();
    world.step(&mut brain).unwrap();

    let frames = brain.seen_frames();
    assert_eq!(frames[0].content, 0);
    assert_eq!(frames[1].content, 0b101);
    // Read control was dropped on the second tick.
    assert_eq!(frames[2].content, 0);
    assert_eq!(world.stigmergy().get(world.agent().pos), 0b101);
}

#[test]
fn food_round_trip_scores_pickup_and_dropoff() {
    let cfg = WorldConfig::default().with_wall_percent(1.0).with_seed(21);
    let mut world = StigmergyWorld::from_config(&cfg).unwrap();
    let mut brain = BitBrain::forward(world.layout());

    let food = world.food().pos;
    let (from, heading) = approach(&world, food);
    assert!(world.place_agent(from, heading));
    let ev = world.step(&mut brain).unwrap();
    assert!(ev.picked_up);
    assert!(world.agent().carrying);
    let after_pickup = BASELINE_SCORE + MOVE_REWARD + PICKUP_REWARD;
    assert!(approx(world.score(), after_pickup));

    let home = world.maze().home;
    let (from, heading) = approach(&world, home);
    assert!(world.place_agent(from, heading));
    let ev = world.step(&mut brain).unwrap();
    assert!(ev.dropped_off);
    assert!(!world.agent().carrying);
    assert!(approx(
        world.score(),
        after_pickup + MOVE_REWARD + DROPOFF_REWARD
    ));
}

#[test]
fn exactly_one_food_and_one_home_after_many_pickups() {
    let cfg = WorldConfig::default().with_wall_percent(1.0).with_seed(8);
    let mut world = StigmergyWorld::from_config(&cfg).unwrap();
    let mut brain = BitBrain::forward(world.layout());

    let mut respawns = 0;
    for _ in 0..20 {
        let food = world.food().pos;
        let (from, heading) = approach(&world, food);
        world.place_agent(from, heading);
        let ev = world.step(&mut brain).unwrap();
        assert!(ev.picked_up);
        respawns += ev.food_respawned as u32;

        let home = world.maze().home;
        let (from, heading) = approach(&world, home);
        world.place_agent(from, heading);
        assert!(world.step(&mut brain).unwrap().dropped_off);

        assert_eq!(world.grid().count(Cell::Food), 1);
        assert_eq!(world.grid().count(Cell::Home), 1);
        assert!((1..=5).contains(&world.food().remaining));
    }
    // At most five pickups per source.
    assert!(respawns >= 20 / 5);
}

#[test]
fn shared_maze_population_is_deterministic() {
    let cfg = WorldConfig::default().with_life_time(100).with_evaluations(3);
    let layout = IoLayout::new(cfg.stigmergy_bits);
    let make = || -> Vec<_> {
        (0..6)
            .map(|id| Organism::new(id, RandomBrain::new(&layout, 40 + id, 0.5)))
            .collect()
    };

    let mut a = make();
    let mut b = make();
    evaluate_generation(&cfg, MazePolicy::PerGeneration, 99, &mut a).unwrap();
    evaluate_generation(&cfg, MazePolicy::PerGeneration, 99, &mut b).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.data.get(SCORE_FIELD), y.data.get(SCORE_FIELD));
        assert_eq!(x.data.get(SCORE_FIELD).len(), 3);
    }
}

#[cfg(feature = "serde")]
#[test]
fn config_from_json_fills_defaults() {
    let cfg = WorldConfig::from_json_str(r#"{ "x_dim": 21, "stigmergy_bits": 4 }"#).unwrap();
    assert_eq!(cfg.x_dim, 21);
    assert_eq!(cfg.y_dim, 15);
    assert_eq!(cfg.stigmergy_bits, 4);
    assert_eq!(cfg.life_time, 1000);

    let world = StigmergyWorld::from_config(&cfg).unwrap();
    assert_eq!(world.layout().input_len(), 40 + 2 + 8 + 4 + 1);
    assert_eq!(world.layout().output_len(), 1 + 4 + 2 + 1);
}
