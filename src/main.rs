use stigmergy::prelude::*;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return;
    }
    if args.len() >= 2 && args[1] == "render" {
        let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1);
        run_render(seed);
        return;
    }
    if args.len() >= 2 && args[1] == "walk" {
        let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1);
        run_walk(seed);
        return;
    }

    if args.len() >= 2 {
        eprintln!("Unknown command: {}", args[1]);
        print_help();
        std::process::exit(2);
    }

    // Minimal demo:
    // - one default 15x15 maze
    // - a handful of random brains with different firing rates
    // - several trials each, reporting the score spread
    let cfg = WorldConfig::default().with_seed(2026).with_evaluations(5);
    let maze = match MazeInstance::from_config(&cfg) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("maze generation failed: {e}");
            std::process::exit(1);
        }
    };
    let layout = IoLayout::new(cfg.stigmergy_bits);

    let mut orgs: Vec<Organism<RandomBrain>> = [0.1f32, 0.3, 0.5, 0.7, 0.9]
        .iter()
        .enumerate()
        .map(|(i, &rate)| Organism::new(i as u64, RandomBrain::new(&layout, 100 + i as u64, rate)))
        .collect();

    if let Err(e) = evaluate_population(&maze, &mut orgs) {
        eprintln!("evaluation failed: {e}");
        std::process::exit(1);
    }

    println!("{}", StigmergyWorld::new(maze).render_grid());
    for org in &orgs {
        if let Some(s) = org.data.summary(SCORE_FIELD) {
            println!(
                "org={} trials={} mean={:.3} min={:.3} max={:.3} sd={:.3}",
                org.id, s.count, s.mean, s.min, s.max, s.std_dev
            );
        }
    }
}

fn print_help() {
    println!("stigmergy (maze environment for evolved brains)");
    println!("usage:");
    println!("  cargo run");
    println!("  cargo run -- render [seed]");
    println!("  cargo run -- walk [seed]");
    println!("  cargo run -- --help");
}

fn run_render(seed: u64) {
    let cfg = WorldConfig::default();
    match MazeInstance::generate(&cfg, seed) {
        Ok(maze) => {
            let world = StigmergyWorld::new(maze);
            print!("{}", world.render_grid());
            println!(
                "food={:?} ({} left) home={:?} heading={:?}",
                world.food().pos,
                world.food().remaining,
                world.maze().home,
                world.agent().heading
            );
        }
        Err(e) => eprintln!("maze generation failed: {e}"),
    }
}

// Random walker that writes and reads signals, printing both layers at the end.
fn run_walk(seed: u64) {
    let cfg = WorldConfig::default().with_stigmergy_bits(2).with_life_time(300);
    let mut world = match MazeInstance::generate(&cfg, seed) {
        Ok(maze) => StigmergyWorld::new(maze),
        Err(e) => {
            eprintln!("maze generation failed: {e}");
            return;
        }
    };
    let mut brain = RandomBrain::new(world.layout(), seed, 0.5);

    let mut pickups = 0;
    let mut dropoffs = 0;
    for t in 0..cfg.life_time {
        match world.step(&mut brain) {
            Ok(ev) => {
                pickups += ev.picked_up as u32;
                dropoffs += ev.dropped_off as u32;
            }
            Err(e) => {
                eprintln!("t={t} step failed: {e}");
                return;
            }
        }
    }

    print!("{}", world.render_grid());
    print!("{}", world.render_stigmergy());
    println!(
        "score={:.3} pickups={} dropoffs={}",
        world.score(),
        pickups,
        dropoffs
    );
}
