use highway_traffic_sim_core::deployment::ScheduledDeployment;
use highway_traffic_sim_core::drivers::{DriverDistribution, DriverType};
use highway_traffic_sim_core::simulation::config::WorldConfig;
use highway_traffic_sim_core::simulation::sweep::{run_sweep, summarize};
use highway_traffic_sim_core::simulation::world::World;
use highway_traffic_sim_core::verbose::{LocalLogger, VerboseLevel, set_verbose_level};
use std::env;
use std::process;

// cargo run --bin highway_sim -- --mode no-animation --road-length 1000 --lanes 3 --steps 200
// cargo run --bin highway_sim -- --mode multiple --vehicle-counts "10,20,30" --num-simulations 5

const USAGE: &str = "highway_sim - microscopic multi-lane highway traffic simulator

USAGE:
    highway_sim [OPTIONS]

OPTIONS:
    --road-length <m>              Road length in meters (default 1000)
    --lanes <k>                    Number of lanes (default 3)
    --vehicles <n>                 Initial vehicle count (default 30)
    --distracted-percentage <pct>  Share of distractable drivers, 0-100 (default 10)
    --sim-time <s>                 Simulated time per run in seconds (default 100)
    --dt <s>                       Tick length in seconds (default 0.5)
    --seed <u64>                   PRNG seed for a reproducible run
    --driver-distribution A,N,C,P,S
                                   Five non-negative fractions summing to 1
    --mode <mode>                  normal | no-animation | multiple (default no-animation)
    --steps <n>                    Tick count for single-run modes (default sim-time/dt)
    --num-simulations <n>          Runs per vehicle count in multiple mode (default 1)
    --vehicle-counts \"n1,n2,...\"   Vehicle counts for multiple mode
    --add-vehicle                  Start a scheduled vehicle entry; followed by:
      --vehicle-type <kind>          aggressive|normal|cautious|polite|submissive
      --vehicle-lane <k>             Target lane
      --vehicle-position <m>         Requested spawn position
      --vehicle-velocity <m/s>       Desired velocity
      --vehicle-deploy-time <s>      Deployment time
      --vehicle-distracted           Mark the driver distractable
    --save-animation               Accepted for compatibility; rendering is
                                   owned by the visualization collaborator
    --verbose                      Structured JSON logging at main level
    --help                         Print this help";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    NoAnimation,
    Multiple,
}

#[derive(Debug)]
struct CliOptions {
    config: WorldConfig,
    mode: Mode,
    steps: Option<usize>,
    num_simulations: usize,
    vehicle_counts: Vec<usize>,
    scheduled: Vec<ScheduledDeployment>,
    save_animation: bool,
    verbose: bool,
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("{} needs a value", flag))?;
    raw.parse::<T>().map_err(|_| format!("{}: can't parse '{}'", flag, raw))
}

fn parse_counts(raw: &str) -> Result<Vec<usize>, String> {
    let mut counts = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        counts.push(
            token
                .parse::<usize>()
                .map_err(|_| format!("--vehicle-counts: can't parse '{}'", token))?,
        );
    }
    if counts.is_empty() {
        return Err("--vehicle-counts: no counts given".to_string());
    }
    Ok(counts)
}

/// Mutable scratch for one `--add-vehicle` group.
#[derive(Debug, Clone)]
struct PendingVehicle {
    driver_type: DriverType,
    lane: usize,
    position: f64,
    desired_velocity: f64,
    deploy_time: f64,
    distracted: bool,
}

impl PendingVehicle {
    fn new() -> Self {
        Self {
            driver_type: DriverType::Normal,
            lane: 0,
            position: 0.0,
            desired_velocity: 25.0,
            deploy_time: 0.0,
            distracted: false,
        }
    }

    fn into_entry(self) -> ScheduledDeployment {
        ScheduledDeployment::new(self.driver_type, self.lane, self.deploy_time)
            .with_initial_position(self.position)
            .with_desired_velocity(self.desired_velocity)
            .with_distraction_capability(self.distracted)
            .build()
    }
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut builder = WorldConfig::new();
    let mut mode = Mode::NoAnimation;
    let mut steps = None;
    let mut num_simulations = 1usize;
    let mut vehicle_counts = Vec::new();
    let mut scheduled = Vec::new();
    let mut pending: Option<PendingVehicle> = None;
    let mut save_animation = false;
    let mut verbose = false;

    let mut index = 0;
    while index < args.len() {
        let flag = args[index].as_str();
        let value = args.get(index + 1);
        let mut consumed_value = true;
        match flag {
            "--road-length" => {
                builder = builder.with_road_length(parse_number(flag, value)?);
            }
            "--lanes" => {
                builder = builder.with_lanes_count(parse_number(flag, value)?);
            }
            "--vehicles" => {
                builder = builder.with_n_vehicles(parse_number(flag, value)?);
            }
            "--distracted-percentage" => {
                builder = builder.with_distracted_percentage(parse_number(flag, value)?);
            }
            "--sim-time" => {
                builder = builder.with_simulation_time(parse_number(flag, value)?);
            }
            "--dt" => {
                builder = builder.with_dt(parse_number(flag, value)?);
            }
            "--seed" => {
                builder = builder.with_seed(parse_number(flag, value)?);
            }
            "--driver-distribution" => {
                let raw = value.ok_or("--driver-distribution needs a value")?;
                let distribution =
                    DriverDistribution::parse(raw).map_err(|e| e.to_string())?;
                builder = builder.with_driver_distribution(distribution);
            }
            "--mode" => {
                let raw = value.ok_or("--mode needs a value")?;
                mode = match raw.as_str() {
                    "normal" => Mode::Normal,
                    "no-animation" => Mode::NoAnimation,
                    "multiple" => Mode::Multiple,
                    other => return Err(format!("--mode: unknown mode '{}'", other)),
                };
            }
            "--steps" => {
                steps = Some(parse_number(flag, value)?);
            }
            "--num-simulations" => {
                num_simulations = parse_number(flag, value)?;
            }
            "--vehicle-counts" => {
                let raw = value.ok_or("--vehicle-counts needs a value")?;
                vehicle_counts = parse_counts(raw)?;
            }
            "--add-vehicle" => {
                if let Some(done) = pending.take() {
                    scheduled.push(done.into_entry());
                }
                pending = Some(PendingVehicle::new());
                consumed_value = false;
            }
            "--vehicle-type" => {
                let raw = value.ok_or("--vehicle-type needs a value")?;
                let kind = DriverType::parse(raw)
                    .ok_or_else(|| format!("--vehicle-type: unknown kind '{}'", raw))?;
                if kind.is_obstacle() {
                    return Err("--vehicle-type: obstacles are not schedulable".to_string());
                }
                pending
                    .as_mut()
                    .ok_or("--vehicle-type must follow --add-vehicle")?
                    .driver_type = kind;
            }
            "--vehicle-lane" => {
                pending.as_mut().ok_or("--vehicle-lane must follow --add-vehicle")?.lane =
                    parse_number(flag, value)?;
            }
            "--vehicle-position" => {
                pending.as_mut().ok_or("--vehicle-position must follow --add-vehicle")?.position =
                    parse_number(flag, value)?;
            }
            "--vehicle-velocity" => {
                pending
                    .as_mut()
                    .ok_or("--vehicle-velocity must follow --add-vehicle")?
                    .desired_velocity = parse_number(flag, value)?;
            }
            "--vehicle-deploy-time" => {
                pending
                    .as_mut()
                    .ok_or("--vehicle-deploy-time must follow --add-vehicle")?
                    .deploy_time = parse_number(flag, value)?;
            }
            "--vehicle-distracted" => {
                pending
                    .as_mut()
                    .ok_or("--vehicle-distracted must follow --add-vehicle")?
                    .distracted = true;
                consumed_value = false;
            }
            "--save-animation" => {
                save_animation = true;
                consumed_value = false;
            }
            "--verbose" => {
                verbose = true;
                consumed_value = false;
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => return Err(format!("unknown flag '{}'", other)),
        }
        index += if consumed_value { 2 } else { 1 };
    }
    if let Some(done) = pending.take() {
        scheduled.push(done.into_entry());
    }

    if mode == Mode::Multiple && vehicle_counts.is_empty() {
        return Err("--mode multiple requires --vehicle-counts".to_string());
    }

    let config = builder.build().map_err(|e| e.to_string())?;
    Ok(CliOptions {
        config,
        mode,
        steps,
        num_simulations,
        vehicle_counts,
        scheduled,
        save_animation,
        verbose,
    })
}

fn run_single(options: &CliOptions) -> Result<(), String> {
    let logger = if options.verbose {
        LocalLogger::with_world(VerboseLevel::Main, "cli")
    } else {
        LocalLogger::none()
    };
    let mut world = World::with_logger(options.config.clone(), logger);
    for entry in &options.scheduled {
        world.schedule_vehicle(entry.clone()).map_err(|e| e.to_string())?;
    }

    let steps = options.steps.unwrap_or_else(|| options.config.steps_total());
    println!("Running {} steps without animation...", steps);
    let mean = world.run_steps(steps);

    let snapshot = world.snapshot();
    println!("Non-animated simulation complete");
    println!("Time: {:.1}s, Vehicles: {}", snapshot.time, snapshot.vehicles.len());
    if mean >= 0.0 {
        println!("Average speed: {:.1} m/s ({:.1} km/h)", mean, mean * 3.6);
    } else {
        println!("Average speed: n/a (no vehicles existed)");
    }
    println!("Lane changes: {}", snapshot.stats.lane_changes);
    let per_lane: Vec<String> = snapshot
        .stats
        .vehicles_per_lane
        .iter()
        .enumerate()
        .map(|(lane, count)| format!("Lane {}: {}", lane + 1, count))
        .collect();
    println!("Vehicles per lane: {}", per_lane.join(", "));
    Ok(())
}

fn run_multiple(options: &CliOptions) -> Result<(), String> {
    println!(
        "Running {} simulation(s) per vehicle count {:?}...",
        options.num_simulations, options.vehicle_counts
    );
    let records = run_sweep(&options.config, &options.vehicle_counts, options.num_simulations);

    println!("\nDetailed Results");
    println!("{:<10} {:<6} {:>12} {:>12} {:>12}", "vehicles", "run", "speed m/s", "density", "flow");
    for record in &records {
        println!(
            "{:<10} {:<6} {:>12.3} {:>12.5} {:>12.5}",
            record.vehicle_count, record.run_index, record.mean_speed, record.density, record.flow
        );
    }

    println!("\nSummary Results");
    println!(
        "{:<10} {:<6} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "vehicles", "runs", "mean", "variance", "std", "min", "max"
    );
    for summary in summarize(&records) {
        println!(
            "{:<10} {:<6} {:>10.3} {:>10.4} {:>10.4} {:>10.3} {:>10.3}  (speed)",
            summary.vehicle_count,
            summary.runs,
            summary.speed.mean,
            summary.speed.variance,
            summary.speed.std_dev,
            summary.speed.min,
            summary.speed.max
        );
        println!(
            "{:<10} {:<6} {:>10.5} {:>10.6} {:>10.6} {:>10.5} {:>10.5}  (flow)",
            summary.vehicle_count,
            summary.runs,
            summary.flow.mean,
            summary.flow.variance,
            summary.flow.std_dev,
            summary.flow.min,
            summary.flow.max
        );
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    if options.verbose {
        set_verbose_level(VerboseLevel::Main);
    }

    let result = match options.mode {
        Mode::Normal => {
            // Animation is owned by the external visualization collaborator;
            // the core runs the same loop either way.
            if options.save_animation {
                println!("note: animation rendering is handled by the visualization collaborator");
            }
            run_single(&options)
        }
        Mode::NoAnimation => run_single(&options),
        Mode::Multiple => run_multiple(&options),
    };

    if let Err(message) = result {
        eprintln!("error: {}", message);
        process::exit(2);
    }
}
