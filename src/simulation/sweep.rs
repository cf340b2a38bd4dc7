use crate::simulation::config::WorldConfig;
use crate::simulation::world::World;
use crate::verbose::EVENT_SWEEP_RUN;
use crate::log_main;
use std::thread;

/// One row of detailed sweep results: a single simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Initial population size of the run.
    pub vehicle_count: usize,
    /// Repetition index within the vehicle count.
    pub run_index: usize,
    /// Time-averaged mean velocity over the run (m/s); -1.0 when the run
    /// never had a vehicle.
    pub mean_speed: f64,
    /// Vehicles per meter of lane: N / (L * K).
    pub density: f64,
    /// Traffic flow: density * mean speed (vehicles/s per lane-meter basis).
    pub flow: f64,
}

/// Aggregates over a group of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl AggregateStats {
    /// Computes mean, population variance, standard deviation, min, and max.
    /// Returns `None` on an empty sample set.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for sample in samples {
            min = min.min(*sample);
            max = max.max(*sample);
        }
        Some(Self { mean, variance, std_dev: variance.sqrt(), min, max })
    }
}

/// Grouped aggregates for one vehicle count: the summary row the reporter
/// collaborator renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub vehicle_count: usize,
    pub runs: usize,
    pub speed: AggregateStats,
    pub flow: AggregateStats,
}

/// Runs `num_simulations` independent simulations for each vehicle count.
///
/// Every run owns an isolated [`World`] and pseudo-random stream and shares
/// nothing mutable with its siblings, so the runs of one vehicle count
/// execute in parallel threads; results are collected only after a run
/// terminates. When the base configuration carries a seed, run `i` of
/// count `c` derives its own seed from it so repetitions stay distinct yet
/// the whole sweep is reproducible.
pub fn run_sweep(
    base: &WorldConfig,
    vehicle_counts: &[usize],
    num_simulations: usize,
) -> Vec<RunRecord> {
    let mut records = Vec::with_capacity(vehicle_counts.len() * num_simulations);
    for (count_index, &vehicle_count) in vehicle_counts.iter().enumerate() {
        let mut configs = Vec::with_capacity(num_simulations);
        for run_index in 0..num_simulations {
            let mut config = base.clone();
            config.n_vehicles = vehicle_count;
            config.seed = base
                .seed
                .map(|seed| seed + (count_index * num_simulations + run_index) as u64);
            configs.push((run_index, config));
        }

        let mut count_records: Vec<RunRecord> = thread::scope(|scope| {
            let handles: Vec<_> = configs
                .into_iter()
                .map(|(run_index, config)| {
                    scope.spawn(move || {
                        let density =
                            vehicle_count as f64 / (config.road_length * config.lanes_count as f64);
                        let steps = config.steps_total();
                        let mut world = World::new(config);
                        let mean_speed = world.run_steps(steps);
                        let flow = if mean_speed >= 0.0 { density * mean_speed } else { 0.0 };
                        RunRecord { vehicle_count, run_index, mean_speed, density, flow }
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("sweep run panicked"))
                .collect()
        });

        count_records.sort_by_key(|record| record.run_index);
        log_main!(
            EVENT_SWEEP_RUN,
            "Sweep group finished",
            vehicle_count = vehicle_count,
            runs = num_simulations
        );
        records.extend(count_records);
    }
    records
}

/// Collapses detailed records into one summary row per vehicle count,
/// preserving the order in which the counts first appear.
pub fn summarize(records: &[RunRecord]) -> Vec<SweepSummary> {
    let mut counts: Vec<usize> = Vec::new();
    for record in records {
        if !counts.contains(&record.vehicle_count) {
            counts.push(record.vehicle_count);
        }
    }

    let mut summaries = Vec::with_capacity(counts.len());
    for vehicle_count in counts {
        let speeds: Vec<f64> = records
            .iter()
            .filter(|r| r.vehicle_count == vehicle_count)
            .map(|r| r.mean_speed)
            .collect();
        let flows: Vec<f64> = records
            .iter()
            .filter(|r| r.vehicle_count == vehicle_count)
            .map(|r| r.flow)
            .collect();
        let (Some(speed), Some(flow)) =
            (AggregateStats::from_samples(&speeds), AggregateStats::from_samples(&flows))
        else {
            continue;
        };
        summaries.push(SweepSummary { vehicle_count, runs: speeds.len(), speed, flow });
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> WorldConfig {
        WorldConfig::new()
            .with_road_length(500.0)
            .with_lanes_count(2)
            .with_simulation_time(5.0)
            .with_dt(0.5)
            .with_seed(123)
            .build()
            .unwrap()
    }

    #[test]
    fn test_aggregates() {
        let stats = AggregateStats::from_samples(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.variance, 1.25);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!(AggregateStats::from_samples(&[]).is_none());
    }

    #[test]
    fn test_sweep_shape() {
        let records = run_sweep(&quick_config(), &[5, 10], 3);
        assert_eq!(records.len(), 6);
        assert_eq!(records.iter().filter(|r| r.vehicle_count == 5).count(), 3);
        for record in &records {
            let expected_density = record.vehicle_count as f64 / (500.0 * 2.0);
            assert!((record.density - expected_density).abs() < 1e-12);
            if record.mean_speed >= 0.0 {
                assert!((record.flow - record.density * record.mean_speed).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_sweep_is_reproducible_with_seed() {
        let first = run_sweep(&quick_config(), &[8], 2);
        let second = run_sweep(&quick_config(), &[8], 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_groups_by_count() {
        let records = run_sweep(&quick_config(), &[5, 10], 2);
        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].vehicle_count, 5);
        assert_eq!(summaries[0].runs, 2);
        assert!(summaries[0].speed.min <= summaries[0].speed.max);
    }
}
