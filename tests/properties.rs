//! Property-based tests for the problem model and solver.
//!
//! # Invariants tested
//!
//! - **Compatibility:** the cached table matches the skills and capacity rule.
//! - **Sub-matrix:** extracted entries match the source matrix.
//! - **Dimensionality:** a rejected amount leaves the catalog unchanged.
//! - **Feasibility:** every job is served exactly once within capacity.
//! - **Monotonic improvement:** local search never worsens construction.
//! - **Thread count:** more workers never yield a worse best cost.

use std::collections::HashSet;

use proptest::prelude::*;
use u_vrp::distance::{CostMatrix, EuclideanMatrix};
use u_vrp::input::{vehicle_ok_with_job, CompatibilityMatrix, Input};
use u_vrp::models::{Amount, Coordinates, Job, Location, Vehicle};
use u_vrp::solver::SolverConfig;
use u_vrp::Error;

/// A random instance: depot at index 0, one location per job.
#[derive(Debug, Clone)]
struct Instance {
    points: Vec<(i32, i32)>,
    demands: Vec<i64>,
    vehicles: usize,
    capacity: i64,
}

fn instance_strategy() -> impl Strategy<Value = Instance> {
    (1usize..10, 1usize..4).prop_flat_map(|(jobs, vehicles)| {
        (
            prop::collection::vec((0i32..100, 0i32..100), jobs + 1),
            prop::collection::vec(0i64..5, jobs),
            Just(vehicles),
            5i64..20,
        )
            .prop_map(|(points, demands, vehicles, capacity)| Instance {
                points,
                demands,
                vehicles,
                capacity,
            })
    })
}

fn location(instance: &Instance, index: usize) -> Location {
    let (x, y) = instance.points[index];
    Location::with_coordinates(index, Coordinates::new(f64::from(x), f64::from(y)))
}

/// Builds the model; the first vehicle can always carry every job.
fn build(instance: &Instance, config: SolverConfig) -> Input {
    let total: i64 = instance.demands.iter().sum();
    let mut input = Input::new()
        .with_provider(Box::new(EuclideanMatrix::default()))
        .with_config(config);
    for v in 0..instance.vehicles {
        let capacity = if v == 0 {
            total.max(instance.capacity)
        } else {
            instance.capacity
        };
        input
            .add_vehicle(
                Vehicle::new(v as u64, location(instance, 0))
                    .with_end(location(instance, 0))
                    .with_capacity(Amount::new(vec![capacity])),
            )
            .expect("vehicle");
    }
    for (j, &d) in instance.demands.iter().enumerate() {
        input
            .add_job(Job::new(j as u64 + 100, location(instance, j + 1)).with_amount(Amount::new(vec![d])))
            .expect("job");
    }
    input
}

fn skills_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..80, 0..4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn compatibility_matches_rule(
        vehicle_specs in prop::collection::vec((skills_strategy(), prop::option::of((0i64..10, 0i64..10))), 1..4),
        job_specs in prop::collection::vec((skills_strategy(), 0i64..10, 0i64..10), 0..6),
    ) {
        let vehicles: Vec<Vehicle> = vehicle_specs
            .iter()
            .enumerate()
            .map(|(i, (skills, cap))| {
                let v = Vehicle::new(i as u64, Location::new(0)).with_skills(skills.iter().copied());
                match cap {
                    Some((a, b)) => v.with_capacity(Amount::new(vec![*a, *b])),
                    None => v,
                }
            })
            .collect();
        let jobs: Vec<Job> = job_specs
            .iter()
            .enumerate()
            .map(|(i, (skills, a, b))| {
                Job::new(i as u64, Location::new(0))
                    .with_amount(Amount::new(vec![*a, *b]))
                    .with_skills(skills.iter().copied())
            })
            .collect();

        let table = CompatibilityMatrix::compute(&vehicles, &jobs);
        for (v, vehicle) in vehicles.iter().enumerate() {
            for (j, job) in jobs.iter().enumerate() {
                let skills_ok = job.skills().iter().all(|s| vehicle.has_skill(s));
                let capacity_ok = vehicle
                    .capacity()
                    .map_or(true, |c| (0..2).all(|d| job.amount()[d] <= c[d]));
                prop_assert_eq!(table.get(v, j), skills_ok && capacity_ok);
                prop_assert_eq!(vehicle_ok_with_job(vehicle, job), table.get(v, j));
            }
        }
    }

    #[test]
    fn sub_matrix_matches_source(
        size in 1usize..8,
        seed in prop::collection::vec(0u64..1000, 64),
        picks in prop::collection::vec(0usize..8, 0..10),
    ) {
        let rows = (0..size)
            .map(|i| (0..size).map(|j| seed[i * 8 + j]).collect())
            .collect();
        let m = CostMatrix::from_rows(rows).expect("square");
        let indices: Vec<usize> = picks.into_iter().filter(|&i| i < size).collect();

        let sub = m.sub_matrix(&indices).expect("in range");
        prop_assert_eq!(sub.size(), indices.len());
        for (a, &i) in indices.iter().enumerate() {
            for (b, &j) in indices.iter().enumerate() {
                prop_assert_eq!(sub.get(a, b), m.get(i, j));
            }
        }
    }

    #[test]
    fn rejected_amount_leaves_catalog_unchanged(first in 0usize..4, second in 0usize..4) {
        let mut input = Input::new();
        input
            .add_job(Job::new(1, Location::new(0)).with_amount(Amount::zero(first)))
            .expect("first job fixes the dimension");
        let result = input.add_job(Job::new(2, Location::new(0)).with_amount(Amount::zero(second)));
        if first == second {
            prop_assert!(result.is_ok());
            prop_assert_eq!(input.jobs().len(), 2);
        } else {
            prop_assert_eq!(
                result.unwrap_err(),
                Error::DimensionMismatch { expected: first, found: second }
            );
            prop_assert_eq!(input.jobs().len(), 1);
        }
        prop_assert_eq!(input.amount_size(), Some(first));
    }

    #[test]
    fn solution_serves_every_job_once(instance in instance_strategy()) {
        let mut input = build(&instance, SolverConfig::default());
        let solution = input.solve(2).expect("feasible");

        let mut served = HashSet::new();
        for route in &solution.routes {
            for id in route.job_ids() {
                prop_assert!(served.insert(id), "job {} served twice", id);
            }
            let capacity = input
                .vehicles()
                .iter()
                .find(|v| v.id() == route.vehicle)
                .and_then(|v| v.capacity())
                .expect("capacitated");
            prop_assert!(route.amount.fits_in(capacity));
        }
        prop_assert_eq!(served.len(), instance.demands.len());
        prop_assert!(solution.unassigned.is_empty());
        prop_assert_eq!(
            solution.summary.cost,
            solution.routes.iter().map(|r| r.cost).sum::<u64>()
        );
    }

    #[test]
    fn local_search_never_worsens_construction(instance in instance_strategy()) {
        let constructed = build(&instance, SolverConfig::default().with_max_iterations(0))
            .solve(1)
            .expect("feasible");
        let improved = build(&instance, SolverConfig::default())
            .solve(1)
            .expect("feasible");
        prop_assert!(improved.summary.cost <= constructed.summary.cost);
    }

    #[test]
    fn more_threads_never_worse(instance in instance_strategy()) {
        let one = build(&instance, SolverConfig::default()).solve(1).expect("feasible");
        let four = build(&instance, SolverConfig::default()).solve(4).expect("feasible");
        prop_assert!(four.summary.cost <= one.summary.cost);
    }
}

fn line_matrix(n: usize) -> CostMatrix {
    let rows = (0..n)
        .map(|i| (0..n).map(|j| i.abs_diff(j) as u64).collect())
        .collect();
    CostMatrix::from_rows(rows).expect("square")
}

#[test]
fn single_vehicle_visits_every_job() {
    let rows = vec![
        vec![0, 2, 9, 10],
        vec![1, 0, 6, 4],
        vec![15, 7, 0, 8],
        vec![6, 3, 12, 0],
    ];
    let matrix = CostMatrix::from_rows(rows).expect("square");
    let mut input = Input::new();
    input
        .add_vehicle(
            Vehicle::new(0, Location::new(0))
                .with_end(Location::new(0))
                .with_capacity(Amount::new(vec![0])),
        )
        .expect("vehicle");
    for index in 1..=3 {
        input
            .add_job(Job::new(index as u64, Location::new(index)).with_amount(Amount::new(vec![0])))
            .expect("job");
    }
    input.set_matrix(matrix.clone()).expect("matrix");

    let solution = input.solve(1).expect("solved");
    assert_eq!(solution.routes.len(), 1);
    let mut ids = solution.routes[0].job_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);

    // every fixed closed tour over the three jobs
    let tours = [[1, 2, 3], [1, 3, 2], [2, 1, 3], [2, 3, 1], [3, 1, 2], [3, 2, 1]];
    let best = tours
        .iter()
        .map(|t| matrix.get(0, t[0]) + matrix.get(t[0], t[1]) + matrix.get(t[1], t[2]) + matrix.get(t[2], 0))
        .min()
        .unwrap_or(u64::MAX);
    assert_eq!(solution.summary.cost, best);
}

#[test]
fn two_vehicles_share_three_jobs() {
    let mut input = Input::new();
    for id in 0..2 {
        input
            .add_vehicle(
                Vehicle::new(id, Location::new(0))
                    .with_end(Location::new(0))
                    .with_capacity(Amount::new(vec![10])),
            )
            .expect("vehicle");
    }
    for index in 1..=3 {
        input
            .add_job(Job::new(index as u64, Location::new(index)).with_amount(Amount::new(vec![4])))
            .expect("job");
    }
    input.set_matrix(line_matrix(4)).expect("matrix");

    let solution = input.solve(2).expect("solved");
    assert_eq!(solution.num_served(), 3);
    assert_eq!(solution.routes.len(), 2);
    for route in &solution.routes {
        assert!(route.amount[0] <= 10);
    }
}

#[test]
fn jobs_that_fit_alone_but_not_together_are_infeasible() {
    // total demand 9 fits the fleet's 10, but no two jobs share a vehicle
    let mut input = Input::new();
    for id in 0..2 {
        input
            .add_vehicle(
                Vehicle::new(id, Location::new(0))
                    .with_end(Location::new(0))
                    .with_capacity(Amount::new(vec![5])),
            )
            .expect("vehicle");
    }
    for index in 1..=3 {
        input
            .add_job(Job::new(index as u64, Location::new(index)).with_amount(Amount::new(vec![3])))
            .expect("job");
    }
    input.set_matrix(line_matrix(4)).expect("matrix");
    for v in 0..2 {
        for j in 0..3 {
            assert!(input.vehicle_ok_with_job(v, j).expect("in range"));
        }
    }

    assert!(matches!(input.solve(4), Err(Error::InfeasibleProblem(_))));
}

#[test]
fn missing_skill_is_infeasible() {
    let mut input = Input::new();
    input
        .add_vehicle(Vehicle::new(0, Location::new(0)).with_skills([1, 2]))
        .expect("vehicle");
    input
        .add_job(Job::new(1, Location::new(1)).with_skills([5]))
        .expect("job");
    input.set_matrix(line_matrix(2)).expect("matrix");
    assert!(matches!(input.solve(1), Err(Error::InfeasibleProblem(_))));
}

#[test]
fn matching_skill_gives_one_stop_route() {
    let mut input = Input::new();
    input
        .add_vehicle(Vehicle::new(0, Location::new(0)).with_skills([5]))
        .expect("vehicle");
    input
        .add_job(Job::new(1, Location::new(1)).with_skills([5]))
        .expect("job");
    input.set_matrix(line_matrix(2)).expect("matrix");

    let solution = input.solve(1).expect("solved");
    assert_eq!(solution.routes.len(), 1);
    assert_eq!(solution.routes[0].job_ids(), vec![1]);
}

#[test]
fn solution_serializes() {
    let mut input = Input::new();
    input
        .add_vehicle(Vehicle::new(3, Location::new(0)).with_end(Location::new(0)))
        .expect("vehicle");
    input.add_job(Job::new(9, Location::new(1))).expect("job");
    input.set_matrix(line_matrix(2)).expect("matrix");

    let solution = input.solve(1).expect("solved");
    let json = serde_json::to_value(&solution).expect("serializable");
    assert_eq!(json["summary"]["cost"], 2);
    assert_eq!(json["routes"][0]["vehicle"], 3);
    assert_eq!(json["routes"][0]["steps"][1]["type"], "job");
    assert_eq!(json["routes"][0]["steps"][1]["job"], 9);
}
