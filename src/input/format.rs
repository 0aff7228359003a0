//! Turns raw worker output into the caller-facing [`Solution`].

use std::time::Instant;

use crate::distance::{Cost, CostMatrix, CostMatrixProvider};
use crate::error::Result;
use crate::models::{Amount, ComputingTimes, Location, Route, Solution, Step, StepKind, Summary};
use crate::problems::{ProblemView, RawSolution};

/// Phase checkpoints, each taken once.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timeline {
    pub start_loading: Instant,
    pub end_loading: Instant,
    pub end_solving: Instant,
    pub end_routing: Instant,
}

impl Timeline {
    fn computing_times(&self) -> ComputingTimes {
        ComputingTimes {
            loading: millis(self.start_loading, self.end_loading),
            solving: millis(self.end_loading, self.end_solving),
            routing: millis(self.end_solving, self.end_routing),
        }
    }
}

fn millis(from: Instant, to: Instant) -> u64 {
    u64::try_from(to.saturating_duration_since(from).as_millis()).unwrap_or(u64::MAX)
}

/// Options of the routing phase.
pub(crate) struct RouteOptions<'p> {
    /// Matrix used to price the formatted routes.
    pub matrix: &'p CostMatrix,
    /// Row of `matrix` for a caller location index.
    pub row: &'p dyn Fn(usize) -> usize,
    /// Geometry source, straight segments when absent.
    pub provider: Option<&'p dyn CostMatrixProvider>,
    /// Whether geometry was requested.
    pub geometry: bool,
    /// Whether every location carries coordinates.
    pub coordinates: bool,
}

/// Builds one [`Route`] per vehicle that serves at least one job.
pub(crate) fn build_routes(
    view: &ProblemView<'_>,
    raw: &RawSolution,
    options: &RouteOptions<'_>,
) -> Result<Vec<Route>> {
    let mut routes = Vec::new();
    for state in raw.routes().iter().filter(|r| !r.is_empty()) {
        let vehicle = view.vehicle(state.vehicle());

        let mut path: Vec<(StepKind, Location, Option<u64>)> =
            vec![(StepKind::Start, *vehicle.start(), None)];
        for &j in state.jobs() {
            let job = view.job(j);
            path.push((StepKind::Job, *job.location(), Some(job.id())));
        }
        if let Some(end) = vehicle.end() {
            path.push((StepKind::End, *end, None));
        }

        let cost: Cost = path
            .windows(2)
            .map(|w| {
                let (from, to) = ((options.row)(w[0].1.index()), (options.row)(w[1].1.index()));
                options.matrix.get(from, to)
            })
            .sum();
        debug_assert_eq!(cost, state.cost());

        let geometry = if options.geometry && options.coordinates {
            let stops: Vec<Location> = path.iter().map(|s| s.1).collect();
            match options.provider {
                Some(p) => p.route_geometry(&stops)?,
                None => stops.iter().map(Location::coordinates).collect(),
            }
        } else {
            None
        };

        let steps = path
            .into_iter()
            .map(|(kind, location, job)| Step {
                kind,
                location_index: location.index(),
                coordinates: if options.coordinates {
                    location.coordinates()
                } else {
                    None
                },
                job,
            })
            .collect();

        routes.push(Route {
            vehicle: vehicle.id(),
            cost,
            amount: state.load().clone(),
            steps,
            geometry,
        });
    }
    Ok(routes)
}

/// Assembles the final solution.
pub(crate) fn solution(routes: Vec<Route>, amount_size: usize, timeline: &Timeline) -> Solution {
    let mut amount = Amount::zero(amount_size);
    for route in &routes {
        amount += &route.amount;
    }
    Solution {
        code: 0,
        summary: Summary {
            cost: routes.iter().map(|r| r.cost).sum(),
            routes: routes.len(),
            unassigned: 0,
            amount,
            computing_times: timeline.computing_times(),
        },
        routes,
        unassigned: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CompatibilityMatrix;
    use crate::models::{Coordinates, Job, Vehicle};

    fn at(index: usize, lon: f64) -> Location {
        Location::with_coordinates(index, Coordinates::new(lon, 0.0))
    }

    #[test]
    fn test_routes_use_caller_indices() {
        // caller matrix over indices 0..6; only 2, 4 and 5 are used
        let rows = (0..6)
            .map(|i: usize| (0..6).map(|j: usize| i.abs_diff(j) as u64).collect())
            .collect();
        let full = CostMatrix::from_rows(rows).expect("square");
        let jobs = vec![Job::new(10, at(4, 4.0)), Job::new(11, at(5, 5.0))];
        let vehicles = vec![
            Vehicle::new(7, at(2, 2.0)).with_end(at(2, 2.0)),
            Vehicle::new(8, at(2, 2.0)),
        ];
        let c = CompatibilityMatrix::compute(&vehicles, &jobs);
        let used = [2, 4, 5];
        let sub = full.sub_matrix(&used).expect("in range");
        let view = ProblemView::new(
            &jobs,
            &vehicles,
            &c,
            sub,
            |i| used.iter().position(|&u| u == i).unwrap_or(0),
            0,
        );
        let raw = RawSolution::from_sequences(&view, vec![vec![1, 0]]);

        let options = RouteOptions {
            matrix: &full,
            row: &|i| i,
            provider: None,
            geometry: true,
            coordinates: true,
        };
        let routes = build_routes(&view, &raw, &options).expect("routes");
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.vehicle, 7);
        assert_eq!(route.job_ids(), vec![11, 10]);
        // 2→5→4→2
        assert_eq!(route.cost, 6);
        let indices: Vec<usize> = route.steps.iter().map(|s| s.location_index).collect();
        assert_eq!(indices, vec![2, 5, 4, 2]);
        assert_eq!(route.steps[3].kind, StepKind::End);
        assert_eq!(route.geometry.as_ref().map(Vec::len), Some(4));
        assert_eq!(route.steps[1].coordinates, Some(Coordinates::new(5.0, 0.0)));
    }

    #[test]
    fn test_no_coordinates_without_full_coverage() {
        let full = CostMatrix::from_rows(vec![vec![0, 3], vec![3, 0]]).expect("square");
        let jobs = vec![Job::new(1, at(1, 1.0))];
        let vehicles = vec![Vehicle::new(0, Location::new(0))];
        let c = CompatibilityMatrix::compute(&vehicles, &jobs);
        let view = ProblemView::new(&jobs, &vehicles, &c, full.clone(), |i| i, 0);
        let raw = RawSolution::from_sequences(&view, vec![vec![0]]);

        let options = RouteOptions {
            matrix: &full,
            row: &|i| i,
            provider: None,
            geometry: true,
            coordinates: false,
        };
        let routes = build_routes(&view, &raw, &options).expect("routes");
        assert!(routes[0].geometry.is_none());
        assert!(routes[0].steps.iter().all(|s| s.coordinates.is_none()));
        assert_eq!(routes[0].cost, 3);
    }

    #[test]
    fn test_summary() {
        let now = Instant::now();
        let timeline = Timeline {
            start_loading: now,
            end_loading: now,
            end_solving: now,
            end_routing: now,
        };
        let route = Route {
            vehicle: 1,
            cost: 5,
            amount: Amount::new(vec![2]),
            steps: Vec::new(),
            geometry: None,
        };
        let sol = solution(vec![route.clone(), route], 1, &timeline);
        assert_eq!(sol.summary.cost, 10);
        assert_eq!(sol.summary.routes, 2);
        assert_eq!(sol.summary.amount.as_slice(), &[4]);
        assert_eq!(sol.summary.computing_times, ComputingTimes::default());
    }
}
