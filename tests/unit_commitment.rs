use approx::assert_relative_eq;
use ucopt::unit_commitment::{InitialState, PeriodSpec, UnitSpec};
use ucopt::{
    CommitmentOutcome, MicroLpSolver, PeriodIndex, SolutionStatus, SolveService, SolverConfig,
    SolverService, UnitCommitmentModel, UnitCommitmentSpec, UnitId,
};
use std::sync::Arc;

const TOLERANCE: f64 = 1e-6;

fn single_unit(demand: f64) -> UnitCommitmentSpec {
    UnitCommitmentSpec::new(
        vec![UnitSpec {
            max_output: 100.0,
            min_output: 10.0,
            ramp_up: 100.0,
            ramp_down: 100.0,
            variable_cost: 1.0,
            fixed_cost: 1.0,
            startup_cost: 1.0,
            shutdown_cost: 1.0,
            initial: InitialState::default(),
        }],
        vec![PeriodSpec {
            demand,
            reserve: 0.0,
        }],
    )
    .unwrap()
}

#[test]
fn single_unit_single_period() {
    let model = UnitCommitmentModel::build(&single_unit(50.0)).unwrap();
    let solution = MicroLpSolver::new().solve(&model.problem).unwrap();
    assert_eq!(solution.status, SolutionStatus::Optimal);

    let schedule = model.schedule(&solution).unwrap();
    let (u, t) = (UnitId(0), PeriodIndex(0));
    assert!(schedule.is_online(u, t));
    assert!(schedule.is_started(u, t));
    assert!(!schedule.is_shut_down(u, t));
    assert!(schedule.output(u, t) >= 50.0 - TOLERANCE);

    // fixed + variable * 50 + startup
    assert_relative_eq!(schedule.objective, 1.0 + 50.0 + 1.0, epsilon = TOLERANCE);
}

#[test]
fn demand_above_total_capacity_is_infeasible() {
    let mut spec = UnitCommitmentSpec::reference();
    spec.periods[1].demand = spec.total_capacity() + 1.0;

    let model = UnitCommitmentModel::build(&spec).unwrap();
    let solution = MicroLpSolver::new().solve(&model.problem).unwrap();
    assert_eq!(solution.status, SolutionStatus::Infeasible);
    assert!(model.schedule(&solution).is_none());
}

#[test]
fn reference_schedule_satisfies_every_constraint() {
    let spec = UnitCommitmentSpec::reference();
    let model = UnitCommitmentModel::build(&spec).unwrap();
    let solution = MicroLpSolver::new().solve(&model.problem).unwrap();
    assert!(solution.is_optimal(), "{}", solution.message);

    // substitute the assignment back into the model
    let values = &solution.variable_values;
    for constraint in &model.problem.constraints {
        assert!(
            constraint.violation(values) <= TOLERANCE,
            "{} violated by {}",
            constraint.name,
            constraint.violation(values)
        );
    }
    assert!(solution.quality.max_constraint_violation <= TOLERANCE);
    assert!(solution.quality.max_integrality_violation <= TOLERANCE);

    let schedule = model.schedule(&solution).unwrap();
    for (k, period) in spec.period_indices().zip(&spec.periods) {
        assert!(schedule.total_output(k) >= period.demand - TOLERANCE);

        let available: f64 = spec
            .unit_ids()
            .filter(|&j| schedule.is_online(j, k))
            .map(|j| spec.unit(j).max_output)
            .sum();
        assert!(available >= period.demand + period.reserve - TOLERANCE);

        for j in spec.unit_ids() {
            let unit = spec.unit(j);
            let p = schedule.output(j, k);
            if schedule.is_online(j, k) {
                assert!(p >= unit.min_output - TOLERANCE);
                assert!(p <= unit.max_output + TOLERANCE);
            } else {
                assert!(p.abs() <= TOLERANCE);
            }
        }
    }

    // every unit starts offline, so each online unit in t0 was started up
    for j in spec.unit_ids() {
        let t0 = PeriodIndex(0);
        assert_eq!(schedule.is_online(j, t0), schedule.is_started(j, t0));
    }

    assert_relative_eq!(
        schedule.objective,
        model.problem.objective.evaluate(values),
        epsilon = TOLERANCE
    );
}

#[test]
fn building_twice_gives_identical_models() {
    let spec = UnitCommitmentSpec::reference();
    let first = UnitCommitmentModel::build(&spec).unwrap();
    let second = UnitCommitmentModel::build(&spec).unwrap();
    assert_eq!(first.problem, second.problem);
    assert_eq!(first.variables, second.variables);
}

#[test]
fn binary_bound_count() {
    for (units, periods) in [(1, 1), (3, 3), (2, 5)] {
        let mut spec = UnitCommitmentSpec::reference();
        spec.units.truncate(units);
        spec.periods = vec![
            PeriodSpec {
                demand: 10.0,
                reserve: 1.0,
            };
            periods
        ];
        let model = UnitCommitmentModel::build(&spec).unwrap();
        let bounds = ["startup_bounds", "shutdown_bounds", "online_bounds"]
            .iter()
            .map(|g| model.problem.constraints_in_group(g).count())
            .sum::<usize>();
        assert_eq!(bounds, 6 * units * periods);
    }
}

#[test]
fn first_transition_without_initial_online_has_zero_rhs() {
    let spec = UnitCommitmentSpec::reference();
    let model = UnitCommitmentModel::build(&spec).unwrap();
    let vars = &model.variables;

    for j in spec.unit_ids() {
        let name = format!("online_transition[{j},t0]");
        let row = model
            .problem
            .constraints
            .iter()
            .find(|c| c.name == name)
            .unwrap();
        let t0 = PeriodIndex(0);
        assert_eq!(row.bound, 0.0);
        assert_eq!(row.coefficients[vars.startup[(j, t0)].index()], 1.0);
        assert_eq!(row.coefficients[vars.shutdown[(j, t0)].index()], -1.0);
        assert_eq!(row.coefficients[vars.online[(j, t0)].index()], -1.0);
        assert_eq!(row.coefficients.iter().filter(|&&c| c != 0.0).count(), 3);
    }
}

#[test]
fn online_unit_before_horizon_need_not_start() {
    let mut spec = single_unit(50.0);
    spec.units[0].initial = InitialState {
        power_output: 50.0,
        online: true,
        ..InitialState::default()
    };

    let model = UnitCommitmentModel::build(&spec).unwrap();
    let solution = MicroLpSolver::new().solve(&model.problem).unwrap();
    let schedule = model.schedule(&solution).unwrap();

    assert!(!schedule.is_started(UnitId(0), PeriodIndex(0)));
    assert_relative_eq!(schedule.objective, 1.0 + 50.0, epsilon = TOLERANCE);
}

#[tokio::test]
async fn service_reports_schedule_and_infeasibility() {
    let service = SolveService::new(Arc::new(MicroLpSolver::new()));
    let config = SolverConfig {
        time_limit: Some(60.0),
        ..SolverConfig::default()
    };

    let outcome = service
        .solve_unit_commitment(&single_unit(50.0), config.clone())
        .await
        .unwrap();
    assert!(matches!(outcome, CommitmentOutcome::Scheduled(_)));

    let outcome = service
        .solve_unit_commitment(&single_unit(150.0), config)
        .await
        .unwrap();
    assert!(matches!(outcome, CommitmentOutcome::Infeasible));
}

#[tokio::test]
async fn service_rejects_invalid_spec_before_solving() {
    let service = SolveService::new(Arc::new(MicroLpSolver::new()));
    let mut spec = single_unit(50.0);
    spec.units[0].min_output = 500.0;

    let err = service
        .solve_unit_commitment(&spec, SolverConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ucopt::Error::Model(ucopt::ModelError::Configuration(_))));
}

#[cfg(not(feature = "highs"))]
#[tokio::test]
async fn service_honours_configured_backend() {
    let service = SolveService::new(Arc::new(MicroLpSolver::new()));
    let config = SolverConfig {
        backend: ucopt::SolverBackend::Highs,
        ..SolverConfig::default()
    };

    let err = service
        .solve_unit_commitment(&UnitCommitmentSpec::reference(), config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ucopt::Error::Solver(ucopt::SolverError::SolverNotAvailable(_))
    ));
}
