use tracing::info;
use tracing_subscriber::EnvFilter;
use ucopt::{problems, CommitmentOutcome, SolveService, SolverConfig, UnitCommitmentSpec};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let service = SolveService::from_config(&SolverConfig::default())?;
    info!(solver = service.solver_name(), "solver ready");

    for problem in [problems::product_mix()?, problems::farm_allocation()?] {
        let name = problem.name.clone();
        let solution = service.solve(problem).await?;
        info!(
            problem = %name,
            status = %solution.status,
            objective = ?solution.optimal_value,
            values = ?solution.variable_values,
        );
    }

    let config = SolverConfig {
        time_limit: Some(60.0),
        ..SolverConfig::default()
    };
    match service
        .solve_unit_commitment(&UnitCommitmentSpec::reference(), config)
        .await?
    {
        CommitmentOutcome::Scheduled(schedule) => {
            info!(objective = schedule.objective, "unit commitment solved");
            for (unit, row) in schedule.power.iter().enumerate() {
                info!(unit, power = ?row, online = ?schedule.online[unit]);
            }
        }
        outcome => info!(?outcome, "unit commitment has no schedule"),
    }

    Ok(())
}
