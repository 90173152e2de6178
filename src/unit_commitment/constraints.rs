//! Constraint rules of the unit-commitment formulation.
//!
//! Each rule is a pure function from the unit/period data and the variable
//! handles to a finished list of constraints. [`commitment_constraints`]
//! collects them, one group per rule, in [`ConstraintRule::ALL`] order.

use std::fmt;

use super::model::CommitmentVariables;
use super::spec::UnitCommitmentSpec;
use crate::builder::{
    ConstraintSet, LinearConstraint, LinearExpr, PeriodIndex, UnitId, VariableMatrix,
};

/// Rule a constraint group encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintRule {
    MinOutput,
    MaxOutput,
    RampUp,
    RampDown,
    OnlineTransition,
    Demand,
    Reserve,
    StartupBounds,
    ShutdownBounds,
    OnlineBounds,
}

impl ConstraintRule {
    pub const ALL: [ConstraintRule; 10] = [
        ConstraintRule::MinOutput,
        ConstraintRule::MaxOutput,
        ConstraintRule::RampUp,
        ConstraintRule::RampDown,
        ConstraintRule::OnlineTransition,
        ConstraintRule::Demand,
        ConstraintRule::Reserve,
        ConstraintRule::StartupBounds,
        ConstraintRule::ShutdownBounds,
        ConstraintRule::OnlineBounds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintRule::MinOutput => "min_output",
            ConstraintRule::MaxOutput => "max_output",
            ConstraintRule::RampUp => "ramp_up",
            ConstraintRule::RampDown => "ramp_down",
            ConstraintRule::OnlineTransition => "online_transition",
            ConstraintRule::Demand => "demand",
            ConstraintRule::Reserve => "reserve",
            ConstraintRule::StartupBounds => "startup_bounds",
            ConstraintRule::ShutdownBounds => "shutdown_bounds",
            ConstraintRule::OnlineBounds => "online_bounds",
        }
    }

    fn generate(
        self,
        spec: &UnitCommitmentSpec,
        vars: &CommitmentVariables,
    ) -> Vec<LinearConstraint> {
        match self {
            ConstraintRule::MinOutput => min_output(spec, vars),
            ConstraintRule::MaxOutput => max_output(spec, vars),
            ConstraintRule::RampUp => ramp_up(spec, vars),
            ConstraintRule::RampDown => ramp_down(spec, vars),
            ConstraintRule::OnlineTransition => online_transition(spec, vars),
            ConstraintRule::Demand => demand(spec, vars),
            ConstraintRule::Reserve => reserve(spec, vars),
            ConstraintRule::StartupBounds => binary_bounds(&vars.startup),
            ConstraintRule::ShutdownBounds => binary_bounds(&vars.shutdown),
            ConstraintRule::OnlineBounds => binary_bounds(&vars.online),
        }
    }
}

impl fmt::Display for ConstraintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every rule, grouped and ordered.
pub fn commitment_constraints(
    spec: &UnitCommitmentSpec,
    vars: &CommitmentVariables,
) -> ConstraintSet {
    ConstraintRule::ALL
        .into_iter()
        .fold(ConstraintSet::new(), |set, rule| {
            set.with_group(rule.as_str(), rule.generate(spec, vars))
        })
}

/// `p / min - v >= 0`, or `p >= 0` for units without a minimum output.
pub fn min_output(spec: &UnitCommitmentSpec, vars: &CommitmentVariables) -> Vec<LinearConstraint> {
    let mut out = Vec::new();
    for k in spec.period_indices() {
        for j in spec.unit_ids() {
            let min = spec.unit(j).min_output;
            let p = vars.power[(j, k)];
            let v = vars.online[(j, k)];
            let lhs = if min > 0.0 {
                (1.0 / min) * p - v
            } else {
                LinearExpr::from(p)
            };
            out.push(lhs.geq(0.0).named(format!("min_output[{j},{k}]")));
        }
    }
    out
}

/// `p / max - v <= 0`
pub fn max_output(spec: &UnitCommitmentSpec, vars: &CommitmentVariables) -> Vec<LinearConstraint> {
    let mut out = Vec::new();
    for k in spec.period_indices() {
        for j in spec.unit_ids() {
            let max = spec.unit(j).max_output;
            let lhs = (1.0 / max) * vars.power[(j, k)] - vars.online[(j, k)];
            out.push(lhs.leq(0.0).named(format!("max_output[{j},{k}]")));
        }
    }
    out
}

/// Output one period earlier: `p[j,k-1]`, or the pre-horizon output at k = 0.
fn previous_output(
    spec: &UnitCommitmentSpec,
    vars: &CommitmentVariables,
    j: UnitId,
    k: PeriodIndex,
) -> LinearExpr {
    match k.previous() {
        Some(prev) => LinearExpr::from(vars.power[(j, prev)]),
        None => LinearExpr::constant(spec.unit(j).initial.power_output),
    }
}

/// `p[k] - p[k-1] <= ramp_up`
pub fn ramp_up(spec: &UnitCommitmentSpec, vars: &CommitmentVariables) -> Vec<LinearConstraint> {
    let mut out = Vec::new();
    for k in spec.period_indices() {
        for j in spec.unit_ids() {
            let lhs = vars.power[(j, k)] - previous_output(spec, vars, j, k);
            out.push(
                lhs.leq(spec.unit(j).ramp_up)
                    .named(format!("ramp_up[{j},{k}]")),
            );
        }
    }
    out
}

/// `p[k-1] - p[k] <= ramp_down`
pub fn ramp_down(spec: &UnitCommitmentSpec, vars: &CommitmentVariables) -> Vec<LinearConstraint> {
    let mut out = Vec::new();
    for k in spec.period_indices() {
        for j in spec.unit_ids() {
            let lhs = previous_output(spec, vars, j, k) - vars.power[(j, k)];
            out.push(
                lhs.leq(spec.unit(j).ramp_down)
                    .named(format!("ramp_down[{j},{k}]")),
            );
        }
    }
    out
}

/// `y - z - v + v[k-1] = 0`; at k = 0 the unit's own pre-horizon online flag
/// takes the place of `v[k-1]`, giving `y - z - v = -online₀`.
pub fn online_transition(
    spec: &UnitCommitmentSpec,
    vars: &CommitmentVariables,
) -> Vec<LinearConstraint> {
    let mut out = Vec::new();
    for k in spec.period_indices() {
        for j in spec.unit_ids() {
            let lhs = vars.startup[(j, k)] - vars.shutdown[(j, k)] - vars.online[(j, k)];
            let constraint = match k.previous() {
                Some(prev) => (lhs + vars.online[(j, prev)]).equals(0.0),
                None => {
                    let online0 = if spec.unit(j).initial.online { 1.0 } else { 0.0 };
                    lhs.equals(-online0)
                }
            };
            out.push(constraint.named(format!("online_transition[{j},{k}]")));
        }
    }
    out
}

/// `Σⱼ p[j,k] >= demand[k]`
pub fn demand(spec: &UnitCommitmentSpec, vars: &CommitmentVariables) -> Vec<LinearConstraint> {
    spec.period_indices()
        .map(|k| {
            let supply: LinearExpr = vars.power.column(k).map(LinearExpr::from).sum();
            supply
                .geq(spec.period(k).demand)
                .named(format!("demand[{k}]"))
        })
        .collect()
}

/// `Σⱼ max[j]·v[j,k] >= demand[k] + reserve[k]`
pub fn reserve(spec: &UnitCommitmentSpec, vars: &CommitmentVariables) -> Vec<LinearConstraint> {
    spec.period_indices()
        .map(|k| {
            let available: LinearExpr = spec
                .unit_ids()
                .map(|j| spec.unit(j).max_output * vars.online[(j, k)])
                .sum();
            let period = spec.period(k);
            available
                .geq(period.demand + period.reserve)
                .named(format!("reserve[{k}]"))
        })
        .collect()
}

/// `x <= 1` and `x >= 0` for every entry of a binary matrix.
pub fn binary_bounds(matrix: &VariableMatrix) -> Vec<LinearConstraint> {
    let mut out = Vec::with_capacity(2 * matrix.unit_count() * matrix.period_count());
    for j in matrix.units() {
        for k in matrix.periods() {
            let x = matrix[(j, k)];
            let name = matrix.name();
            out.push(LinearExpr::from(x).leq(1.0).named(format!("{name}_upper[{j},{k}]")));
            out.push(LinearExpr::from(x).geq(0.0).named(format!("{name}_lower[{j},{k}]")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::VariableRegistry;
    use crate::domain::ConstraintType;

    fn setup(spec: &UnitCommitmentSpec) -> CommitmentVariables {
        let mut registry = VariableRegistry::new();
        CommitmentVariables::register(&mut registry, spec).unwrap()
    }

    #[test]
    fn group_order_and_sizes() {
        let spec = UnitCommitmentSpec::reference();
        let vars = setup(&spec);
        let set = commitment_constraints(&spec, &vars);

        let names: Vec<_> = set.groups().iter().map(|g| g.name.as_str()).collect();
        let expected: Vec<_> = ConstraintRule::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, expected);

        let cells = spec.unit_count() * spec.period_count();
        assert_eq!(set.group("min_output").unwrap().constraints.len(), cells);
        assert_eq!(set.group("ramp_up").unwrap().constraints.len(), cells);
        assert_eq!(set.group("demand").unwrap().constraints.len(), spec.period_count());
        assert_eq!(set.group("reserve").unwrap().constraints.len(), spec.period_count());

        let bounds: usize = ["startup_bounds", "shutdown_bounds", "online_bounds"]
            .iter()
            .map(|g| set.group(g).unwrap().constraints.len())
            .sum();
        assert_eq!(bounds, 6 * cells);
    }

    #[test]
    fn first_period_ramp_uses_initial_output() {
        let mut spec = UnitCommitmentSpec::reference();
        spec.units[0].initial.power_output = 120.0;
        let vars = setup(&spec);

        let ramps = ramp_up(&spec, &vars);
        let first = &ramps[0];
        assert_eq!(first.name(), "ramp_up[u0,t0]");
        assert_eq!(first.terms(), &[(vars.power[(UnitId(0), PeriodIndex(0))], 1.0)]);
        assert_eq!(first.bound(), 200.0 + 120.0);

        let downs = ramp_down(&spec, &vars);
        assert_eq!(downs[0].bound(), 300.0 - 120.0);
    }

    #[test]
    fn later_periods_ramp_against_previous_output() {
        let spec = UnitCommitmentSpec::reference();
        let vars = setup(&spec);
        let j = UnitId(1);
        let k = PeriodIndex(2);

        let c = ramp_up(&spec, &vars)
            .into_iter()
            .find(|c| c.name() == "ramp_up[u1,t2]")
            .unwrap();
        assert_eq!(
            c.terms(),
            &[(vars.power[(j, k)], 1.0), (vars.power[(j, PeriodIndex(1))], -1.0)]
        );
        assert_eq!(c.bound(), 100.0);
    }

    #[test]
    fn transition_at_start_from_offline() {
        let spec = UnitCommitmentSpec::reference();
        let vars = setup(&spec);
        let j = UnitId(2);
        let k = PeriodIndex(0);

        let c = online_transition(&spec, &vars)
            .into_iter()
            .find(|c| c.name() == "online_transition[u2,t0]")
            .unwrap();
        assert_eq!(c.constraint_type(), ConstraintType::Equal);
        assert_eq!(
            c.terms(),
            &[
                (vars.startup[(j, k)], 1.0),
                (vars.shutdown[(j, k)], -1.0),
                (vars.online[(j, k)], -1.0),
            ]
        );
        assert_eq!(c.bound(), 0.0);
    }

    #[test]
    fn transition_at_start_uses_per_unit_flag() {
        let mut spec = UnitCommitmentSpec::reference();
        spec.units[1].initial.online = true;
        let vars = setup(&spec);

        let transitions = online_transition(&spec, &vars);
        let bound_of = |name: &str| {
            transitions
                .iter()
                .find(|c| c.name() == name)
                .map(|c| c.bound())
                .unwrap()
        };
        assert_eq!(bound_of("online_transition[u1,t0]"), -1.0);
        assert_eq!(bound_of("online_transition[u0,t0]"), 0.0);
        assert_eq!(bound_of("online_transition[u2,t0]"), 0.0);
        assert_eq!(bound_of("online_transition[u1,t1]"), 0.0);
    }

    #[test]
    fn zero_minimum_output_keeps_power_non_negative() {
        let mut spec = UnitCommitmentSpec::reference();
        spec.units[0].min_output = 0.0;
        let vars = setup(&spec);

        let c = &min_output(&spec, &vars)[0];
        assert_eq!(c.terms(), &[(vars.power[(UnitId(0), PeriodIndex(0))], 1.0)]);
        assert_eq!(c.bound(), 0.0);
    }

    #[test]
    fn reserve_rhs_adds_margin_to_demand() {
        let spec = UnitCommitmentSpec::reference();
        let vars = setup(&spec);

        let reserve = reserve(&spec, &vars);
        let demand = demand(&spec, &vars);
        for ((r, d), period) in reserve.iter().zip(&demand).zip(&spec.periods) {
            assert_eq!(d.bound(), period.demand);
            assert_eq!(r.bound(), period.demand + period.reserve);
            assert!(r.bound() >= d.bound());
        }
        let coefficients: Vec<_> = reserve[1].terms().iter().map(|&(_, c)| c).collect();
        assert_eq!(coefficients, vec![350.0, 200.0, 140.0]);
    }
}
