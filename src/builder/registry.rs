// Decision-variable registry: declares variables and hands out opaque handles

use std::fmt;
use std::ops::Index;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::{ModelError, Result};
use crate::domain::{Solution, Variable, VariableType};

static NEXT_REGISTRY: AtomicUsize = AtomicUsize::new(0);

/// Opaque handle to a variable declared in a [`VariableRegistry`]
///
/// A handle only resolves in the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    registry: usize,
    index: usize,
}

impl VariableId {
    /// Column of the variable in the built problem.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Index of a unit (row axis of a [`VariableMatrix`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// Index of a period in the planning horizon (column axis of a [`VariableMatrix`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodIndex(pub usize);

impl PeriodIndex {
    /// The period before this one, `None` for the first period.
    pub fn previous(self) -> Option<PeriodIndex> {
        self.0.checked_sub(1).map(PeriodIndex)
    }
}

impl fmt::Display for PeriodIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Unit × period grid of variable handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMatrix {
    name: String,
    unit_count: usize,
    period_count: usize,
    // row-major: unit * period_count + period
    ids: Vec<VariableId>,
}

impl VariableMatrix {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    pub fn period_count(&self) -> usize {
        self.period_count
    }

    pub fn units(&self) -> impl Iterator<Item = UnitId> {
        (0..self.unit_count).map(UnitId)
    }

    pub fn periods(&self) -> impl Iterator<Item = PeriodIndex> {
        (0..self.period_count).map(PeriodIndex)
    }

    pub fn get(&self, unit: UnitId, period: PeriodIndex) -> Option<VariableId> {
        if unit.0 < self.unit_count && period.0 < self.period_count {
            Some(self.ids[unit.0 * self.period_count + period.0])
        } else {
            None
        }
    }

    /// All handles of one period, in unit order.
    pub fn column(&self, period: PeriodIndex) -> impl Iterator<Item = VariableId> + '_ {
        self.units().map(move |unit| self[(unit, period)])
    }

    pub fn iter(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.ids.iter().copied()
    }

    /// Unit × period grid of values from a solution that carries an assignment.
    pub fn values(&self, solution: &Solution) -> Option<Vec<Vec<f64>>> {
        self.units()
            .map(|unit| {
                self.periods()
                    .map(|period| solution.value(self[(unit, period)].index()))
                    .collect::<Option<Vec<_>>>()
            })
            .collect()
    }
}

impl Index<(UnitId, PeriodIndex)> for VariableMatrix {
    type Output = VariableId;

    fn index(&self, (unit, period): (UnitId, PeriodIndex)) -> &VariableId {
        assert!(
            unit.0 < self.unit_count && period.0 < self.period_count,
            "({unit}, {period}) out of range for {}",
            self.name
        );
        &self.ids[unit.0 * self.period_count + period.0]
    }
}

/// Owns the declared variables of one model
///
/// Clones share the identity of the original, so handles stay valid in both.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    key: usize,
    variables: Vec<Variable>,
}

impl Default for VariableRegistry {
    fn default() -> Self {
        Self {
            key: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            variables: Vec::new(),
        }
    }
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable with explicit bounds.
    pub fn declare(&mut self, variable: Variable) -> VariableId {
        let id = VariableId {
            registry: self.key,
            index: self.variables.len(),
        };
        self.variables.push(variable);
        id
    }

    /// Declare a single variable with the default bounds of its type.
    pub fn scalar(&mut self, kind: VariableType, name: impl Into<String>) -> VariableId {
        self.declare(Variable::of_type(kind, name))
    }

    /// Declare one variable per (unit, period) pair, named `name[uJ,tK]`.
    pub fn create(
        &mut self,
        kind: VariableType,
        name: impl Into<String>,
        unit_count: usize,
        period_count: usize,
    ) -> Result<VariableMatrix> {
        let name = name.into();
        if unit_count == 0 || period_count == 0 {
            return Err(ModelError::Configuration(format!(
                "variable matrix '{name}' needs at least one unit and one period \
                 (got {unit_count} units, {period_count} periods)"
            )));
        }

        let mut ids = Vec::with_capacity(unit_count * period_count);
        for unit in (0..unit_count).map(UnitId) {
            for period in (0..period_count).map(PeriodIndex) {
                ids.push(self.scalar(kind, format!("{name}[{unit},{period}]")));
            }
        }

        Ok(VariableMatrix {
            name,
            unit_count,
            period_count,
            ids,
        })
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn get(&self, id: VariableId) -> Option<&Variable> {
        if id.registry == self.key {
            self.variables.get(id.index)
        } else {
            None
        }
    }

    /// Whether `id` was issued by this registry.
    pub fn contains(&self, id: VariableId) -> bool {
        id.registry == self.key && id.index < self.variables.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_empty_axes() {
        let mut registry = VariableRegistry::new();
        let err = registry
            .create(VariableType::Binary, "v", 0, 3)
            .unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
        assert!(registry
            .create(VariableType::Binary, "v", 2, 0)
            .is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn matrix_handles_are_distinct_and_named() {
        let mut registry = VariableRegistry::new();
        let p = registry
            .create(VariableType::Continuous, "p", 2, 3)
            .unwrap();
        let v = registry.create(VariableType::Binary, "v", 2, 3).unwrap();

        assert_eq!(registry.len(), 12);
        assert_ne!(p[(UnitId(1), PeriodIndex(2))], v[(UnitId(1), PeriodIndex(2))]);

        let id = p[(UnitId(1), PeriodIndex(0))];
        let var = registry.get(id).unwrap();
        assert_eq!(var.name, "p[u1,t0]");
        assert_eq!(var.variable_type, VariableType::Continuous);
        assert_eq!(var.upper_bound, None);

        let binary = registry.get(v[(UnitId(0), PeriodIndex(0))]).unwrap();
        assert_eq!(binary.upper_bound, Some(1.0));
    }

    #[test]
    fn get_is_bounds_checked() {
        let mut registry = VariableRegistry::new();
        let m = registry.create(VariableType::Continuous, "p", 1, 2).unwrap();
        assert!(m.get(UnitId(0), PeriodIndex(1)).is_some());
        assert!(m.get(UnitId(1), PeriodIndex(0)).is_none());
        assert!(m.get(UnitId(0), PeriodIndex(2)).is_none());
    }

    #[test]
    fn handles_from_another_registry_do_not_resolve() {
        let mut first = VariableRegistry::new();
        let mut second = VariableRegistry::new();
        let a = first.scalar(VariableType::Continuous, "a");
        let b = second.scalar(VariableType::Continuous, "b");

        assert_eq!(a.index(), b.index());
        assert!(first.contains(a));
        assert!(!first.contains(b));
        assert!(second.get(a).is_none());
        assert!(first.clone().contains(a));
    }

    #[test]
    fn previous_period() {
        assert_eq!(PeriodIndex(0).previous(), None);
        assert_eq!(PeriodIndex(3).previous(), Some(PeriodIndex(2)));
    }

    #[test]
    fn values_extracts_grid() {
        let mut registry = VariableRegistry::new();
        let m = registry.create(VariableType::Continuous, "p", 2, 2).unwrap();
        let solution = Solution::optimal(0.0, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            m.values(&solution),
            Some(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
        );
        assert_eq!(m.values(&Solution::infeasible()), None);
    }
}
