use crate::builder::{PeriodIndex, UnitId};

/// Optimal commitment decisions as unit × period grids
#[derive(Debug, Clone, PartialEq)]
pub struct CommitmentSchedule {
    pub objective: f64,
    pub power: Vec<Vec<f64>>,
    pub startup: Vec<Vec<f64>>,
    pub shutdown: Vec<Vec<f64>>,
    pub online: Vec<Vec<f64>>,
}

impl CommitmentSchedule {
    pub fn output(&self, unit: UnitId, period: PeriodIndex) -> f64 {
        self.power[unit.0][period.0]
    }

    pub fn is_online(&self, unit: UnitId, period: PeriodIndex) -> bool {
        self.online[unit.0][period.0] > 0.5
    }

    pub fn is_started(&self, unit: UnitId, period: PeriodIndex) -> bool {
        self.startup[unit.0][period.0] > 0.5
    }

    pub fn is_shut_down(&self, unit: UnitId, period: PeriodIndex) -> bool {
        self.shutdown[unit.0][period.0] > 0.5
    }

    /// Output summed over all units in one period.
    pub fn total_output(&self, period: PeriodIndex) -> f64 {
        self.power.iter().map(|row| row[period.0]).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_indicators_with_rounding() {
        let schedule = CommitmentSchedule {
            objective: 0.0,
            power: vec![vec![10.0, 20.0], vec![5.0, 0.0]],
            startup: vec![vec![0.9999999, 0.0], vec![0.0, 0.0]],
            shutdown: vec![vec![0.0, 0.0], vec![0.0, 1.0]],
            online: vec![vec![1.0, 1.0], vec![1.0, 1e-9]],
        };
        assert!(schedule.is_started(UnitId(0), PeriodIndex(0)));
        assert!(!schedule.is_online(UnitId(1), PeriodIndex(1)));
        assert!(schedule.is_shut_down(UnitId(1), PeriodIndex(1)));
        assert_eq!(schedule.total_output(PeriodIndex(0)), 15.0);
        assert_eq!(schedule.output(UnitId(0), PeriodIndex(1)), 20.0);
    }
}
