// Unit-commitment MILP: which generators run in each period and at what output

pub mod constraints;
pub mod model;
pub mod schedule;
pub mod spec;

pub use constraints::{commitment_constraints, ConstraintRule};
pub use model::{commitment_objective, CommitmentVariables, UnitCommitmentModel};
pub use schedule::CommitmentSchedule;
pub use spec::{ColumnarSpec, InitialState, PeriodSpec, UnitCommitmentSpec, UnitSpec};
