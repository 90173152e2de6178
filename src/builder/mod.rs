// Builder layer: declarative construction of LP/MILP models

pub mod error;
pub mod expression;
pub mod model;
pub mod objective;
pub mod registry;

pub use error::ModelError;
pub use expression::{LinearConstraint, LinearExpr};
pub use model::{ConstraintGroup, ConstraintSet, ModelBuilder};
pub use objective::{Objective, ObjectiveAssembler};
pub use registry::{PeriodIndex, UnitId, VariableId, VariableMatrix, VariableRegistry};
