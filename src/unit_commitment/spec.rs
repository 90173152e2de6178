// Static unit and period data for a unit-commitment run

use serde::Deserialize;

use crate::builder::{ModelError, PeriodIndex, UnitId};

/// State of a unit in the period just before the planning horizon
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub power_output: f64,
    pub online: bool,
    pub started_up: bool,
    pub shut_down: bool,
}

/// A generation unit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitSpec {
    pub max_output: f64,
    pub min_output: f64,
    pub ramp_up: f64,
    pub ramp_down: f64,
    pub variable_cost: f64,
    pub fixed_cost: f64,
    pub startup_cost: f64,
    pub shutdown_cost: f64,
    #[serde(default)]
    pub initial: InitialState,
}

/// Demand and reserve requirement of one period
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PeriodSpec {
    pub demand: f64,
    #[serde(default)]
    pub reserve: f64,
}

/// Units and planning horizon of a unit-commitment problem
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitCommitmentSpec {
    pub units: Vec<UnitSpec>,
    pub periods: Vec<PeriodSpec>,
}

impl UnitCommitmentSpec {
    /// Validated unit and period data.
    pub fn new(units: Vec<UnitSpec>, periods: Vec<PeriodSpec>) -> Result<Self, ModelError> {
        let spec = Self { units, periods };
        spec.validate()?;
        Ok(spec)
    }

    /// Parse either the per-unit table layout or the column layout.
    ///
    /// A document with a `units` key is read as tables, anything else as
    /// columns, and errors name the layout that was tried.
    pub fn from_toml_str(text: &str) -> Result<Self, ModelError> {
        let invalid = |layout: &str, err: toml::de::Error| {
            ModelError::Configuration(format!("invalid unit-commitment TOML ({layout}): {err}"))
        };
        let document: toml::Table = text.parse().map_err(|e| invalid("syntax", e))?;

        if !document.contains_key("units") {
            let columns: ColumnarSpec =
                toml::from_str(text).map_err(|e| invalid("column layout", e))?;
            return columns.into_spec();
        }
        let spec: UnitCommitmentSpec =
            toml::from_str(text).map_err(|e| invalid("table layout", e))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Three units over three hours.
    pub fn reference() -> Self {
        Self {
            units: vec![
                unit(350.0, 50.0, 200.0, 300.0, 0.100, 5.0, 20.0, 5.0),
                unit(200.0, 80.0, 100.0, 150.0, 0.125, 7.0, 18.0, 3.0),
                unit(140.0, 40.0, 100.0, 100.0, 0.150, 6.0, 5.0, 1.0),
            ],
            periods: vec![
                PeriodSpec {
                    demand: 150.0,
                    reserve: 15.0,
                },
                PeriodSpec {
                    demand: 500.0,
                    reserve: 50.0,
                },
                PeriodSpec {
                    demand: 400.0,
                    reserve: 40.0,
                },
            ],
        }
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> {
        (0..self.units.len()).map(UnitId)
    }

    pub fn period_indices(&self) -> impl Iterator<Item = PeriodIndex> {
        (0..self.periods.len()).map(PeriodIndex)
    }

    pub fn unit(&self, id: UnitId) -> &UnitSpec {
        &self.units[id.0]
    }

    pub fn period(&self, index: PeriodIndex) -> &PeriodSpec {
        &self.periods[index.0]
    }

    /// Sum of every unit's maximum output.
    pub fn total_capacity(&self) -> f64 {
        self.units.iter().map(|u| u.max_output).sum()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.units.is_empty() {
            return Err(config("at least one unit is required"));
        }
        if self.periods.is_empty() {
            return Err(config("at least one period is required"));
        }

        for (id, u) in self.unit_ids().zip(&self.units) {
            let fields = [
                ("max_output", u.max_output),
                ("min_output", u.min_output),
                ("ramp_up", u.ramp_up),
                ("ramp_down", u.ramp_down),
                ("variable_cost", u.variable_cost),
                ("fixed_cost", u.fixed_cost),
                ("startup_cost", u.startup_cost),
                ("shutdown_cost", u.shutdown_cost),
                ("initial.power_output", u.initial.power_output),
            ];
            for (field, value) in fields {
                if !value.is_finite() {
                    return Err(config(format!("unit {id}: {field} is not finite ({value})")));
                }
            }

            if u.max_output <= 0.0 {
                return Err(config(format!(
                    "unit {id}: max_output must be positive (got {})",
                    u.max_output
                )));
            }
            if u.min_output < 0.0 || u.min_output > u.max_output {
                return Err(config(format!(
                    "unit {id}: min_output {} outside [0, max_output {}]",
                    u.min_output, u.max_output
                )));
            }
            if u.ramp_up < 0.0 || u.ramp_down < 0.0 {
                return Err(config(format!("unit {id}: ramp limits must be non-negative")));
            }
            if u.initial.power_output < 0.0 {
                return Err(config(format!(
                    "unit {id}: initial power output must be non-negative"
                )));
            }
        }

        for (index, p) in self.period_indices().zip(&self.periods) {
            if !p.demand.is_finite() || p.demand < 0.0 {
                return Err(config(format!(
                    "period {index}: demand must be finite and non-negative (got {})",
                    p.demand
                )));
            }
            if !p.reserve.is_finite() || p.reserve < 0.0 {
                return Err(config(format!(
                    "period {index}: reserve must be finite and non-negative (got {})",
                    p.reserve
                )));
            }
        }

        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn unit(
    max_output: f64,
    min_output: f64,
    ramp_up: f64,
    ramp_down: f64,
    variable_cost: f64,
    fixed_cost: f64,
    startup_cost: f64,
    shutdown_cost: f64,
) -> UnitSpec {
    UnitSpec {
        max_output,
        min_output,
        ramp_up,
        ramp_down,
        variable_cost,
        fixed_cost,
        startup_cost,
        shutdown_cost,
        initial: InitialState::default(),
    }
}

fn config(msg: impl Into<String>) -> ModelError {
    ModelError::Configuration(msg.into())
}

/// Parallel per-unit and per-period arrays
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColumnarSpec {
    pub max_output: Vec<f64>,
    pub min_output: Vec<f64>,
    pub ramp_up: Vec<f64>,
    pub ramp_down: Vec<f64>,
    pub variable_cost: Vec<f64>,
    pub fixed_cost: Vec<f64>,
    pub startup_cost: Vec<f64>,
    pub shutdown_cost: Vec<f64>,
    #[serde(default)]
    pub power_output_t0: Vec<f64>,
    #[serde(default)]
    pub online_t0: Vec<bool>,
    #[serde(default)]
    pub startup_t0: Vec<bool>,
    #[serde(default)]
    pub shutdown_t0: Vec<bool>,
    pub demand: Vec<f64>,
    #[serde(default)]
    pub reserve: Vec<f64>,
}

impl ColumnarSpec {
    /// Zip the columns into a validated [`UnitCommitmentSpec`].
    ///
    /// Optional columns (pre-horizon state, reserve) may be left empty and
    /// default to zero.
    pub fn into_spec(self) -> Result<UnitCommitmentSpec, ModelError> {
        let units = self.max_output.len();
        let required = [
            ("min_output", self.min_output.len()),
            ("ramp_up", self.ramp_up.len()),
            ("ramp_down", self.ramp_down.len()),
            ("variable_cost", self.variable_cost.len()),
            ("fixed_cost", self.fixed_cost.len()),
            ("startup_cost", self.startup_cost.len()),
            ("shutdown_cost", self.shutdown_cost.len()),
        ];
        let optional = [
            ("power_output_t0", self.power_output_t0.len()),
            ("online_t0", self.online_t0.len()),
            ("startup_t0", self.startup_t0.len()),
            ("shutdown_t0", self.shutdown_t0.len()),
        ];
        for (column, len) in required {
            if len != units {
                return Err(config(format!(
                    "{column} has {len} entries but max_output has {units}"
                )));
            }
        }
        for (column, len) in optional {
            if len != 0 && len != units {
                return Err(config(format!(
                    "{column} has {len} entries but max_output has {units}"
                )));
            }
        }
        let periods = self.demand.len();
        if !self.reserve.is_empty() && self.reserve.len() != periods {
            return Err(config(format!(
                "reserve has {} entries but demand has {periods}",
                self.reserve.len()
            )));
        }

        fn flag(column: &[bool], j: usize) -> bool {
            column.get(j).copied().unwrap_or(false)
        }
        let unit_specs = (0..units)
            .map(|j| UnitSpec {
                max_output: self.max_output[j],
                min_output: self.min_output[j],
                ramp_up: self.ramp_up[j],
                ramp_down: self.ramp_down[j],
                variable_cost: self.variable_cost[j],
                fixed_cost: self.fixed_cost[j],
                startup_cost: self.startup_cost[j],
                shutdown_cost: self.shutdown_cost[j],
                initial: InitialState {
                    power_output: self.power_output_t0.get(j).copied().unwrap_or(0.0),
                    online: flag(&self.online_t0, j),
                    started_up: flag(&self.startup_t0, j),
                    shut_down: flag(&self.shutdown_t0, j),
                },
            })
            .collect();
        let period_specs = (0..periods)
            .map(|k| PeriodSpec {
                demand: self.demand[k],
                reserve: self.reserve.get(k).copied().unwrap_or(0.0),
            })
            .collect();

        UnitCommitmentSpec::new(unit_specs, period_specs)
    }
}
