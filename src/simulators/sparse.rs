//! Sparse simulation context
//!
//! Owns everything one run needs: the current state and register width, the
//! measurement unit with its generator and cumulative probability, the gate
//! engine and the oracle registry. Every instruction either replaces the
//! state wholesale or returns an error and leaves it untouched.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::config::SimulatorConfig;
use crate::error::{QuicError, Result};
use crate::oracle::{parse_parameters, OracleRegistry};
use crate::quantum::engine::{ColumnReport, GateEngine};
use crate::quantum::gate::{GateColumn, MeasurementMode};
use crate::quantum::measurement::{MeasurementUnit, Outcome};
use crate::quantum::state::{BasisIndex, SparseState};

/// A sparse simulator for gate-column circuits
#[derive(Debug)]
pub struct SparseSimulator {
    /// The current state of the simulator
    state: SparseState,
    /// Register width in qubits
    width: usize,
    config: SimulatorConfig,
    engine: GateEngine,
    /// Random generator and probability bookkeeping for measurements
    meter: MeasurementUnit,
    registry: OracleRegistry,
}

impl SparseSimulator {
    /// Create a simulator in the ground state with the default configuration
    pub fn new(width: usize) -> Result<Self> {
        Self::with_config(width, SimulatorConfig::default())
    }

    pub fn with_config(width: usize, config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        check_width(width, config.max_qubits)?;
        Ok(SparseSimulator {
            state: SparseState::new(),
            width,
            engine: GateEngine::new(config.max_qubits),
            meter: MeasurementUnit::new(config.seed),
            registry: OracleRegistry::with_builtins(),
            config,
        })
    }

    /// Get the current state
    pub fn state(&self) -> &SparseState {
        &self.state
    }

    /// Get the number of qubits in the register
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cumulative probability of the forced measurement outcomes so far
    pub fn probability(&self) -> f64 {
        self.meter.probability()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &OracleRegistry {
        &self.registry
    }

    /// Mutable access for registering further oracles and functions
    pub fn registry_mut(&mut self) -> &mut OracleRegistry {
        &mut self.registry
    }

    /// Replace the register, e.g. with a restored state
    pub fn set_state(&mut self, width: usize, state: SparseState) -> Result<()> {
        check_width(width, self.config.max_qubits)?;
        if let Some(entry) = state.iter().find(|entry| entry.index >> width != 0) {
            return Err(QuicError::InvalidParameter(format!(
                "index {} does not fit in {} qubits",
                entry.index, width
            )));
        }
        self.width = width;
        self.state = state;
        Ok(())
    }

    /// Reset to the ground state and a cumulative probability of 1
    pub fn reset(&mut self) {
        self.state = SparseState::new();
        self.meter.reset_probability();
    }

    /// Apply one gate column
    pub fn apply_column(&mut self, column: &GateColumn) -> Result<ColumnReport> {
        let result = self
            .engine
            .apply(&self.state, self.width, column, &mut self.meter)?;
        if result.width != self.width {
            debug!("register width {} -> {}", self.width, result.width);
        }
        self.width = result.width;
        self.state = result.state;
        Ok(result.report)
    }

    /// Parse and apply one gate column
    pub fn run_column(&mut self, column: &str) -> Result<ColumnReport> {
        self.apply_column(&GateColumn::parse(column))
    }

    /// Apply a sequence of columns, stopping at the first error
    pub fn run_circuit<'a, I>(&mut self, columns: I) -> Result<Vec<ColumnReport>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        columns
            .into_iter()
            .map(|column| self.run_column(column))
            .collect()
    }

    fn mask(&self, qubit: usize) -> Result<BasisIndex> {
        if qubit >= self.width {
            return Err(QuicError::QubitOutOfRange {
                qubit,
                width: self.width,
            });
        }
        Ok(1 << (self.width - 1 - qubit))
    }

    /// Measure a single qubit and collapse the state
    pub fn measure(&mut self, qubit: usize, mode: MeasurementMode) -> Result<Outcome> {
        let mask = self.mask(qubit)?;
        let (state, outcome) = self.meter.measure(&self.state, mask, mode)?;
        self.state = state;
        Ok(outcome)
    }

    /// Measure a single qubit with a sampled outcome
    pub fn measure_qubit(&mut self, qubit: usize) -> Result<Outcome> {
        self.measure(qubit, MeasurementMode::Random)
    }

    /// Outcome probabilities of one qubit without collapsing the state
    pub fn measure_qubit_probability(&self, qubit: usize) -> Result<HashMap<Outcome, f64>> {
        let mask = self.mask(qubit)?;
        let total = self.state.total_weight();

        let mut probabilities = HashMap::new();
        probabilities.insert(Outcome::Zero, 0.0);
        probabilities.insert(Outcome::One, 0.0);
        if total <= 0.0 {
            return Ok(probabilities);
        }
        for entry in &self.state {
            let outcome = if entry.bit(mask) { Outcome::One } else { Outcome::Zero };
            *probabilities.entry(outcome).or_insert(0.0) += entry.weight() / total;
        }
        Ok(probabilities)
    }

    /// Joint outcome probabilities of several qubits without collapsing the state
    pub fn measure_qubits_probability(&self, qubits: &[usize]) -> Result<HashMap<Vec<Outcome>, f64>> {
        let masks = qubits
            .iter()
            .map(|&qubit| self.mask(qubit))
            .collect::<Result<Vec<_>>>()?;
        let total = self.state.total_weight();

        let mut probabilities: HashMap<Vec<Outcome>, f64> = HashMap::new();
        if total <= 0.0 {
            return Ok(probabilities);
        }
        for entry in &self.state {
            let outcomes: Vec<Outcome> = masks
                .iter()
                .map(|&mask| if entry.bit(mask) { Outcome::One } else { Outcome::Zero })
                .collect();
            *probabilities.entry(outcomes).or_insert(0.0) += entry.weight() / total;
        }
        Ok(probabilities)
    }

    /// Run named oracle `id`; the low `output_bits` qubits receive `f(x)` by XOR
    pub fn run_oracle(&mut self, id: u32, output_bits: usize, params: &[u64]) -> Result<()> {
        self.check_parameter_count(params)?;
        let state = self
            .registry
            .run_oracle(id, self.width, output_bits, params, &self.state)
            .map_err(|err| {
                warn!("oracle #{} skipped: {}", id, err);
                err
            })?;
        self.state = state;
        Ok(())
    }

    /// [`run_oracle`](Self::run_oracle) with whitespace-separated parameters
    pub fn run_oracle_str(&mut self, id: u32, output_bits: usize, params: &str) -> Result<()> {
        let params = parse_parameters(params, self.config.max_parameters)?;
        self.run_oracle(id, output_bits, &params)
    }

    /// Run classical function `id` over the leading `bit_count` qubits
    pub fn run_function(&mut self, id: u32, bit_count: usize, params: &[u64]) -> Result<()> {
        self.check_parameter_count(params)?;
        let state = self
            .registry
            .run_function(id, self.width, bit_count, params, &self.state)
            .map_err(|err| {
                warn!("function #{} skipped: {}", id, err);
                err
            })?;
        self.state = state;
        Ok(())
    }

    /// [`run_function`](Self::run_function) with whitespace-separated parameters
    pub fn run_function_str(&mut self, id: u32, bit_count: usize, params: &str) -> Result<()> {
        let params = parse_parameters(params, self.config.max_parameters)?;
        self.run_function(id, bit_count, &params)
    }

    fn check_parameter_count(&self, params: &[u64]) -> Result<()> {
        if params.len() > self.config.max_parameters {
            return Err(QuicError::TooManyParameters {
                count: params.len(),
                max: self.config.max_parameters,
            });
        }
        Ok(())
    }
}

fn check_width(width: usize, max: usize) -> Result<()> {
    if width == 0 || width > max {
        return Err(QuicError::InvalidWidth { width, max });
    }
    Ok(())
}

impl fmt::Display for SparseSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let probability = self.probability();
        if probability < 1.0 {
            writeln!(f, "probability of result: {:.1}%", probability * 100.0)?;
        }
        write!(f, "{}", self.state.display(self.width))
    }
}
