use num_complex::Complex64;

use quic::error::QuicError;
use quic::quantum::engine::{clone_bit, delete_bit, Diagnostic, GateEngine};
use quic::quantum::gate::{GateCode, GateColumn, MeasurementMode, OracleRole};
use quic::quantum::measurement::MeasurementUnit;
use quic::quantum::state::SparseState;

/// Helper function for comparing complex numbers with tolerance
fn complex_approx_eq(a: Complex64, b: Complex64, epsilon: f64) -> bool {
    (a - b).norm() < epsilon
}

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Run `columns` from the ground state of a `width`-qubit register
fn run(width: usize, columns: &[&str]) -> (usize, SparseState) {
    let engine = GateEngine::new(31);
    let mut meter = MeasurementUnit::new(Some(7));
    let mut state = SparseState::new();
    let mut width = width;
    for column in columns {
        let result = engine
            .apply(&state, width, &GateColumn::parse(column), &mut meter)
            .unwrap();
        width = result.width;
        state = result.state;
    }
    (width, state)
}

fn entries(state: &SparseState) -> Vec<(u64, Complex64)> {
    state.iter().map(|entry| (entry.index, entry.amplitude)).collect()
}

#[test]
fn test_gate_code_round_trip() {
    let alphabet = "HIXCNPTsftdc01mn+-*/^%=";
    let column = GateColumn::parse(alphabet);
    assert_eq!(column.to_string(), alphabet);
    assert!(column.codes().iter().all(|code| !matches!(code, GateCode::Unknown(_))));

    assert_eq!(GateCode::from_char('m'), GateCode::Measure(MeasurementMode::Random));
    assert_eq!(GateCode::from_char('^'), GateCode::Oracle(OracleRole::Pow));
    assert_eq!(GateCode::from_char('Q'), GateCode::Unknown('Q'));
}

#[test]
fn test_column_masks() {
    let column = GateColumn::parse("CIN");
    assert_eq!(column.mask(0), Some(0b100));
    assert_eq!(column.mask(2), Some(0b001));
    assert_eq!(column.mask(3), None);
    assert_eq!(GateColumn::parse("").mask(0), None);
    assert_eq!(column.mask_of(GateCode::Control), 0b100);
    assert_eq!(column.positions_of(GateCode::Not), vec![2]);
}

#[test]
fn test_hadamard_split_is_unnormalised() {
    let (_, state) = run(1, &["H"]);
    assert_eq!(entries(&state), vec![(0, c(1.0, 0.0)), (1, c(1.0, 0.0))]);

    let (_, state) = run(1, &["X", "H"]);
    assert_eq!(entries(&state), vec![(0, c(1.0, 0.0)), (1, c(-1.0, 0.0))]);
}

#[test]
fn test_hadamard_twice_doubles_ground_amplitude() {
    let (_, state) = run(1, &["H", "H"]);
    assert_eq!(entries(&state), vec![(0, c(2.0, 0.0))]);
}

#[test]
fn test_not_is_self_inverse() {
    let (_, once) = run(3, &["HIH", "IXI"]);
    let (_, twice) = run(3, &["HIH", "IXI", "IXI"]);
    let (_, original) = run(3, &["HIH"]);
    assert_eq!(twice, original);
    assert_ne!(once, original);
}

#[test]
fn test_bell_state() {
    let (width, state) = run(2, &["HI", "CN"]);
    assert_eq!(width, 2);
    assert_eq!(entries(&state), vec![(0b00, c(1.0, 0.0)), (0b11, c(1.0, 0.0))]);
}

#[test]
fn test_ghz_state() {
    let (_, state) = run(3, &["HII", "CNI", "ICN"]);
    assert_eq!(entries(&state), vec![(0b000, c(1.0, 0.0)), (0b111, c(1.0, 0.0))]);
}

#[test]
fn test_toffoli() {
    let (_, state) = run(3, &["XXI", "CCN"]);
    assert_eq!(entries(&state), vec![(0b111, c(1.0, 0.0))]);

    let (_, state) = run(3, &["XII", "CCN"]);
    assert_eq!(entries(&state), vec![(0b100, c(1.0, 0.0))]);
}

#[test]
fn test_not_without_controls_is_identity() {
    let (_, state) = run(2, &["IN"]);
    assert_eq!(entries(&state), vec![(0, c(1.0, 0.0))]);
}

#[test]
fn test_controlled_phase() {
    let (_, state) = run(2, &["XX", "CP"]);
    assert_eq!(entries(&state), vec![(0b11, c(0.0, 1.0))]);

    // Control not satisfied
    let (_, state) = run(2, &["IX", "CP"]);
    assert_eq!(entries(&state), vec![(0b01, c(1.0, 0.0))]);
}

#[test]
fn test_t_phase_squared_is_i() {
    let (_, state) = run(2, &["XX", "CT", "CT"]);
    let amplitude = state.amplitude(0b11).unwrap();
    assert!(complex_approx_eq(amplitude, c(0.0, 1.0), 1e-12));
}

#[test]
fn test_phase_without_controls_is_identity() {
    // Same rule as `N`: no `C` in the column, no phase
    let (_, state) = run(1, &["X", "P"]);
    assert_eq!(entries(&state), vec![(1, c(1.0, 0.0))]);
    let (_, state) = run(2, &["XX", "IT"]);
    assert_eq!(entries(&state), vec![(0b11, c(1.0, 0.0))]);
}

#[test]
fn test_swap_pair() {
    let (_, state) = run(3, &["XII", "sIs"]);
    assert_eq!(state.indices(), vec![0b001]);
}

#[test]
fn test_swap_group_reverses_bits() {
    let (_, state) = run(4, &["XXIX", "ssss"]);
    assert_eq!(state.indices(), vec![0b1011]);
}

#[test]
fn test_controlled_swap() {
    let (_, state) = run(3, &["IXI", "Css"]);
    assert_eq!(state.indices(), vec![0b010]);

    let (_, state) = run(3, &["XXI", "Css"]);
    assert_eq!(state.indices(), vec![0b101]);
}

#[test]
fn test_clone_and_delete_widths() {
    let (width, state) = run(2, &["XI", "cI"]);
    assert_eq!(width, 3);
    assert_eq!(state.indices(), vec![0b110]);

    let (width, state) = run(2, &["XI", "cI", "dII"]);
    assert_eq!(width, 2);
    assert_eq!(state.indices(), vec![0b10]);
}

#[test]
fn test_bit_transforms() {
    // Cloning qubit 1 of 0b101 (mask 0b010) keeps bit 0 and shifts bit 2 up
    assert_eq!(clone_bit(0b101, 0b010), 0b1001);
    assert_eq!(clone_bit(0b111, 0b010), 0b1111);
    assert_eq!(delete_bit(0b1001, 0b010), 0b101);
    for index in 0..64u64 {
        for shift in 0..6 {
            let mask = 1 << shift;
            assert_eq!(delete_bit(clone_bit(index, mask), mask), index);
        }
    }
}

#[test]
fn test_delete_merges_colliding_indices() {
    // H on the deleted qubit creates |0⟩ + |1⟩; after deleting it both
    // branches land on the same index
    let (width, state) = run(2, &["IH", "Id"]);
    assert_eq!(width, 1);
    assert_eq!(entries(&state), vec![(0, c(2.0, 0.0))]);

    let (_, state) = run(2, &["IX", "IH", "Id"]);
    assert!(state.is_empty());
}

#[test]
fn test_width_limits_reject_column() {
    let engine = GateEngine::new(2);
    let mut meter = MeasurementUnit::new(Some(1));
    let state = SparseState::new();

    let err = engine
        .apply(&state, 2, &GateColumn::parse("cI"), &mut meter)
        .unwrap_err();
    assert_eq!(err, QuicError::InvalidWidth { width: 3, max: 2 });

    let err = engine
        .apply(&state, 1, &GateColumn::parse("d"), &mut meter)
        .unwrap_err();
    assert_eq!(err, QuicError::InvalidWidth { width: 0, max: 2 });
}

#[test]
fn test_column_length_mismatch() {
    let engine = GateEngine::new(31);
    let mut meter = MeasurementUnit::new(Some(1));
    let err = engine
        .apply(&SparseState::new(), 3, &GateColumn::parse("HI"), &mut meter)
        .unwrap_err();
    assert_eq!(err, QuicError::ColumnLength { expected: 3, actual: 2 });
}

#[test]
fn test_unknown_code_is_identity_with_diagnostic() {
    let engine = GateEngine::new(31);
    let mut meter = MeasurementUnit::new(Some(1));
    let result = engine
        .apply(&SparseState::new(), 2, &GateColumn::parse("QH"), &mut meter)
        .unwrap();
    assert_eq!(result.state.indices(), vec![0b00, 0b01]);
    assert_eq!(
        result.report.diagnostics,
        vec![Diagnostic::UnknownCode { position: 0, code: 'Q' }]
    );
}

#[test]
fn test_positions_see_earlier_positions() {
    // H on the control runs before the controlled-not in the same column
    let (_, state) = run(2, &["HN"]);
    assert_eq!(state.indices(), vec![0b00, 0b10]);
    let (_, state) = run(2, &["CX"]);
    assert_eq!(state.indices(), vec![0b01]);
}

#[test]
fn test_qft_of_ground_state_is_uniform() {
    let (_, state) = run(2, &["ff"]);
    assert_eq!(
        entries(&state),
        vec![(0, c(1.0, 0.0)), (1, c(1.0, 0.0)), (2, c(1.0, 0.0)), (3, c(1.0, 0.0))]
    );
}

#[test]
fn test_qft_then_inverse_restores_basis_state() {
    let (_, state) = run(2, &["XI", "ff", "ss", "tt", "ss"]);
    assert_eq!(entries(&state), vec![(0b10, c(4.0, 0.0))]);
}

#[test]
fn test_qft_inverse_on_superposition() {
    let (_, state) = run(3, &["XIX", "HII", "fff", "sIs", "ttt", "sIs"]);
    assert_eq!(state.len(), 2);
    assert!(complex_approx_eq(state.amplitude(0b001).unwrap(), c(8.0, 0.0), 1e-9));
    assert!(complex_approx_eq(state.amplitude(0b101).unwrap(), c(-8.0, 0.0), 1e-9));
}

#[test]
fn test_qft_round_trip_every_basis_state() {
    for start in 0..8u64 {
        let prep: String = (0..3)
            .map(|p| if start & (1 << (2 - p)) != 0 { 'X' } else { 'I' })
            .collect();
        let (_, state) = run(3, &[prep.as_str(), "fff", "sIs", "ttt", "sIs"]);
        let values: Vec<(u64, Complex64)> = entries(&state)
            .into_iter()
            .filter(|(_, amplitude)| amplitude.norm() > 1e-9)
            .collect();
        assert_eq!(values.len(), 1, "start {:03b}", start);
        assert_eq!(values[0].0, start);
        assert!(complex_approx_eq(values[0].1, c(8.0, 0.0), 1e-9));
    }
}

#[test]
fn test_measure_code_in_column() {
    let engine = GateEngine::new(31);
    let mut meter = MeasurementUnit::new(Some(3));
    let state = SparseState::new();
    let bell = ["HI", "CN"].iter().fold(state, |state, column| {
        engine
            .apply(&state, 2, &GateColumn::parse(column), &mut meter)
            .unwrap()
            .state
    });

    let result = engine
        .apply(&bell, 2, &GateColumn::parse("1I"), &mut meter)
        .unwrap();
    assert_eq!(result.state.indices(), vec![0b11]);
    assert_eq!(result.report.outcomes.len(), 1);
    assert_eq!(result.report.outcomes[0].0, 0);
    assert!(result.report.outcomes[0].1.is_one());
    assert!((meter.probability() - 0.5).abs() < 1e-12);
}

#[test]
fn test_grover_two_qubit_search() {
    let (_, state) = run(
        3,
        &[
            "HHI", "IIX", "IIH", "III", "CCN", "III", "IIH", "IIX", "HHI", "XXI", "IHI", "CNI", "IHI", "XXI",
            "HHI",
        ],
    );
    assert_eq!(entries(&state), vec![(0b110, c(-32.0, 0.0))]);
}

#[test]
fn test_deutsch_jozsa() {
    let (_, balanced) = run(3, &["IIX", "HHH", "CIN", "ICN", "HHH"]);
    assert_eq!(entries(&balanced), vec![(0b111, c(8.0, 0.0))]);

    let (_, constant) = run(3, &["IIX", "HHH", "III", "HHH"]);
    assert_eq!(entries(&constant), vec![(0b001, c(8.0, 0.0))]);
}
