use quic::config::SimulatorConfig;
use quic::error::Result;
use quic::oracle::builtin::ORACLE_MODEXP;
use quic::oracle::linear_solver::FUNCTION_GAUSSIAN_ELIMINATION;
use quic::quantum::gate::MeasurementMode;
use quic::simulators::SparseSimulator;

fn section(title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));
}

fn run(title: &str, width: usize, columns: &[&str]) -> Result<SparseSimulator> {
    section(title);
    let mut simulator = SparseSimulator::new(width)?;
    for column in columns {
        let report = simulator.run_column(column)?;
        for diagnostic in &report.diagnostics {
            println!("  warning: {}", diagnostic);
        }
    }
    print!("{}", simulator);
    Ok(simulator)
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Sparse Quantum Circuit Emulator {}", quic::VERSION);

    run("Bell state", 2, &["HI", "CN"])?;
    run("GHZ state", 3, &["HII", "CNI", "ICN"])?;

    run(
        "Grover search for |11⟩",
        3,
        &[
            "HHI", "IIX", "IIH", "CCN", "IIH", "IIX", "HHI", "XXI", "IHI", "CNI", "IHI", "XXI", "HHI",
        ],
    )?;

    run("Deutsch-Jozsa, balanced f", 3, &["IIX", "HHH", "CIN", "ICN", "HHH"])?;

    let mut bell = run("Partial measurement", 2, &["HI", "CN", "0I"])?;
    bell.reset();

    section("Simon's algorithm, hidden mask 11");
    let mut simon = SparseSimulator::with_config(4, SimulatorConfig::seeded(1))?;
    simon.run_circuit(["HHII", "CINI", "CIIN", "ICNI", "ICIN"])?;
    simon.measure(2, MeasurementMode::Random)?;
    simon.measure(3, MeasurementMode::Random)?;
    simon.run_column("HHII")?;
    print!("{}", simon);
    simon.run_function(FUNCTION_GAUSSIAN_ELIMINATION, 2, &[])?;
    println!("solved:");
    print!("{}", simon);

    section("Modular exponentiation 7^x mod 15");
    let mut shor = SparseSimulator::new(8)?;
    shor.run_column("HHHHIIII")?;
    shor.run_oracle_str(ORACLE_MODEXP, 4, "7 15")?;
    shor.run_column("IIIImmmm")?;
    print!("{}", shor);

    Ok(())
}
