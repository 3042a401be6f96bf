//! Main CLI application for the Minesweeper SAT solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use minesweeper_sat::{
    board::{create_example_puzzles, load_grid_from_file},
    config::{CliOverrides, OutputFormat, Settings, SolverBackend},
    puzzle::{solve_batch, MinesweeperProblem},
    sat::{FormulaSolver, SatEncoder, UnifiedSatSolver},
    utils::{ColorOutput, SolutionFormatter},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "minesweeper_sat")]
#[command(about = "Minesweeper SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a Minesweeper board
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// SAT backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// Placements to enumerate; above 1 checks uniqueness (overrides config)
        #[arg(short, long)]
        max_solutions: Option<usize>,

        /// Output directory; enables saving (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show board and encoding statistics without solving
    Analyze {
        /// Puzzle file
        #[arg(short, long)]
        puzzle: PathBuf,
    },

    /// Write the CNF encoding of a board in DIMACS format
    Encode {
        /// Puzzle file
        #[arg(short, long)]
        puzzle: PathBuf,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Solve every puzzle in a directory
    Batch {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Directory containing .txt puzzles
        #[arg(short, long, default_value = "input/puzzles")]
        directory: PathBuf,

        /// SAT backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// Output directory; enables saving (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            config,
            puzzle,
            backend,
            max_solutions,
            output,
            format,
        } => {
            let overrides = CliOverrides {
                backend,
                max_solutions,
                puzzle_file: puzzle,
                output_dir: output,
                format,
            };
            solve_command(&config, &overrides, cli.verbose)
        }
        Commands::Analyze { puzzle } => analyze_command(&puzzle),
        Commands::Encode { puzzle, output } => encode_command(&puzzle, output.as_deref()),
        Commands::Batch {
            config,
            directory,
            backend,
            output,
        } => {
            let overrides = CliOverrides {
                backend,
                output_dir: output,
                ..Default::default()
            };
            batch_command(&config, &directory, &overrides)
        }
        Commands::Setup { directory, force } => setup_command(&directory, force),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Load the config file if present, fall back to defaults, then apply overrides
fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        log::info!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(config_path: &Path, overrides: &CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Starting Minesweeper SAT Solver"));

    let settings = load_settings(config_path, overrides)?;

    if verbose {
        println!("Configuration:");
        println!("  Backend: {:?}", settings.solver.backend);
        println!("  Max solutions: {}", settings.solver.max_solutions);
        println!("  Puzzle file: {}", settings.input.puzzle_file.display());
        if settings.output.save_solution {
            println!("  Output dir: {}", settings.output.output_directory.display());
        }
        println!();
    }

    let start_time = Instant::now();
    let problem =
        MinesweeperProblem::new(settings.clone()).context("Failed to create Minesweeper problem")?;

    if verbose {
        println!("Puzzle:");
        println!("{}", SolutionFormatter::format_grid_with_coords(problem.grid()));
        println!("{}", problem.encoding_statistics()?);
    }

    let mut solver = UnifiedSatSolver::new(settings.solver.backend);
    let solution = problem
        .solve_with(&mut solver)
        .context("Failed to solve board")?;
    let total_time = start_time.elapsed();

    if verbose {
        println!("{}", solver.statistics());
    }

    let Some(solution) = solution else {
        println!(
            "{}",
            ColorOutput::warning("No mine placement is consistent with the hints")
        );
        return Ok(());
    };

    println!(
        "{}",
        ColorOutput::success(&format!("Solved in {:.3}s", total_time.as_secs_f64()))
    );

    match settings.output.format {
        OutputFormat::Text => println!("\n{}", SolutionFormatter::format_solution(&solution)),
        OutputFormat::Json => println!("{}", solution.to_json()?),
    }

    if settings.output.save_solution {
        let stem = settings
            .input
            .puzzle_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("puzzle");
        let path = SolutionFormatter::save_solution(
            &solution,
            &settings.output.output_directory,
            stem,
            settings.output.format,
        )
        .context("Failed to save solution")?;
        println!("{}", ColorOutput::success(&format!("Solution saved to {}", path.display())));
    }

    Ok(())
}

fn analyze_command(puzzle_path: &Path) -> Result<()> {
    println!("{}", ColorOutput::info("Analyzing board..."));

    let grid = load_grid_from_file(puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;

    println!("Board ({}x{}):", grid.rows, grid.cols);
    println!("{}", SolutionFormatter::format_grid_with_coords(&grid));

    let stats = SatEncoder::new()
        .statistics(&grid)
        .context("Failed to encode board")?;
    println!("{}", stats);

    if stats.trivially_unsatisfiable {
        println!("{}", ColorOutput::warning("Some hint needs more mines than it has unknown neighbours"));
    }

    Ok(())
}

fn encode_command(puzzle_path: &Path, output: Option<&Path>) -> Result<()> {
    let grid = load_grid_from_file(puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;

    let formula = SatEncoder::new()
        .build_formula(&grid)
        .context("Failed to encode board")?;
    let dimacs = formula.to_dimacs();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            std::fs::write(path, dimacs)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                ColorOutput::success(&format!(
                    "Wrote {} clauses over {} variables to {}",
                    formula.clause_count(),
                    formula.num_variables,
                    path.display()
                ))
            );
        }
        None => print!("{}", dimacs),
    }

    Ok(())
}

fn batch_command(config_path: &Path, directory: &Path, overrides: &CliOverrides) -> Result<()> {
    println!(
        "{}",
        ColorOutput::info(&format!("Solving all puzzles in {}", directory.display()))
    );

    let settings = load_settings(config_path, overrides)?;
    let start_time = Instant::now();
    let results = solve_batch(&settings, directory)?;

    if results.is_empty() {
        println!("{}", ColorOutput::warning("No puzzles found"));
        return Ok(());
    }

    println!("\n{}", SolutionFormatter::format_batch_summary(&results));

    if settings.output.save_solution {
        for entry in &results {
            if let Ok(Some(solution)) = &entry.result {
                SolutionFormatter::save_solution(
                    solution,
                    &settings.output.output_directory,
                    &entry.name,
                    settings.output.format,
                )
                .with_context(|| format!("Failed to save solution for {}", entry.name))?;
            }
        }
        println!(
            "{}",
            ColorOutput::success(&format!(
                "Solutions saved to {}",
                settings.output.output_directory.display()
            ))
        );
    }

    let failures = results.iter().filter(|r| r.result.is_err()).count();
    let message = format!(
        "Processed {} puzzle(s) in {:.3}s",
        results.len(),
        start_time.elapsed().as_secs_f64()
    );
    if failures > 0 {
        println!("{}", ColorOutput::error(&format!("{}, {} failed", message, failures)));
        anyhow::bail!("{} of {} puzzle(s) failed", failures, results.len());
    }

    println!("{}", ColorOutput::success(&message));
    Ok(())
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/puzzles");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&input_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", input_dir.display());

    // Variant that proves uniqueness with the pure-Rust backend
    let examples_dir = config_dir.join("examples");
    let mut thorough = Settings::default();
    thorough.solver.backend = SolverBackend::Varisat;
    thorough.solver.max_solutions = 10;
    thorough.input.puzzle_file = PathBuf::from("input/puzzles/strip.txt");
    thorough.output.format = OutputFormat::Json;
    thorough.to_file(examples_dir.join("thorough.yaml"))?;
    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Add your puzzles to {}", input_dir.display());
    println!("2. Run: cargo run -- solve --puzzle input/puzzles/corner.txt");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "minesweeper_sat",
            "solve",
            "--puzzle",
            "board.txt",
            "--backend",
            "varisat",
            "--max-solutions",
            "5",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["minesweeper_sat", "solve", "--backend", "minisat"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["minesweeper_sat", "--verbose", "encode", "-p", "b.txt"]);
        assert!(cli.unwrap().verbose);
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("config/examples/thorough.yaml").exists());
        assert!(temp_dir.path().join("input/puzzles/corner.txt").exists());
    }

    #[test]
    fn test_encode_command_writes_dimacs() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzles(temp_dir.path()).unwrap();
        let out = temp_dir.path().join("cnf/ring.cnf");

        encode_command(&temp_dir.path().join("ring.txt"), Some(&out)).unwrap();

        let dimacs = std::fs::read_to_string(out).unwrap();
        assert!(dimacs.starts_with("p cnf 9 8\n"));
    }

    #[test]
    fn test_batch_command_saves_solutions() {
        let temp_dir = tempdir().unwrap();
        let puzzles = temp_dir.path().join("puzzles");
        create_example_puzzles(&puzzles).unwrap();
        let out = temp_dir.path().join("solutions");

        let overrides = CliOverrides {
            output_dir: Some(out.clone()),
            ..Default::default()
        };
        batch_command(&temp_dir.path().join("missing.yaml"), &puzzles, &overrides).unwrap();

        assert!(out.join("corner_solution.txt").exists());
        assert!(!out.join("contradiction_solution.txt").exists());
    }

    #[test]
    fn test_batch_command_counts_malformed_board() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzles(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("bad.txt"), "1 2\n_,9\n").unwrap();

        let err = batch_command(
            &temp_dir.path().join("missing.yaml"),
            temp_dir.path(),
            &CliOverrides::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "1 of 5 puzzle(s) failed");
    }
}
