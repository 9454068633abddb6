use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the fare guide workspace",
    long_about = "A unified CLI for running the quote demo, sample quotes, benchmarks,\n\
                  and CI checks in the fare guide workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the fixture trips for every passenger class
    Demo,
    /// Quote one trip through the fareguide binary
    Quote {
        /// Origin as "lat,lng"
        #[arg(long, default_value = "11.28026,125.06909")]
        from: String,
        /// Destination as "lat,lng"
        #[arg(long, default_value = "11.3012,125.0823")]
        to: String,
        /// Passenger class
        #[arg(long, default_value = "REGULAR")]
        class: String,
        /// Use the geometric estimate only
        #[arg(long)]
        no_map: bool,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build without default features and run the demo
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn bench() {
    run_cargo(&["bench", "--package", "fare_core", "--bench", "performance"]);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test fare_core");
    run_cargo(&["test", "-p", "fare_core"]);

    step("Test fare_cli");
    run_cargo(&["test", "-p", "fare_cli"]);
}

fn ci_examples() {
    step("Build fare_core without the map service");
    run_cargo(&[
        "build",
        "-p",
        "fare_core",
        "--no-default-features",
    ]);

    step("Run quote_demo");
    run_cargo(&["run", "-p", "fare_core", "--example", "quote_demo"]);
}

fn ci_bench() {
    step("Run benchmarks");
    bench();
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => {
            run_cargo(&["run", "-p", "fare_core", "--example", "quote_demo"]);
        }
        Commands::Quote {
            from,
            to,
            class,
            no_map,
        } => {
            let mut args = vec![
                "run",
                "-p",
                "fare_cli",
                "--",
                "quote",
                "--from",
                from.as_str(),
                "--to",
                to.as_str(),
                "--class",
                class.as_str(),
            ];
            if no_map {
                args.push("--no-map");
            }
            run_cargo(&args);
        }
        Commands::Bench => bench(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
