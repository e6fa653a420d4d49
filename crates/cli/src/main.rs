// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::Context;
use c3shim_config::{Demo, StopReason, SystemConfig, TestAssertion, TestScript};
use c3shim_core::metrics::PerformanceMetrics;
use c3shim_core::runner::{RunLimits, RunReport, Runner};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "C3Shim ESP32-C3 demo simulator", long_about = None)]
struct Cli {
    /// Enable register-level tracing
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a demo program on the simulated SoC
    Run(RunArgs),
    /// Run a test script and check its assertions
    Test(TestArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Demo program to run
    #[arg(short, long, value_enum)]
    demo: DemoArg,

    /// Path to the system config (YAML)
    #[arg(short, long)]
    system: Option<PathBuf>,

    /// Simulated CPU cycles to run for
    #[arg(long, default_value = "100000000")]
    max_cycles: u64,

    /// Write a JSON snapshot of the SoC when the run stops
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Do not mirror UART0 to stdout
    #[arg(long)]
    no_uart_stdout: bool,
}

#[derive(Args, Debug)]
struct TestArgs {
    /// Path to the test script (YAML)
    #[arg(long)]
    script: PathBuf,

    /// Directory for result.json (defaults to the current directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Do not mirror UART0 to stdout, even with `uart_echo: true`
    #[arg(long)]
    no_uart_stdout: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DemoArg {
    Blink,
    BlinkNoWdt,
    Hello,
}

impl From<DemoArg> for Demo {
    fn from(arg: DemoArg) -> Self {
        match arg {
            DemoArg::Blink => Demo::Blink,
            DemoArg::BlinkNoWdt => Demo::BlinkNoWdt,
            DemoArg::Hello => Demo::Hello,
        }
    }
}

#[derive(Serialize, Debug)]
struct AssertionResult {
    assertion: TestAssertion,
    passed: bool,
}

#[derive(Serialize, Debug)]
struct TestResult<'a> {
    status: &'static str,
    config_hash: String,
    report: &'a RunReport,
    uart: String,
    assertions: Vec<AssertionResult>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level based on --trace flag
    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Test(args) => test(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SystemConfig> {
    match path {
        Some(path) => {
            info!("Loading system config: {:?}", path);
            SystemConfig::from_file(path)
        }
        None => {
            info!("Using default hardware configuration");
            Ok(SystemConfig::default())
        }
    }
}

fn config_hash(config: &SystemConfig) -> anyhow::Result<String> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    Ok(format!("{:x}", Sha256::digest(yaml.as_bytes())))
}

fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let mut config = load_config(args.system.as_deref())?;
    config.uart_echo = !args.no_uart_stdout;
    let demo = Demo::from(args.demo);

    let metrics = Arc::new(PerformanceMetrics::new());
    let mut runner = Runner::new(config);
    runner.observers.push(metrics.clone());

    info!(
        "Running {:?} for {} cycles ({} spins per delay)",
        demo,
        args.max_cycles,
        runner.delay().iterations()
    );
    let report = runner.run(
        demo,
        RunLimits {
            max_cycles: args.max_cycles,
            wall_time: None,
        },
    );

    info!(
        "Stopped ({:?}) after {} cycles: {} iterations, {} resets",
        report.stop_reason,
        report.cycles,
        report.iterations,
        report.resets.len()
    );
    for event in &report.resets {
        info!(
            "  reset at cycle {}: {:?} after {} iterations",
            event.cycle, event.cause, event.iterations
        );
    }
    info!("Simulated {:.0} cycles/s", metrics.get_cps());

    if let Some(path) = args.snapshot {
        let snapshot = runner.soc().snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot to {:?}", path))?;
        info!("Snapshot written to {:?}", path);
    }

    Ok(ExitCode::SUCCESS)
}

fn check(assertion: &TestAssertion, report: &RunReport) -> bool {
    match assertion {
        TestAssertion::UartContains(a) => report.uart_text().contains(&a.uart_contains),
        TestAssertion::MinResets(a) => report.resets.len() as u64 >= a.min_resets,
        TestAssertion::MaxResets(a) => report.resets.len() as u64 <= a.max_resets,
        TestAssertion::ExpectedStopReason(a) => report.stop_reason == a.expected_stop_reason,
    }
}

fn test(args: TestArgs) -> anyhow::Result<ExitCode> {
    let script = TestScript::from_file(&args.script)?;

    // System config paths are relative to the script
    let system = script.inputs.system.as_ref().map(|s| {
        args.script
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(s)
    });
    let mut config = load_config(system.as_deref())?;
    let config_hash = config_hash(&config)?;
    // Scripts echo only when the system config asks for it
    config.uart_echo &= !args.no_uart_stdout;

    let mut runner = Runner::new(config);
    let report = runner.run(
        script.inputs.demo,
        RunLimits {
            max_cycles: script.limits.max_cycles,
            wall_time: script.limits.wall_time_ms.map(Duration::from_millis),
        },
    );

    let assertions: Vec<AssertionResult> = script
        .assertions
        .iter()
        .map(|a| AssertionResult {
            assertion: a.clone(),
            passed: check(a, &report),
        })
        .collect();
    let passed = assertions.iter().all(|a| a.passed);

    for result in assertions.iter().filter(|a| !a.passed) {
        error!("Assertion failed: {:?}", result.assertion);
    }
    if report.stop_reason == StopReason::WallTime {
        info!("Wall-time limit reached at cycle {}", report.cycles);
    }

    let result = TestResult {
        status: if passed { "pass" } else { "fail" },
        config_hash,
        report: &report,
        uart: report.uart_text(),
        assertions,
    };

    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output dir {:?}", output_dir))?;
    let result_path = output_dir.join("result.json");
    std::fs::write(&result_path, serde_json::to_string_pretty(&result)?)
        .with_context(|| format!("Failed to write {:?}", result_path))?;
    info!("Result written to {:?}", result_path);

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
