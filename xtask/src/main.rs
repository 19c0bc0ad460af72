use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "regex-rename";
const CORE_PACKAGE: &str = "regex-rename-core";
const BIN_PACKAGE: &str = "regex-rename-bin";

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install regex-rename binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run regex-rename with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to regex-rename")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run every test suite in the workspace"))
                .subcommand(Command::new("core").about("Run tests for regex-rename-core"))
                .subcommand(Command::new("bin").about("Run tests for regex-rename-bin"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", _args)) => install(),
        Some(("run", args)) => run(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn install() -> Result<()> {
    println!("Installing {BIN_NAME}...");
    cargo(&["install", "--path", "crates/regex-rename-bin"], "Failed to install regex-rename")?;
    println!("✓ {BIN_NAME} installed successfully");
    Ok(())
}

fn run(args: &ArgMatches) -> Result<()> {
    let mut command_args = vec![
        "run".to_string(),
        "--bin".to_string(),
        BIN_NAME.to_string(),
        "--".to_string(),
    ];
    if let Some(values) = args.get_many::<String>("args") {
        command_args.extend(values.cloned());
    }

    let status = process::Command::new("cargo").args(&command_args).status()?;
    if !status.success() {
        anyhow::bail!("Failed to run {BIN_NAME}");
    }
    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => test_package(CORE_PACKAGE),
        Some(("bin", _args)) => test_package(BIN_PACKAGE),
        _ => {
            println!("Available test commands:");
            println!("  all   - Run every test suite in the workspace");
            println!("  core  - Run tests for {CORE_PACKAGE}");
            println!("  bin   - Run tests for {BIN_PACKAGE}");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    let suites: [(&str, &[&str]); 3] = [
        ("workspace", &["test", "--workspace"]),
        ("documentation", &["test", "--doc", "--package", CORE_PACKAGE]),
        ("cli", &["run", "--bin", BIN_NAME, "--", "--help"]),
    ];

    let mut failed = Vec::new();
    for (name, args) in suites {
        println!("🧪 Running {name} tests...");
        match cargo(args, "suite failed") {
            Ok(()) => println!("✅ {name} tests passed\n"),
            Err(e) => {
                println!("❌ {name} tests failed: {e}\n");
                failed.push(name);
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Test suites failed: {}", failed.join(", "));
    }

    println!("🎉 All tests passed successfully!");
    Ok(())
}

fn test_package(package: &str) -> Result<()> {
    println!("🧪 Running {package} tests...");
    cargo(&["test", "--package", package], "Tests failed")
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{failure}");
    }
    Ok(())
}
