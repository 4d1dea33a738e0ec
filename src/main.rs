mod cli;

use clap::Parser;
use rekrut::builders::{parse_expression, preset};
use rekrut::calculator::Calculator;
use rekrut::catalog;
use rekrut::config;
use rekrut::error::RekrutError;
use rekrut::formula::validate_formula;
use rekrut::report::{self, EvaluationReport, OutputFormat};
use rekrut::scores::ExamSystem;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const BLOCKING: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<i32, RekrutError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        cli::Commands::Evaluate(cmd) => {
            let cfg = config::load_config(Path::new("."))?;
            let formula = catalog::load_formula(&cmd.formula)?;
            formula.validate()?;
            let scores = catalog::load_scores(&cmd.scores)?;
            scores.validate()?;

            let mut options = cfg.engine_options();
            if cmd.strict {
                options.strict_requirements = true;
            }
            let result = Calculator::new(options).evaluate(&formula, &scores);
            let passed = result.passed_all_stages();
            let evaluation = EvaluationReport::new(&formula, result)?;

            let format = match cmd.format {
                Some(cli::ReportFormat::Json) => OutputFormat::Json,
                Some(cli::ReportFormat::Md) => OutputFormat::Md,
                None => cfg.report.format,
            };
            let rendered = report::render(&evaluation, format, cfg.report.decimals)?;
            println!("{rendered}");

            if passed {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::WARNINGS)
            }
        }
        cli::Commands::Validate(cmd) => {
            let formula = catalog::load_formula(&cmd.formula)?;
            let issues = validate_formula(&formula);
            if issues.is_empty() {
                println!("validate: no issues");
                return Ok(exit_code::SUCCESS);
            }

            for issue in &issues {
                println!("[INVALID] {issue}");
            }
            Ok(exit_code::BLOCKING)
        }
        cli::Commands::Compare(cmd) => {
            let cfg = config::load_config(Path::new("."))?;
            let dir = cmd
                .catalog
                .unwrap_or_else(|| PathBuf::from(&cfg.catalog.dir));
            let scores = catalog::load_scores(&cmd.scores)?;
            scores.validate()?;
            let calculator = Calculator::new(cfg.engine_options());

            let mut rows = Vec::new();
            let mut skipped = 0usize;
            for path in catalog::list_formula_files(&dir)? {
                let formula = match catalog::load_formula(&path).and_then(|formula| {
                    formula.validate()?;
                    Ok(formula)
                }) {
                    Ok(formula) => formula,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping formula");
                        eprintln!("warning: skipping {}: {}", path.display(), e);
                        skipped += 1;
                        continue;
                    }
                };
                let result = calculator.evaluate(&formula, &scores);
                rows.push(EvaluationReport::new(&formula, result)?);
            }

            if rows.is_empty() {
                println!("compare: no formulas found in {}", dir.display());
            } else {
                rows.sort_by(|a, b| b.result.total_score.total_cmp(&a.result.total_score));
                println!("{}", comparison_table(&rows, cfg.report.decimals));
            }

            if skipped > 0 {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Parse(cmd) => {
            let formula = parse_expression(&cmd.expression, &cmd.university, &cmd.program)?;
            println!("{}", serde_json::to_string_pretty(&formula)?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Preset(cmd) => {
            let formula = preset(&cmd.name, &cmd.university, &cmd.program)?;
            println!("{}", serde_json::to_string_pretty(&formula)?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Convert(cmd) => {
            let (system, label) = match cmd.system {
                cli::GradeSystem::Ib => (ExamSystem::Ib, "IB"),
                cli::GradeSystem::Eb => (ExamSystem::Eb, "EB"),
            };
            let (min, max) = system.grade_range();
            if !cmd.grade.is_finite() || cmd.grade < min || cmd.grade > max {
                return Err(RekrutError::InvalidScores(format!(
                    "{label} grade must be between {min} and {max} (found {})",
                    cmd.grade
                )));
            }
            println!("{:.2}", system.to_percentage(cmd.grade));
            Ok(exit_code::SUCCESS)
        }
    }
}

fn comparison_table(rows: &[EvaluationReport], decimals: usize) -> String {
    let mut output = String::new();
    output.push_str("| university | program | score | max | chance | progress |\n");
    output.push_str("|---|---|---|---|---|---|\n");
    for row in rows {
        output.push_str(&format!(
            "| {} | {} | {:.prec$} | {:.prec$} | {} | {} |\n",
            row.university_id,
            row.program_id,
            row.result.total_score,
            row.max_possible_score,
            row.outlook.chance,
            row.outlook.progress_text().unwrap_or_else(|| "-".to_string()),
            prec = decimals
        ));
    }
    output
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
