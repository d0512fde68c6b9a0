//! # Beam CLI
//!
//! Reads a beam workbook, solves every beam and writes the PDF report.
//!
//! ```text
//! beam_cli <workbook.json> [-o report.pdf] [--samples N] [--settings file.json] [--json]
//! beam_cli template <path>
//! ```
//!
//! Rejected rows are printed to stderr and skipped. The exit code is non-zero only when
//! the whole run fails (unreadable workbook, missing sheet or columns, nothing
//! to report, report not written).

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use beam_core::batch::process_rows;
use beam_core::errors::{CalcError, CalcResult};
use beam_core::file_io::{load_settings, save_report, write_template};
use beam_core::pdf::render_report_pdf;
use beam_core::settings::{ReportSettings, DEFAULT_REPORT_FILE};
use beam_core::workbook::load_workbook;
use log::info;

const USAGE: &str = "\
Usage:
  beam_cli <workbook.json> [-o report.pdf] [--samples N] [--settings file.json] [--json]
  beam_cli template <path>";

#[derive(Debug)]
enum Command {
    Run(RunArgs),
    Template(PathBuf),
    Help,
}

#[derive(Debug)]
struct RunArgs {
    workbook: PathBuf,
    output: PathBuf,
    samples: Option<usize>,
    settings: Option<PathBuf>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args.first().map(String::as_str) {
        None | Some("-h") | Some("--help") => return Ok(Command::Help),
        Some("template") => {
            return match args.get(1) {
                Some(path) => Ok(Command::Template(PathBuf::from(path))),
                None => Err("template: missing output path".to_string()),
            };
        }
        _ => {}
    }

    let mut workbook = None;
    let mut output = PathBuf::from(DEFAULT_REPORT_FILE);
    let mut samples = None;
    let mut settings = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let value = iter.next().ok_or("-o: missing output path")?;
                output = PathBuf::from(value);
            }
            "--samples" => {
                let value = iter.next().ok_or("--samples: missing value")?;
                let n = value
                    .parse()
                    .map_err(|_| format!("--samples: '{}' is not a whole number", value))?;
                samples = Some(n);
            }
            "--settings" => {
                let value = iter.next().ok_or("--settings: missing path")?;
                settings = Some(PathBuf::from(value));
            }
            "--json" => json = true,
            other if other.starts_with('-') => return Err(format!("unknown option '{}'", other)),
            other => {
                if workbook.is_some() {
                    return Err(format!("unexpected argument '{}'", other));
                }
                workbook = Some(PathBuf::from(other));
            }
        }
    }

    let workbook = workbook.ok_or("missing workbook path")?;
    Ok(Command::Run(RunArgs {
        workbook,
        output,
        samples,
        settings,
        json,
    }))
}

/// Run the pipeline, writing results to `out`.
///
/// Rejected rows go to stderr so that `--json` output stays parseable.
fn run(args: &RunArgs, out: &mut impl Write) -> CalcResult<()> {
    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => ReportSettings::default(),
    };
    if let Some(n) = args.samples {
        settings = settings.with_sample_points(n);
    }

    info!("reading {}", args.workbook.display());
    let workbook = load_workbook(&args.workbook)?;
    let rows = workbook.beam_rows()?;
    let report = process_rows(&rows, &settings);

    for failure in &report.failures {
        eprintln!("{}", failure);
    }
    report.ensure_not_empty()?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        return writeln!(out).map_err(stdout_error);
    }

    let pdf_bytes = render_report_pdf(&report, &settings)?;
    save_report(&pdf_bytes, &args.output)?;

    writeln!(
        out,
        "\nBeams processed: {}\nBeams rejected:  {}\nReport written to {}",
        report.processed_count(),
        report.failed_count(),
        args.output.display()
    )
    .map_err(stdout_error)
}

fn stdout_error(e: std::io::Error) -> CalcError {
    CalcError::file_error("write", "<stdout>", e.to_string())
}

fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    let result = match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Template(path) => write_template(&path).map(|()| {
            println!("Template written to {}", path.display());
        }),
        Command::Run(args) => run(&args, &mut io::stdout().lock()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        match parse_args(&args(&["vigas.json"])).unwrap() {
            Command::Run(run) => {
                assert_eq!(run.workbook, PathBuf::from("vigas.json"));
                assert_eq!(run.output, PathBuf::from("Relatorio_Vigas.pdf"));
                assert_eq!(run.samples, None);
                assert!(!run.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_all_options() {
        let parsed = parse_args(&args(&[
            "--samples", "100", "vigas.json", "-o", "out.pdf", "--settings", "s.json", "--json",
        ]))
        .unwrap();
        match parsed {
            Command::Run(run) => {
                assert_eq!(run.samples, Some(100));
                assert_eq!(run.output, PathBuf::from("out.pdf"));
                assert_eq!(run.settings, Some(PathBuf::from("s.json")));
                assert!(run.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_template_command() {
        assert!(matches!(
            parse_args(&args(&["template", "t.json"])).unwrap(),
            Command::Template(_)
        ));
        assert!(parse_args(&args(&["template"])).is_err());
    }

    fn run_args(workbook: PathBuf, json: bool) -> RunArgs {
        RunArgs {
            output: workbook.with_extension("pdf"),
            workbook,
            samples: Some(5),
            settings: None,
            json,
        }
    }

    #[test]
    fn test_json_output_is_only_json() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = dir.path().join("vigas.json");
        std::fs::write(
            &workbook,
            r#"{"Vigas": [
                {"ID": "OK", "Tipo": "biapoiada", "L (m)": 10, "Apoios (m)": "[0, 10]",
                 "Cargas JSON": "[{\"tipo\": \"pontual\", \"pos\": 5, \"valor\": 100}]"},
                {"ID": "BAD", "Tipo": "biapoiada", "L (m)": 10, "Apoios (m)": "[3, 1]",
                 "Cargas JSON": "[]"}
            ]}"#,
        )
        .unwrap();

        let mut out = Vec::new();
        run(&run_args(workbook, true), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["beams"].as_array().unwrap().len(), 1);
        assert_eq!(value["failures"][0]["id"], "BAD");
        assert!(!String::from_utf8(out).unwrap().contains("Error in beam"));
    }

    #[test]
    fn test_empty_sheet_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = dir.path().join("vigas.json");
        std::fs::write(&workbook, r#"{"Vigas": []}"#).unwrap();

        let mut out = Vec::new();
        let err = run(&run_args(workbook, true), &mut out).unwrap_err();
        assert_eq!(err, CalcError::EmptyInput);
        assert!(out.is_empty());
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(&args(&["--samples", "many", "v.json"])).is_err());
        assert!(parse_args(&args(&["a.json", "b.json"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["-o", "x.pdf"])).is_err());
        assert!(matches!(parse_args(&[]).unwrap(), Command::Help));
    }
}
