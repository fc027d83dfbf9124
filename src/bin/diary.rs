//! Motor Diary CLI - Command-line interface for the symptom profile engine
//!
//! Commands:
//! - report: Assemble the full report payload from an event log
//! - summary: Print the derived insight lines
//! - validate: Validate an events file
//! - record: Append a tap to a JSON event log file

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, FixedOffset, Utc};
use motor_diary::pipeline::Diary;
use motor_diary::types::{Medication, SubjectProfile, SymptomEvent, SymptomState};
use motor_diary::{MedicationList, SlotAggregator, ENGINE_VERSION};

/// Motor Diary - On-device compute engine for symptom state profiles
#[derive(Parser)]
#[command(name = "motor-diary")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Turn a symptom tap log into daily profiles and reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the full report payload from an event log
    Report {
        /// Events file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Medication list file (JSON array)
        #[arg(long)]
        medications: Option<PathBuf>,

        /// Subject profile file (JSON object)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Trailing window length in days
        #[arg(long, default_value = "28")]
        window_days: i64,

        /// Evaluation instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,

        /// Wall-clock offset from UTC in minutes for slot bucketing
        #[arg(long, default_value = "0")]
        utc_offset_minutes: i32,
    },

    /// Print the derived insight lines for an event log
    Summary {
        /// Events file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Trailing window length in days
        #[arg(long, default_value = "28")]
        window_days: i64,

        /// Evaluation instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,

        /// Wall-clock offset from UTC in minutes for slot bucketing
        #[arg(long, default_value = "0")]
        utc_offset_minutes: i32,

        /// Output insight lines as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an events file
    Validate {
        /// Events file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a tap to a JSON event log file
    Record {
        /// Log file path; created when missing
        #[arg(short, long)]
        log: PathBuf,

        /// State to record: on, off, dys, trem
        #[arg(short, long)]
        state: String,

        /// Tap instant (RFC 3339); defaults to the current time
        #[arg(long)]
        at: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one event per line)
    Ndjson,
    /// JSON array of events
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DiaryCliError> {
    match cli.command {
        Commands::Report {
            input,
            output,
            input_format,
            output_format,
            medications,
            profile,
            window_days,
            now,
            utc_offset_minutes,
        } => cmd_report(
            &input,
            &output,
            input_format,
            output_format,
            medications.as_deref(),
            profile.as_deref(),
            window_days,
            now.as_deref(),
            utc_offset_minutes,
        ),

        Commands::Summary {
            input,
            input_format,
            window_days,
            now,
            utc_offset_minutes,
            json,
        } => cmd_summary(
            &input,
            input_format,
            window_days,
            now.as_deref(),
            utc_offset_minutes,
            json,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Record { log, state, at } => cmd_record(&log, &state, at.as_deref()),
    }
}

fn cmd_report(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    medications: Option<&Path>,
    profile: Option<&Path>,
    window_days: i64,
    now: Option<&str>,
    utc_offset_minutes: i32,
) -> Result<(), DiaryCliError> {
    let events = read_events(input, &input_format)?;
    let now = parse_now(now)?;

    let medications: Vec<Medication> = match medications {
        Some(path) => MedicationList::from_json(&fs::read_to_string(path)?)?
            .medications()
            .to_vec(),
        None => Vec::new(),
    };

    let subject: SubjectProfile = match profile {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SubjectProfile::default(),
    };

    let aggregator = build_aggregator(window_days, utc_offset_minutes)?;
    let profile = aggregator.daily_profile_at(&events, now);
    let summary = motor_diary::daily_summary(&profile);
    let report =
        motor_diary::ReportAssembler::assemble(&profile, &summary, &medications, &subject, now);

    let output_data = match output_format {
        OutputFormat::Json => serde_json::to_string(&report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&report)?,
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_summary(
    input: &Path,
    input_format: InputFormat,
    window_days: i64,
    now: Option<&str>,
    utc_offset_minutes: i32,
    json: bool,
) -> Result<(), DiaryCliError> {
    let events = read_events(input, &input_format)?;
    let now = parse_now(now)?;

    let aggregator = build_aggregator(window_days, utc_offset_minutes)?;
    let profile = aggregator.daily_profile_at(&events, now);
    let summary = motor_diary::daily_summary(&profile);

    if json {
        let lines: Vec<SummaryLineOut> = summary
            .insights
            .iter()
            .map(|insight| SummaryLineOut {
                text: insight.headline(),
                severity: format!("{:?}", insight.severity()).to_lowercase(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else if summary.is_empty() {
        eprintln!("No insights for the current window");
    } else {
        for insight in &summary.insights {
            println!("{}", insight.headline());
        }
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), DiaryCliError> {
    let input_data = read_input(input)?;

    let mut events: Vec<SymptomEvent> = Vec::new();
    let mut errors: Vec<ValidationErrorDetail> = Vec::new();

    match input_format {
        InputFormat::Ndjson => {
            for (index, line) in input_data.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str::<SymptomEvent>(trimmed) {
                    Ok(event) => events.push(event),
                    Err(e) => errors.push(ValidationErrorDetail {
                        line: index + 1,
                        error: e.to_string(),
                    }),
                }
            }
        }
        InputFormat::Json => match serde_json::from_str::<Vec<SymptomEvent>>(&input_data) {
            Ok(parsed) => events = parsed,
            Err(e) => errors.push(ValidationErrorDetail {
                line: 1,
                error: e.to_string(),
            }),
        },
    }

    let mut state_counts: BTreeMap<String, usize> = BTreeMap::new();
    for event in &events {
        *state_counts.entry(event.state.as_str().to_string()).or_default() += 1;
    }

    let report = ValidationReport {
        total_events: events.len() + errors.len(),
        valid_events: events.len(),
        invalid_events: errors.len(),
        state_counts,
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total events:   {}", report.total_events);
        println!("Valid events:   {}", report.valid_events);
        println!("Invalid events: {}", report.invalid_events);
        for (state, count) in &report.state_counts {
            println!("  {:4} {}", state, count);
        }

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - line {}: {}", err.line, err.error);
            }
        }
    }

    if report.invalid_events > 0 {
        Err(DiaryCliError::ValidationFailed(report.invalid_events))
    } else {
        Ok(())
    }
}

fn cmd_record(log_path: &Path, state: &str, at: Option<&str>) -> Result<(), DiaryCliError> {
    let state: SymptomState = state.parse()?;
    let timestamp = parse_now(at)?;

    let mut diary = Diary::new();
    if log_path.exists() {
        diary.load_log(&fs::read_to_string(log_path)?)?;
    }

    diary.record_at(state, timestamp);
    fs::write(log_path, diary.save_log()?)?;

    // Echo the appended event so callers can capture its identifier
    if let Some(event) = diary.log().entries().last() {
        println!("{}", serde_json::to_string(event)?);
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, DiaryCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_events(input: &Path, format: &InputFormat) -> Result<Vec<SymptomEvent>, DiaryCliError> {
    let input_data = read_input(input)?;

    match format {
        InputFormat::Ndjson => {
            let mut events = Vec::new();
            for (index, line) in input_data.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let event: SymptomEvent = serde_json::from_str(trimmed).map_err(|e| {
                    DiaryCliError::ParseError(format!("line {}: {}", index + 1, e))
                })?;
                events.push(event);
            }
            Ok(events)
        }
        InputFormat::Json => Ok(serde_json::from_str(&input_data)?),
    }
}

fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>, DiaryCliError> {
    match now {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(|e| DiaryCliError::ParseError(format!("invalid --now value: {}", e))),
        None => Ok(Utc::now()),
    }
}

fn build_aggregator(
    window_days: i64,
    utc_offset_minutes: i32,
) -> Result<SlotAggregator, DiaryCliError> {
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
        DiaryCliError::ParseError(format!(
            "invalid --utc-offset-minutes value: {}",
            utc_offset_minutes
        ))
    })?;
    Ok(SlotAggregator::new()
        .with_window_days(window_days)
        .with_offset(offset))
}

// Error types

#[derive(Debug)]
enum DiaryCliError {
    Io(io::Error),
    Diary(motor_diary::DiaryError),
    Json(serde_json::Error),
    ParseError(String),
    ValidationFailed(usize),
}

impl From<io::Error> for DiaryCliError {
    fn from(e: io::Error) -> Self {
        DiaryCliError::Io(e)
    }
}

impl From<motor_diary::DiaryError> for DiaryCliError {
    fn from(e: motor_diary::DiaryError) -> Self {
        DiaryCliError::Diary(e)
    }
}

impl From<serde_json::Error> for DiaryCliError {
    fn from(e: serde_json::Error) -> Self {
        DiaryCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<DiaryCliError> for CliError {
    fn from(e: DiaryCliError) -> Self {
        match e {
            DiaryCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            DiaryCliError::Diary(e) => CliError {
                code: "DIARY_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check event and medication file contents".to_string()),
            },
            DiaryCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            DiaryCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
            DiaryCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} events failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_events: usize,
    valid_events: usize,
    invalid_events: usize,
    state_counts: BTreeMap<String, usize>,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    line: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct SummaryLineOut {
    text: String,
    severity: String,
}
