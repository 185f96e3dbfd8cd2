//! BMI CLI - Command-line interface for the BMI engine
//!
//! Commands:
//! - calc: Compute and classify a single measurement
//! - transform: Process measurement records into reports (batch mode)
//! - run: Process streaming records from stdin (streaming mode)
//! - categories: Print the classification bands

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bmi_engine::calculator::PROMPT;
use bmi_engine::classify::band_bounds;
use bmi_engine::encoder::ReportEncoder;
use bmi_engine::types::{BmiReport, Category, HeightUnit, MeasurementRecord, RawValue, WeightUnit};
use bmi_engine::{BmiError, BmiProcessor, ENGINE_VERSION};

/// BMI - Body Mass Index computation and classification
#[derive(Parser)]
#[command(name = "bmi")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute and classify Body Mass Index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and classify a single measurement
    Calc {
        /// Height in centimeters, or feet with --height-unit ft
        #[arg(long, allow_hyphen_values = true)]
        height: String,

        /// Inches, added to the feet value when --height-unit is ft
        #[arg(long, allow_hyphen_values = true)]
        inches: Option<String>,

        /// Height unit (cm or ft)
        #[arg(long, default_value = "cm")]
        height_unit: HeightUnit,

        /// Weight in the chosen weight unit
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Weight unit (kg or lbs)
        #[arg(long, default_value = "kg")]
        weight_unit: WeightUnit,

        /// Output format
        #[arg(long, default_value = "auto")]
        format: CalcFormat,
    },

    /// Process measurement records into reports (batch mode)
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,
    },

    /// Process streaming records from stdin (streaming mode)
    Run {
        /// Only flush output at end of input instead of after each record
        #[arg(long)]
        no_flush: bool,
    },

    /// Print the classification bands
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum CalcFormat {
    /// Text on a terminal, JSON otherwise
    Auto,
    /// Human readable text
    Text,
    /// Single-line JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one report per line)
    Ndjson,
    /// JSON array of reports
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Exit code when the inputs did not produce a result
const EXIT_NO_RESULT: u8 = 2;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("BMI_LOG", "warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
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

fn run(cli: Cli) -> Result<ExitCode, BmiCliError> {
    match cli.command {
        Commands::Calc {
            height,
            inches,
            height_unit,
            weight,
            weight_unit,
            format,
        } => {
            let record = MeasurementRecord {
                record_id: None,
                height: RawValue::Text(height),
                height_unit,
                inches: inches.map(RawValue::Text),
                weight: RawValue::Text(weight),
                weight_unit,
            };
            cmd_calc(&record, format)
        }

        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
        } => cmd_transform(&input, &output, input_format, output_format).map(|()| ExitCode::SUCCESS),

        Commands::Run { no_flush } => cmd_run(!no_flush).map(|()| ExitCode::SUCCESS),

        Commands::Categories { json } => cmd_categories(json).map(|()| ExitCode::SUCCESS),
    }
}

fn cmd_calc(record: &MeasurementRecord, format: CalcFormat) -> Result<ExitCode, BmiCliError> {
    let encoder = ReportEncoder::new();
    let report = encoder.encode(record.evaluate(), None);

    let format = match format {
        CalcFormat::Auto if atty::is(atty::Stream::Stdout) => CalcFormat::Text,
        CalcFormat::Auto => CalcFormat::Json,
        other => other,
    };

    match format {
        CalcFormat::Text => print_text(&report),
        CalcFormat::Json => println!("{}", serde_json::to_string(&report)?),
        CalcFormat::JsonPretty | CalcFormat::Auto => {
            println!("{}", serde_json::to_string_pretty(&report)?)
        }
    }

    if report.result.is_some() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_NO_RESULT))
    }
}

fn print_text(report: &BmiReport) {
    let Some(result) = &report.result else {
        println!("{}", PROMPT);
        return;
    };

    println!("BMI:      {}", result.display_bmi());
    println!("Category: {}", result.category);
    println!("          {}", result.description);
    println!("\nHealth Recommendations:");
    for tip in &result.tips {
        println!("  - {}", tip);
    }
}

fn cmd_transform(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
) -> Result<(), BmiCliError> {
    // Read input
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let processor = BmiProcessor::new();
    let reports = match input_format {
        InputFormat::Ndjson => processor.process_ndjson(&input_data)?,
        InputFormat::Json => processor.process_array(&input_data)?,
    };

    if reports.is_empty() {
        return Err(BmiCliError::NoRecords);
    }

    let absent = reports.iter().filter(|r| r.result.is_none()).count();
    if absent > 0 {
        log::warn!("{} of {} records were not computable", absent, reports.len());
    }

    let output_data = format_output(&reports, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(flush: bool) -> Result<(), BmiCliError> {
    let processor = BmiProcessor::new();
    log::info!("streaming with instance {}", processor.instance_id());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let report = processor
            .process_json(trimmed)
            .map_err(|e| BmiCliError::ParseError(format!("Failed to parse record: {}", e)))?;

        writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    stdout.flush()?;
    Ok(())
}

fn cmd_categories(json: bool) -> Result<(), BmiCliError> {
    let rows: Vec<CategoryRow> = Category::ALL
        .iter()
        .map(|category| {
            let (lower, upper) = band_bounds(*category);
            CategoryRow {
                category: category.label(),
                lower,
                upper: upper.is_finite().then_some(upper),
                description: category.description(),
                tips: category.tips(),
                color: category.color(),
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("BMI Categories");
        println!("==============");
        for row in &rows {
            let range = match row.upper {
                Some(upper) => format!("{:.1} - <{:.1}", row.lower, upper),
                None => format!("{:.1}+", row.lower),
            };
            println!("\n{} ({})", row.category, range);
            println!("  {}", row.description);
            for tip in &row.tips {
                println!("  - {}", tip);
            }
        }
    }

    Ok(())
}

// Helper functions

fn format_output(reports: &[BmiReport], format: &OutputFormat) -> Result<String, BmiCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for report in reports {
                lines.push(serde_json::to_string(report)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(reports)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(reports)?),
    }
}

// Error types

#[derive(Debug)]
enum BmiCliError {
    Io(io::Error),
    Engine(BmiError),
    Json(serde_json::Error),
    NoRecords,
    ParseError(String),
}

impl From<io::Error> for BmiCliError {
    fn from(e: io::Error) -> Self {
        BmiCliError::Io(e)
    }
}

impl From<BmiError> for BmiCliError {
    fn from(e: BmiError) -> Self {
        BmiCliError::Engine(e)
    }
}

impl From<serde_json::Error> for BmiCliError {
    fn from(e: serde_json::Error) -> Self {
        BmiCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<BmiCliError> for CliError {
    fn from(e: BmiCliError) -> Self {
        match e {
            BmiCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            BmiCliError::Engine(e) => CliError {
                code: "RECORD_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Records need height, weight and cm/ft, kg/lbs unit tags".to_string()),
            },
            BmiCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            BmiCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            BmiCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct CategoryRow {
    category: &'static str,
    lower: f64,
    upper: Option<f64>,
    description: &'static str,
    tips: [&'static str; 3],
    color: &'static str,
}
