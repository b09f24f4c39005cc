use atomc_compiler::config::runtime::RuntimeConfig;
use atomc_compiler::lexical::render_token_table;
use atomc_compiler::logging::codes;
use atomc_compiler::{logging, pipeline};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Tokens,
    Parse,
    Ast,
}

/// Tokenizer and syntax recognizer for AtomC sources.
///
/// Errors in the program are printed as `error in line <N>: <message>`
/// and the process exits with status 1.
#[derive(Parser, Debug)]
#[command(name = "atomc_compiler", version, after_help = build_note())]
struct Cli {
    /// Print the token table (default)
    #[arg(long, group = "mode")]
    tokens: bool,

    /// Check the syntax; silent on success
    #[arg(long, group = "mode")]
    parse: bool,

    /// Print the syntax tree as JSON
    #[arg(long, group = "mode")]
    ast: bool,

    /// Runtime preferences (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// AtomC source file
    file: String,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.tokens || !(self.parse || self.ast) {
            Mode::Tokens
        } else if self.parse {
            Mode::Parse
        } else {
            Mode::Ast
        }
    }
}

fn build_note() -> String {
    format!("Build: {}", atomc_compiler::config::build_info::source_info())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            error.print()?;
            std::process::exit(code);
        }
    };

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path).map_err(|error| {
            logging::safe_log_error(codes::system::CONFIGURATION_ERROR, &error.to_string());
            error
        })?,
        None => RuntimeConfig::default(),
    };

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()
        .and_then(|()| pipeline::validate_pipeline())
        .map_err(|message| {
            logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &message);
            message
        })?;

    match cli.mode() {
        Mode::Tokens => print_tokens(&cli.file, &config),
        Mode::Parse => {
            if let Err(error) = pipeline::process_file_with_config(&cli.file, &config) {
                report_failure(&error);
            }
        }
        Mode::Ast => match pipeline::process_file_with_config(&cli.file, &config) {
            Ok(result) => println!("{}", serde_json::to_string_pretty(&result.unit)?),
            Err(error) => report_failure(&error),
        },
    }

    Ok(())
}

fn print_tokens(file: &str, config: &RuntimeConfig) {
    match pipeline::tokenize_file_with_config(file, config) {
        Ok(dump) => {
            print!("{}", render_token_table(&dump.tokens));
            if let Some(error) = dump.error {
                println!("{}", error.diagnostic());
                std::process::exit(1);
            }
        }
        Err(error) => report_failure(&error),
    }
}

/// Compile errors go to stdout as a single diagnostic line; read failures go to stderr
fn report_failure(error: &pipeline::PipelineError) -> ! {
    if error.is_compile_error() {
        println!("{}", error.diagnostic());
    } else {
        eprintln!("Error: {}", error);
    }
    std::process::exit(1);
}
