mod commands;
mod output;

use clap::{Parser, Subcommand};
use docsift_core::error::DocsiftError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docsift",
    version,
    about = "Extract text from digital PDFs, scanned PDFs and images"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the text of a PDF or image file
    Extract {
        /// Path to a .pdf, .jpg, .jpeg, .png, .bmp or .tiff file
        input_file: PathBuf,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Write output to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// JSON config file overriding the defaults
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// OCR every PDF, even when it has a text layer
        #[arg(long)]
        force_ocr: bool,

        /// Tesseract language(s), e.g. "eng" or "eng+deu"
        #[arg(short, long, value_name = "LANG")]
        lang: Option<String>,
    },
    /// Report whether a PDF is digital or scanned
    Classify {
        /// Path to a PDF or image file
        input_file: PathBuf,

        /// JSON config file overriding the defaults
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the default configuration as JSON
    Show,
    /// Validate a JSON config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

/// Process exit code for an error.
fn exit_code(e: &DocsiftError) -> i32 {
    match e {
        DocsiftError::NotFound(_) => 2,
        DocsiftError::UnsupportedFileType { .. } => 3,
        _ => 1,
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            output,
            out,
            config,
            force_ocr,
            lang,
        } => commands::extract::run(commands::extract::ExtractArgs {
            input_file,
            output_format: output,
            output_file: out,
            config,
            force_ocr,
            language: lang,
        }),
        Commands::Classify { input_file, config } => commands::classify::run(input_file, config),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        log::debug!("exiting with {:?}", e);
        eprintln!("Error: {e}");
        std::process::exit(exit_code(&e));
    }
}
