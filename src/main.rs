use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use docplain::{Config, Error, InputFormat};

#[derive(Parser)]
#[command(name = "docplain")]
#[command(about = "Convert rich-text documents to plain text")]
struct Cli {
    /// Input document (Markdown or editor JSON), or `-` for stdin
    input: PathBuf,

    /// Output text file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// TOML config with list markers and separators
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Markdown,
    Json,
}

impl From<Format> for InputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Auto => InputFormat::Auto,
            Format::Markdown => InputFormat::Markdown,
            Format::Json => InputFormat::Json,
        }
    }
}

fn read_input(path: &Path) -> Result<String, Error> {
    let result = if path == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).map(|_| content)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Config::compiled_default(),
    };

    let content = match read_input(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Stdin has no extension to go by
    let path = (cli.input != Path::new("-")).then_some(cli.input.as_path());
    let format = InputFormat::from(cli.format).resolve(path, &content);
    tracing::debug!(?format, input = %cli.input.display(), "reading document");

    let document = match docplain::parse_input(&content, format) {
        Ok(document) => document,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let text = docplain::extract_plain_text_with_config(&document, &config);

    match cli.output {
        Some(output) => {
            if let Err(e) = fs::write(&output, format!("{}\n", text)) {
                tracing::error!("writing {}: {}", output.display(), e);
                std::process::exit(1);
            }
            tracing::info!(output = %output.display(), "wrote plain text");
        }
        None => println!("{}", text),
    }
}
