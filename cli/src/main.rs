use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brine_nsd::schema_to_json;
use brine_nsd_compiler::{Emitter, NsdError};

/// Environment variable holding the log filter, e.g. `BNSD_LOG=debug`.
const LOG_ENV: &str = "BNSD_LOG";

#[derive(Parser)]
#[command(name = "bnsd")]
#[command(about = "Compile nsd schemas into Rust pack/unpack code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a `.rs` file for every `.nsd` schema found
    Compile {
        /// A `.nsd` file or a directory to search for them
        #[arg(short, long)]
        input: PathBuf,

        /// Also search subdirectories of the input directory
        #[arg(short, long)]
        recursive: bool,

        /// Directory for generated files (defaults to next to each schema)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a `.nsd` schema and print it as JSON (printed to stdout)
    Parse {
        /// Input `.nsd` file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Display lists every schema cause with its line and column.
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands) -> Result<(), NsdError> {
    match command {
        Commands::Compile { input, recursive, output } => {
            let emitter = Emitter::new();
            for schema in discover_schemas(input, *recursive)? {
                info!("Found nsd: {}", schema.display());
                let out_path = compile_file(&emitter, &schema, output.as_deref())?;
                info!("Generated: {}", out_path.display());
            }
            Ok(())
        }

        Commands::Parse { input } => {
            let text = fs::read_to_string(input)?;
            println!("{}", schema_to_json(&text)?);
            Ok(())
        }
    }
}

/// Every `.nsd` file (extension compared case-insensitively) at `input`,
/// sorted by path. A file path is returned as is.
fn discover_schemas(input: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                found.extend(discover_schemas(&path, true)?);
            }
        } else if is_schema(&path) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

fn is_schema(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("nsd"))
}

/// Compiles `schema` to `<stem>.rs` in `output`, or next to the schema.
fn compile_file(emitter: &Emitter, schema: &Path, output: Option<&Path>) -> Result<PathBuf, NsdError> {
    let text = fs::read_to_string(schema)?;
    let name = schema
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let code = emitter.compile(&name, &text)?;

    let directory = match output {
        Some(dir) => dir.to_path_buf(),
        None => schema.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    fs::create_dir_all(&directory)?;

    let mut out_path = directory.join(schema.file_stem().unwrap_or_default());
    out_path.set_extension("rs");
    fs::write(&out_path, code)?;
    Ok(out_path)
}
