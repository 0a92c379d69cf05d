use clap::{Parser as ClapParser, Subcommand};
use mapgen::{
    cli::{self, CliError, GenerateOptions},
    output::OutputFormat,
};
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "mapgen")]
#[command(about = "mapgen - Derive SQL mapper statements from data-access method names")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the statements of a mapper manifest
    Generate {
        /// Mapper manifest (.yaml, .yml or .json)
        manifest: PathBuf,

        /// Existing statement document to extend
        #[arg(short, long)]
        existing: Option<PathBuf>,

        /// Output format: json, yaml or xml
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Exit with an error when any method produced no statement
        #[arg(long)]
        strict: bool,
    },

    /// Show the tokens and AST of a method name
    Parse {
        /// Method name (reads one name per line from stdin if not provided)
        name: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Classify a type signature against a manifest
    Resolve {
        /// Mapper manifest providing the type declarations
        manifest: PathBuf,

        /// Type signature, e.g. java.util.List<com.example.Person>
        signature: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'mapgen docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            manifest,
            existing,
            format,
            pretty,
            strict,
        } => run_generate(GenerateOptions {
            manifest,
            existing,
            format,
            pretty,
            strict,
        }),
        Commands::Parse { name, pretty } => run_parse(name, pretty),
        Commands::Resolve {
            manifest,
            signature,
            pretty,
        } => cli::resolve_type(&manifest, &signature)
            .and_then(|descriptor| print_json(&descriptor, pretty)),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_generate(options: GenerateOptions) -> Result<(), CliError> {
    let rendered = cli::execute_generate(&options)?;
    println!("{}", rendered);
    Ok(())
}

fn run_parse(name: Option<String>, pretty: bool) -> Result<(), CliError> {
    let names = match name {
        Some(name) => vec![name],
        None if !atty::is(atty::Stream::Stdin) => io::stdin()
            .lock()
            .lines()
            .map(|line| line.map(|l| l.trim().to_string()))
            .filter(|line| !matches!(line, Ok(l) if l.is_empty()))
            .collect::<Result<Vec<_>, _>>()?,
        None => return Err(CliError::NoInput),
    };

    for name in names {
        print_json(&cli::parse_name(&name)?, pretty)?;
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(mapgen::output::OutputError::from)?;
    println!("{}", json);
    Ok(())
}
