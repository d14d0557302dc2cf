use clap::{Parser, Subcommand};
use miette::{Diagnostic, IntoDiagnostic, MietteHandlerOpts, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use unimpl_analyzer::{check_program, LoadedSource, Program, Scheduling};

mod sexpr;

#[derive(Parser)]
#[command(
    name = "unimpl",
    version,
    about = "Find interfaces that nothing implements",
    long_about = "Reads C#-style sources and warns about every declared interface that no class, struct or record implements, directly or through inheritance."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report unimplemented interfaces across a set of source files
    Check {
        /// Source files analysed together (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Visit symbols on the current thread instead of a thread pool
        #[arg(long, conflicts_with = "threads")]
        sequential: bool,

        /// Number of visitation threads (defaults to one per core)
        #[arg(short, long, value_name = "N")]
        threads: Option<usize>,

        /// Exit with a failure status when any interface is unimplemented
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Parse source files and display their declarations (debug only)
    Parse {
        /// Source files to parse (use '-' to read from stdin)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Show the full AST with span information
        #[arg(short, long)]
        spans: bool,
    },
}

/// Problems reading input files
#[derive(Error, Diagnostic, Debug)]
enum SourceError {
    #[error("File not found: {path}")]
    #[diagnostic(code(unimpl::cli::not_found))]
    NotFound { path: String },

    #[error("Expected a .cs file, got: {path}")]
    #[diagnostic(
        code(unimpl::cli::wrong_extension),
        help("Only C# sources are analysed; use '-' to pipe other input")
    )]
    WrongExtension { path: String },
}

fn main() {
    setup_tracing();
    setup_miette_handler();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check {
            files,
            sequential,
            threads,
            deny_warnings,
        }) => {
            let scheduling = if sequential {
                Scheduling::Sequential
            } else {
                Scheduling::Parallel { threads }
            };
            handle_check_command(files, scheduling, deny_warnings);
        }
        Some(Commands::Parse { files, spans }) => {
            handle_parse_command(files, spans);
        }
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["unimpl", "--help"]);
        }
    }
}

/// Log to stderr when UNIMPL_LOG holds a filter, e.g. `UNIMPL_LOG=unimpl_analyzer=debug`
fn setup_tracing() {
    if let Ok(filter) = EnvFilter::try_from_env("UNIMPL_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }
}

/// Configure miette for readable reports
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .color(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

fn handle_check_command(files: Vec<PathBuf>, scheduling: Scheduling, deny_warnings: bool) {
    let mut sources = Vec::with_capacity(files.len());
    for file_path in &files {
        match read_source(file_path) {
            Ok(source) => sources.push(source),
            Err(e) => {
                eprintln!("{:?}", e);
                process::exit(1);
            }
        }
    }
    let file_count = sources.len();

    let program = match Program::from_loaded(sources) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(1);
        }
    };

    let diagnostics = match check_program(&program, scheduling) {
        Ok(diagnostics) => diagnostics,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(1);
        }
    };

    for diagnostic in &diagnostics {
        eprintln!("{:?}", diagnostic.to_report(&program));
    }

    if diagnostics.is_empty() {
        println!(
            "✅ No unimplemented interfaces ({} types in {} files)",
            program.len(),
            file_count
        );
    } else {
        println!(
            "📊 {} unimplemented interface(s) ({} types in {} files)",
            diagnostics.len(),
            program.len(),
            file_count
        );
        if deny_warnings {
            process::exit(1);
        }
    }
}

fn handle_parse_command(files: Vec<PathBuf>, spans: bool) {
    let mut success = true;
    let multiple_files = files.len() > 1;

    for file_path in files {
        match parse_single_file(&file_path, spans) {
            Ok(()) => {
                if multiple_files {
                    println!("✅ {}", display_name(&file_path));
                }
            }
            Err(e) => {
                eprintln!("{:?}", e);
                success = false;
            }
        }
    }

    if !success {
        process::exit(1);
    }
}

fn parse_single_file(file_path: &Path, spans: bool) -> Result<()> {
    let source = read_source(file_path)?;
    let file = unimpl_parser::parse_source(&source.name, &source.text)?;

    if spans {
        println!("{:#?}", file);
    } else {
        println!("{}", sexpr::format_source_file_as_sexpr(&file));
    }
    Ok(())
}

fn display_name(file_path: &Path) -> String {
    if file_path.to_str() == Some("-") {
        "<stdin>".to_string()
    } else {
        file_path.display().to_string()
    }
}

fn read_source(file_path: &Path) -> Result<LoadedSource> {
    let name = display_name(file_path);

    if file_path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        return Ok(LoadedSource::new(name, buffer));
    }

    if !file_path.exists() {
        return Err(SourceError::NotFound { path: name }.into());
    }
    if file_path.extension().and_then(|s| s.to_str()) != Some("cs") {
        return Err(SourceError::WrongExtension { path: name }.into());
    }

    let text = fs::read_to_string(file_path).into_diagnostic()?;
    Ok(LoadedSource::new(name, text))
}
