//! Vality CLI entry point.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rhizome_vality_ast::{print, validate};
use rhizome_vality_core::{Desugar, Registry};
use rhizome_vality_syntax_typescript::{parse, Dialect};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vality")]
#[command(about = "Vality schema shorthand desugarer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand schema shorthand into canonical call form
    Desugar {
        /// Input file(s) (or - for stdin)
        #[arg(required = true)]
        files: Vec<String>,

        /// Output directory
        #[arg(short, long)]
        out: Option<String>,

        /// Write to stdout instead of file
        #[arg(long)]
        stdout: bool,

        /// Registry file (TOML); defaults to the built-in registry
        #[arg(short, long)]
        registry: Option<String>,

        /// Validate the rewritten tree before printing
        #[arg(long)]
        check: bool,
    },

    /// Print the effective registry as JSON
    Registry {
        /// Registry file (TOML); defaults to the built-in registry
        #[arg(short, long)]
        registry: Option<String>,
    },
}

fn load_registry(path: Option<&str>) -> Result<Registry, Box<dyn std::error::Error>> {
    let registry = match path {
        Some(path) => {
            info!("Registry: {}", path);
            Registry::from_file(path)?
        }
        None => Registry::builtin()?,
    };
    Ok(registry)
}

/// `dir/name.ts` becomes `<out or dir>/name.vality.ts`.
fn output_path(file: &str, out: Option<&str>) -> PathBuf {
    let path = Path::new(file);
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let filename = match path.extension() {
        Some(ext) => format!("{}.vality.{}", stem, ext.to_string_lossy()),
        None => format!("{}.vality", stem),
    };
    match out {
        Some(dir) => Path::new(dir).join(filename),
        None => path.with_file_name(filename),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("vality=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Desugar {
            files,
            out,
            stdout,
            registry,
            check,
        } => {
            let pass = Desugar::new(load_registry(registry.as_deref())?);

            for file in files {
                let (source, dialect) = if file == "-" {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    (buf, Dialect::TypeScript)
                } else {
                    (std::fs::read_to_string(&file)?, Dialect::from_path(&file))
                };

                let mut ast = parse(&source, dialect)?;
                let stats = pass.run(&mut ast);
                if check {
                    validate(&ast)?;
                }
                let output = print(&ast)?;
                info!("{}: {} rewrites", file, stats.total());

                if stdout || file == "-" {
                    print!("{}", output);
                } else {
                    let out_path = output_path(&file, out.as_deref());
                    std::fs::write(&out_path, &output)?;
                    println!("{} -> {}", file, out_path.display());
                }
            }
        }

        Commands::Registry { registry } => {
            let registry = load_registry(registry.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&registry)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path("schemas/user.ts", None),
            PathBuf::from("schemas/user.vality.ts")
        );
        assert_eq!(
            output_path("schemas/view.tsx", Some("build")),
            PathBuf::from("build/view.vality.tsx")
        );
        assert_eq!(output_path("schema", None), PathBuf::from("schema.vality"));
    }
}
