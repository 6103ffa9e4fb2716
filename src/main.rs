use clap::{Parser, Subcommand};
use facetsite::{config, generate, output, scan};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("FACETSITE_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FACETSITE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "facetsite")]
#[command(about = "Search index compiler for faceted static content sites")]
#[command(long_about = "\
Search index compiler for faceted static content sites

Markdown documents are grouped by glob into sections and compiled into a
single JSON search index for the in-browser ranking engine.

Content structure:

  content/
  ├── config.toml                  # Groups, index and runtime settings
  ├── vendor/search.js             # Ranking runtime (copied verbatim)
  ├── articles/
  │   ├── 010-sleep-basics.md      # URL /articles/sleep-basics/
  │   └── research/
  │       └── 010-melatonin.md
  └── resources/
      └── checklist.md             # permalink: in front matter wins

Front matter (YAML, optional):
  title        falls back to the first '# ' heading
  permalink    falls back to /{group}/{slug}/
  tags         string or list
  category     string or list
  audience     string or list

Run 'facetsite gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log build progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile the search index and copy the ranking runtime
    Index,
    /// Validate the content directory without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Index => {
            println!("==> Indexing {}", cli.source.display());
            let (site_config, index) = scan::scan(&cli.source)?;
            output::print_scan_output(&site_config, &index);
            let report = generate::emit(&index, &site_config, &cli.source, &cli.output)?;
            output::print_emit_output(&report);
            println!("==> Index complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (site_config, index) = scan::scan(&cli.source)?;
            output::print_scan_output(&site_config, &index);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only, or info with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "facetsite=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
