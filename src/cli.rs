use std::path::PathBuf;

use clap::Parser;

use crate::models::{DependencyKind, Ecosystem};

#[derive(Parser, Debug)]
#[command(
    name = "license-lookup",
    about = "Resolve the license of loosely identified dependencies",
    version
)]
pub struct Cli {
    /// Batch file: a JSON request `{"dependencies": [...]}` or one dependency per line. `-` reads stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Kind of every line of a plain-text batch
    #[arg(long, value_enum, default_value = "name")]
    pub kind: KindArg,

    /// Config file [default: ./.license-lookup/config.toml, fallback ~/.config/license-lookup/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Items resolved at once (overrides `[http] concurrency`)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print the fetched license text under the table
    #[arg(long)]
    pub show_text: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum KindArg {
    /// Free-text dependency name
    Name,
    /// Source repository link
    Link,
    /// requirements.txt line
    Python,
    /// package.json dependency entry
    Npm,
    /// Cargo.toml dependency entry
    Cargo,
}

impl From<KindArg> for DependencyKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Name => DependencyKind::Name,
            KindArg::Link => DependencyKind::RepositoryLink,
            KindArg::Python => DependencyKind::ManifestEntry(Ecosystem::Python),
            KindArg::Npm => DependencyKind::ManifestEntry(Ecosystem::Node),
            KindArg::Cargo => DependencyKind::ManifestEntry(Ecosystem::Rust),
        }
    }
}
