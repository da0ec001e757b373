use clap::Parser;

use crate::lib::loader::Source;
use crate::lib::units::UnitMode;

/// Kubernetes resource statistics
///
/// Summarizes CPU, memory, ephemeral storage and volume claim requests and
/// limits of pods, and compares a snapshot against a reference snapshot.
///
/// Sources are JSON or YAML files produced by `kubectl get pods,pvc -o json`,
/// or `@namespace` to query a namespace through kubectl.
#[derive(Parser, Debug)]
#[command(name = "kubestat", author, version, about, styles=get_styles())]
pub struct Cli {
    /// Current snapshot sources, merged into one set
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<Source>,

    /// Reference snapshot source to compare against (repeatable)
    #[arg(short, long = "reference", value_name = "SOURCE")]
    pub references: Vec<Source>,

    /// Filter containers
    ///
    /// Comma-separated list of 'field=regex' or 'field!=regex' items. Fields:
    /// workloadType (kind), podName (pod), containerType (type),
    /// containerName (container). Without a field, podName is assumed.
    /// Examples: -f log,kind=R,type=reg  |  -f 'kind!=^Job$'
    #[arg(short, long, value_name = "EXPR")]
    pub filter: Option<String>,

    /// Show the containers NOT matching the filter
    #[arg(long)]
    pub invert_filter: bool,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", default_value = "pretty")]
    pub output: OutputFormat,

    /// Units for CPU and memory values
    #[arg(short, long, value_name = "UNITS", default_value = "binary")]
    pub units: UnitMode,

    /// Show raw millicores and bytes (same as --units raw)
    #[arg(long)]
    pub raw: bool,

    /// Maximum line width (0 = unlimited, default: terminal width)
    #[arg(short, long, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Comma-separated table columns, by header name
    #[arg(long, value_name = "LIST")]
    pub columns: Option<String>,

    /// When to color the tree and table output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// kubectl executable used for @namespace sources
    #[arg(long, env = "KUBESTAT_KUBECTL", default_value = "kubectl")]
    pub kubectl: String,

    /// Write the processed containers and claims as JSON to FILE
    #[arg(long, value_name = "FILE")]
    pub dump: Option<std::path::PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress log output to stderr (logs still written to file)
    #[arg(short, long)]
    pub quiet: bool,

    /// Also append log output to kubestat.log in the user data directory
    #[arg(long)]
    pub log_file: bool,
}

/// Output format for the rendered resource set
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table with repeated application and pod cells left blank
    Pretty,
    /// Table with every cell filled
    Table,
    /// Pods with their containers indented below
    Tree,
    /// Comma-separated raw values, one row per container
    Csv,
}

/// Color switch for rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Color when writing to a terminal and NO_COLOR is unset
    Auto,
    Always,
    Never,
}

/// Set color and variants for help description
///
/// Thanks to [Praveen Perera](https://stackoverflow.com/a/76916424)
fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}
