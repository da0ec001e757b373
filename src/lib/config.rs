use anstyle::{AnsiColor, Color, Style};
use log::debug;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::lib::cli::{Cli, ColorMode, OutputFormat};
use crate::lib::container::Change;
use crate::lib::error::Result;
use crate::lib::fields::{Field, default_change_columns, default_columns};
use crate::lib::filter::Filter;
use crate::lib::loader::Source;
use crate::lib::units::UnitMode;

/// Run configuration resolved from the command line
#[derive(Clone, Debug)]
pub struct Config {
    pub inputs: Vec<Source>,
    pub references: Vec<Source>,
    pub filter: Filter,
    pub output: OutputFormat,
    pub kubectl: String,
    pub dump: Option<PathBuf>,
    pub render: RenderConfig,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let filter = Filter::parse(cli.filter.as_deref(), cli.invert_filter)?;

        let columns = match cli.columns.as_deref() {
            Some(list) => Field::parse_list(list)?,
            None => default_columns(),
        };
        let (table_columns, change_columns): (Vec<Field>, Vec<Field>) =
            columns.into_iter().partition(|f| !f.needs_reference());

        let with_changes = !cli.references.is_empty();
        let stdout_is_terminal = std::io::stdout().is_terminal();

        let render = RenderConfig {
            units: if cli.raw { UnitMode::Raw } else { cli.units },
            color: match cli.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => stdout_is_terminal && std::env::var_os("NO_COLOR").is_none(),
            },
            max_width: match cli.width {
                Some(0) => None,
                Some(width) => Some(width),
                None if stdout_is_terminal => terminal_width(),
                None => None,
            },
            with_changes,
            table_columns,
            change_columns: match cli.columns {
                Some(_) => change_columns,
                None => default_change_columns(),
            },
            palette: Palette::default(),
        };
        debug!("Render configuration: {:?}", render);

        Ok(Self {
            inputs: cli.inputs.clone(),
            references: cli.references.clone(),
            filter,
            output: cli.output,
            kubectl: cli.kubectl.clone(),
            dump: cli.dump.clone(),
            render,
        })
    }
}

fn terminal_width() -> Option<usize> {
    match crossterm::terminal::size() {
        Ok((columns, _)) => Some(columns as usize),
        Err(e) => {
            debug!("Cannot detect terminal width: {}", e);
            None
        }
    }
}

/// Immutable renderer configuration
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub units: UnitMode,
    pub color: bool,
    /// Target line width; `None` for unlimited
    pub max_width: Option<usize>,
    /// A reference snapshot was compared, so change columns are shown
    pub with_changes: bool,
    pub table_columns: Vec<Field>,
    pub change_columns: Vec<Field>,
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            units: UnitMode::Binary,
            color: false,
            max_width: None,
            with_changes: false,
            table_columns: default_columns(),
            change_columns: default_change_columns(),
            palette: Palette::default(),
        }
    }
}

/// Styles for change classifications.
///
/// Pod lines of the tree view use the `pod*` styles; container rows use the
/// others and stay unstyled when unchanged.
#[derive(Clone, Debug)]
pub struct Palette {
    pub pod: Style,
    pub pod_deleted: Style,
    pub pod_new: Style,
    pub deleted: Style,
    pub new: Style,
    pub modified: Style,
}

impl Default for Palette {
    fn default() -> Self {
        let fg = |color| Style::new().fg_color(Some(Color::Ansi(color)));
        Self {
            pod: fg(AnsiColor::White).bold(),
            pod_deleted: fg(AnsiColor::Red).bold(),
            pod_new: fg(AnsiColor::Green).bold(),
            deleted: fg(AnsiColor::Red),
            new: fg(AnsiColor::Green),
            modified: fg(AnsiColor::BrightYellow),
        }
    }
}

impl Palette {
    pub fn pod_style(&self, change: Change) -> Style {
        match change {
            Change::DeletedPod => self.pod_deleted,
            Change::NewPod => self.pod_new,
            _ => self.pod,
        }
    }

    pub fn row_style(&self, change: Change) -> Option<Style> {
        match change {
            Change::Unchanged => None,
            Change::Deleted | Change::DeletedContainer | Change::DeletedPod => Some(self.deleted),
            Change::New | Change::NewContainer | Change::NewPod => Some(self.new),
            Change::Modified => Some(self.modified),
        }
    }
}
