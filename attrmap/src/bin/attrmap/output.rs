use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

/// Colors for the help text appendix and key/value lines.
pub mod palette {
    use colored::Color;

    pub const SECTION: Color = Color::Cyan;
    pub const TITLE: Color = Color::BrightBlue;
    pub const COMMAND: Color = Color::Magenta;
    pub const KEY: Color = Color::BrightCyan;
    pub const VALUE: Color = Color::White;
    pub const ARROW: &str = "→";
}

/// Kind of status line, which picks its icon and color.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Tone {
    Success,
    Error,
    Warning,
    Info,
}

impl Tone {
    fn icon(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Error => "✗",
            Tone::Warning => "⚠",
            Tone::Info => "ℹ",
        }
    }

    fn color(self) -> Color {
        match self {
            Tone::Success => Color::Green,
            Tone::Error => Color::Red,
            Tone::Warning => Color::Yellow,
            Tone::Info => Color::Blue,
        }
    }
}

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn is_json(&self) -> bool {
        self.options.output_format == OutputFormat::Json
    }

    /// Render data in the configured output format.
    pub fn render<T>(&self, data: &T) -> Result<String>
    where
        T: Serialize + TableDisplay,
    {
        Ok(match self.options.output_format {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Table => data.to_table(&self.options).to_string(),
            OutputFormat::Compact => data.to_compact(),
        })
    }

    /// Print data unless running quiet.
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }
        println!("{}", self.render(data)?);
        Ok(())
    }

    fn status_line(&self, tone: Tone, message: &str) -> String {
        if self.options.no_color {
            format!("{} {message}", tone.icon())
        } else {
            format!("{} {}", tone.icon().color(tone.color()), message.color(tone.color()))
        }
    }

    pub fn success(&self, message: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        println!("{}", self.status_line(Tone::Success, message));
    }

    /// Errors are printed even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status_line(Tone::Error, message));
    }

    /// Warnings go to stderr so JSON output stays parseable.
    pub fn warning(&self, message: &str) {
        if self.options.quiet {
            return;
        }
        eprintln!("{}", self.status_line(Tone::Warning, message));
    }

    pub fn info(&self, message: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        println!("{}", self.status_line(Tone::Info, message));
    }

    /// Display a heading
    pub fn heading(&self, text: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        let output = if self.options.no_color {
            format!("\n{text}\n{}", "=".repeat(text.len()))
        } else {
            format!("\n{}", text.color(palette::TITLE).bold())
        };
        println!("{output}");
    }

    /// Display a key-value pair
    pub fn key_value(&self, key: &str, value: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        let output = if self.options.no_color {
            format!("{key}: {value}")
        } else {
            format!("{}: {}", key.color(palette::KEY).bold(), value.color(palette::VALUE))
        };
        println!("{output}");
    }
}

/// Create a table with the preset matching the color setting
pub fn create_table(options: &GlobalOptions) -> Table {
    let preset = if options.no_color {
        comfy_table::presets::ASCII_FULL
    } else {
        comfy_table::presets::UTF8_FULL_CONDENSED
    };
    let mut table = Table::new();
    table.load_preset(preset);
    table
}

/// Add themed header to table
pub fn add_table_header(table: &mut Table, options: &GlobalOptions, headers: &[&str]) {
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(header_cells);
}
