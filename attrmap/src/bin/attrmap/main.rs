mod commands;
mod examples;
mod output;

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};

use commands::{
    fields::{FieldsArgs, handle_fields},
    load_config,
    values::{ValuesArgs, handle_values},
};
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager, palette};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("RUST_LOG", "Log filter, e.g. 'attrmap=debug' to trace cache misses"),
    ("ATTRMAP_CONFIG", "Mapper config file used when --config is not given"),
];

#[derive(Parser)]
#[command(name = "attrmap")]
#[command(version = "0.1.0")]
#[command(
    about = "Inspect how catalog attributes map to search-index fields",
    long_about = r#"Inspection tool for the attrmap library:

• Field type inference for every attribute of a catalog fixture
• Value normalization and option text resolution per store

Commands:
  fields    Show the index mapping built from the attributes
  values    Prepare the fixture's sample values for a store
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Mapper config file (TOML)
    #[arg(long, env = "ATTRMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show field types and options derived from the catalog attributes
    Fields(FieldsArgs),

    /// Normalize the catalog's sample values for a store
    Values(ValuesArgs),
}

fn build_cli_command() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command().after_long_help(render_top_level_appendix(use_color));
    command = command.color(if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    });
    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            let help_text = render_examples(example.groups, use_color);
            *subcommand = subcommand.clone().after_long_help(help_text);
        }
    }
    command
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut buffer = String::new();

    let heading = stylize("Examples:", palette::SECTION, true, use_color);
    let _ = writeln!(buffer, "{heading}");

    for (index, group) in groups.iter().enumerate() {
        let title = stylize(group.title, palette::TITLE, true, use_color);
        let _ = writeln!(buffer, "  {title}");

        for command in group.commands {
            let arrow = stylize(palette::ARROW, palette::COMMAND, false, use_color);
            let command_text = stylize(command, palette::COMMAND, false, use_color);
            let _ = writeln!(buffer, "    {arrow} {command_text}");
        }

        if index + 1 < groups.len() {
            buffer.push('\n');
        }
    }

    buffer
}

fn render_top_level_appendix(use_color: bool) -> String {
    let mut buffer = String::new();

    let env_heading = stylize("Environment Variables:", palette::SECTION, true, use_color);
    let _ = writeln!(buffer, "{env_heading}");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let key_text = stylize(key, palette::KEY, true, use_color);
        let value_text = stylize(description, palette::VALUE, false, use_color);
        let _ = writeln!(buffer, "  {key_text}  {value_text}");
    }

    buffer
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    let styled = text.color(color);
    if bold { styled.bold().to_string() } else { styled.to_string() }
}

fn main() {
    env_logger::init();

    let matches = build_cli_command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    if cli.no_color {
        colored::control::set_override(false);
    }

    let options = GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        no_color: cli.no_color,
    };
    let output = OutputManager::new(options);

    if let Err(err) = execute(cli, &output) {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Fields(args) => handle_fields(args, config, output)?,
        Commands::Values(args) => handle_values(args, config, output)?,
    }

    Ok(())
}
