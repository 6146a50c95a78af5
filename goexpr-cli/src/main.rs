//! Command-line interface for goexpr
//! This binary runs extraction over template fragments and dumps the intermediate stages.
//!
//! Usage:
//!   goexpr extract [`<path>`|-] [--category `<name>`] [--format text|json] [--config `<file>`]
//!   goexpr tokens [`<path>`|-]      - Go tokens of the input as JSON
//!   goexpr ast [`<path>`|-]         - Syntax tree of the wrapped input

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use goexpr_config::{GoexprConfig, Loader, OutputFormat};
use goexpr_parser::goexpr::error::format_source_context;
use goexpr_parser::goexpr::lexing::tokenize;
use goexpr_parser::{extract, extract_as, parse_wrapped, Category, ExtractError};
use serde_json::json;
use std::io::Read;
use std::path::Path;

/// Read when present in the working directory and no `--config` is given
const LOCAL_CONFIG: &str = "goexpr.toml";

fn input_arg() -> Arg {
    Arg::new("path")
        .help("Fragment file, or - for stdin")
        .default_value("-")
        .index(1)
}

fn cli() -> Command {
    let categories: Vec<&'static str> = std::iter::once("auto")
        .chain(Category::ALL.iter().map(|c| c.name()))
        .collect();

    Command::new("goexpr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract Go headers and expressions from template fragments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("extract")
                .about("Print the Go header or expression a fragment starts with")
                .arg(input_arg())
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Extract as this category instead of classifying the fragment")
                        .value_parser(categories)
                        .default_value("auto"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (default from configuration)")
                        .value_parser(["text", "json"]),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                )
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .help("Report the category and configuration on stderr")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the Go tokens of the input as JSON")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("ast")
                .about("Print the syntax tree and errors of the wrapped input")
                .arg(input_arg()),
        )
}

fn main() {
    let matches = cli().get_matches();
    let result = match matches.subcommand() {
        Some(("extract", sub)) => handle_extract_command(sub),
        Some(("tokens", sub)) => handle_tokens_command(sub).map(|_| true),
        Some(("ast", sub)) => handle_ast_command(sub).map(|_| true),
        _ => unreachable!("clap requires a subcommand"),
    };
    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(2);
        }
    }
}

fn read_input(matches: &ArgMatches) -> Result<String> {
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("-");
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}

fn load_config(matches: &ArgMatches) -> Result<GoexprConfig> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(Path::new(LOCAL_CONFIG)),
    };
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    loader.build().context("invalid configuration")
}

/// Handle the extract command; returns false when extraction failed
fn handle_extract_command(matches: &ArgMatches) -> Result<bool> {
    let config = load_config(matches)?;
    let fragment = read_input(matches)?;
    let verbose = matches.get_flag("verbose");

    let requested = matches
        .get_one::<String>("category")
        .map(String::as_str)
        .unwrap_or("auto");
    let category = match Category::from_name(requested) {
        Some(category) => category,
        None => Category::classify(&fragment),
    };
    if verbose {
        eprintln!("category: {}", category);
        eprintln!("config: {:?}", config);
    }

    let result = if requested == "auto" {
        extract(&fragment)
    } else {
        extract_as(category, &fragment)
    };

    match config.output.format {
        OutputFormat::Json => print_json(category, &result)?,
        OutputFormat::Text => print_text(category, &result, &fragment, &config),
    }
    Ok(result.is_ok())
}

fn print_json(category: Category, result: &Result<String, ExtractError>) -> Result<()> {
    let value = match result {
        Ok(expression) => json!({
            "category": category.name(),
            "expression": expression,
            "error": null,
        }),
        Err(err) => {
            let error = match err.syntax_error() {
                Some(syntax) => json!({
                    "message": syntax.message,
                    "offset": syntax.offset,
                    "line": syntax.position.line + 1,
                    "column": syntax.position.column + 1,
                }),
                None => json!({ "message": err.to_string() }),
            };
            let expression = match err {
                ExtractError::Syntax { extracted, .. } => Some(extracted.as_str()),
                _ => None,
            };
            json!({
                "category": category.name(),
                "expression": expression,
                "error": error,
            })
        }
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_text(
    category: Category,
    result: &Result<String, ExtractError>,
    fragment: &str,
    config: &GoexprConfig,
) {
    match result {
        Ok(expression) => {
            if config.output.show_category {
                println!("{}: {}", category, expression);
            } else {
                println!("{}", expression);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            if let Some(syntax) = err.syntax_error() {
                if config.diagnostics.show_source_context {
                    eprint!(
                        "{}",
                        format_source_context(
                            fragment,
                            syntax.offset,
                            config.diagnostics.context_lines
                        )
                    );
                }
            }
        }
    }
}

fn handle_tokens_command(matches: &ArgMatches) -> Result<()> {
    let source = read_input(matches)?;
    let tokens: Vec<_> = tokenize(&source)
        .iter()
        .map(|t| {
            json!({
                "token": t.token.as_str(),
                "start": t.span.start,
                "end": t.span.end,
                "text": t.text,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&tokens)?);
    Ok(())
}

fn handle_ast_command(matches: &ArgMatches) -> Result<()> {
    let source = read_input(matches)?;
    let wrapped = parse_wrapped(&source);
    match &wrapped.file {
        Some(file) => println!("{:#?}", file),
        None => println!("no syntax tree"),
    }
    for error in wrapped.errors.iter() {
        println!("error: {}", error);
    }
    Ok(())
}
