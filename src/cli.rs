use std::sync::Arc;

use crate::catalog::load_catalog_file;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::render::{render_character, render_listing};
use crate::server;

const USAGE: &str = "usage: chargen <serve|generate|list|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Generate,
    List,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("generate") => Some(Command::Generate),
        Some("list") => Some(Command::List),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    match command {
        Command::Serve => handle_serve(config),
        Command::Generate => handle_generate(config, &args[2..]),
        Command::List => handle_list(config),
        Command::Validate => handle_validate(config, args.get(2).map(String::as_str)),
    }
}

fn load_context(config: AppConfig) -> Option<AppContext> {
    match AppContext::load(config) {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("catalog error: {err}");
            None
        }
    }
}

fn handle_serve(config: AppConfig) -> i32 {
    let bind_addr = config.bind_addr.clone();
    let Some(ctx) = load_context(config) else {
        return 1;
    };
    match server::run_server(Arc::new(ctx), &bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_generate(config: AppConfig, rest: &[String]) -> i32 {
    let as_json = rest.iter().any(|arg| arg == "--json");
    let names: Vec<&str> = rest
        .iter()
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
        .collect();

    let Some(ctx) = load_context(config) else {
        return 1;
    };
    let character = match ctx.character(&names) {
        Ok(character) => character,
        Err(err) => {
            eprintln!("cannot compose character: {err}");
            return 1;
        }
    };

    if as_json {
        match serde_json::to_string_pretty(&character) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize character: {err}");
                return 1;
            }
        }
    } else {
        println!(
            "{}",
            render_character(&character, &ctx.techniques, ctx.config.dice_style)
        );
    }
    0
}

fn handle_list(config: AppConfig) -> i32 {
    let Some(ctx) = load_context(config) else {
        return 1;
    };
    println!("{}", render_listing(&ctx.catalog));
    0
}

fn handle_validate(config: AppConfig, path: Option<&str>) -> i32 {
    let path = path.map(str::to_string).unwrap_or_else(|| config.catalog_path.display().to_string());

    match load_catalog_file(&path) {
        Ok(catalog) => {
            let orders = catalog.archetypes().iter().filter(|a| a.is_order).count();
            println!(
                "validation passed: {path} ({} archetypes, {orders} orders)",
                catalog.len()
            );
            for archetype in catalog.archetypes() {
                if archetype.name.is_empty() {
                    eprintln!("- warning: archetype without a name");
                }
                for line in &archetype.unparsed_lines {
                    eprintln!("- warning: {}: unparsed line '{line}'", archetype.name);
                }
            }
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}
