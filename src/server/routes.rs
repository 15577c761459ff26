use serde::Serialize;

use crate::compose::{Character, ComposeError};
use crate::context::AppContext;
use crate::render::{render_character, render_listing, GUIDANCE};

const TEXT: &str = "text/plain; charset=utf-8";
const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type,
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeListItem<'a> {
    pub name: &'a str,
    pub power_level: i32,
    pub is_order: bool,
}

pub fn route_request(ctx: &AppContext, method: &str, path: &str) -> HttpResponse {
    if method != "GET" {
        return text_error(405, "Method Not Allowed", "Only GET is supported");
    }
    let route = path.split('?').next().unwrap_or("/");
    match route {
        "/" => character_text(ctx, &[]),
        "/list" => HttpResponse::ok(TEXT, render_listing(&ctx.catalog)),
        "/favicon.ico" => text_error(404, "Not Found", "Not found"),
        "/api/health" => match health_payload(ctx) {
            Ok(payload) => HttpResponse::ok(JSON, payload),
            Err(err) => json_error(500, "Internal Server Error", &err.to_string()),
        },
        "/api/archetypes" => match archetypes_payload(ctx) {
            Ok(payload) => HttpResponse::ok(JSON, payload),
            Err(err) => json_error(500, "Internal Server Error", &err.to_string()),
        },
        "/api/character" => {
            let names = parse_names_query(path);
            match ctx.character(&names) {
                Ok(character) => match character_payload(&character) {
                    Ok(payload) => HttpResponse::ok(JSON, payload),
                    Err(err) => json_error(500, "Internal Server Error", &err.to_string()),
                },
                Err(err) => json_error(500, "Internal Server Error", &err.to_string()),
            }
        }
        route if route.starts_with("/api/") => json_error(404, "Not Found", "Route not found"),
        route => match urlencoding::decode(route.trim_start_matches('/')) {
            Ok(decoded) => {
                let names = split_names(&decoded);
                character_text(ctx, &names)
            }
            Err(_) => text_error(400, "Bad Request", "Path is not valid UTF-8"),
        },
    }
}

fn character_text(ctx: &AppContext, names: &[String]) -> HttpResponse {
    match ctx.character(names) {
        Ok(character) => {
            let mut body = render_character(&character, &ctx.techniques, ctx.config.dice_style);
            body.push_str(GUIDANCE);
            HttpResponse::ok(TEXT, body)
        }
        Err(err) => compose_error(&err),
    }
}

fn compose_error(err: &ComposeError) -> HttpResponse {
    tracing::error!(%err, "character composition failed");
    text_error(500, "Internal Server Error", "An internal error occurred.")
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// `names=a,b` from the query string; `+` and percent escapes are decoded.
fn parse_names_query(path: &str) -> Vec<String> {
    let query = path.split('?').nth(1).unwrap_or("");
    query
        .split('&')
        .filter_map(|pair| pair.strip_prefix("names="))
        .filter_map(|value| urlencoding::decode(&value.replace('+', " ")).ok().map(|v| v.into_owned()))
        .flat_map(|value| split_names(&value))
        .collect()
}

pub fn health_payload(ctx: &AppContext) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "chargen",
        "version": env!("CARGO_PKG_VERSION"),
        "archetypes": ctx.catalog.len(),
    }))
}

pub fn archetypes_payload(ctx: &AppContext) -> Result<String, serde_json::Error> {
    let list: Vec<ArchetypeListItem<'_>> = ctx
        .catalog
        .archetypes()
        .iter()
        .map(|a| ArchetypeListItem {
            name: &a.name,
            power_level: a.power_level,
            is_order: a.is_order,
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({ "archetypes": list }))
}

pub fn character_payload(character: &Character<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(character)
}

fn text_error(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: TEXT,
        body: message.to_string(),
    }
}

fn json_error(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: JSON,
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
