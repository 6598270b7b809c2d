//! Gauge MCP Server
//!
//! MCP Server (protocol revision 2025-11-25) over line-delimited stdio.
//! One process is one conversion session.
//!
//! Tools:
//! - convert: Convert a value between two units of a category
//! - convert_query: Convert a free-text query ("5 Kilometers to Miles")
//! - list_categories: Categories with their rule kind and units
//! - list_units: Units of one category
//! - history: Recent conversions, newest first
//! - clear_history: Reset the session history
//! - set_default_unit: Prefer a default source unit for a category
//! - format: Render a number with the session formatter

use gauge::{DisplaySettings, Gauge};
use gauge_core::{GaugeError, ResultFormatter};
use gauge_units::ConversionRequest;
use std::env;
use std::io::{self, BufRead, Write};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::Level;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "gauge";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log level from `GAUGE_LOG`, `info` when unset or unrecognized
fn log_level(raw: Option<&str>) -> Level {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("error") => Level::ERROR,
        Some("warn") => Level::WARN,
        Some("debug") => Level::DEBUG,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Session settings from `GAUGE_PRECISION` and `GAUGE_SCIENTIFIC`
fn settings_from(precision: Option<&str>, scientific: Option<&str>) -> DisplaySettings {
    let mut settings = DisplaySettings::new();
    if let Some(raw) = precision {
        match raw.trim().parse::<u32>() {
            Ok(p) => settings = settings.with_precision(p),
            Err(_) => tracing::warn!(value = raw, "ignoring invalid GAUGE_PRECISION"),
        }
    }
    if let Some(raw) = scientific {
        settings = settings.with_scientific(parse_flag(raw));
    }
    settings
}

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

impl McpResponse {
    fn parse_error(details: &str) -> Self {
        McpResponse {
            jsonrpc: "2.0".to_string(),
            id: None,
            result: None,
            error: Some(McpError {
                code: -32700,
                message: format!("Parse error: {}", details),
                data: None,
            }),
        }
    }
}

/// Serialize a response onto one line
fn encode(response: &McpResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to encode response");
        r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#.to_string()
    })
}

fn main() {
    let level = log_level(env::var("GAUGE_LOG").ok().as_deref());
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let settings = settings_from(
        env::var("GAUGE_PRECISION").ok().as_deref(),
        env::var("GAUGE_SCIENTIFIC").ok().as_deref(),
    );
    let mut gauge = Gauge::standard().with_settings(settings);

    tracing::info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Gauge MCP Server started");
    tracing::info!(
        precision = gauge.settings().precision,
        scientific = gauge.settings().scientific,
        categories = gauge.categories().len(),
        "session ready"
    );

    // Line-based protocol: one request per line on stdin, responses on stdout
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                tracing::info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let Some(response) = process_line(&mut gauge, line) else {
                    continue;
                };

                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", encode(&response)) {
                    tracing::error!(error = %e, "error writing response");
                    break;
                }
                if let Err(e) = stdout.flush() {
                    tracing::error!(error = %e, "error flushing stdout");
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "error reading input");
                break;
            }
        }
    }

    tracing::info!("server shutting down");
}

/// Handle one input line; `None` for notifications, which get no response
fn process_line(gauge: &mut Gauge, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "error parsing request");
            return Some(McpResponse::parse_error(&e.to_string()));
        }
    };

    tracing::debug!(method = %request.method, "processing");
    let response = handle_request(gauge, &request);

    if request.id.is_none() {
        tracing::debug!(method = %request.method, "notification processed (no response)");
        return None;
    }
    Some(response)
}

fn handle_request(gauge: &mut Gauge, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(gauge, &request.params),

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Echo the client's protocol version
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    tracing::info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion across eleven measurement categories"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Gauge converts values between units of the same category (Length, Weight, Temperature, Angle, Speed, Time, Volume, Pressure, Energy, Power, Data Transfer Rate). Use 'list_categories' to discover unit names, then 'convert' or 'convert_query'. The session keeps the last five conversions in 'history'."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let precision = json!({
        "type": "integer",
        "description": "Decimal places for this call, 0-10 (default: session precision)",
        "minimum": 0,
        "maximum": 10
    });
    let scientific = json!({
        "type": "boolean",
        "description": "Use scientific notation for magnitudes below 0.0001 (default: session setting)"
    });

    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value between two units of one category. Successful conversions are added to the session history.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name, e.g. \"Length\""
                        },
                        "from": {
                            "type": "string",
                            "description": "Source unit, e.g. \"Kilometers\""
                        },
                        "to": {
                            "type": "string",
                            "description": "Target unit, e.g. \"Miles\""
                        },
                        "value": {
                            "type": "number",
                            "description": "Value to convert"
                        },
                        "precision": precision,
                        "scientific": scientific
                    },
                    "required": ["category", "from", "to", "value"]
                }
            },
            {
                "name": "convert_query",
                "description": "Convert a free-text query such as \"5 km to mi\" or \"100 Celsius -> Fahrenheit\". The category is inferred from the units unless given.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "<value> <unit> (to|in|->) <unit>"
                        },
                        "category": {
                            "type": "string",
                            "description": "Restrict unit lookup to this category"
                        },
                        "precision": precision,
                        "scientific": scientific
                    },
                    "required": ["query"]
                }
            },
            {
                "name": "list_categories",
                "description": "List categories in display order with their conversion rule and units.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List the units of one category in display order.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name"
                        }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "history",
                "description": "The last five successful conversions, newest first.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "clear_history",
                "description": "Forget all conversions in this session.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "set_default_unit",
                "description": "Prefer a default source unit for a category (e.g. Feet for Length).",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name"
                        },
                        "unit": {
                            "type": "string",
                            "description": "Unit of that category"
                        }
                    },
                    "required": ["category", "unit"]
                }
            },
            {
                "name": "format",
                "description": "Render a number with the session formatter.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": "number",
                            "description": "Value to render"
                        },
                        "precision": precision,
                        "scientific": scientific
                    },
                    "required": ["value"]
                }
            }
        ]
    }))
}

fn handle_tool_call(gauge: &mut Gauge, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "convert" => tool_convert(gauge, &args),
        "convert_query" => tool_convert_query(gauge, &args),
        "list_categories" => tool_list_categories(gauge),
        "list_units" => tool_list_units(gauge, &args),
        "history" => tool_history(gauge),
        "clear_history" => tool_clear_history(gauge),
        "set_default_unit" => tool_set_default_unit(gauge, &args),
        "format" => tool_format(gauge, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

// ========== Argument helpers ==========

fn arg_error(tool: &str, arg: &str, expected: &str) -> McpError {
    let err = GaugeError::arg_type(tool, arg, expected);
    McpError {
        code: -32602,
        message: err.message.clone(),
        data: serde_json::to_value(&err).ok(),
    }
}

fn str_arg<'a>(args: &'a JsonValue, tool: &str, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| arg_error(tool, name, "a string"))
}

/// Numbers, or numeric strings ("1e3", "NaN") for values JSON cannot carry
fn number_arg(args: &JsonValue, tool: &str, name: &str) -> Result<f64, McpError> {
    match args.get(name) {
        Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| arg_error(tool, name, "a number")),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().map_err(|_| arg_error(tool, name, "a number")),
        _ => Err(arg_error(tool, name, "a number")),
    }
}

/// Non-negative integer, accepting integral floats such as `2.0`
fn whole_number(v: &JsonValue) -> Option<u64> {
    v.as_u64().or_else(|| {
        v.as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f.min(u64::MAX as f64) as u64)
    })
}

/// Optional string argument; absent or null is `None`
fn opt_str_arg<'a>(args: &'a JsonValue, tool: &str, name: &str) -> Result<Option<&'a str>, McpError> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(arg_error(tool, name, "a string")),
    }
}

/// Per-call formatter: arguments override the session settings
fn formatter_arg(gauge: &Gauge, args: &JsonValue, tool: &str) -> Result<ResultFormatter, McpError> {
    let settings = gauge.settings();
    let precision = match args.get("precision") {
        None | Some(JsonValue::Null) => settings.precision,
        Some(v) => whole_number(v)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .ok_or_else(|| arg_error(tool, "precision", "a non-negative integer"))?,
    };
    let scientific = match args.get("scientific") {
        None | Some(JsonValue::Null) => settings.scientific,
        Some(v) => v.as_bool()
            .ok_or_else(|| arg_error(tool, "scientific", "a boolean"))?,
    };
    Ok(ResultFormatter::new(precision, scientific))
}

/// Tool-level failure: reported in the result with `isError`
fn tool_error(err: GaugeError) -> JsonValue {
    tracing::debug!(code = %err.code, message = %err.message, "tool error");
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "error": err,
        "isError": true
    })
}

fn conversion_json(conversion: &gauge::Conversion) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": conversion.summary }],
        "category": conversion.result.category,
        "from": conversion.result.from_unit,
        "to": conversion.result.to_unit,
        "input": conversion.input,
        "value": conversion.result.value,
        "formatted": conversion.formatted,
        "isError": false
    })
}

// ========== Tools ==========

fn tool_convert(gauge: &mut Gauge, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = str_arg(args, "convert", "category")?;
    let from = str_arg(args, "convert", "from")?;
    let to = str_arg(args, "convert", "to")?;
    let value = number_arg(args, "convert", "value")?;
    let formatter = formatter_arg(gauge, args, "convert")?;

    let request = ConversionRequest::new(category, from, to, value);
    Ok(match gauge.convert_with(&request, &formatter) {
        Ok(conversion) => conversion_json(&conversion),
        Err(e) => tool_error(e.into()),
    })
}

fn tool_convert_query(gauge: &mut Gauge, args: &JsonValue) -> Result<JsonValue, McpError> {
    let query = str_arg(args, "convert_query", "query")?;
    let category = opt_str_arg(args, "convert_query", "category")?;
    let formatter = formatter_arg(gauge, args, "convert_query")?;

    Ok(match gauge.convert_query_with(category, query, &formatter) {
        Ok(conversion) => conversion_json(&conversion),
        Err(e) => tool_error(e.into()),
    })
}

fn tool_list_categories(gauge: &Gauge) -> Result<JsonValue, McpError> {
    let categories: Vec<JsonValue> = gauge.categories().iter()
        .map(|c| json!({
            "name": c.name,
            "kind": c.rule().kind(),
            "units": c.units(),
        }))
        .collect();

    let text = gauge.categories().iter()
        .map(|c| format!("{}: {}", c.name, c.units().join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "categories": categories,
        "isError": false
    }))
}

fn tool_list_units(gauge: &Gauge, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = str_arg(args, "list_units", "category")?;

    let units = match gauge.units(category) {
        Ok(units) => units,
        Err(e) => return Ok(tool_error(e.into())),
    };
    let (default_from, default_to) = match gauge.default_units(category) {
        Ok(defaults) => defaults,
        Err(e) => return Ok(tool_error(e.into())),
    };

    Ok(json!({
        "content": [{ "type": "text", "text": units.join(", ") }],
        "category": category,
        "units": units,
        "defaults": { "from": default_from, "to": default_to },
        "isError": false
    }))
}

fn tool_history(gauge: &Gauge) -> Result<JsonValue, McpError> {
    let lines = gauge.history_lines();
    Ok(json!({
        "content": [{ "type": "text", "text": lines.join("\n") }],
        "records": gauge.history(),
        "lines": lines,
        "isError": false
    }))
}

fn tool_clear_history(gauge: &mut Gauge) -> Result<JsonValue, McpError> {
    gauge.clear_history();
    Ok(json!({
        "content": [{ "type": "text", "text": "History cleared" }],
        "isError": false
    }))
}

fn tool_set_default_unit(gauge: &mut Gauge, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = str_arg(args, "set_default_unit", "category")?;
    let unit = str_arg(args, "set_default_unit", "unit")?;

    Ok(match gauge.set_default_unit(category, unit) {
        Ok(()) => json!({
            "content": [{ "type": "text", "text": format!("Default {} unit set to {}", category, unit) }],
            "isError": false
        }),
        Err(e) => tool_error(e.into()),
    })
}

fn tool_format(gauge: &Gauge, args: &JsonValue) -> Result<JsonValue, McpError> {
    let value = number_arg(args, "format", "value")?;
    let formatter = formatter_arg(gauge, args, "format")?;

    if !value.is_finite() {
        return Ok(tool_error(gauge_core::ConversionError::InvalidValue(value).into()));
    }

    let formatted = formatter.format(value);
    Ok(json!({
        "content": [{ "type": "text", "text": formatted }],
        "formatted": formatted,
        "precision": formatter.precision(),
        "scientific": formatter.scientific(),
        "isError": false
    }))
}
