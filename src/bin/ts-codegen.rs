//! generate typescript declarations from a graphql schema
//!
//! this binary runs the types plugin, the resolvers plugin, or both, and writes
//! a single typescript file.
//!
//! command help reference (kept in sync with `ts-codegen --help`):
#[doc = concat!("```text\n", include_str!("ts-codegen-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("ts-codegen-help.txt");

use graphql_parser::query::parse_query;
use graphql_parser::schema::parse_schema;
use graphql_ts_codegen::{Plugin, PluginConfig, PluginOutput, ResolversPlugin, Schema, TypesPlugin};
use reqwest::blocking::Client as BlockingClient;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PluginChoice {
    Types,
    Resolvers,
    All,
}

#[derive(Debug)]
struct Args {
    url: Option<String>,
    schema_path: Option<PathBuf>,
    documents: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    plugin: PluginChoice,
    out: Option<PathBuf>,
}

enum ParseArgsError {
    Help,
    Message(String),
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("graphql_ts_codegen=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    let schema_text = match load_schema(&args) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("failed to load schema: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&args, &schema_text) {
        eprintln!("codegen failed: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args, schema_text: &str) -> Result<(), String> {
    let config = match &args.config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
            PluginConfig::from_json(&raw).map_err(|err| err.to_string())?
        }
        None => PluginConfig::new(),
    };

    let document = parse_schema::<String>(schema_text)
        .map_err(|err| format!("failed to parse schema: {err}"))?;
    let schema = Schema::new(&document).map_err(|err| err.to_string())?;

    let sources = args
        .documents
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .map_err(|err| format!("failed to read {}: {err}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let documents = sources
        .iter()
        .zip(&args.documents)
        .map(|(source, path)| {
            parse_query::<String>(source)
                .map_err(|err| format!("failed to parse {}: {err}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let plugins: Vec<&dyn Plugin> = match args.plugin {
        PluginChoice::Types => vec![&TypesPlugin],
        PluginChoice::Resolvers => vec![&ResolversPlugin],
        PluginChoice::All => vec![&TypesPlugin as &dyn Plugin, &ResolversPlugin],
    };

    let mut output = PluginOutput::default();
    for plugin in plugins {
        tracing::info!(plugin = plugin.name(), "running plugin");
        let generated = plugin
            .generate(&schema, &documents, &config)
            .map_err(|err| format!("{} plugin: {err}", plugin.name()))?;
        output = output.merge(generated);
    }

    let source = output.into_source();
    match &args.out {
        Some(path) => {
            fs::write(path, source)
                .map_err(|err| format!("failed to write {}: {err}", path.display()))?;
            tracing::info!(out = %path.display(), "wrote output");
        }
        None => print!("{source}"),
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut url = None;
    let mut schema_path = None;
    let mut documents = Vec::new();
    let mut config_path = None;
    let mut plugin = PluginChoice::All;
    let mut out = None;

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => url = iter.next(),
            "--schema" => schema_path = iter.next().map(PathBuf::from),
            "--document" => documents.extend(iter.next().map(PathBuf::from)),
            "--config" => config_path = iter.next().map(PathBuf::from),
            "--plugin" => {
                plugin = match iter.next().as_deref() {
                    Some("types") => PluginChoice::Types,
                    Some("resolvers") => PluginChoice::Resolvers,
                    Some("all") => PluginChoice::All,
                    Some(other) => {
                        return Err(ParseArgsError::Message(format!("unknown plugin: {other}")))
                    }
                    None => {
                        return Err(ParseArgsError::Message(
                            "--plugin needs a value".to_string(),
                        ))
                    }
                }
            }
            "--out" => out = iter.next().map(PathBuf::from),
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ => return Err(ParseArgsError::Message(format!("unknown argument: {arg}"))),
        }
    }

    if url.is_none() && schema_path.is_none() {
        return Err(ParseArgsError::Message(
            "--url or --schema is required".to_string(),
        ));
    }

    Ok(Args {
        url,
        schema_path,
        documents,
        config_path,
        plugin,
        out,
    })
}

fn load_schema(args: &Args) -> Result<String, String> {
    if let Some(schema_path) = &args.schema_path {
        return fs::read_to_string(schema_path)
            .map_err(|err| format!("failed to read {}: {err}", schema_path.display()));
    }

    let url = args
        .url
        .as_ref()
        .ok_or_else(|| "--url is required when --schema not provided".to_string())?;
    let schema_url = schema_url(url)?;
    tracing::info!(url = %schema_url, "fetching schema");

    let response = BlockingClient::new()
        .get(schema_url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|err| err.to_string())?;

    response
        .text()
        .map_err(|err| format!("failed to read schema response: {err}"))
}

fn schema_url(endpoint: &str) -> Result<Url, String> {
    let mut base = endpoint.trim_end_matches('/').to_string();
    base.push_str("/schema.graphql");
    let url = Url::parse(&base).map_err(|err| format!("invalid url {endpoint}: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!("unsupported url scheme: {scheme}")),
    }
}
