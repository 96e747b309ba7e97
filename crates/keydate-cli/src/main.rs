use chrono::{SecondsFormat, Utc};
use keydate_core::{Extraction, Extractor, ExtractorConfig, TokenSource};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOCAL_OFFSET_ENV: &str = "KEYDATE_LOCAL_OFFSET";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(keydate_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<keydate_core::Error> for CliError {
    fn from(value: keydate_core::Error) -> Self {
        Self::Config(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Default)]
struct Args {
    keys: Vec<String>,
    lines: Option<String>,
    pretty: bool,
    local_offset: Option<i32>,
    label: Option<String>,
    config: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Found,
    Invalid,
    NotFound,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyOut<'a> {
    key: &'a str,
    status: Status,
    source: Option<TokenSource>,
    epoch_millis: Option<i64>,
    iso: Option<String>,
    label: Option<String>,
}

fn usage() -> &'static str {
    "keydate-cli\n\
\n\
USAGE:\n\
  keydate-cli [--pretty] [--local-offset <minutes>] [--label <pattern>] [--config <path>] [--] <key>...\n\
  keydate-cli [--pretty] [--local-offset <minutes>] [--label <pattern>] [--config <path>] --lines <path>|-\n\
\n\
NOTES:\n\
  - Without keys or --lines, keys are read from stdin, one per line.\n\
  - --local-offset is minutes east of UTC for offset-less date literals; it overrides\n\
    KEYDATE_LOCAL_OFFSET, which overrides the config file. The default is the system timezone.\n\
  - --label takes a dayjs pattern such as 'YYYY-MM-DD HH:mm'.\n\
  - Output is a JSON array with one object per key. Unparseable keys are reported, not fatal.\n\
  - Set RUST_LOG to control diagnostics on stderr (default: keydate=warn).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--lines" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.lines = Some(path.clone());
            }
            "--local-offset" => {
                let Some(mins) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.local_offset =
                    Some(mins.trim().parse::<i32>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--label" => {
                let Some(pattern) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.label = Some(pattern.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--" => {
                args.keys.extend(it.by_ref().cloned());
            }
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            key => args.keys.push(key.to_string()),
        }
    }

    if args.lines.is_some() && !args.keys.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_keys(args: &Args) -> Result<Vec<String>, CliError> {
    if !args.keys.is_empty() {
        return Ok(args.keys.clone());
    }
    let text = read_input(args.lines.as_deref())?;
    Ok(text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn env_local_offset() -> Result<Option<i32>, CliError> {
    let Ok(raw) = std::env::var(LOCAL_OFFSET_ENV) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>().map(Some).map_err(|_| {
        CliError::Config(keydate_core::Error::InvalidConfig {
            message: format!("{LOCAL_OFFSET_ENV} is not an integer: {raw}"),
        })
    })
}

fn resolve_config(args: &Args) -> Result<ExtractorConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => ExtractorConfig::from_path(path)?,
        None => ExtractorConfig::default(),
    };
    config = config.merged_with(ExtractorConfig {
        local_offset_minutes: env_local_offset()?,
        label_format: None,
    });
    config = config.merged_with(ExtractorConfig {
        local_offset_minutes: args.local_offset,
        label_format: args.label.clone(),
    });
    config.validate()?;
    tracing::debug!(?config, "resolved extractor config");
    Ok(config)
}

fn key_out<'a>(key: &'a str, extraction: &Extraction, extractor: &Extractor) -> KeyOut<'a> {
    let status = match extraction {
        Extraction::Found(_) => Status::Found,
        Extraction::Invalid(_) => Status::Invalid,
        Extraction::NotFound => Status::NotFound,
    };
    KeyOut {
        key,
        status,
        source: extraction.source(),
        epoch_millis: extraction.epoch_millis(),
        iso: extraction
            .date()
            .map(|d| d.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)),
        label: extractor.label(extraction),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = resolve_config(&args)?;
    let extractor = Extractor::from_config(&config)?;
    let keys = read_keys(&args)?;

    let extractions = extractor.extract_all(keys.iter().map(String::as_str));
    let out: Vec<KeyOut<'_>> = keys
        .iter()
        .zip(&extractions)
        .map(|(key, extraction)| key_out(key, extraction, &extractor))
        .collect();
    write_json(&out, args.pretty)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keydate=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
