//! catjson command-line tool for validating, outlining, and transcoding JSON.
//!
//! Usage: catjson [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (outline, json, pretty, yaml, toml, cbor, diag)
//!                          [default: outline]
//!   -w, --write            Write output to file with inferred name
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if input is valid (exit 0 if valid, 1 if invalid)
//!   -v, --verbose          Log parser activity to stderr (-vv and beyond: every token)
//!   -h, --help             Print help
//!   -V, --version          Print version

use libcatjson::{encode, parse, Format, Value};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod transcode;

/// Output formats accepted by `-t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Outline,
    Json,
    Pretty,
    Yaml,
    Toml,
    Cbor,
    CborDiag,
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    match s {
        "outline" => Some(OutputFormat::Outline),
        "json" => Some(OutputFormat::Json),
        "pretty" => Some(OutputFormat::Pretty),
        "yaml" | "yml" => Some(OutputFormat::Yaml),
        "toml" => Some(OutputFormat::Toml),
        "cbor" => Some(OutputFormat::Cbor),
        "diag" => Some(OutputFormat::CborDiag),
        _ => None,
    }
}

fn format_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Outline => "txt",
        OutputFormat::Json | OutputFormat::Pretty => "json",
        OutputFormat::Yaml => "yaml",
        OutputFormat::Toml => "toml",
        OutputFormat::Cbor => "cbor",
        OutputFormat::CborDiag => "diag",
    }
}

/// Where rendered output goes.
#[derive(Debug, Clone, Copy)]
struct OutputTarget<'a> {
    format: OutputFormat,
    output_file: Option<&'a str>,
    write_back: bool,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut to_format: Option<OutputFormat> = None;
    let mut write_back = false;
    let mut output_file: Option<&str> = None;
    let mut check_only = false;
    let mut verbosity = 0u8;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("catjson {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                match parse_format(&args[i]) {
                    Some(format) => to_format = Some(format),
                    None => {
                        eprintln!("Error: Unknown format: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            "-w" | "--write" => {
                write_back = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--check" => {
                check_only = true;
            }
            "--verbose" => {
                verbosity = verbosity.saturating_add(1);
            }
            arg if verbose_count(arg).is_some() => {
                verbosity = verbosity.saturating_add(verbose_count(arg).unwrap_or(0));
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    init_logging(verbosity);

    if write_back && output_file.is_some() {
        eprintln!("Error: --write and --output are mutually exclusive");
        process::exit(1);
    }

    let target = OutputTarget {
        format: to_format.unwrap_or(OutputFormat::Outline),
        output_file,
        write_back,
    };

    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            if output_file.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process::exit(process_directory(path, target, check_only));
        }
    }

    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    process::exit(process_input(&input, input_path, target, check_only));
}

/// How many levels a short verbosity flag (`-v`, `-vv`, `-vvv`, ...) asks for.
fn verbose_count(arg: &str) -> Option<u8> {
    let vs = arg.strip_prefix('-')?;
    if vs.is_empty() || !vs.bytes().all(|b| b == b'v') {
        return None;
    }
    Some(u8::try_from(vs.len()).unwrap_or(u8::MAX))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn process_directory(dir_path: &str, target: OutputTarget<'_>, check_only: bool) -> i32 {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            return 1;
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    paths.sort();
    info!(dir = dir_path, files = paths.len(), "processing directory");

    let mut had_errors = false;
    for path in paths {
        let path_str = path.to_string_lossy();
        let input = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path_str, e);
                had_errors = true;
                continue;
            }
        };
        if process_input(&input, Some(&*path_str), target, check_only) != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_input(
    input: &str,
    input_file: Option<&str>,
    target: OutputTarget<'_>,
    check_only: bool,
) -> i32 {
    debug!(file = input_file.unwrap_or("<stdin>"), bytes = input.len(), "read input");

    let value: Value = match parse(input) {
        Ok(v) => v,
        Err(e) => {
            if let Some(path) = input_file {
                eprintln!("{}: {}", path, e);
            } else {
                eprintln!("Parse error: {}", e);
            }
            return 1;
        }
    };

    if check_only {
        match input_file {
            Some(path) => println!("{}: ok", path),
            None => println!("ok"),
        }
        return 0;
    }

    match render(&value, target.format) {
        Ok(Rendered::Text(output)) => write_output(output.as_bytes(), target, input_file, true),
        Ok(Rendered::Binary(output)) => write_output(&output, target, input_file, false),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

enum Rendered {
    Text(String),
    Binary(Vec<u8>),
}

fn render(value: &Value, format: OutputFormat) -> Result<Rendered, String> {
    let rendered = match format {
        OutputFormat::Outline => Rendered::Text(encode(value, Format::Outline)),
        OutputFormat::Json => Rendered::Text(encode(value, Format::Json)),
        OutputFormat::Pretty => Rendered::Text(encode(value, Format::Pretty)),
        OutputFormat::Yaml => Rendered::Text(
            transcode::yaml::encode(value).map_err(|e| format!("Cannot convert to YAML: {}", e))?,
        ),
        OutputFormat::Toml => Rendered::Text(
            transcode::toml::encode(value).map_err(|e| format!("Cannot convert to TOML: {}", e))?,
        ),
        OutputFormat::Cbor => Rendered::Binary(
            transcode::cbor::encode(value).map_err(|e| format!("Cannot convert to CBOR: {}", e))?,
        ),
        OutputFormat::CborDiag => {
            let bytes = transcode::cbor::encode(value)
                .map_err(|e| format!("Cannot convert to CBOR: {}", e))?;
            Rendered::Text(
                transcode::cbor::diagnostic(&bytes)
                    .map_err(|e| format!("Cannot render CBOR diagnostic notation: {}", e))?,
            )
        }
    };
    Ok(rendered)
}

fn write_output(
    output: &[u8],
    target: OutputTarget<'_>,
    input_file: Option<&str>,
    is_text: bool,
) -> i32 {
    if let Some(path) = target.output_file {
        if let Err(e) = fs::write(path, output) {
            eprintln!("Error writing {}: {}", path, e);
            return 1;
        }
    } else if target.write_back {
        let Some(input_path) = input_file else {
            eprintln!("Error: --write requires an input file");
            return 1;
        };
        let output_path = Path::new(input_path).with_extension(format_extension(target.format));
        if output_path == Path::new(input_path) {
            eprintln!("Error: refusing to overwrite input {}", input_path);
            return 1;
        }
        if let Err(e) = fs::write(&output_path, output) {
            eprintln!("Error writing {}: {}", output_path.display(), e);
            return 1;
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let mut result = handle.write_all(output);
        // Ensure text output ends with newline
        if result.is_ok() && is_text && !output.is_empty() && !output.ends_with(b"\n") {
            result = handle.write_all(b"\n");
        }
        if let Err(e) = result {
            eprintln!("Error writing to stdout: {}", e);
            return 1;
        }
    }
    0
}

fn print_help() {
    println!(
        "catjson - JSON validator, outliner, and transcoder

USAGE:
    catjson [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .json files in it

OPTIONS:
    -t, --to <FORMAT>      Output format [default: outline]
                           Supported: outline, json, pretty, yaml, toml, cbor, diag

    -w, --write            Write output to file with inferred extension

    -o, --output <FILE>    Write output to specified file (not valid with directory input)

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    -v, --verbose          Log parser activity to stderr; -vv logs every token.
                           RUST_LOG overrides this.

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # Print the key/value outline of a document
    catjson data.json

    # Validate every JSON file in a directory
    catjson --check ./configs/

    # Minimal JSON from stdin
    cat data.json | catjson -t json

    # Convert to YAML
    catjson -t yaml data.json

    # Convert to CBOR (binary) and inspect it
    catjson -t cbor data.json -o data.cbor
    catjson -t diag data.json
"
    );
}
