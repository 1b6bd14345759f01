//! Test harness for the JSON parser against fixture files.
//!
//! Every `test/json/*.json` document must parse; when a sibling `.out` file
//! exists it holds the expected minimal JSON encoding. Every `test/bad/*.json`
//! document must fail, and a sibling `.error` file holds the exact message.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use libcatjson::{check, encode, parse, Format, Parser, Value};

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// All `.json` files in a subdirectory of test/, sorted.
fn fixture_files(subdir: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join("*.json");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .flatten()
        .collect();
    files.sort();
    files
}

/// Read the sibling file with another extension, if present.
fn read_sibling(path: &Path, ext: &str) -> Option<String> {
    fs::read_to_string(path.with_extension(ext)).ok()
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// Run a single good fixture (expected to succeed).
fn run_good_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    let value = parse(&content)
        .map_err(|e| format!("{}: Unexpected parse error: {}", filename, e))?;

    match read_sibling(path, "out") {
        Some(expected) => {
            let actual = encode(&value, Format::Json);
            if actual != expected.trim() {
                return Err(format!(
                    "{}: Output mismatch\n    expected: {}\n    actual:   {}",
                    filename,
                    expected.trim(),
                    actual
                ));
            }
            println!("  {} => {}", filename, actual);
        }
        None => println!("  {} => {:?} (no expected output)", filename, value),
    }
    Ok(())
}

/// Run a single bad fixture (expected to fail with a specific error).
fn run_bad_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    let actual_error = match parse(&content) {
        Ok(value) => {
            return Err(format!(
                "{}: Expected parse error, but got success: {:?}",
                filename, value
            ))
        }
        Err(e) => e.to_string(),
    };

    if check(&content).is_ok() {
        return Err(format!("{}: check() accepted a bad document", filename));
    }

    match read_sibling(path, "error") {
        Some(expected) if actual_error != expected.trim() => Err(format!(
            "{}: Error mismatch\n    expected: {}\n    actual:   {}",
            filename,
            expected.trim(),
            actual_error
        )),
        Some(_) => {
            println!("  {} => error (as expected)", filename);
            Ok(())
        }
        None => {
            println!(
                "  {} => error: {} (no .error file to compare)",
                filename, actual_error
            );
            Ok(())
        }
    }
}

fn run_all(subdir: &str, run: fn(&Path) -> Result<(), String>) {
    let files = fixture_files(subdir);
    assert!(!files.is_empty(), "no fixtures found in test/{}", subdir);

    println!("\nRunning {} test/{} files:", files.len(), subdir);

    let errors: Vec<String> = files.iter().filter_map(|f| run(f).err()).collect();

    println!(
        "\nResults: {} passed, {} failed",
        files.len() - errors.len(),
        errors.len()
    );
    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    assert!(errors.is_empty(), "{} test/{} fixtures failed", errors.len(), subdir);
}

#[test]
fn test_all_good_fixtures() {
    run_all("json", run_good_test);
}

#[test]
fn test_all_bad_fixtures() {
    run_all("bad", run_bad_test);
}

// ============================================================================
// Round trips
// ============================================================================

/// Small deterministic generator so the trees differ in shape and content.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn gen_value(rng: &mut Lcg, depth: usize) -> Value {
    let choice = if depth == 0 { rng.below(4) } else { rng.below(6) };
    match choice {
        0 => Value::Null,
        1 => Value::Bool(rng.below(2) == 1),
        2 => {
            let whole = rng.below(100_000) as f64;
            let scale = [1.0, 0.5, 0.001, 1e6, -1.0, -0.25][rng.below(6) as usize];
            Value::Number(whole * scale)
        }
        3 => Value::String(gen_text(rng)),
        4 => Value::Array((0..rng.below(4)).map(|_| gen_value(rng, depth - 1)).collect()),
        _ => gen_object(rng, depth - 1),
    }
}

fn gen_object(rng: &mut Lcg, depth: usize) -> Value {
    let mut obj = HashMap::new();
    for _ in 0..rng.below(4) {
        obj.insert(gen_text(rng), gen_value(rng, depth));
    }
    Value::Object(obj)
}

fn gen_text(rng: &mut Lcg) -> String {
    const ALPHABET: &[char] = &['a', 'b', 'z', ' ', '_', '7', 'é', '語', '{', ']', ':', ','];
    (0..rng.below(8))
        .map(|_| ALPHABET[rng.below(ALPHABET.len() as u64) as usize])
        .collect()
}

#[test]
fn test_generated_trees_round_trip() {
    let mut rng = Lcg(0x5eed);
    for _ in 0..200 {
        let root = if rng.below(2) == 0 {
            gen_object(&mut rng, 3)
        } else {
            Value::Array((0..rng.below(5)).map(|_| gen_value(&mut rng, 3)).collect())
        };
        for format in [Format::Json, Format::Pretty] {
            let text = encode(&root, format);
            let reparsed = parse(&text)
                .unwrap_or_else(|e| panic!("failed to reparse {:?}: {}", text, e));
            assert_eq!(reparsed, root, "round trip through {:?}", format);
        }
    }
}

#[test]
fn test_parser_accepts_any_char_source() {
    let bytes = br#"{"from": ["bytes", 1]}"#;
    let value = Parser::new(bytes.iter().map(|&b| b as char)).parse().unwrap();
    assert_eq!(value, parse(r#"{"from": ["bytes", 1]}"#).unwrap());

    let chars: Vec<char> = "[null]".chars().collect();
    assert_eq!(
        Parser::new(chars).parse().unwrap(),
        Value::Array(vec![Value::Null])
    );
}
