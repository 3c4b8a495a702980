pub mod config;
pub mod scanner;

pub use twcascade_core::{
    Cascader, ClassValue, Classification, Classifier, CompiledTable, DefinitionError,
    DefinitionNode, Group, GroupPath, TableError, TaxonomyError, class_names, compile,
    compile_taxonomy, merge, parse_taxonomy,
};

use config::{Config, TableSource};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

const BUILTIN_TABLE_JSON: &str = include_str!(concat!(env!("OUT_DIR"), "/builtin_table.json"));

static BUILTIN_TABLE: OnceLock<Result<Arc<CompiledTable>, TableError>> = OnceLock::new();
static DEFAULT_CASCADER: OnceLock<Option<Cascader>> = OnceLock::new();

/// The table compiled from the bundled taxonomy at build time.
pub fn builtin_table() -> Result<Arc<CompiledTable>, TableError> {
    BUILTIN_TABLE
        .get_or_init(|| CompiledTable::from_json(BUILTIN_TABLE_JSON).map(Arc::new))
        .clone()
}

/// A cascader over the built-in table for classes carrying `prefix`.
pub fn create_cascader(prefix: &str) -> Result<Cascader, TableError> {
    Ok(Cascader::with_prefix(builtin_table()?, prefix))
}

/// Concatenates `args` and resolves them against the built-in table.
pub fn twcx(args: &[ClassValue]) -> String {
    match default_cascader() {
        Some(cascader) => cascader.cx(args),
        None => class_names(args),
    }
}

fn default_cascader() -> Option<&'static Cascader> {
    DEFAULT_CASCADER
        .get_or_init(|| match builtin_table() {
            Ok(table) => Some(Cascader::new(table)),
            Err(err) => {
                tracing::error!(error = %err, "built-in table unavailable, classes pass through unresolved");
                None
            }
        })
        .as_ref()
}

/// `twcx!("p-4", ["m-2"], ("hidden", open))` resolves against the built-in table.
#[macro_export]
macro_rules! twcx {
    ($($arg:expr),* $(,)?) => {
        $crate::twcx(&[$($crate::ClassValue::from($arg)),*])
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resolve {
        classes: Vec<String>,
        prefix: Option<String>,
        config: Option<String>,
        table: Option<String>,
    },
    Generate {
        taxonomy: Option<String>,
        out: Option<String>,
    },
    Check {
        inputs: Vec<String>,
        ignore: Vec<String>,
        prefix: Option<String>,
        config: Option<String>,
        table: Option<String>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    pub message: String,
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self {
            message: err.message,
        }
    }
}

impl From<scanner::ScanError> for CliError {
    fn from(err: scanner::ScanError) -> Self {
        Self {
            message: err.message,
        }
    }
}

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Resolve {
            classes,
            prefix,
            config,
            table,
        } => run_resolve(classes, prefix, config, table),
        Command::Generate { taxonomy, out } => run_generate(taxonomy, out),
        Command::Check {
            inputs,
            ignore,
            prefix,
            config,
            table,
        } => run_check(inputs, ignore, prefix, config, table),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

pub fn run_from_env() -> Result<(), CliError> {
    let command = parse_args(env::args().skip(1))?;
    run(command)
}

pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let Some(cmd) = iter.next() else {
        return Ok(Command::Help);
    };

    match cmd.as_str() {
        "resolve" => parse_resolve_args(iter.collect()),
        "generate" => parse_generate_args(iter.collect()),
        "check" => parse_check_args(iter.collect()),
        "-h" | "--help" | "help" => Ok(Command::Help),
        _ => Err(CliError {
            message: format!("unknown command: {}", cmd),
        }),
    }
}

fn take_value(args: &[String], idx: usize, command: &str, flag: &str) -> Result<String, CliError> {
    args.get(idx).cloned().ok_or_else(|| CliError {
        message: format!("{} requires a value for {}", command, flag),
    })
}

fn parse_resolve_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut classes = Vec::new();
    let mut prefix = None;
    let mut config = None;
    let mut table = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--prefix" | "-p" => {
                idx += 1;
                prefix = Some(take_value(&args, idx, "resolve", "--prefix")?);
            }
            "--config" | "-c" => {
                idx += 1;
                config = Some(take_value(&args, idx, "resolve", "--config")?);
            }
            "--table" | "-t" => {
                idx += 1;
                table = Some(take_value(&args, idx, "resolve", "--table")?);
            }
            value => {
                classes.push(value.to_string());
            }
        }
        idx += 1;
    }

    Ok(Command::Resolve {
        classes,
        prefix,
        config,
        table,
    })
}

fn parse_generate_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut taxonomy = None;
    let mut out = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--taxonomy" | "-x" => {
                idx += 1;
                taxonomy = Some(take_value(&args, idx, "generate", "--taxonomy")?);
            }
            "--out" | "--output" | "-o" => {
                idx += 1;
                out = Some(take_value(&args, idx, "generate", "--output")?);
            }
            value => {
                return Err(CliError {
                    message: format!("generate does not accept argument: {}", value),
                });
            }
        }
        idx += 1;
    }

    Ok(Command::Generate { taxonomy, out })
}

fn parse_check_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut inputs = Vec::new();
    let mut ignore = Vec::new();
    let mut prefix = None;
    let mut config = None;
    let mut table = None;
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--ignore" | "-I" => {
                idx += 1;
                ignore.push(take_value(&args, idx, "check", "--ignore")?);
            }
            "--prefix" | "-p" => {
                idx += 1;
                prefix = Some(take_value(&args, idx, "check", "--prefix")?);
            }
            "--config" | "-c" => {
                idx += 1;
                config = Some(take_value(&args, idx, "check", "--config")?);
            }
            "--table" | "-t" => {
                idx += 1;
                table = Some(take_value(&args, idx, "check", "--table")?);
            }
            value => {
                inputs.push(value.to_string());
            }
        }
        idx += 1;
    }

    if inputs.is_empty() {
        return Err(CliError {
            message: "check requires at least one path or glob pattern".to_string(),
        });
    }

    Ok(Command::Check {
        inputs,
        ignore,
        prefix,
        config,
        table,
    })
}

fn run_resolve(
    classes: Vec<String>,
    prefix: Option<String>,
    config_path: Option<String>,
    table_path: Option<String>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let cascader = build_cascader(&config, prefix, table_path)?;
    println!("{}", cascader.resolve(&classes.join(" ")));
    Ok(())
}

fn run_generate(taxonomy_path: Option<String>, out: Option<String>) -> Result<(), CliError> {
    let table = match taxonomy_path.as_ref() {
        Some(path) => compile_taxonomy_file(Path::new(path))?,
        None => compile_taxonomy(twcascade_core::BUNDLED_TAXONOMY).map_err(|err| CliError {
            message: format!("bundled taxonomy is invalid: {}", err),
        })?,
    };
    let json = table.to_json().map_err(|err| CliError {
        message: err.to_string(),
    })?;

    match out.as_ref() {
        Some(path) => {
            write_output(Path::new(path), &json)?;
            eprintln!(
                "compiled {} classes, {} override groups into {}",
                table.len(),
                table.overrides().len(),
                path
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_check(
    inputs: Vec<String>,
    ignore: Vec<String>,
    prefix: Option<String>,
    config_path: Option<String>,
    table_path: Option<String>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let cascader = build_cascader(&config, prefix, table_path)?;

    let mut effective_ignore = config.check.ignore.clone();
    effective_ignore.extend(ignore);

    let (files, patterns): (Vec<String>, Vec<String>) =
        inputs.into_iter().partition(|input| Path::new(input).is_file());
    let mut result =
        scanner::scan_files(&files.iter().map(PathBuf::from).collect::<Vec<_>>())?;
    if !patterns.is_empty() {
        let globbed = scanner::scan_globs_with_options(
            &patterns,
            &effective_ignore,
            &scanner::ScanGlobOptions::default(),
        )?;
        result.files_scanned += globbed.files_scanned;
        result.sites.extend(globbed.sites);
    }

    let mut conflicts = 0usize;
    for site in &result.sites {
        if let Some((original, resolved)) = find_conflict(&cascader, &site.value) {
            conflicts += 1;
            println!(
                "{}:{}: \"{}\" -> \"{}\"",
                site.path.display(),
                site.line,
                original,
                resolved
            );
        }
    }

    eprintln!(
        "checked {} files, {} class lists, {} conflicts",
        result.files_scanned,
        result.sites.len(),
        conflicts
    );

    if conflicts > 0 {
        return Err(CliError {
            message: format!("found {} class lists with conflicting classes", conflicts),
        });
    }
    Ok(())
}

/// Returns the normalized list and its cascade when the cascade drops a
/// class; repeated tokens alone are not a conflict.
fn find_conflict(cascader: &Cascader, value: &str) -> Option<(String, String)> {
    let mut seen = HashSet::new();
    let distinct = value
        .split_whitespace()
        .filter(|token| seen.insert(*token))
        .collect::<Vec<_>>();
    let resolved = cascader.resolve_tokens(distinct.iter().copied());
    if resolved == distinct {
        return None;
    }
    Some((
        value.split_whitespace().collect::<Vec<_>>().join(" "),
        resolved.join(" "),
    ))
}

fn load_config(path: Option<&str>) -> Result<Config, CliError> {
    if let Some(path) = path {
        return Ok(config::load(Path::new(path))?);
    }
    let cwd = env::current_dir().map_err(|err| CliError {
        message: format!("failed to read current directory: {}", err),
    })?;
    Ok(config::discover(&cwd)?.unwrap_or_default())
}

/// Flags win over config values; a table flag wins over any configured source.
fn build_cascader(
    config: &Config,
    prefix: Option<String>,
    table_path: Option<String>,
) -> Result<Cascader, CliError> {
    let source = match table_path {
        Some(path) => TableSource::Compiled(PathBuf::from(path)),
        None => config.table_source(),
    };
    let table = load_table(&source)?;
    let prefix = prefix.unwrap_or_else(|| config.prefix.clone());
    Ok(Cascader::with_prefix(table, prefix))
}

fn load_table(source: &TableSource) -> Result<Arc<CompiledTable>, CliError> {
    match source {
        TableSource::Builtin => builtin_table().map_err(|err| CliError {
            message: err.to_string(),
        }),
        TableSource::Taxonomy(path) => compile_taxonomy_file(path).map(Arc::new),
        TableSource::Compiled(path) => {
            let json = fs::read_to_string(path).map_err(|err| CliError {
                message: format!("failed to read table {}: {}", path.display(), err),
            })?;
            CompiledTable::from_json(&json)
                .map(Arc::new)
                .map_err(|err| CliError {
                    message: format!("{}: {}", path.display(), err),
                })
        }
    }
}

fn compile_taxonomy_file(path: &Path) -> Result<CompiledTable, CliError> {
    let source = fs::read_to_string(path).map_err(|err| CliError {
        message: format!("failed to read taxonomy {}: {}", path.display(), err),
    })?;
    compile_taxonomy(&source).map_err(|err| CliError {
        message: format!("{}: {}", path.display(), err),
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| CliError {
            message: format!("failed to create directory {}: {}", parent.display(), err),
        })?;
    }
    fs::write(path, contents).map_err(|err| CliError {
        message: format!("failed to write {}: {}", path.display(), err),
    })
}

fn print_help() {
    println!("twcascade");
    println!();
    println!("USAGE:");
    println!("  twcascade resolve [--prefix <prefix>] [--config <path>] [--table <path>] <class...>");
    println!("  twcascade generate [--taxonomy <path>] [--output <path>]");
    println!(
        "  twcascade check [--prefix <prefix>] [--config <path>] [--table <path>] [--ignore <glob>] <glob...>"
    );
    println!();
    println!("COMMANDS:");
    println!("  resolve   Print the class list with overridden classes removed");
    println!("  generate  Compile a taxonomy into a lookup table (JSON)");
    println!("  check     Report class attributes that contain overridden classes");
    println!();
    println!("EXAMPLES:");
    println!("  twcascade resolve pt-4 px-2 p-8");
    println!("  twcascade generate --output dist/table.json");
    println!("  twcascade check --ignore \"dist/**\" \"src/**/*.html\"");
    println!();
    println!("Config is read from ./twcascade.toml when present; flags override it.");
    println!("Set TWCASCADE_LOG (e.g. debug) to change log output on stderr.");
}

#[cfg(test)]
mod tests {
    use super::{
        CliError, Command, ClassValue, builtin_table, create_cascader, find_conflict, load_table,
        parse_args, run, twcx,
    };
    use crate::config::TableSource;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_resolve_collects_classes_and_flags() {
        let command = parse_args(args(&["resolve", "--prefix", "tw-", "tw-p-4", "tw-p-8"]))
            .expect("resolve args should parse");
        assert_eq!(
            command,
            Command::Resolve {
                classes: args(&["tw-p-4", "tw-p-8"]),
                prefix: Some("tw-".to_string()),
                config: None,
                table: None,
            }
        );
    }

    #[test]
    fn parse_generate_supports_output_alias() {
        let command = parse_args(args(&["generate", "-x", "tax.toml", "--output", "out.json"]))
            .expect("generate args should parse");
        assert_eq!(
            command,
            Command::Generate {
                taxonomy: Some("tax.toml".to_string()),
                out: Some("out.json".to_string()),
            }
        );
    }

    #[test]
    fn parse_generate_rejects_positional() {
        let err = parse_args(args(&["generate", "stray"])).expect_err("should fail");
        assert!(err.message.contains("stray"));
    }

    #[test]
    fn parse_check_requires_inputs() {
        let err = parse_args(args(&["check", "--ignore", "dist/**"])).expect_err("should fail");
        assert_eq!(
            err,
            CliError {
                message: "check requires at least one path or glob pattern".to_string(),
            }
        );
    }

    #[test]
    fn parse_reports_missing_flag_value() {
        let err = parse_args(args(&["resolve", "--table"])).expect_err("should fail");
        assert_eq!(err.message, "resolve requires a value for --table");
    }

    #[test]
    fn parse_defaults_to_help() {
        assert_eq!(parse_args(Vec::new()), Ok(Command::Help));
        assert_eq!(parse_args(args(&["--help"])), Ok(Command::Help));
        assert!(parse_args(args(&["build"])).is_err());
    }

    #[test]
    fn builtin_table_resolves_spacing() {
        let table = builtin_table().expect("built-in table should load");
        assert!(table.len() > 2000);
        let cascader = create_cascader("").expect("cascader should build");
        assert_eq!(cascader.resolve("pt-4 px-2 p-8"), "p-8");
        assert_eq!(cascader.resolve("p-8 pt-4"), "p-8 pt-4");
    }

    #[test]
    fn twcx_macro_and_function_agree() {
        let from_fn = twcx(&[
            ClassValue::from("rounded-tl-lg rounded"),
            ClassValue::from(("hidden", false)),
        ]);
        let from_macro = crate::twcx!("rounded-tl-lg rounded", ("hidden", false));
        assert_eq!(from_fn, "rounded");
        assert_eq!(from_macro, from_fn);
        assert_eq!(crate::twcx!(), "");
    }

    #[test]
    fn loads_compiled_table_file() {
        let path = temp_path("twcascade_table", "json");
        let _ = fs::write(
            &path,
            r#"{ "definitions": { "a": "g.one", "b": "g.one" }, "overrides": {} }"#,
        );
        let table = load_table(&TableSource::Compiled(path.clone())).expect("table should load");
        assert_eq!(table.len(), 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn reports_invalid_taxonomy_file() {
        let path = temp_path("twcascade_taxonomy", "toml");
        let _ = fs::write(&path, "[groups]\ndisplay = [\"flex\"]\nflex = [\"flex\"]\n");
        let err = load_table(&TableSource::Taxonomy(path.clone())).expect_err("should fail");
        assert!(err.message.contains("class `flex` is assigned to both"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn generate_writes_table_file() {
        let dir = temp_path("twcascade_generate", "d");
        let taxonomy = dir.join("taxonomy.toml");
        let out = dir.join("dist/table.json");
        let _ = fs::create_dir_all(&dir);
        let _ = fs::write(
            &taxonomy,
            "[groups.padding]\nall = [\"p-{4,8}\"]\nt = [\"pt-4\"]\n\n[overrides.padding]\nall = [\"t\"]\n",
        );

        run(Command::Generate {
            taxonomy: Some(taxonomy.display().to_string()),
            out: Some(out.display().to_string()),
        })
        .expect("generate should succeed");

        let table = load_table(&TableSource::Compiled(out)).expect("output should load");
        assert_eq!(table.len(), 3);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn check_fails_on_conflicting_class_lists() {
        let dir = temp_path("twcascade_check", "d");
        let _ = fs::create_dir_all(&dir);
        let _ = fs::write(dir.join("ok.html"), r#"<div class="p-8 pt-4"></div>"#);
        let _ = fs::write(dir.join("bad.html"), r#"<div class="pt-4 p-8"></div>"#);

        let ok = run(Command::Check {
            inputs: vec![dir.join("ok.html").display().to_string()],
            ignore: vec![],
            prefix: None,
            config: None,
            table: None,
        });
        assert_eq!(ok, Ok(()));

        let err = run(Command::Check {
            inputs: vec![
                dir.join("ok.html").display().to_string(),
                dir.join("bad.html").display().to_string(),
            ],
            ignore: vec![],
            prefix: None,
            config: None,
            table: None,
        })
        .expect_err("conflict should be reported");
        assert!(err.message.contains("1 class lists"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn repeated_classes_are_not_conflicts() {
        let cascader = create_cascader("").expect("cascader should build");
        assert_eq!(find_conflict(&cascader, "foo  foo"), None);
        assert_eq!(find_conflict(&cascader, "p-4 foo p-4"), None);
        assert_eq!(find_conflict(&cascader, "p-8 pt-4"), None);
        assert_eq!(
            find_conflict(&cascader, "pt-4  foo pt-4 p-8"),
            Some(("pt-4 foo pt-4 p-8".to_string(), "foo p-8".to_string()))
        );
    }

    #[test]
    fn check_passes_on_repeated_unknown_class() {
        let dir = temp_path("twcascade_check_repeat", "d");
        let _ = fs::create_dir_all(&dir);
        let _ = fs::write(dir.join("repeat.html"), r#"<div class="card card"></div>"#);

        let result = run(Command::Check {
            inputs: vec![dir.join("repeat.html").display().to_string()],
            ignore: vec![],
            prefix: None,
            config: None,
            table: None,
        });
        assert_eq!(result, Ok(()));
        let _ = fs::remove_dir_all(&dir);
    }

    fn temp_path(prefix: &str, ext: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}.{}", prefix, nanos, ext))
    }
}
