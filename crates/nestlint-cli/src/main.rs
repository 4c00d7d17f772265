use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use nestlint_core::{check_nesting, check_source};
use owo_colors::{OwoColorize, Style};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// A bracket nesting checker for text
#[derive(Parser, Debug)]
#[command(name = "nestlint", version, about)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// Files or glob patterns to check (reads from stdin if none provided)
    #[arg()]
    files: Vec<String>,

    /// Treat each input line as an independent string and print its verdict
    #[arg(long)]
    lines: bool,

    /// Read from stdin
    #[arg(long)]
    stdin: bool,

    /// Suppress normal output, only set the exit code
    #[arg(long)]
    quiet: bool,

    /// Show source context for each violation
    #[arg(long)]
    explain: bool,

    /// When to colorize verdicts
    #[arg(long, value_name = "WHEN", value_enum)]
    color: Option<ColorMode>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    let options = Options::resolve(&args, &config);

    if args.stdin || args.files.is_empty() {
        match check_stdin(&options) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(1),
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(2)
            }
        }
    } else {
        check_files(&args.files, &options)
    }
}

/// Check stdin, printing verdicts to stdout. Returns whether input was clean.
fn check_stdin(options: &Options) -> Result<bool, Error> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;

    let report = check_text("stdin", &text, options);
    print!("{}", report.output);
    Ok(!report.invalid)
}

fn check_files(patterns: &[String], options: &Options) -> ExitCode {
    let files = match expand_patterns(patterns) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let reports: Vec<(PathBuf, Result<Report, Error>)> = files
        .par_iter()
        .map(|path| (path.clone(), check_file(path, options)))
        .collect();

    let mut any_invalid = false;
    let mut any_error = false;

    for (path, result) in reports {
        match result {
            Ok(report) => {
                print!("{}", report.output);
                if report.invalid {
                    any_invalid = true;
                }
            }
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                any_error = true;
            }
        }
    }

    if any_error {
        return ExitCode::from(2);
    }
    if any_invalid {
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn check_file(path: &Path, options: &Options) -> Result<Report, Error> {
    let text = fs::read_to_string(path)?;
    Ok(check_text(&path.display().to_string(), &text, options))
}

/// Buffered per-input output, printed once checking completes.
///
/// Files are checked in parallel, so verdicts are collected here and
/// printed sequentially to keep the output stable.
struct Report {
    output: String,
    invalid: bool,
}

/// Check one input, either line by line or as a whole.
fn check_text(name: &str, text: &str, options: &Options) -> Report {
    if options.lines {
        check_text_lines(text, options)
    } else {
        check_text_whole(name, text, options)
    }
}

fn check_text_lines(text: &str, options: &Options) -> Report {
    use std::fmt::Write;

    let mut output = String::new();
    let mut invalid = false;

    for line in text.lines() {
        let balanced = check_nesting(line);
        if !balanced {
            invalid = true;
        }
        if !options.quiet {
            let verdict = if balanced {
                options.palette.paint_ok("true")
            } else {
                options.palette.paint_bad("false")
            };
            let _ = writeln!(output, "{line}: {verdict}");
        }
    }

    Report { output, invalid }
}

fn check_text_whole(name: &str, text: &str, options: &Options) -> Report {
    use std::fmt::Write;

    let mut output = String::new();
    let mut invalid = false;

    match check_source(text) {
        Ok(()) => {
            if !options.quiet {
                let _ = writeln!(output, "{name}: {}", options.palette.paint_ok("ok"));
            }
        }
        Err(e) => {
            invalid = true;
            if !options.quiet {
                if options.explain {
                    let _ = writeln!(output, "{name}: {}", options.palette.paint_bad("invalid"));
                    let _ = writeln!(output, "{}", e.detail());
                } else {
                    let _ = writeln!(output, "{name}: {e}");
                }
            }
        }
    }

    Report { output, invalid }
}

/// Expand glob patterns into file paths.
///
/// A pattern that matches nothing is kept as a literal path so the read
/// error names it.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();

    for pattern in patterns {
        let mut matched = false;
        for entry in glob::glob(pattern)? {
            files.push(entry.map_err(glob::GlobError::into_error)?);
            matched = true;
        }
        if !matched {
            files.push(PathBuf::from(pattern));
        }
    }

    Ok(files)
}

const CONFIG_FILE: &str = "nestlint.toml";

/// Configuration options read from `nestlint.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Config {
    /// Treat each input line as an independent string.
    lines: bool,
    /// When to colorize verdicts.
    color: ColorMode,
}

impl Config {
    /// Load configuration from `nestlint.toml` in the working directory.
    fn load() -> Result<Self, Error> {
        match fs::read_to_string(CONFIG_FILE) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// When to colorize output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
enum ColorMode {
    /// Colorize when stdout is a terminal.
    #[default]
    Auto,
    /// Always colorize.
    Always,
    /// Never colorize.
    Never,
}

/// Resolved output options after merging flags over file configuration.
#[derive(Clone, Copy)]
struct Options {
    lines: bool,
    quiet: bool,
    explain: bool,
    palette: Palette,
}

impl Options {
    fn resolve(args: &Args, config: &Config) -> Self {
        let enabled = match effective_color(args, config) {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => io::stdout().is_terminal(),
        };

        Self {
            lines: args.lines || config.lines,
            quiet: args.quiet,
            explain: args.explain,
            palette: Palette::new(enabled),
        }
    }
}

/// Color mode after flags override file configuration.
fn effective_color(args: &Args, config: &Config) -> ColorMode {
    args.color.unwrap_or(config.color)
}

/// Styles applied to verdicts.
#[derive(Clone, Copy)]
struct Palette {
    enabled: bool,
    ok: Style,
    bad: Style,
}

impl Palette {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ok: Style::new().green(),
            bad: Style::new().red(),
        }
    }

    fn paint_ok(&self, text: &str) -> String {
        self.paint(text, self.ok)
    }

    fn paint_bad(&self, text: &str) -> String {
        self.paint(text, self.bad)
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}

#[derive(Debug, Error)]
enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("invalid nestlint.toml: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_options(lines: bool) -> Options {
        Options {
            lines,
            quiet: false,
            explain: false,
            palette: Palette::new(false),
        }
    }

    #[test]
    fn test_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.lines);
        assert_eq!(config.color, ColorMode::Auto);
    }

    #[test]
    fn test_config_fields_parse() {
        let config: Config = toml::from_str("lines = true\ncolor = \"never\"\n").unwrap();
        assert!(config.lines);
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["nestlint", "--color", "always"]);
        let config = Config {
            lines: true,
            color: ColorMode::Never,
        };
        assert_eq!(effective_color(&args, &config), ColorMode::Always);

        let options = Options::resolve(&args, &config);
        assert!(options.lines);
    }

    #[test]
    fn test_lines_mode_verdicts() {
        let report = check_text("stdin", "a(b)\n[(]\n", &plain_options(true));
        assert!(report.invalid);
        assert_eq!(report.output, "a(b): true\n[(]: false\n");
    }

    #[test]
    fn test_whole_mode_reports_location() {
        let report = check_text("sample.txt", "ok()\nbad]\n", &plain_options(false));
        assert!(report.invalid);
        assert_eq!(
            report.output,
            "sample.txt: 2:4: unexpected closing bracket `]`\n"
        );
    }

    #[test]
    fn test_quiet_suppresses_output() {
        let mut options = plain_options(false);
        options.quiet = true;
        let report = check_text("stdin", "}{", &options);
        assert!(report.invalid);
        assert!(report.output.is_empty());
    }

    #[test]
    fn test_explain_adds_source_context() {
        let mut options = plain_options(false);
        options.explain = true;
        let report = check_text("stdin", "a)", &options);
        assert!(report.output.starts_with("stdin: invalid\n"));
        assert!(report.output.contains("  1 | a)"));
        assert!(report.output.contains("= help:"));
    }

    #[test]
    fn test_check_file_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balanced.txt");
        fs::write(&path, "z([{}-()]{a})\n").unwrap();

        let report = check_file(&path, &plain_options(false)).unwrap();
        assert!(!report.invalid);
        assert!(report.output.ends_with(": ok\n"));
    }

    #[test]
    fn test_expand_patterns_keeps_literal_misses() {
        let files = expand_patterns(&["no-such-file-anywhere.txt".to_string()]).unwrap();
        assert_eq!(files, vec![PathBuf::from("no-such-file-anywhere.txt")]);
    }
}
