// Command-line interface for bincookies.
//
// Subcommands inspect, dump, and rewrite BinaryCookies containers. All
// diagnostics go to stderr; `dump` writes cookie data to stdout, as JSON
// when the global `--json` flag is set.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use time::format_description::well_known::Rfc3339;

use crate::io::{decode_file, encode_file};
use crate::model::{CookieRecord, absolute_to_datetime};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// BinaryCookies container inspector and rewriter.
#[derive(Parser, Debug)]
#[command(
    name = "bincookies",
    version,
    about = "Safari BinaryCookies encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print container structure: pages, checksum, metadata size.
    Info(InputArgs),
    /// Print every cookie in the container.
    Dump(InputArgs),
    /// Decode and re-encode, normalizing field order, offsets, and checksum.
    Recode(RecodeArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input Cookies.binarycookies file.
    input: PathBuf,
}

#[derive(Args, Debug)]
struct RecodeArgs {
    /// Input Cookies.binarycookies file.
    input: PathBuf,
    /// Output file.
    output: PathBuf,
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn format_absolute(seconds: f64) -> String {
    match absolute_to_datetime(seconds) {
        Some(t) => t
            .format(&Rfc3339)
            .unwrap_or_else(|_| format!("{seconds}s")),
        None => "-".into(),
    }
}

fn record_json(r: &CookieRecord) -> serde_json::Value {
    serde_json::json!({
        "domain": r.domain,
        "name": r.name,
        "path": r.path,
        "value": r.value,
        "secure": r.secure,
        "http_only": r.http_only,
        "creation": r.creation,
        "expiration": r.expiration,
        "comment": r.comment,
        "comment_url": r.comment_url,
        "port": r.port,
        "version": r.version,
    })
}

// ---------------------------------------------------------------------------
// Info command
// ---------------------------------------------------------------------------

fn cmd_info(cli: &Cli, args: &InputArgs) -> i32 {
    let (file, stats) = match decode_file(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("bincookies: {}: {e}", args.input.display());
            return 1;
        }
    };

    if cli.json_output {
        let json = serde_json::json!({
            "input_size": stats.input_size,
            "pages": stats.pages,
            "cookies": stats.cookies,
            "stored_checksum": stats.stored_checksum,
            "computed_checksum": stats.computed_checksum,
            "checksum_matches": stats.checksum_matches(),
            "metadata_size": stats.metadata_size,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap());
        return 0;
    }

    println!("pages: {}", stats.pages);
    println!("cookies: {}", stats.cookies);
    if cli.verbose > 0 {
        for (i, page) in file.pages.iter().enumerate() {
            println!(
                "  page {i}: {} cookies, {} bytes",
                page.cookies.len(),
                page.encoded_len()
            );
        }
    }
    let note = if stats.checksum_matches() {
        ""
    } else {
        " (mismatch)"
    };
    println!("stored checksum: {:#010x}", stats.stored_checksum);
    println!("computed checksum: {:#010x}{note}", stats.computed_checksum);
    println!("metadata: {} bytes", stats.metadata_size);
    0
}

// ---------------------------------------------------------------------------
// Dump command
// ---------------------------------------------------------------------------

fn cmd_dump(cli: &Cli, args: &InputArgs) -> i32 {
    let (file, _) = match decode_file(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("bincookies: {}: {e}", args.input.display());
            return 1;
        }
    };
    let records = file.to_records();

    if cli.json_output {
        let cookies: Vec<_> = records.iter().map(record_json).collect();
        println!("{}", serde_json::to_string_pretty(&cookies).unwrap());
        return 0;
    }

    for r in &records {
        println!(
            "{} {}={} path={} secure={} httponly={} expires={}",
            r.domain,
            r.name,
            r.value,
            r.path,
            r.secure,
            r.http_only,
            format_absolute(r.expiration)
        );
        if cli.verbose > 0 {
            println!("  created={}", format_absolute(r.creation));
            if let Some(port) = r.port {
                println!("  port={port}");
            }
            if let Some(ref comment) = r.comment {
                println!("  comment={comment}");
            }
            if let Some(ref comment_url) = r.comment_url {
                println!("  comment-url={comment_url}");
            }
        }
    }
    if !cli.quiet {
        eprintln!("bincookies: {} cookies", records.len());
    }
    0
}

// ---------------------------------------------------------------------------
// Recode command
// ---------------------------------------------------------------------------

fn cmd_recode(cli: &Cli, args: &RecodeArgs) -> i32 {
    if args.output.exists() && !cli.force {
        eprintln!(
            "bincookies: output file exists, use -f to overwrite: {}",
            args.output.display()
        );
        return 1;
    }

    let (file, in_stats) = match decode_file(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("bincookies: {}: {e}", args.input.display());
            return 1;
        }
    };

    let out_stats = match encode_file(&file, &args.output) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bincookies: {}: {e}", args.output.display());
            return 1;
        }
    };

    if !cli.quiet {
        eprintln!(
            "bincookies: recoded {} pages, {} cookies, {} -> {} bytes",
            out_stats.pages, out_stats.cookies, in_stats.input_size, out_stats.output_size
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "recode",
            "pages": out_stats.pages,
            "cookies": out_stats.cookies,
            "input_size": in_stats.input_size,
            "output_size": out_stats.output_size,
            "checksum": out_stats.checksum,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Cmd::Info(args) => cmd_info(&cli, args),
        Cmd::Dump(args) => cmd_dump(&cli, args),
        Cmd::Recode(args) => cmd_recode(&cli, args),
    };

    process::exit(exit_code);
}
