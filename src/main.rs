use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;

use iplookup::config::LookupConfig;
use iplookup::lookup::providers::{IPAPI_URL, IPINFO_URL, IPWHO_URL};
use iplookup::lookup::LookupResolver;
use iplookup::mock::generate_mock;
use iplookup::report::{render, FailureKind, LookupReport};

/// iplookup: IPv4 geolocation with provider fallback
///
/// Looks an address up on ipapi.co, then ipwho.is, then ipinfo.io, and
/// prints the location next to placeholder personal data.
///
/// Examples:
///   iplookup 8.8.8.8
///   iplookup 1.1.1.1 --json
///   iplookup --serve --port 8080
#[derive(Parser)]
#[command(name = "iplookup", version, about, long_about = None)]
struct Cli {
    /// IPv4 address to look up. Example: iplookup 8.8.8.8
    #[arg(index = 1)]
    address: Option<String>,

    /// Print the result as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Serve the browser UI instead of doing a single lookup.
    #[arg(long)]
    serve: bool,

    /// Bind address for --serve.
    #[arg(long, env = "IPLOOKUP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for --serve.
    #[arg(long, env = "IPLOOKUP_PORT", default_value_t = 3000)]
    port: u16,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "IPLOOKUP_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// ipapi.co URL template ({ip} is replaced by the address).
    #[arg(long, env = "IPLOOKUP_IPAPI_URL", default_value = IPAPI_URL)]
    ipapi_url: String,

    /// ipwho.is URL template.
    #[arg(long, env = "IPLOOKUP_IPWHO_URL", default_value = IPWHO_URL)]
    ipwho_url: String,

    /// ipinfo.io URL template.
    #[arg(long, env = "IPLOOKUP_IPINFO_URL", default_value = IPINFO_URL)]
    ipinfo_url: String,
}

impl Cli {
    fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            timeout: Duration::from_secs(self.timeout),
            ipapi_url: self.ipapi_url.clone(),
            ipwho_url: self.ipwho_url.clone(),
            ipinfo_url: self.ipinfo_url.clone(),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    error: &'static str,
    kind: FailureKind,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    iplookup::init_logging(if cli.serve { "info" } else { "warn" });

    let resolver = LookupResolver::from_config(&cli.lookup_config());

    if cli.serve {
        return match iplookup::server::start(&cli.host, cli.port, resolver).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: Cannot serve on {}:{}: {}", cli.host, cli.port, e);
                ExitCode::FAILURE
            }
        };
    }

    let Some(address) = cli.address.as_deref() else {
        eprintln!("Error: No address specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  iplookup 8.8.8.8");
        eprintln!("  iplookup 8.8.8.8 --json");
        eprintln!("  iplookup --serve");
        return ExitCode::from(2);
    };

    let result = resolver.lookup(address).await;
    match render(result, generate_mock) {
        Ok(report) => {
            print_report(&report, cli.json);
            ExitCode::SUCCESS
        }
        Err(kind) => {
            print_failure(kind, cli.json);
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &LookupReport, json: bool) {
    if !json {
        print!("{}", report);
        return;
    }
    match serde_json::to_string_pretty(report) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: Cannot encode result: {}", e),
    }
}

fn print_failure(kind: FailureKind, json: bool) {
    if json {
        let body = JsonError { error: kind.message(), kind };
        if let Ok(s) = serde_json::to_string_pretty(&body) {
            println!("{}", s);
        }
    }
    eprintln!("Error: {}", kind.message());
}
