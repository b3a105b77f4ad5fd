//! linkrpc CLI — simulate retry behaviour and check shared credentials.
//!
//! Usage:
//! ```bash
//! # Two transient receiver failures, then success
//! linkrpc simulate --failures 2 --delay-ms 100
//!
//! # A deterministic failure is never retried
//! linkrpc simulate --failures 1 --code invalid
//!
//! # Connection faults before the server is reached
//! linkrpc simulate --faults 111,1009
//!
//! # Check a credential against a shared secret
//! linkrpc verify --secret s3cret --presented s3cret
//! ```

mod config;
mod logging;

use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};

use linkrpc_core::codes;
use linkrpc_core::{
    Authenticator, Channel, ErrorCode, LogicalRetryPolicy, MuxPushRequest, MuxPushResponse,
    SimpleAuthenticator, TransportError, VerifyResult,
};
use linkrpc_loopback::{LoopbackServer, LoopbackTransport, ScriptedHandler};

use crate::config::CliConfig;
use crate::logging::init_tracing;

const DEFAULT_PEER: &str = "127.0.0.1:9530";

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "simulate" => cmd_simulate(&args[2..]).await,
        "verify" => cmd_verify(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("linkrpc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("linkrpc {}", env!("CARGO_PKG_VERSION"));
    println!("Simulate link retry behaviour and check shared credentials\n");
    println!("USAGE:");
    println!("    linkrpc <COMMAND>\n");
    println!("COMMANDS:");
    println!("    simulate   Push one message over a loopback link");
    println!("    verify     Check a credential against a shared secret");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("SIMULATE FLAGS:");
    println!("    --config <FILE>      JSON config (timeout_ms, max_retry, retry_delay_ms, ...)");
    println!("    --failures <N>       Receiver failures before success  [default: 0]");
    println!("    --code <CODE>        unexpected | invalid | link_id_not_found  [default: unexpected]");
    println!("    --faults <C1,C2..>   Transport codes failing the first sends");
    println!("    --max-retry <N>      Override max_retry");
    println!("    --delay-ms <MS>      Override retry_delay_ms");
    println!("    --timeout-ms <MS>    Override timeout_ms");
    println!("    --secret <S>         Shared secret for both ends");
    println!("    --client-secret <S>  Secret the client presents (defaults to --secret)");
    println!("    --verbose            Log retry decisions\n");
    println!("VERIFY FLAGS:");
    println!("    --secret <S>         Configured secret  [required]");
    println!("    --presented <S>      Presented credential  [required]");
    println!("    --peer <ADDR>        Peer address  [default: {DEFAULT_PEER}]");
}

/// What one simulated push did.
struct Simulation {
    /// Sends the transport made, injected faults included.
    attempts: usize,
    /// Times the receiver handler actually ran.
    server_calls: usize,
    result: Result<MuxPushResponse, TransportError>,
}

impl Simulation {
    fn into_response(self) -> anyhow::Result<MuxPushResponse> {
        self.result.map_err(|e| anyhow::Error::new(e).context("push failed"))
    }
}

async fn cmd_simulate(args: &[String]) -> anyhow::Result<()> {
    let config = simulation_config(args)?;
    init_tracing(&config.log);

    println!("Simulating push over {DEFAULT_PEER}...");
    let start = Instant::now();
    let sim = run_simulation(args, &config).await?;
    let elapsed = start.elapsed();

    println!("  Attempts:     {}", sim.attempts);
    println!("  Server calls: {}", sim.server_calls);
    println!("  Elapsed:      {}ms", elapsed.as_millis());
    let resp = sim.into_response()?;
    println!("  Status:       {}", resp.error_code);
    if !resp.error_msg.is_empty() {
        println!("  Message:      {}", resp.error_msg);
    }
    Ok(())
}

/// `--config` file (or defaults) with the command-line overrides applied.
fn simulation_config(args: &[String]) -> anyhow::Result<CliConfig> {
    let mut config = match parse_flag(args, "--config") {
        Some(path) => CliConfig::load(Path::new(&path))?,
        None => CliConfig::default(),
    };
    if let Some(v) = parse_num::<u32>(args, "--max-retry")? {
        config.max_retry = v;
    }
    if let Some(v) = parse_num::<u64>(args, "--delay-ms")? {
        config.retry_delay_ms = v;
    }
    if let Some(v) = parse_num::<u64>(args, "--timeout-ms")? {
        config.timeout_ms = v;
    }
    if let Some(secret) = parse_flag(args, "--secret") {
        config.secret = Some(secret);
    }
    if args.iter().any(|a| a == "--verbose") {
        config.log.level = "info".into();
        config.log.components.insert("linkrpc-core".into(), "debug".into());
    }
    Ok(config)
}

/// Push one message over a freshly wired loopback link.
async fn run_simulation(args: &[String], config: &CliConfig) -> anyhow::Result<Simulation> {
    let failures = parse_num::<usize>(args, "--failures")?.unwrap_or(0);
    let code: ErrorCode = parse_flag(args, "--code")
        .unwrap_or_else(|| "unexpected".into())
        .parse()
        .map_err(anyhow::Error::msg)?;
    let faults = match parse_flag(args, "--faults") {
        Some(list) => parse_codes(&list)?,
        None => Vec::new(),
    };
    let peer: SocketAddr = DEFAULT_PEER.parse().context("default peer address")?;
    tracing::info!(
        failures,
        %code,
        ?faults,
        max_retry = config.max_retry,
        retry_delay_ms = config.retry_delay_ms,
        timeout_ms = config.timeout_ms,
        "starting simulation"
    );

    let handler = Arc::new(ScriptedHandler::failing(code, failures));
    let mut server = LoopbackServer::new(handler.clone());
    if let Some(secret) = &config.secret {
        server = server.with_authenticator(Arc::new(SimpleAuthenticator::new(secret.clone())));
    }
    let transport = Arc::new(LoopbackTransport::new(Arc::new(server), peer).with_faults(faults));

    let mut channel = Channel::new(transport.clone(), config.channel_config())
        .with_retry_policy(Arc::new(LogicalRetryPolicy::new(config.retry_config())));
    if let Some(secret) = parse_flag(args, "--client-secret").or_else(|| config.secret.clone()) {
        channel = channel.with_authenticator(&SimpleAuthenticator::new(secret));
    }

    let result = channel
        .push(MuxPushRequest::new("sim-link", 0, "sim-key", b"hello".to_vec()))
        .await;
    Ok(Simulation {
        attempts: transport.attempts(),
        server_calls: handler.calls(),
        result,
    })
}

fn cmd_verify(args: &[String]) -> anyhow::Result<()> {
    let secret = parse_flag(args, "--secret").context("--secret is required")?;
    let presented = parse_flag(args, "--presented").context("--presented is required")?;
    let peer: SocketAddr = parse_flag(args, "--peer")
        .unwrap_or_else(|| DEFAULT_PEER.into())
        .parse()
        .context("--peer must be an address like 10.0.0.1:9530")?;

    let auth = SimpleAuthenticator::new(secret);
    match auth.verify_credential(&presented.into(), peer) {
        VerifyResult::Accepted => {
            println!("accepted");
            Ok(())
        }
        VerifyResult::Rejected => bail!("credential rejected for {peer}"),
    }
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn parse_num<T>(args: &[String], flag: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_flag(args, flag)
        .map(|v| v.parse::<T>().with_context(|| format!("{flag} expects a number, got {v:?}")))
        .transpose()
}

/// Comma-separated transport codes, e.g. `111,1009`.
fn parse_codes(list: &str) -> anyhow::Result<Vec<i32>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| -> anyhow::Result<i32> {
            let code = s.parse::<i32>().with_context(|| format!("bad transport code {s:?}"))?;
            if code == codes::OK {
                bail!("transport code 0 is not a fault");
            }
            Ok(code)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_are_looked_up_by_name() {
        let a = args(&["--failures", "2", "--secret", "k"]);
        assert_eq!(parse_flag(&a, "--secret").as_deref(), Some("k"));
        assert_eq!(parse_num::<usize>(&a, "--failures").unwrap(), Some(2));
        assert_eq!(parse_num::<usize>(&a, "--max-retry").unwrap(), None);
        assert!(parse_num::<usize>(&args(&["--failures", "x"]), "--failures").is_err());
    }

    #[test]
    fn fault_lists() {
        assert_eq!(parse_codes("111, 1009").unwrap(), vec![111, 1009]);
        assert!(parse_codes("0").is_err());
        assert!(parse_codes("abc").is_err());
    }

    #[test]
    fn simulate_flags_override_config() {
        let config = simulation_config(&args(&[
            "--max-retry", "7",
            "--delay-ms", "0",
            "--timeout-ms", "250",
            "--secret", "k",
            "--verbose",
        ]))
        .unwrap();
        assert_eq!(config.max_retry, 7);
        assert!(config.retry_config().retry_delay.is_zero());
        assert_eq!(config.channel_config().timeout, Duration::from_millis(250));
        assert_eq!(config.secret.as_deref(), Some("k"));
        assert_eq!(config.log.level, "info");

        assert_eq!(simulation_config(&[]).unwrap(), CliConfig::default());
        assert!(simulation_config(&args(&["--delay-ms", "soon"])).is_err());
        assert!(simulation_config(&args(&["--config", "/nonexistent/linkrpc.json"])).is_err());
    }

    async fn simulate(list: &[&str]) -> Simulation {
        let a = args(list);
        let config = simulation_config(&a).unwrap();
        run_simulation(&a, &config).await.unwrap()
    }

    #[tokio::test]
    async fn simulate_recovers_after_unexpected_errors() {
        let sim = simulate(&["--failures", "2", "--delay-ms", "0"]).await;
        assert_eq!(sim.attempts, 3);
        assert_eq!(sim.server_calls, 3);
        assert!(sim.into_response().unwrap().is_success());
    }

    #[tokio::test]
    async fn simulate_invalid_request_is_final() {
        let sim = simulate(&["--failures", "1", "--code", "invalid", "--delay-ms", "0"]).await;
        assert_eq!(sim.attempts, 1);
        assert_eq!(sim.into_response().unwrap().error_code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn simulate_counts_faulted_attempts() {
        let sim = simulate(&["--faults", "111,1009", "--delay-ms", "0"]).await;
        assert_eq!(sim.attempts, 3);
        assert_eq!(sim.server_calls, 1);
        assert!(sim.into_response().unwrap().is_success());
    }

    #[tokio::test]
    async fn simulate_respects_max_retry() {
        let sim = simulate(&["--failures", "5", "--max-retry", "1", "--delay-ms", "0"]).await;
        assert_eq!(sim.attempts, 2);
        assert_eq!(sim.into_response().unwrap().error_code, ErrorCode::UnexpectedError);
    }

    #[tokio::test]
    async fn simulate_client_secret_mismatch() {
        let sim = simulate(&["--secret", "a", "--client-secret", "b", "--delay-ms", "0"]).await;
        assert_eq!(sim.attempts, 1);
        assert_eq!(sim.server_calls, 0);
        let err = format!("{:#}", sim.into_response().unwrap_err());
        assert!(err.starts_with("push failed"), "{err}");
        assert!(err.contains("ERPCAUTH"), "{err}");

        let sim = simulate(&["--secret", "a", "--client-secret", "a", "--delay-ms", "0"]).await;
        assert!(sim.into_response().unwrap().is_success());
    }

    #[test]
    fn verify_command() {
        assert!(cmd_verify(&args(&["--secret", "s", "--presented", "s"])).is_ok());
        assert!(cmd_verify(&args(&["--secret", "s", "--presented", "s "])).is_err());
        assert!(cmd_verify(&args(&["--secret", "s"])).is_err());
    }
}
