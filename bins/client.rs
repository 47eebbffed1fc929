//! Command line client for the product service.
//!
//! `client list`
//! `client get <ID>`
//! `client create <NAME> [--price PRICE]`
//! `client update <ID> <NAME> [--price PRICE]`
//! `client delete <ID>`
//!
//! `--base-url` (or `PRODUCTS_BASE_URL`, or `[client] base_url` in the config
//! file) selects the server; the default is `http://localhost:5000`.
//! Results are printed as one human-readable line on stdout.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgMatches, Command};
use client::{product_payload, report, ProductClient};
use dotenvy::dotenv;
use tracing::debug;

/// A parsed subcommand.
#[derive(Debug)]
enum Request {
    List,
    Get { id: u64 },
    Create { name: String, price: f64 },
    Update { id: u64, name: String, price: f64 },
    Delete { id: u64 },
}

/// [`Opt`] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    base_url: String,
    timeout: Duration,
    req: Request,
}

fn cli() -> Command {
    let id = || Arg::new("ID").required(true).value_parser(value_parser!(u64));
    let name = || Arg::new("NAME").required(true);
    let price = || {
        Arg::new("price")
            .long("price")
            .value_name("PRICE")
            .value_parser(value_parser!(f64))
            .default_value("0.0")
    };

    Command::new("client")
        .version(env!("CARGO_PKG_VERSION"))
        .about("talks to a product server over HTTP")
        .subcommand_required(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("server base URL, e.g. http://localhost:5000"),
        )
        .subcommands([
            Command::new("list").about("List all products"),
            Command::new("get").about("Show one product").arg(id()),
            Command::new("create").about("Create a product").arg(name()).arg(price()),
            Command::new("update").about("Update a product's name and price").arg(id()).arg(name()).arg(price()),
            Command::new("delete").about("Remove a product").arg(id()),
        ])
}

/// parses the matches from the command line into a [`Request`]
fn parse_request(matches: &ArgMatches) -> anyhow::Result<Request> {
    let id = |args: &ArgMatches| args.get_one::<u64>("ID").copied().ok_or_else(|| anyhow!("missing ID"));
    let name = |args: &ArgMatches| args.get_one::<String>("NAME").cloned().ok_or_else(|| anyhow!("missing NAME"));
    let price = |args: &ArgMatches| args.get_one::<f64>("price").copied().unwrap_or(0.0);

    match matches.subcommand() {
        Some(("list", _)) => Ok(Request::List),
        Some(("get", args)) => Ok(Request::Get { id: id(args)? }),
        Some(("create", args)) => Ok(Request::Create { name: name(args)?, price: price(args) }),
        Some(("update", args)) => Ok(Request::Update { id: id(args)?, name: name(args)?, price: price(args) }),
        Some(("delete", args)) => Ok(Request::Delete { id: id(args)? }),
        Some((other, _)) => Err(anyhow!("unknown command: {other}")),
        None => Err(anyhow!("no command given")),
    }
}

fn parse_options(matches: &ArgMatches) -> anyhow::Result<Opt> {
    let mut cfg = configs::AppConfig::load_and_validate().context("loading configuration")?;
    if let Some(url) = matches.get_one::<String>("base-url") {
        cfg.client.base_url = url.clone();
        cfg.normalize_and_validate()?;
    }
    Ok(Opt {
        base_url: cfg.client.base_url,
        timeout: Duration::from_secs(cfg.client.timeout_secs),
        req: parse_request(matches)?,
    })
}

/// runs the request and returns the line to print
async fn run(opt: Opt) -> anyhow::Result<String> {
    let client = ProductClient::new(&opt.base_url, opt.timeout)?;
    debug!(base_url = %opt.base_url, request = ?opt.req, "sending request");
    let line = match opt.req {
        Request::List => report::listed(&client.list().await?),
        Request::Get { id } => report::found(client.get(id).await?.as_ref()),
        Request::Create { name, price } => report::created(&client.create(&product_payload(&name, price)).await?),
        Request::Update { id, name, price } => {
            report::updated(client.update(id, &product_payload(&name, price)).await?.as_ref())
        }
        Request::Delete { id } => report::deleted(id, client.delete(id).await?),
    };
    Ok(line)
}

fn main() -> ExitCode {
    dotenv().ok();
    // stdout carries results, diagnostics go to stderr
    common::utils::logging::init_logging_stderr("warn");

    let matches = cli().get_matches();
    let opt = match parse_options(&matches) {
        Ok(opt) => opt,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: cannot start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(opt)) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
