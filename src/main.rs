//! CLI for compiling SD-JWT circuit inputs.
//!
//! Usage examples:
//!   cargo run --release -- inputs --token token.txt --jwk key.json --claim <disclosure> -o inputs.json
//!   cargo run --release -- inputs --token token.txt --pem key.pem --claims-file disclosures.txt
//!   cargo run --release -- check --token token.txt --claim <disclosure>
//!
//! `inputs` assembles the full named-signal map and writes it as JSON
//! for the witness generator; `check` only runs the positional `_sd`
//! disclosure match and reports the result.

use std::{env::args, fs, path::PathBuf, process};

use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sdjwt_groth16_inputs::{
    assemble, claims, jwt::JwtToken, prover::write_inputs_json, CircuitParams, PublicKeyInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Inputs,
    Check,
}

#[derive(Debug, Default, Clone)]
struct CommandOptions {
    token: Option<PathBuf>,
    jwk: Option<PathBuf>,
    pem: Option<PathBuf>,
    claims: Vec<String>,
    claims_file: Option<PathBuf>,
    output: PathBuf,
    params: Option<CircuitParams>,
}

/// Subset of a JWK file the pipeline needs.
#[derive(Debug, Deserialize)]
struct JwkFile {
    x: String,
    y: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(true)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = args().collect();
    let command_args: &[String] = if args.len() > 1 { &args[1..] } else { &[] };

    let (action, options) = match parse_command(command_args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("Error: {}", err);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = execute(action, options) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn execute(action: Action, options: CommandOptions) -> Result<(), Box<dyn std::error::Error>> {
    let token_path = options
        .token
        .as_ref()
        .ok_or("--token is required")?;
    let raw_token = fs::read_to_string(token_path)?.trim().to_string();

    let disclosed = collect_claims(&options)?;

    match action {
        Action::Check => {
            let token = JwtToken::parse(&raw_token)?;
            let payload = claims::JwtPayload::from_slice(&token.decode_payload()?)?;
            let digests = payload.sd_digests();
            claims::match_disclosures(digests, &disclosed)?;
            info!(
                sd_entries = digests.len(),
                disclosed = disclosed.len(),
                "all supplied disclosures match their _sd digests"
            );
            println!(
                "ok: {} of {} _sd digests matched",
                disclosed.len(),
                digests.len()
            );
        }
        Action::Inputs => {
            let key = load_key(&options)?;
            let params = options.params.unwrap_or_else(CircuitParams::es256_sd_jwt);
            let map = assemble(&raw_token, &key, &disclosed, &params)?;
            write_inputs_json(&options.output, &map)?;
            println!(
                "wrote {} signals to {}",
                map.len(),
                options.output.display()
            );
        }
    }
    Ok(())
}

fn collect_claims(options: &CommandOptions) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut disclosed = options.claims.clone();
    if let Some(path) = &options.claims_file {
        for line in fs::read_to_string(path)?.lines() {
            let line = line.trim();
            if !line.is_empty() {
                disclosed.push(line.to_string());
            }
        }
    }
    Ok(disclosed)
}

fn load_key(options: &CommandOptions) -> Result<PublicKeyInput, Box<dyn std::error::Error>> {
    match (&options.jwk, &options.pem) {
        (Some(path), None) => {
            let jwk: JwkFile = serde_json::from_str(&fs::read_to_string(path)?)?;
            Ok(PublicKeyInput::Jwk { x: jwk.x, y: jwk.y })
        }
        (None, Some(path)) => Ok(PublicKeyInput::Pem(fs::read_to_string(path)?)),
        (Some(_), Some(_)) => Err("--jwk and --pem are mutually exclusive".into()),
        (None, None) => Err("one of --jwk or --pem is required".into()),
    }
}

fn parse_command(args: &[String]) -> Result<(Action, CommandOptions), String> {
    if args.is_empty() {
        return Err("No command provided".into());
    }

    let action = match args[0].as_str() {
        "-h" | "--help" => {
            print_usage();
            process::exit(0);
        }
        "inputs" => Action::Inputs,
        "check" => Action::Check,
        other => return Err(format!("Unknown command '{other}'")),
    };

    let options = parse_options(&args[1..])?;
    Ok((action, options))
}

fn parse_options(args: &[String]) -> Result<CommandOptions, String> {
    let mut options = CommandOptions {
        output: PathBuf::from("inputs.json"),
        ..CommandOptions::default()
    };
    let mut index = 0;

    let value_for = |args: &[String], index: &mut usize, flag: &str| -> Result<String, String> {
        *index += 1;
        args.get(*index)
            .cloned()
            .ok_or_else(|| format!("Missing value for {flag}"))
    };

    while index < args.len() {
        match args[index].as_str() {
            "--token" | "-t" => {
                options.token = Some(PathBuf::from(value_for(args, &mut index, "--token")?));
            }
            "--jwk" => {
                options.jwk = Some(PathBuf::from(value_for(args, &mut index, "--jwk")?));
            }
            "--pem" => {
                options.pem = Some(PathBuf::from(value_for(args, &mut index, "--pem")?));
            }
            "--claim" | "-c" => {
                options.claims.push(value_for(args, &mut index, "--claim")?);
            }
            "--claims-file" => {
                options.claims_file =
                    Some(PathBuf::from(value_for(args, &mut index, "--claims-file")?));
            }
            "--output" | "-o" => {
                options.output = PathBuf::from(value_for(args, &mut index, "--output")?);
            }
            "--params" => {
                let raw = value_for(args, &mut index, "--params")?;
                options.params = Some(parse_params(&raw)?);
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => return Err(format!("Unknown option '{other}'")),
        }
        index += 1;
    }

    Ok(options)
}

/// Parse `--params` as seven comma-separated sizes:
/// limb_bits,limb_count,max_message,max_payload,max_claim,max_matches,max_sd
fn parse_params(raw: &str) -> Result<CircuitParams, String> {
    let values: Vec<usize> = raw
        .split(',')
        .map(|v| v.trim().parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("Invalid --params value: {e}"))?;
    if values.len() != 7 {
        return Err(format!(
            "--params expects 7 comma-separated sizes, got {}",
            values.len()
        ));
    }
    Ok(CircuitParams {
        limb_bits: values[0],
        limb_count: values[1],
        max_message_len: values[2],
        max_payload_len: values[3],
        max_claim_len: values[4],
        max_match_count: values[5],
        max_sd_count: values[6],
    })
}

fn print_usage() {
    eprintln!(
        "Usage:
  sdjwt-inputs inputs --token <path> (--jwk <path> | --pem <path>) [options]
  sdjwt-inputs check --token <path> [options]

Commands:
  inputs               Assemble the full circuit input map and write it as JSON
  check                Match supplied disclosures against the token's _sd digests

Options:
  --token, -t <path>   File containing the compact SD-JWT
  --jwk <path>         JWK file with base64url x/y coordinates
  --pem <path>         PEM file with a DER SubjectPublicKeyInfo
  --claim, -c <value>  A disclosed claim string (repeatable, positional)
  --claims-file <path> File of disclosed claims, one per line
  --output, -o <path>  Where to write the input JSON (default: inputs.json)
  --params <csv>       Override circuit sizes:
                       limb_bits,limb_count,max_message,max_payload,max_claim,max_matches,max_sd

Examples:
  sdjwt-inputs inputs --token token.txt --jwk issuer.jwk.json -c 'WyJ1cWJ5...' -o inputs.json
  sdjwt-inputs check --token token.txt --claims-file disclosures.txt"
    );
}
