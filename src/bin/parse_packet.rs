//! Packet decode utility
//! Decodes meter packets given as hex text and prints the reading

use fs9721_rs::core::readable_unit;
use fs9721_rs::formats::{parse_hex, CsvLog, ReadingRecord};
use fs9721_rs::protocol::decode;
use fs9721_rs::Reading;
use std::env;
use std::fs;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut json = false;
    let mut show_fields = false;
    let mut file: Option<String> = None;
    let mut csv: Option<String> = None;
    let mut hex_parts: Vec<String> = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--fields" => show_fields = true,
            "--file" => {
                file = Some(
                    iter.next()
                        .ok_or_else(|| anyhow::anyhow!("--file requires a path"))?
                        .clone(),
                );
            }
            "--csv" => {
                csv = Some(
                    iter.next()
                        .ok_or_else(|| anyhow::anyhow!("--csv requires a path"))?
                        .clone(),
                );
            }
            _ => hex_parts.push(arg.clone()),
        }
    }

    if file.is_none() && hex_parts.is_empty() {
        eprintln!("Usage: {} [options] <hex bytes>", args[0]);
        eprintln!("       {} [options] --file <packets.txt>", args[0]);
        eprintln!("\nOptions:");
        eprintln!("  --json        print the reading as JSON");
        eprintln!("  --fields      dump every raw field of the reading");
        eprintln!("  --csv <path>  append decoded readings to a CSV log");
        eprintln!("\nExamples:");
        eprintln!(
            "  {} 17 27 3D 47 5D 65 7B 89 97 A0 B8 C0 D4 E1",
            args[0]
        );
        eprintln!("  {} --file captures.txt --csv readings.csv", args[0]);
        std::process::exit(1);
    }

    let mut csv_log = match &csv {
        Some(path) => Some(CsvLog::create(path)?),
        None => None,
    };

    match file {
        Some(path) => {
            // One packet per line; malformed lines are skipped, not fatal
            let content = fs::read_to_string(&path)?;
            let mut decoded = 0usize;
            for (line_num, line) in content.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                match parse_line(line) {
                    Ok((raw, reading)) => {
                        decoded += 1;
                        print_reading(&raw, &reading, json, show_fields)?;
                        if let Some(log) = csv_log.as_mut() {
                            log.log_reading(&reading)?;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("skipping line {}: {}", line_num + 1, e);
                    }
                }
            }
            tracing::info!("decoded {} packets from {}", decoded, path);
        }
        None => {
            let (raw, reading) = parse_line(&hex_parts.join(" "))?;
            print_reading(&raw, &reading, json, show_fields)?;
            if let Some(log) = csv_log.as_mut() {
                log.log_reading(&reading)?;
            }
        }
    }

    Ok(())
}

/// Parse one hex line and decode it
fn parse_line(line: &str) -> anyhow::Result<(Vec<u8>, Reading)> {
    let raw = parse_hex(line)?;
    let reading = decode(&raw)?;
    Ok((raw, reading))
}

fn print_reading(
    raw: &[u8],
    reading: &Reading,
    json: bool,
    show_fields: bool,
) -> anyhow::Result<()> {
    if json {
        let record = ReadingRecord::from(reading);
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Inbound Packet:  {}", hex_string(raw));
    println!("Decoded Data:    {}", hex_string(reading.data()));
    println!("Display:         {}", reading.display());

    let unit = readable_unit(&reading.units());
    match reading.value() {
        Ok(value) => {
            print!("Value:           {} {}", value, unit);
            if let Ok(base) = reading.base_value() {
                if base != value {
                    print!(" ({} base)", base);
                }
            }
            println!();
        }
        Err(_) => println!("Value:           (not numeric)"),
    }

    let flags = reading.flags();
    if !flags.is_empty() {
        let labels: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
        println!("Flags:           {}", labels.join(" "));
    }

    if show_fields {
        println!("Fields:");
        for (name, value) in reading.fields() {
            println!("  {:<13} {:#04x}", name, value);
        }
    }

    println!();
    Ok(())
}

fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
