//! CLI tool to validate webserv configuration files.

use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: webconf <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  validate  Check if configuration file(s) are valid");
        eprintln!("  tokens    Dump the token stream of file(s)");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  webconf validate default.conf");
        eprintln!("  webconf tokens default.conf");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match command {
            "validate" => match webconf_rs::parse_str(&content) {
                Ok(config) => {
                    let servers = config.servers.len();
                    let locations: usize =
                        config.servers.iter().map(|s| s.locations.len()).sum();
                    eprintln!("{path}: valid ({servers} server(s), {locations} location(s))");
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    if !e.context.is_empty() {
                        eprintln!("{}", e.context.trim_end());
                    }
                    had_error = true;
                }
            },
            "tokens" => match webconf_rs::tokenize(&content) {
                Ok(tokens) => {
                    for token in &tokens {
                        println!("{}", token.describe());
                    }
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    had_error = true;
                }
            },
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
