//! `httpclient [GET/POST] [URL]`
//!
//! Performs one request and prints the decoded response body. Exits 1 with
//! the usage text when called without arguments, and 255 when the server
//! cannot be reached.

mod logger;

use std::process::ExitCode;

use rawhttp_core::{ClientError, HttpClient, HttpMethod};

const USAGE: &str = "httpclient [GET/POST] [URL]\n";

/// Exit status for an unreachable server.
const EXIT_CONNECT: u8 = 255;

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    method: HttpMethod,
    url: String,
    args: Vec<(String, String)>,
}

/// `<url>` or `<METHOD> <url> [key=value ...]`. `None` means print usage.
fn parse_args(argv: &[String]) -> Option<Invocation> {
    match argv {
        [] => None,
        [url] => Some(Invocation {
            method: HttpMethod::Get,
            url: url.clone(),
            args: Vec::new(),
        }),
        [method, url, rest @ ..] => Some(Invocation {
            method: HttpMethod::from_command(method),
            url: url.clone(),
            args: rest.iter().map(|pair| form_pair(pair)).collect(),
        }),
    }
}

/// `key=value`; an item without `=` becomes a key with an empty value.
fn form_pair(item: &str) -> (String, String) {
    match item.split_once('=') {
        Some((key, value)) => (key.to_string(), value.to_string()),
        None => (item.to_string(), String::new()),
    }
}

fn exit_status(err: &ClientError) -> u8 {
    if err.is_connect() {
        EXIT_CONNECT
    } else {
        1
    }
}

fn main() -> ExitCode {
    logger::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(invocation) = parse_args(&argv) else {
        print!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let client = HttpClient::new();
    match client.command(&invocation.url, invocation.method, &invocation.args) {
        Ok(response) => {
            println!("{response}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(exit_status(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_prints_usage() {
        assert_eq!(parse_args(&[]), None);
    }

    #[test]
    fn single_argument_is_a_get() {
        let inv = parse_args(&argv(&["http://example.com/"])).unwrap();
        assert_eq!(inv.method, HttpMethod::Get);
        assert_eq!(inv.url, "http://example.com/");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn method_comes_before_url() {
        let inv = parse_args(&argv(&["POST", "http://example.com/submit"])).unwrap();
        assert_eq!(inv.method, HttpMethod::Post);
        assert_eq!(inv.url, "http://example.com/submit");

        let inv = parse_args(&argv(&["GET", "http://example.com/"])).unwrap();
        assert_eq!(inv.method, HttpMethod::Get);
    }

    #[test]
    fn trailing_items_become_form_arguments() {
        let inv = parse_args(&argv(&["POST", "http://h/", "a=1", "b=x=y", "flag"])).unwrap();
        assert_eq!(
            inv.args,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "x=y".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn connect_failures_exit_with_255() {
        let err = ClientError::Connect {
            authority: "h:80".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(exit_status(&err), 255);
        assert_eq!(exit_status(&ClientError::MissingSeparator), 1);
    }
}
