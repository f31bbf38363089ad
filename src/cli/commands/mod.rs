use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("entrata")
        .about("Partner authentication front door")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ENTRATA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("identity-url")
                .short('i')
                .long("identity-url")
                .help("Base URL of the upstream identity service, example: https://identity.tld:8443")
                .env("ENTRATA_IDENTITY_URL")
                .required(true),
        )
        .arg(
            Arg::new("public-url")
                .long("public-url")
                .help("Public base URL of this front door, used to build password reset links")
                .default_value("http://localhost:8080")
                .env("ENTRATA_PUBLIC_URL"),
        )
        .arg(
            Arg::new("secure-cookies")
                .long("secure-cookies")
                .help("Mark session cookies Secure, requires HTTPS in front of the server")
                .env("ENTRATA_SECURE_COOKIES")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ENTRATA_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "entrata");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Partner authentication front door"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_port_and_identity_url() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "entrata",
            "--port",
            "8080",
            "--identity-url",
            "https://identity.tld:8443",
            "--public-url",
            "https://partners.example.com",
        ]);

        assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(8080));
        assert_eq!(
            matches
                .get_one::<String>("identity-url")
                .map(|s| s.to_string()),
            Some("https://identity.tld:8443".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("public-url")
                .map(|s| s.to_string()),
            Some("https://partners.example.com".to_string())
        );
        assert!(!matches.get_flag("secure-cookies"));
    }

    #[test]
    fn test_public_url_default() {
        let matches = new().get_matches_from(vec![
            "entrata",
            "--identity-url",
            "https://identity.tld:8443",
        ]);
        assert_eq!(
            matches
                .get_one::<String>("public-url")
                .map(|s| s.to_string()),
            Some("http://localhost:8080".to_string())
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("ENTRATA_IDENTITY_URL", Some("https://identity.tld:8443")),
                ("ENTRATA_PUBLIC_URL", Some("https://partners.example.com")),
                ("ENTRATA_PORT", Some("443")),
                ("ENTRATA_SECURE_COOKIES", Some("true")),
                ("ENTRATA_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["entrata"]);
                assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>("identity-url")
                        .map(|s| s.to_string()),
                    Some("https://identity.tld:8443".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("public-url")
                        .map(|s| s.to_string()),
                    Some("https://partners.example.com".to_string())
                );
                assert!(matches.get_flag("secure-cookies"));
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("ENTRATA_LOG_LEVEL", Some(level)),
                    ("ENTRATA_IDENTITY_URL", Some("https://identity.tld:8443")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["entrata"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").map(|s| *s),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("ENTRATA_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "entrata".to_string(),
                    "--identity-url".to_string(),
                    "https://identity.tld:8443".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }
}
