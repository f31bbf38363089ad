use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        identity_url: matches
            .get_one("identity-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --identity-url"))?,
        public_url: matches
            .get_one("public-url")
            .map(|s: &String| s.to_string())
            .unwrap_or_else(|| "http://localhost:8080".to_string()),
        secure_cookies: matches.get_flag("secure-cookies"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_builds_server_action() {
        let matches = commands::new().get_matches_from(vec![
            "entrata",
            "--port",
            "9090",
            "--identity-url",
            "https://identity.tld:8443",
            "--secure-cookies",
        ]);

        let Action::Server {
            port,
            identity_url,
            public_url,
            secure_cookies,
        } = handler(&matches).unwrap();

        assert_eq!(port, 9090);
        assert_eq!(identity_url, "https://identity.tld:8443");
        assert_eq!(public_url, "http://localhost:8080");
        assert!(secure_cookies);
    }
}
