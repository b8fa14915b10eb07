//! Input resolution for the address bar
//!
//! Text already carrying a web scheme is used as typed. Anything else gets
//! the default scheme prefixed. The result is checked with [`Url`] for the
//! log only and handed on exactly as built, so `example.com` becomes
//! `https://example.com` without a trailing slash.

use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;
use url::Url;

const WEB_SCHEMES: [&str; 2] = ["http://", "https://"];
const PASSTHROUGH_SCHEMES: [&str; 3] = ["about:", "file://", "data:"];

/// Scheme prefixed to input that has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultScheme {
    #[default]
    Https,
    Http,
}

impl DefaultScheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            DefaultScheme::Https => "https://",
            DefaultScheme::Http => "http://",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputResolver {
    default_scheme: DefaultScheme,
}

impl InputResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_scheme(default_scheme: DefaultScheme) -> Self {
        Self { default_scheme }
    }

    pub fn default_scheme(&self) -> DefaultScheme {
        self.default_scheme
    }

    /// Turn address bar text into the URL handed to the engine.
    ///
    /// Never fails. Text that does not parse as a URL is still loaded and
    /// the engine reports the failure through its load events.
    pub fn resolve(&self, input: &str) -> String {
        let input = input.trim();

        let candidate = if WEB_SCHEMES
            .iter()
            .chain(PASSTHROUGH_SCHEMES.iter())
            .any(|scheme| starts_with_ignore_case(input, scheme))
        {
            input.to_string()
        } else {
            let (host, rest) = split_host_and_rest(input);
            let prefix = self.default_scheme.prefix();
            if host.parse::<Ipv6Addr>().is_ok() {
                format!("{}[{}]{}", prefix, host, rest)
            } else {
                format!("{}{}", prefix, input)
            }
        };

        if let Err(e) = Url::parse(&candidate) {
            tracing::warn!(url = %candidate, error = %e, "Address does not parse as a URL");
        }

        candidate
    }
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

fn split_host_and_rest(input: &str) -> (&str, &str) {
    let cut = input.find(['/', '?', '#']).unwrap_or(input.len());
    input.split_at(cut)
}
