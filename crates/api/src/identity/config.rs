//! Identity-service settings.

/// URL variables, first present wins.
pub const URL_KEYS: &[&str] = &["SUPABASE_URL", "PUBLIC_SUPABASE_URL"];

/// Service key variables, first present wins. The anon keys come last so a
/// development setup without a service key can still sign users in.
pub const SERVICE_KEY_KEYS: &[&str] = &[
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_SERVICE_ROLE",
    "SUPABASE_SERVICE_KEY",
    "SUPABASE_SECRET_KEY",
    "SUPABASE_KEY",
    "SUPABASE_ANON_KEY",
    "PUBLIC_SUPABASE_ANON_KEY",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    /// Base URL without a trailing `/`.
    pub url: String,
    pub service_key: String,
}

impl IdentitySettings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Option<Self> {
        Self::resolve_from(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`. Blank values count as absent.
    /// Returns `None` unless both a URL and a key are found.
    pub fn resolve_from(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let url = first(URL_KEYS)?.trim_end_matches('/').to_string();
        let service_key = first(SERVICE_KEY_KEYS)?;
        Some(Self { url, service_key })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn service_role_key_takes_precedence() {
        let settings = IdentitySettings::resolve_from(lookup(&[
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ]))
        .unwrap();
        assert_eq!(settings.url, "https://abc.supabase.co");
        assert_eq!(settings.service_key, "service");
    }

    #[test]
    fn public_url_is_a_fallback() {
        let settings = IdentitySettings::resolve_from(lookup(&[
            ("PUBLIC_SUPABASE_URL", "https://pub.supabase.co"),
            ("PUBLIC_SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(settings.url, "https://pub.supabase.co");
        assert_eq!(settings.service_key, "anon");
    }

    #[test]
    fn blank_values_are_skipped() {
        let settings = IdentitySettings::resolve_from(lookup(&[
            ("SUPABASE_URL", "  "),
            ("PUBLIC_SUPABASE_URL", "https://x.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", ""),
            ("SUPABASE_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(settings.url, "https://x.co");
        assert_eq!(settings.service_key, "k");
    }

    #[test]
    fn missing_key_means_unconfigured() {
        assert_eq!(
            IdentitySettings::resolve_from(lookup(&[("SUPABASE_URL", "https://x.co")])),
            None
        );
        assert_eq!(IdentitySettings::resolve_from(lookup(&[])), None);
    }
}
