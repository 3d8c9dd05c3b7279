use reqwest::Url;

/// Resolves a wordlist entry against the base URL using standard
/// base/relative join semantics: an entry starting with `/` replaces the
/// whole path, a relative entry resolves against the base path, and an
/// empty entry yields the base URL itself.
///
/// Never fails. Entries the parser rejects fall back to plain
/// concatenation; whatever error that string provokes is reported by the
/// executor like any other connection failure.
pub fn join_target(base: &Url, entry: &str) -> String {
    match base.join(entry) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base, entry),
    }
}
