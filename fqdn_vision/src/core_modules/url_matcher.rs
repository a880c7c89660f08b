// THEORY:
// The `url_matcher` turns raw OCR output into an FQDN. It is a single regular
// expression search: an `http` or `https` scheme, `://`, a run of non-whitespace,
// a literal dot and one of a closed list of top-level domains, bounded by word
// boundaries on both ends.
//
// The trailing word boundary ends the match at the TLD, so any path after the host is
// left out: "https://example.com/page" yields "https://example.com". Hosts under a TLD
// outside the allow-list are not recognized.

use regex::Regex;
use std::sync::OnceLock;

/// Top-level domains the matcher accepts.
pub const DOMAIN_EXTENSIONS: &[&str] = &[
    "com", "org", "hr", "ru", "net", "ir", "in", "uk", "au", "de", "ua", "us", "gov",
];

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn url_pattern() -> &'static Regex {
    URL_PATTERN.get_or_init(|| {
        let expr = format!(r"\bhttps?://\S+\.({})\b", DOMAIN_EXTENSIONS.join("|"));
        Regex::new(&expr).expect("URL pattern is a valid regular expression")
    })
}

/// Finds the first FQDN-shaped substring in `text`, scheme included.
pub fn extract_url(text: &str) -> Option<String> {
    url_pattern().find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_the_tld_boundary() {
        assert_eq!(
            extract_url("visit https://example.com/page now").as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn keeps_subdomains() {
        assert_eq!(
            extract_url("https://mail.example.org/inbox").as_deref(),
            Some("https://mail.example.org")
        );
        assert_eq!(
            extract_url("  http://news.bbc.co.uk  ").as_deref(),
            Some("http://news.bbc.co.uk")
        );
    }

    #[test]
    fn rejects_other_schemes_and_bare_hosts() {
        assert_eq!(extract_url("see ftp://example.com"), None);
        assert_eq!(extract_url("email me at user@example.com"), None);
        assert_eq!(extract_url("example.com"), None);
    }

    #[test]
    fn rejects_unlisted_tlds() {
        assert_eq!(extract_url("https://example.io"), None);
        assert_eq!(extract_url("https://example.community"), None);
    }

    #[test]
    fn tolerates_ocr_noise_around_the_url() {
        let ocr = "© | https://www.kernel.org/pub/linux ☆ :\n";
        assert_eq!(extract_url(ocr).as_deref(), Some("https://www.kernel.org"));
    }

    #[test]
    fn empty_text_has_no_match() {
        assert_eq!(extract_url(""), None);
    }
}
