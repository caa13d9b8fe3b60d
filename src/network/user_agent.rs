//! User agent generation

use rand::seq::SliceRandom;
use rand::Rng;

const CHROME_VERSIONS: [&str; 4] = ["122.0.0.0", "123.0.0.0", "124.0.0.0", "125.0.0.0"];
const FIREFOX_VERSIONS: [&str; 3] = ["123.0", "124.0", "125.0"];
const DESKTOP_PLATFORMS: [&str; 4] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

/// Generate a random but realistic desktop browser user agent.
///
/// Target pages often block obvious bots, so page fetches identify as a
/// mainstream browser.
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let os = DESKTOP_PLATFORMS
        .choose(&mut rng)
        .copied()
        .unwrap_or(DESKTOP_PLATFORMS[0]);

    // Chrome 70%, Firefox 30%
    if rng.gen_range(0..10) < 7 {
        let chrome = CHROME_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(CHROME_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            os, chrome
        )
    } else {
        let firefox = FIREFOX_VERSIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(FIREFOX_VERSIONS[0]);
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            os, firefox, firefox
        )
    }
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
}

/// Accept header for JSON APIs
pub fn accept_json() -> &'static str {
    "application/json"
}

/// Standard accept-language header
pub fn accept_language(lang: &str) -> String {
    if lang.is_empty() {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en-US;q=0.9,en;q=0.8", lang)
    }
}
