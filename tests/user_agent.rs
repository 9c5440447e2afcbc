mod helpers;

use actix_secure_headers::{UaFamily, UserAgent};
use helpers::*;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CHROME_UA, UaFamily::Modern, "Chrome", Some(119) ; "chrome")]
    #[test_case(FIREFOX_UA, UaFamily::Firefox, "Firefox", Some(120) ; "firefox")]
    #[test_case(SAFARI_UA, UaFamily::Safari, "Safari", Some(17) ; "safari")]
    #[test_case(EDGE_LEGACY_UA, UaFamily::Edge, "Edge", Some(17) ; "edge legacy")]
    #[test_case(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.61",
        UaFamily::Modern, "Edge", Some(120) ; "edge chromium"
    )]
    #[test_case(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 OPR/105.0.0.0",
        UaFamily::Modern, "Opera", Some(105) ; "opera"
    )]
    #[test_case(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/119.0.6045.169 Mobile/15E148 Safari/604.1",
        UaFamily::Modern, "Chrome", Some(119) ; "chrome ios"
    )]
    #[test_case(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) FxiOS/120.0 Mobile/15E148 Safari/605.1.15",
        UaFamily::Firefox, "Firefox", Some(120) ; "firefox ios"
    )]
    fn test_known_browsers(raw: &str, family: UaFamily, browser: &str, version: Option<u32>) {
        init_logger();
        let user_agent = UserAgent::parse(raw);

        assert_eq!(user_agent.family(), family);
        assert_eq!(user_agent.browser(), browser);
        assert_eq!(user_agent.major_version(), version);
    }

    #[test_case("" ; "empty")]
    #[test_case("curl/8.4.0" ; "curl")]
    #[test_case("Safari/604.1" ; "safari without version")]
    #[test_case("\u{0}\u{fffd}garbage" ; "garbage")]
    fn test_unknown_falls_back_to_modern(raw: &str) {
        let user_agent = UserAgent::parse(raw);

        assert_eq!(user_agent.family(), UaFamily::Modern);
        assert_eq!(user_agent.browser(), "Unknown");
        assert_eq!(user_agent.major_version(), None);
    }

    #[test]
    fn test_missing_version_digits() {
        let user_agent = UserAgent::parse("Mozilla/5.0 Firefox/beta");

        assert_eq!(user_agent.family(), UaFamily::Firefox);
        assert_eq!(user_agent.major_version(), None);
    }

    #[test]
    fn test_representatives_parse_to_their_family() {
        for family in UaFamily::ALL {
            assert_eq!(
                UserAgent::parse(family.representative_user_agent()).family(),
                family
            );
        }
    }

    #[test]
    fn test_family_support() {
        assert!(UaFamily::Modern.supports_directive("trusted-types"));
        assert!(!UaFamily::Firefox.supports_directive("trusted-types"));
        assert!(UaFamily::Firefox.supports_directive("report-to"));
        assert!(!UaFamily::Safari.supports_directive("report-to"));
        assert!(!UaFamily::Edge.supports_directive("worker-src"));
        assert!(UaFamily::Edge.supports_directive("script-src"));

        assert_eq!(
            UaFamily::ALL.map(|family| family.to_string()),
            ["modern", "firefox", "safari", "edge"]
        );
    }
}
