use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::lexicon::Lexicon;

static META_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<meta\b[^>]*>").unwrap());
static LINK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<link\b[^>]*>").unwrap());
static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)([a-z_:-]+)\s*=\s*["']([^"']*)["']"#).unwrap());
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<title>([^<]+)</title>").unwrap());
static PTT_BOARD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"看板\s+(\S+)").unwrap());
static PTT_AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)作者.*?href[^>]*>([^<]+)</a>").unwrap());

const DCARD_TITLE_SUFFIX: &str = " _ Dcard";
const DCARD_BOARD_SUFFIX: &str = " - 看板";
const DCARD_BOARD_MARKER: &str = "板 _ Dcard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ptt,
    Dcard,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ptt => "ptt",
            Platform::Dcard => "dcard",
        }
    }

    /// Substring sniffing, PTT first. Used on markup and on domains alike.
    pub fn sniff(haystack: &str) -> Option<Platform> {
        let lower = haystack.to_lowercase();
        if lower.contains(Platform::Ptt.as_str()) {
            Some(Platform::Ptt)
        } else if lower.contains(Platform::Dcard.as_str()) {
            Some(Platform::Dcard)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedMetadata {
    pub url: Option<String>,
    pub domain: Option<String>,
    pub platform: Option<Platform>,
    pub board_or_category: Option<String>,
    pub author_display: Option<String>,
    pub title: Option<String>,
}

/// Pull url, title and platform fields out of raw markup.
///
/// `extracted_title` is the `<title>` text the extractor saw; the raw regex and
/// `og:title` are fallbacks when it is missing.
pub fn extract(markup: &str, extracted_title: Option<&str>, lexicon: &Lexicon) -> ExtractedMetadata {
    let og_url = meta_property(markup, "og:url");
    let canonical = canonical_href(markup);
    let url = og_url.or(canonical);
    let domain = url.as_deref().and_then(extract_domain);

    let raw_title = extracted_title
        .map(str::to_string)
        .or_else(|| TITLE_RE.captures(markup).map(|c| c[1].to_string()))
        .or_else(|| meta_property(markup, "og:title"));
    let title = raw_title.and_then(|t| clean_title(&t));

    let platform = Platform::sniff(markup);
    let (board_or_category, author_display) = match platform {
        Some(Platform::Ptt) => (ptt_board(markup), ptt_author(markup)),
        Some(Platform::Dcard) => (dcard_board(markup, lexicon), None),
        None => (None, None),
    };

    ExtractedMetadata {
        url,
        domain,
        platform,
        board_or_category,
        author_display,
        title,
    }
}

fn attrs(tag: &str) -> Vec<(String, &str)> {
    ATTR_RE
        .captures_iter(tag)
        .filter_map(|c| {
            let key = c.get(1)?.as_str().to_ascii_lowercase();
            Some((key, c.get(2)?.as_str()))
        })
        .collect()
}

fn attr<'a>(pairs: &[(String, &'a str)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
}

/// `content` of the first `<meta property=prop>`, whatever the attribute order.
pub fn meta_property(markup: &str, prop: &str) -> Option<String> {
    META_TAG_RE.find_iter(markup).find_map(|m| {
        let pairs = attrs(m.as_str());
        let matches = attr(&pairs, "property").is_some_and(|p| p.eq_ignore_ascii_case(prop));
        if !matches {
            return None;
        }
        attr(&pairs, "content")
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    })
}

pub fn canonical_href(markup: &str) -> Option<String> {
    LINK_TAG_RE.find_iter(markup).find_map(|m| {
        let pairs = attrs(m.as_str());
        let is_canonical = attr(&pairs, "rel").is_some_and(|r| r.eq_ignore_ascii_case("canonical"));
        if !is_canonical {
            return None;
        }
        attr(&pairs, "href")
            .filter(|h| !h.is_empty())
            .map(str::to_string)
    })
}

/// URL authority (`host[:port]`) exactly as written; `None` for relative or
/// host-less URLs. `Url` only validates; its host is normalized.
pub fn extract_domain(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = url::Url::parse(url).ok()?;
    parsed.host_str().filter(|h| !h.is_empty())?;

    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if authority.is_empty() {
        None
    } else {
        Some(authority.to_string())
    }
}

/// Strip the Dcard suffixes (only on Dcard titles) and trim.
pub fn clean_title(raw: &str) -> Option<String> {
    let title = if raw.contains(DCARD_TITLE_SUFFIX) {
        raw.replace(DCARD_TITLE_SUFFIX, "")
            .replace(DCARD_BOARD_SUFFIX, "")
    } else {
        raw.to_string()
    };
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn ptt_board(markup: &str) -> Option<String> {
    PTT_BOARD_RE.captures(markup).map(|c| c[1].to_string())
}

fn ptt_author(markup: &str) -> Option<String> {
    PTT_AUTHOR_RE
        .captures(markup)
        .map(|c| c[1].trim().to_string())
        .filter(|a| !a.is_empty())
}

/// Fixed ladder of known boards; anything else stays unknown.
fn dcard_board(markup: &str, lexicon: &Lexicon) -> Option<String> {
    if !markup.contains(DCARD_BOARD_MARKER) {
        return None;
    }
    lexicon
        .dcard_boards
        .iter()
        .find(|b| markup.contains(b.marker.as_str()))
        .map(|b| b.category.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn og_url_wins_over_canonical() {
        let html = r#"<link rel="canonical" href="https://www.dcard.tw/f/mood/p/1">
            <meta property="og:url" content="https://www.dcard.tw/f/mood/p/2">"#;
        let m = extract(html, None, &Lexicon::default());
        assert_eq!(m.url.as_deref(), Some("https://www.dcard.tw/f/mood/p/2"));
        assert_eq!(m.domain.as_deref(), Some("www.dcard.tw"));
    }

    #[test]
    fn attributes_in_any_order() {
        let html = r#"<META content='https://example.org:8080/a' PROPERTY='og:url'/>"#;
        assert_eq!(
            meta_property(html, "og:url").as_deref(),
            Some("https://example.org:8080/a")
        );
        let html = r#"<link href="https://x.test/p" rel="Canonical">"#;
        assert_eq!(canonical_href(html).as_deref(), Some("https://x.test/p"));
    }

    #[test]
    fn domain_keeps_explicit_port() {
        assert_eq!(extract_domain("https://example.org:8080/a").as_deref(), Some("example.org:8080"));
        assert_eq!(extract_domain("/relative/path"), None);
        assert_eq!(extract_domain("mailto:a@b.c"), None);
    }

    #[test]
    fn domain_is_authority_as_written() {
        assert_eq!(
            extract_domain("https://WWW.PTT.CC:443/bbs/x.html").as_deref(),
            Some("WWW.PTT.CC:443")
        );
        assert_eq!(extract_domain("https://論壇.台灣/p/1").as_deref(), Some("論壇.台灣"));
        assert_eq!(
            extract_domain("https://user:pw@example.org:8080/a?q=1#f").as_deref(),
            Some("example.org:8080")
        );
        assert_eq!(extract_domain("https://www.dcard.tw?x=1").as_deref(), Some("www.dcard.tw"));
    }

    #[test]
    fn missing_url_means_missing_domain() {
        let m = extract("<html><body>nothing</body></html>", None, &Lexicon::default());
        assert_eq!(m.url, None);
        assert_eq!(m.domain, None);
        assert_eq!(m.platform, None);
        assert_eq!(m.board_or_category, None);
        assert_eq!(m.author_display, None);
    }

    #[test]
    fn dcard_title_suffixes_are_stripped() {
        assert_eq!(clean_title("小測試 _ Dcard").as_deref(), Some("小測試"));
        assert_eq!(clean_title("好累 - 看板 心情 _ Dcard").as_deref(), Some("好累 心情"));
        // Only Dcard titles are touched.
        assert_eq!(clean_title("問題 - 看板").as_deref(), Some("問題 - 看板"));
        assert_eq!(clean_title("   "), None);
    }

    #[test]
    fn title_falls_back_to_regex_then_og_title() {
        let lex = Lexicon::default();
        let m = extract("<title>原始標題</title>", None, &lex);
        assert_eq!(m.title.as_deref(), Some("原始標題"));
        let m = extract(r#"<meta property="og:title" content="OG 標題">"#, None, &lex);
        assert_eq!(m.title.as_deref(), Some("OG 標題"));
        let m = extract("<title>原始標題</title>", Some("解析標題"), &lex);
        assert_eq!(m.title.as_deref(), Some("解析標題"));
    }

    #[test]
    fn ptt_fields_from_fixture() {
        let html = fixture("ptt_post");
        let m = extract(&html, None, &Lexicon::default());
        assert_eq!(m.platform, Some(Platform::Ptt));
        assert_eq!(m.board_or_category.as_deref(), Some("graduate"));
        assert_eq!(m.author_display.as_deref(), Some("nightowl (貓頭鷹)"));
        assert_eq!(m.domain.as_deref(), Some("www.ptt.cc"));
    }

    #[test]
    fn dcard_board_ladder_from_fixture() {
        let html = fixture("dcard_post");
        let m = extract(&html, None, &Lexicon::default());
        assert_eq!(m.platform, Some(Platform::Dcard));
        assert_eq!(m.board_or_category.as_deref(), Some("研究所"));
        assert_eq!(m.author_display, None);
    }

    #[test]
    fn dcard_unknown_board_is_none() {
        let html = "<title>閒聊 - 看板 閒聊板 _ Dcard</title>";
        let m = extract(html, None, &Lexicon::default());
        assert_eq!(m.platform, Some(Platform::Dcard));
        assert_eq!(m.board_or_category, None);
    }

    #[test]
    fn ptt_is_sniffed_before_dcard() {
        assert_eq!(Platform::sniff("PTT 與 Dcard"), Some(Platform::Ptt));
        assert_eq!(Platform::sniff("www.DCARD.tw"), Some(Platform::Dcard));
        assert_eq!(Platform::sniff("example.org"), None);
    }
}
