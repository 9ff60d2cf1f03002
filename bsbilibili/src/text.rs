//! Normalisation des champs texte renvoyés par Bilibili.

use regex::Regex;
use std::sync::LazyLock;

const BV_PREFIX: &str = "BV";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Motif constant
    Regex::new(r"<[^>]*>").expect("valid tag regex")
});

/// Retire toutes les balises `<...>` d'un titre (les entités ne sont pas décodées)
///
/// La recherche entoure les mots trouvés de `<em class="keyword">`.
pub fn strip_markup(title: &str) -> String {
    TAG_RE.replace_all(title, "").into_owned()
}

/// Identifiant interne : le code BV sans son préfixe
pub fn strip_bv_prefix(bvid: &str) -> &str {
    bvid.strip_prefix(BV_PREFIX).unwrap_or(bvid)
}

/// Code BV public, que l'entrée porte déjà le préfixe ou non
pub fn to_bvid(id: &str) -> String {
    if id.starts_with(BV_PREFIX) {
        id.to_string()
    } else {
        format!("{BV_PREFIX}{id}")
    }
}

/// Rend une URL de pochette relative au protocole (`//host/path`)
pub fn protocol_relative(url: &str) -> String {
    for scheme in ["https:", "http:"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            if rest.starts_with("//") {
                return rest.to_string();
            }
        }
    }
    url.to_string()
}

/// Durée textuelle `m:ss` ou `h:mm:ss` en secondes
///
/// `None` si le texte est illisible ou si la durée dépasse `u32`.
pub fn parse_clock_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let parts = text
        .split(':')
        .map(|p| p.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [s] => Some(*s),
        [m, s] if *s < 60 => m.checked_mul(60)?.checked_add(*s),
        [h, m, s] if *m < 60 && *s < 60 => h
            .checked_mul(3600)?
            .checked_add(m * 60 + s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>Song</b>"), "Song");
        assert_eq!(
            strip_markup(r#"Live <em class="keyword">test</em> &amp; more"#),
            "Live test &amp; more"
        );
        assert_eq!(strip_markup("plain"), "plain");
    }

    #[test]
    fn test_bv_prefix_round_trip() {
        assert_eq!(strip_bv_prefix("BVabc123"), "abc123");
        assert_eq!(strip_bv_prefix("abc123"), "abc123");
        assert_eq!(to_bvid("abc123"), "BVabc123");
        assert_eq!(to_bvid("BVabc123"), "BVabc123");
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(protocol_relative("//img/x.jpg"), "//img/x.jpg");
        assert_eq!(protocol_relative("http://img/x.jpg"), "//img/x.jpg");
        assert_eq!(protocol_relative("https://img/x.jpg"), "//img/x.jpg");
        assert_eq!(protocol_relative("img/x.jpg"), "img/x.jpg");
    }

    #[test]
    fn test_parse_clock_duration() {
        assert_eq!(parse_clock_duration("3:25"), Some(205));
        assert_eq!(parse_clock_duration("1:02:03"), Some(3723));
        assert_eq!(parse_clock_duration("42"), Some(42));
        assert_eq!(parse_clock_duration(""), None);
        assert_eq!(parse_clock_duration("3:75"), None);
        assert_eq!(parse_clock_duration("abc"), None);
    }

    #[test]
    fn test_parse_clock_duration_overflow() {
        assert_eq!(parse_clock_duration("99999999:00"), None);
        assert_eq!(parse_clock_duration("2000000:00:00"), None);
        assert_eq!(parse_clock_duration("1193046:28:15"), Some(u32::MAX));
    }
}
