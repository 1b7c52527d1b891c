//! Site-specific naming for the decoding protocol.

use crate::consts;
use regex::Regex;

/// Describes how a particular site ships and uses its decoding scripts.
///
/// The defaults match the layout of the KissManga family of sites: two
/// fragments (`ca` and `lo`), a guest function `wrapKA(token)` that performs
/// the actual decoding, and a key-derivation snippet embedded in every
/// chapter page.
///
/// The host appends a little glue to the fetched fragments:
///
/// ```text
/// var <memo> = {};
/// function <trigger>(token) {
///     if (!(token in <memo>)) { <memo>[token] = <decoder>(token); }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Scheme {
    /// Names of the script fragments, in concatenation order.
    pub fragments: Vec<String>,
    /// Pattern locating the key-derivation expression in a page body. The
    /// first capture group is executed as guest code.
    pub key_pattern: Regex,
    /// Guest function that turns a token into its decoded value.
    pub decoder: String,
    /// Name of the host-glue function invoked once per token.
    pub trigger: String,
    /// Name of the guest global holding decoded values.
    pub memo: String,
}

impl Scheme {
    pub fn with_fragments(mut self, fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fragments = fragments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_key_pattern(mut self, key_pattern: Regex) -> Self {
        self.key_pattern = key_pattern;
        self
    }

    pub fn with_decoder(mut self, decoder: impl Into<String>) -> Self {
        self.decoder = decoder.into();
        self
    }

    /// Extract the key-derivation expression from a page body.
    pub fn key_expression<'a>(&self, page_body: &'a str) -> Option<&'a str> {
        self.key_pattern.captures(page_body).and_then(|captures| captures.get(1)).map(|m| m.as_str())
    }

    pub(crate) fn glue(&self) -> String {
        let Self {
            decoder,
            trigger,
            memo,
            ..
        } = self;
        format!(
            "var {memo} = {{}};\n\
             function {trigger}(token) {{ if (!(token in {memo})) {{ {memo}[token] = {decoder}(token); }} }}"
        )
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Self {
            fragments: vec!["ca".to_string(), "lo".to_string()],
            key_pattern: consts::DECRYPTION_KEY_REGEX.clone(),
            decoder: "wrapKA".to_string(),
            trigger: "calcHash".to_string(),
            memo: "document".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "<script type=\"text/javascript\">\n    var chko = \"abc\"; key = CryptoJS.SHA256(chko)\n</script>",
        Some("var chko = \"abc\"; key = CryptoJS.SHA256(chko)")
    )]
    #[case("<p>\nchko = _0x1[2] + chko; key = CryptoJS.SHA256(chko)</p>", Some("chko = _0x1[2] + chko; key = CryptoJS.SHA256(chko)"))]
    #[case("<p>no key here</p>", None)]
    #[case("key = CryptoJS.SHA256(chko)", None)]
    #[case("", None)]
    fn test_key_expression(#[case] page: &str, #[case] expected: Option<&str>) {
        assert_eq!(Scheme::default().key_expression(page), expected);
    }

    #[test]
    fn test_glue_mentions_every_name() {
        let glue = Scheme::default().with_decoder("decodeIt").glue();
        assert!(glue.contains("var document = {};"));
        assert!(glue.contains("function calcHash(token)"));
        assert!(glue.contains("document[token] = decodeIt(token);"));
    }
}
