//! Visible-text extraction for server-rendered HTML receipts.
//!
//! Some providers answer a plain HTTPS request with a server-rendered
//! receipt page. The payload is treated as a rendered page: scripts,
//! styles and tags are stripped, entities decoded, and the remainder
//! normalized like every other extraction origin.

use lazy_static::lazy_static;
use regex::Regex;

use super::RawText;

lazy_static! {
    static ref SCRIPT: Regex = Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    static ref STYLE: Regex = Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref BLOCK_END: Regex =
        Regex::new(r"(?i)</(?:p|div|tr|td|th|li|h[1-6]|table|section)>|<br\s*/?>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Strip an HTML document down to its visible text.
pub fn visible_text(html: &str) -> RawText {
    let text = SCRIPT.replace_all(html, "");
    let text = STYLE.replace_all(&text, "");
    let text = COMMENT.replace_all(&text, "");
    // Block-level closers become separators so adjacent cells don't fuse.
    let text = BLOCK_END.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    RawText::from_text(&text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_scripts_and_tags() {
        let html = r#"
            <html><head><title>Receipt</title><script>var x = 1;</script>
            <style>body { color: red; }</style></head>
            <body><table>
              <tr><td>Settled Amount</td><td>1,000.00 Birr</td></tr>
              <tr><td>Receipt No</td><td>CEH2LB03XH</td></tr>
            </table></body></html>
        "#;
        let text = visible_text(html);
        assert!(text.as_str().contains("Settled Amount 1,000.00 Birr"));
        assert!(text.as_str().contains("Receipt No CEH2LB03XH"));
        assert!(!text.as_str().contains("var x"));
        assert!(!text.as_str().contains("color"));
    }

    #[test]
    fn decodes_entities_and_keeps_separation() {
        let text = visible_text("<p>Payment Date &amp; Time</p><p>6/21/2024</p>");
        assert_eq!(text.as_str(), "Payment Date & Time 6/21/2024");
    }

    #[test]
    fn bilingual_labels_survive() {
        let text = visible_text("<td>የከፋይ ስም/Payer Name</td><td>Abebe Kebede</td>");
        assert_eq!(text.as_str(), "የከፋይ ስም/Payer Name Abebe Kebede");
    }
}
