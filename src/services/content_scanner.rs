//! 内容特征扫描 - 业务能力层
//!
//! 对原始文本做正则匹配，同时识别直接写出的标签和转义后的 HTML（`&lt;img`）

use crate::models::ContentFlags;
use regex::Regex;
use std::sync::LazyLock;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:<|&lt;)(?:img|matimage)\b").expect("invalid image pattern"));

static AUDIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<|&lt;)(?:audio|mataudio)\b|\.(?:mp3|wav|ogg|m4a)\b").expect("invalid audio pattern")
});

static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<|&lt;)(?:video|matvideo)\b|\.(?:mp4|webm|mov)\b|youtube\.com|youtu\.be|vimeo\.com")
        .expect("invalid video pattern")
});

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*(?:"|'|&quot;|&#39;)?\s*https?://"#).expect("invalid link pattern")
});

static MATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<|&lt;)(?:m:)?math\b|\\\(|\\\[|\$\$|equation_image").expect("invalid math pattern")
});

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:<|&lt;)table\b").expect("invalid table pattern"));

static FORMATTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<|&lt;)(?:b|strong|i|em|u|p|span|ul|ol|h[1-6])\b").expect("invalid formatting pattern")
});

/// 扫描内容特征
pub fn scan_content(raw: &str) -> ContentFlags {
    ContentFlags {
        has_images: IMAGE_RE.is_match(raw),
        has_audio: AUDIO_RE.is_match(raw),
        has_video: VIDEO_RE.is_match(raw),
        has_external_links: LINK_RE.is_match(raw),
        has_math: MATH_RE.is_match(raw),
        has_tables: TABLE_RE.is_match(raw),
        has_formatted_text: FORMATTED_RE.is_match(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_qti_has_no_flags() {
        let flags = scan_content(
            r#"<assessmentItem xmlns="http://www.imsglobal.org/xsd/imsqti_v2p1"><itemBody><choiceInteraction/></itemBody></assessmentItem>"#,
        );
        assert_eq!(flags, ContentFlags::default());
    }

    #[test]
    fn test_escaped_html_in_mattext() {
        let flags = scan_content(
            r#"<mattext texttype="text/html">&lt;p&gt;See &lt;a href=&quot;https://example.com&quot;&gt;this&lt;/a&gt; &lt;img src="x.png"&gt;&lt;/p&gt;</mattext>"#,
        );
        assert!(flags.has_formatted_text);
        assert!(flags.has_external_links);
        assert!(flags.has_images);
        assert!(!flags.has_tables);
    }

    #[test]
    fn test_media_math_tables() {
        let flags = scan_content(
            r#"<itemBody><audio src="a.mp3"/><object data="clip.mp4"/><math xmlns="http://www.w3.org/1998/Math/MathML"/><table/></itemBody>"#,
        );
        assert!(flags.has_audio);
        assert!(flags.has_video);
        assert!(flags.has_math);
        assert!(flags.has_tables);
    }

    #[test]
    fn test_relative_href_is_not_external() {
        let flags = scan_content(r#"<assessmentItemRef identifier="r1" href="items/r1.xml"/>"#);
        assert!(!flags.has_external_links);
    }

    #[test]
    fn test_latex_delimiters() {
        assert!(scan_content(r"<mattext>\(x^2\)</mattext>").has_math);
        assert!(scan_content("<mattext>$$x^2$$</mattext>").has_math);
    }

    #[test]
    fn test_element_prefix_words_do_not_match() {
        let flags = scan_content("<item><presentation><itemBody/></presentation></item>");
        assert!(!flags.has_formatted_text);
        assert!(!flags.has_images);
    }
}
