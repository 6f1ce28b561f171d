//! Response sanitizer
//!
//! Deterministic post-processing of generated text before persistence.
//! The model is instructed not to emit bold markers or emoji, but the
//! instruction is not trusted: both are stripped here again.

/// Pictographic/emoji code point ranges removed from generated text.
/// An explicit allow-list of ranges, not an emoji library.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F300, 0x1F9FF), // symbols & pictographs through supplemental
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2700, 0x27BF),   // dingbats
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport & map symbols
    (0x1F1E0, 0x1F1FF), // regional indicators (flags)
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x1FA00, 0x1FA6F), // chess symbols, extended-A lead-in
    (0x1FA70, 0x1FAFF), // symbols & pictographs extended-A
];

fn is_disallowed_symbol(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Remove every doubled-asterisk emphasis marker and every code point in
/// the disallowed emoji ranges. Total and idempotent: both removals are
/// exact deletions that never reintroduce removable content.
pub fn sanitize(text: &str) -> String {
    text.replace("**", "")
        .chars()
        .filter(|c| !is_disallowed_symbol(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_all_double_asterisks() {
        let input = "**重點**：本期 ROAS **顯著**提升";
        let output = sanitize(input);
        assert!(!output.contains("**"));
        assert_eq!(output, "重點：本期 ROAS 顯著提升");
    }

    #[test]
    fn test_single_asterisk_preserved() {
        assert_eq!(sanitize("a * b"), "a * b");
    }

    #[test]
    fn test_removes_emoji_in_all_ranges() {
        let input = "📊 成效 🚀 提升 ✅ 完成 😀 🇹🇼 🤖 🩷";
        let output = sanitize(input);
        for c in output.chars() {
            assert!(!is_disallowed_symbol(c), "leftover symbol: {:?}", c);
        }
        assert!(output.contains("成效"));
        assert!(output.contains("提升"));
    }

    #[test]
    fn test_preserves_cjk_and_markdown_tables() {
        let input = "| 指標 | 數值 |\n|------|------|\n| CTR | 2.4% |";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "**bold** 📊 text",
            "plain text",
            "******",
            "emoji 🎯 only",
            "",
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "sanitize not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_odd_asterisk_runs() {
        // "***" = one "**" removed, one "*" left
        assert_eq!(sanitize("***x"), "*x");
        assert_eq!(sanitize(&sanitize("***x")), "*x");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
    }
}
