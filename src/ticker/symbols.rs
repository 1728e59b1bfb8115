//! Ticker symbol validation and extraction from free text

use once_cell::sync::Lazy;
use regex::Regex;

/// 1-5 uppercase letters with an optional share-class suffix (`BRK.B`)
static TICKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{1,5}(\.[A-Z]{1,2})?$").expect("valid ticker regex"));

/// Model answers meaning "no ticker"
const NO_TICKER_ANSWERS: [&str; 4] = ["null", "none", "n/a", "unknown"];

/// Uppercase words that show up in answers but are never the ticker itself
///
/// Market names plus the legal-form suffixes of company names.
const MARKET_WORDS: [&str; 28] = [
    "US", "USA", "UK", "EU", "NYSE", "OTC", "OTCQX", "OTCQB", "ADR", "LSE", "TSX", "ETF", "PLC",
    "INC", "AG", "SA", "NV", "SE", "LTD", "LLC", "CORP", "CO", "GMBH", "SPA", "BV", "AB", "ASA",
    "KK",
];

/// Checks whether a string is a plausible exchange ticker
pub fn is_valid_ticker(ticker: &str) -> bool {
    TICKER_RE.is_match(ticker)
}

/// Pulls a ticker out of a model answer
///
/// A bare ticker is returned as-is. In a sentence such as "The ticker for ABB
/// Group in the US OTC market is ABBNY." the last ticker-shaped word of two or
/// more letters wins, since the answer usually ends with it.
pub fn extract_ticker(answer: &str) -> Option<String> {
    let trimmed = strip_punctuation(answer.trim());
    if trimmed.is_empty() || NO_TICKER_ANSWERS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }
    if is_valid_ticker(trimmed) {
        return Some(trimmed.to_string());
    }

    answer
        .split_whitespace()
        .rev()
        .map(strip_punctuation)
        .find(|word| {
            word.len() >= 2
                && !MARKET_WORDS.contains(word)
                && !NO_TICKER_ANSWERS.contains(&word.to_lowercase().as_str())
                && is_valid_ticker(word)
        })
        .map(str::to_string)
}

fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ticker_valid_cases() {
        for ticker in ["AAPL", "GOOGL", "ABBNY", "ADDYY", "EADSY", "BAESY", "A", "ABCDE", "BRK.B"] {
            assert!(is_valid_ticker(ticker), "Ticker {} should be valid", ticker);
        }
    }

    #[test]
    fn test_is_valid_ticker_invalid_cases() {
        for ticker in ["", "123ABC", "ABCDEFGHIJK", "abc", "AB-CD", "AB CD", "ABCDEF"] {
            assert!(!is_valid_ticker(ticker), "Ticker {} should be invalid", ticker);
        }
    }

    #[test]
    fn test_extract_bare_ticker() {
        assert_eq!(extract_ticker("AAPL"), Some("AAPL".to_string()));
        assert_eq!(extract_ticker("  MSFT.\n"), Some("MSFT".to_string()));
    }

    #[test]
    fn test_extract_null_answers() {
        assert_eq!(extract_ticker("null"), None);
        assert_eq!(extract_ticker("NULL"), None);
        assert_eq!(extract_ticker("None."), None);
        assert_eq!(extract_ticker(""), None);
    }

    #[test]
    fn test_extract_from_sentence() {
        let answer = "The stock ticker symbol for ABB Group in the US OTC market is ABBNY.";
        assert_eq!(extract_ticker(answer), Some("ABBNY".to_string()));
    }

    #[test]
    fn test_extract_skips_market_words() {
        let answer = "Allianz trades as ALIZF on the US OTC market.";
        assert_eq!(extract_ticker(answer), Some("ALIZF".to_string()));
    }

    #[test]
    fn test_extract_ignores_no_ticker_words_in_sentence() {
        assert_eq!(extract_ticker("This company is not publicly traded. NULL"), None);
        assert_eq!(extract_ticker("Answer: NONE"), None);
        assert_eq!(extract_ticker("Ticker: NONE."), None);
    }

    #[test]
    fn test_extract_skips_legal_form_suffixes() {
        assert_eq!(extract_ticker("Siemens AG is a private company."), None);
        assert_eq!(extract_ticker("Airbus SE trades OTC as EADSY."), Some("EADSY".to_string()));
        for answer in ["Heineken NV", "Carrefour SA", "Acme LLC", "Example LTD"] {
            assert_eq!(extract_ticker(answer), None, "{}", answer);
        }
    }

    #[test]
    fn test_extract_rejects_invalid_format() {
        assert_eq!(extract_ticker("123INVALID"), None);
        assert_eq!(extract_ticker("this company is private"), None);
    }
}
