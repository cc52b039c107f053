use regex::Regex;

/// Pulls candidate values out of raw text.
///
/// Implementations return matches in document order. Scraping rules for the
/// docs page and its script bundle live behind this trait so they can change
/// without touching the resolver.
pub trait TextExtractor {
    fn extract(&self, text: &str) -> Vec<String>;
}

/// Extractor returning the first capture group of every regex match.
#[derive(Debug, Clone)]
pub struct RegexExtractor {
    pattern: Regex,
}

impl RegexExtractor {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// `<script src="...">` references to the versioned static bundle.
    pub fn script_sources() -> Self {
        Self {
            pattern: Regex::new(r#"src="((?:https?://[^"/]+)?/static/btprt/[^"]*\.js)""#)
                .expect("script source pattern is valid"),
        }
    }

    /// Non-empty `API_CLIENT_ID: '<value>'` assignments inside the bundle.
    pub fn client_id() -> Self {
        Self {
            pattern: Regex::new(r"API_CLIENT_ID:\s*'([^']+)'")
                .expect("client id pattern is valid"),
        }
    }
}

impl TextExtractor for RegexExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
