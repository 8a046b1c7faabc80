//! Settings that control which calls the pass treats as definitions

/// Keywords recognised when none are configured
pub const DEFAULT_KEYWORDS: &[&str] = &["process"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesugarSettings {
    keywords: Vec<String>,
}

impl Default for DesugarSettings {
    fn default() -> Self {
        DesugarSettings {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl DesugarSettings {
    /// Settings recognising exactly the keywords given
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        DesugarSettings {
            keywords: keywords.into_iter().map(|k| k.as_ref().to_string()).collect(),
        }
    }

    /// Add keywords to those already recognised
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for k in keywords {
            let k = k.as_ref().to_string();
            if !self.keywords.contains(&k) {
                self.keywords.push(k);
            }
        }
        self
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if a call to `method` (without receiver) is a definition
    pub fn is_definition_keyword(&self, method: &str) -> bool {
        self.keywords.iter().any(|k| k == method)
    }
}
