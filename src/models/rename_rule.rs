use anyhow::{Context, Result};
use fancy_regex::{Regex, RegexBuilder};

/// Pattern and replacement applied to whole file contents.
///
/// Patterns go through `fancy-regex` so rules may use look-around.
#[derive(Debug, Clone)]
pub struct RenameRule {
    pattern: Regex,
    replacement: String,
}

impl RenameRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        // Word boundaries count against the backtrack limit, so large files need it lifted
        let pattern = RegexBuilder::new(pattern)
            .backtrack_limit(usize::MAX)
            .build()
            .with_context(|| format!("Invalid rename pattern: {}", pattern))?;

        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match in `text`
    pub fn apply(&self, text: &str) -> Result<String> {
        let replaced = self
            .pattern
            .try_replacen(text, 0, self.replacement.as_str())
            .with_context(|| format!("Failed to apply pattern {}", self.pattern()))?;

        Ok(replaced.into_owned())
    }
}

/// `deviceId` becomes `id`, then every bare `id` becomes `idKey`.
/// Order matters: the second rule also sees what the first produced.
pub fn default_rules() -> Result<Vec<RenameRule>> {
    Ok(vec![
        RenameRule::new(r"\bdeviceId\b", "id")?,
        RenameRule::new(r"\bid\b(?!Key\b)", "idKey")?,
    ])
}

/// Run `rules` in order, each one over the output of the previous
pub fn apply_rules(text: &str, rules: &[RenameRule]) -> Result<String> {
    rules
        .iter()
        .try_fold(text.to_string(), |current, rule| rule.apply(&current))
}
