use wdbot_constraint::Fix;

/// Allowlist restricting which fixes may be applied.
///
/// Built from comma-separated tokens such as `P495,P449`. A fix passes when
/// any token is a case-sensitive substring of its summary. An empty filter
/// lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixFilter {
    tokens: Vec<String>,
}

impl FixFilter {
    pub fn parse(raw: &str) -> Self {
        Self {
            tokens: raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn allows(&self, fix: &Fix) -> bool {
        self.is_empty() || should_fix(fix, &self.tokens)
    }
}

/// True when any token occurs in the fix summary
pub fn should_fix(fix: &Fix, tokens: &[String]) -> bool {
    tokens.iter().any(|token| fix.summary().contains(token.as_str()))
}
