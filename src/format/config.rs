//! Formatting configuration for Blitz assembly
//!
//! Layout is tab-based: code is indented one tab, and trailing `!` comments start at a fixed column reached with
//! tab stops.

/// Formatting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// 1-based column at which trailing comments start
    pub comment_column: usize,
    /// Width of a tab stop
    pub tab_size: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            comment_column: 49,
            tab_size: 8,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column trailing comments are aligned to
    pub fn with_comment_column(mut self, column: usize) -> Self {
        self.comment_column = column.max(1);
        self
    }

    /// Set the tab stop width
    pub fn with_tab_size(mut self, size: usize) -> Self {
        self.tab_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormatConfig::default();
        assert_eq!(config.comment_column, 49);
        assert_eq!(config.tab_size, 8);
        assert_eq!(FormatConfig::new(), config);
    }

    #[test]
    fn test_builders_leave_other_fields_alone() {
        let config = FormatConfig::new().with_comment_column(41);
        assert_eq!(config.comment_column, 41);
        assert_eq!(config.tab_size, 8);

        let config = FormatConfig::new().with_tab_size(4);
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.comment_column, 49);
    }

    #[test]
    fn test_zero_is_clamped() {
        let config = FormatConfig::new().with_tab_size(0).with_comment_column(0);
        assert_eq!(config.tab_size, 1);
        assert_eq!(config.comment_column, 1);
    }
}
