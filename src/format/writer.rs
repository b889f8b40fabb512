//! Line writer with tab-stop aware column tracking

use super::config::FormatConfig;

/// Builds one output line and tracks its visual width with tabs expanded
pub struct LineWriter<'c> {
    output: String,
    /// 0-based visual column of the next character
    column: usize,
    config: &'c FormatConfig,
}

impl<'c> LineWriter<'c> {
    pub fn new(config: &'c FormatConfig) -> Self {
        Self {
            output: String::new(),
            column: 0,
            config,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Write text that contains no newlines
    pub fn write(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\t' {
                self.column = self.next_tab_stop();
            } else {
                self.column += 1;
            }
        }
        self.output.push_str(s);
    }

    pub fn tab(&mut self) {
        self.write("\t");
    }

    /// Tab forward until the 0-based `target` column is reached, always emitting at least one tab
    pub fn tab_to(&mut self, target: usize) {
        self.tab();
        while self.column < target {
            self.tab();
        }
    }

    fn next_tab_stop(&self) -> usize {
        let size = self.config.tab_size;
        (self.column / size + 1) * size
    }
}
