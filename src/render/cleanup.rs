//! Text cleanup pass applied after flattening.

use unicode_normalization::UnicodeNormalization;

/// Options for text cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Strip trailing whitespace from each line
    pub trim_line_ends: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            trim_line_ends: true,
            max_consecutive_newlines: 0,
        }
    }
}

/// Applies the configured cleanup steps in order.
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a pipeline from options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Process text through the pipeline.
    pub fn process(&self, input: &str) -> String {
        let mut result = input.to_string();

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.trim_line_ends {
            result = result
                .lines()
                .map(|line| line.trim_end())
                .collect::<Vec<_>>()
                .join("\n");
        }

        if self.options.max_consecutive_newlines > 0 {
            result = limit_newlines(&result, self.options.max_consecutive_newlines as usize);
        }

        result
    }
}

fn limit_newlines(input: &str, max: usize) -> String {
    let mut out = String::with_capacity(input.len());
    let mut run = 0usize;
    for ch in input.chars() {
        if ch == '\n' {
            run += 1;
            if run <= max {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfc_normalization() {
        // Decomposed Hangul syllable: ᄒ + ᅡ + ᆫ -> 한
        let decomposed = "\u{1112}\u{1161}\u{11AB}";
        let pipeline = CleanupPipeline::new(CleanupOptions::default());
        assert_eq!(pipeline.process(decomposed), "한");
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let pipeline = CleanupPipeline::new(CleanupOptions::default());
        assert_eq!(pipeline.process("a  \nb\t\nc"), "a\nb\nc");
    }

    #[test]
    fn test_newline_limit() {
        let options = CleanupOptions {
            max_consecutive_newlines: 2,
            ..Default::default()
        };
        let pipeline = CleanupPipeline::new(options);
        assert_eq!(pipeline.process("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_process_is_idempotent() {
        let pipeline = CleanupPipeline::new(CleanupOptions::default());
        let once = pipeline.process("한  글\n\n\ntext   ");
        let twice = pipeline.process(&once);
        assert_eq!(once, twice);
    }
}
