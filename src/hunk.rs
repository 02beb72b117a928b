//! Hunk data structures shared by [`crate::diff`].

/// A line within a hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkLine {
    /// A context line (unchanged).
    Context(String),
    /// A line to be added.
    Add(String),
    /// A line to be removed.
    Remove(String),
}

impl HunkLine {
    /// Get the content of this line.
    pub fn content(&self) -> &str {
        match self {
            Self::Context(s) | Self::Add(s) | Self::Remove(s) => s,
        }
    }

    /// Check if this is a context line.
    pub fn is_context(&self) -> bool {
        matches!(self, Self::Context(_))
    }

    /// Check if this is an add line.
    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add(_))
    }

    /// Check if this is a remove line.
    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove(_))
    }

    /// Get the line for matching purposes (context or remove lines).
    pub fn match_content(&self) -> Option<&str> {
        match self {
            Self::Context(s) | Self::Remove(s) => Some(s),
            Self::Add(_) => None,
        }
    }
}

/// A hunk represents a contiguous block of changes.
#[derive(Debug, Clone)]
pub struct Hunk {
    /// Starting line number in the original file (1-indexed).
    pub old_start: usize,
    /// Number of lines in the original file this hunk spans.
    pub old_count: usize,
    /// Starting line number in the new file (1-indexed).
    pub new_start: usize,
    /// Number of lines in the new file this hunk spans.
    pub new_count: usize,
    /// Optional section header (function name, etc.).
    pub section_header: Option<String>,
    /// The lines in this hunk.
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Create a new hunk.
    pub fn new(old_start: usize, old_count: usize, new_start: usize, new_count: usize) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            section_header: None,
            lines: Vec::new(),
        }
    }

    /// Add a line to this hunk.
    pub fn add_line(&mut self, line: HunkLine) {
        self.lines.push(line);
    }

    /// Get the lines that should be matched against the original file.
    pub fn match_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.match_content())
            .collect()
    }

    /// Get the lines that will appear in the new file.
    pub fn result_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                HunkLine::Context(s) | HunkLine::Add(s) => Some(s.as_str()),
                HunkLine::Remove(_) => None,
            })
            .collect()
    }

    /// Calculate the number of lines added by this hunk.
    pub fn lines_added(&self) -> usize {
        self.lines.iter().filter(|l| l.is_add()).count()
    }

    /// Calculate the number of lines removed by this hunk.
    pub fn lines_removed(&self) -> usize {
        self.lines.iter().filter(|l| l.is_remove()).count()
    }

    /// Calculate the net change in line count.
    pub fn line_delta(&self) -> isize {
        self.lines_added() as isize - self.lines_removed() as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hunk_line_content() {
        let ctx = HunkLine::Context("hello".to_string());
        let add = HunkLine::Add("world".to_string());
        let rem = HunkLine::Remove("foo".to_string());

        assert_eq!(ctx.content(), "hello");
        assert_eq!(add.content(), "world");
        assert_eq!(rem.content(), "foo");
    }

    #[test]
    fn test_hunk_match_lines() {
        let mut hunk = Hunk::new(1, 3, 1, 4);
        hunk.add_line(HunkLine::Context("line 1".to_string()));
        hunk.add_line(HunkLine::Remove("old line".to_string()));
        hunk.add_line(HunkLine::Add("new line".to_string()));
        hunk.add_line(HunkLine::Context("line 3".to_string()));

        let match_lines = hunk.match_lines();
        assert_eq!(match_lines, vec!["line 1", "old line", "line 3"]);
    }

    #[test]
    fn test_hunk_result_lines() {
        let mut hunk = Hunk::new(1, 3, 1, 4);
        hunk.add_line(HunkLine::Context("line 1".to_string()));
        hunk.add_line(HunkLine::Remove("old line".to_string()));
        hunk.add_line(HunkLine::Add("new line".to_string()));
        hunk.add_line(HunkLine::Context("line 3".to_string()));

        let result_lines = hunk.result_lines();
        assert_eq!(result_lines, vec!["line 1", "new line", "line 3"]);
    }

    #[test]
    fn test_hunk_line_delta() {
        let mut hunk = Hunk::new(1, 3, 1, 4);
        hunk.add_line(HunkLine::Context("line 1".to_string()));
        hunk.add_line(HunkLine::Add("new 1".to_string()));
        hunk.add_line(HunkLine::Add("new 2".to_string()));
        hunk.add_line(HunkLine::Remove("old".to_string()));
        hunk.add_line(HunkLine::Context("line 3".to_string()));

        assert_eq!(hunk.lines_added(), 2);
        assert_eq!(hunk.lines_removed(), 1);
        assert_eq!(hunk.line_delta(), 1);
    }
}
