//! In-process equivalents of `grep <marker>` and `awk '{print $N}'`.
//!
//! Field indices are zero-based throughout; awk's `$2` is index 1.

/// Lines of `text` containing `marker` as a literal substring, in order
pub fn matching_lines<'a>(text: &'a str, marker: &'a str) -> impl Iterator<Item = &'a str> {
    text.lines().filter(move |line| line.contains(marker))
}

/// Whitespace-separated field `index` of `line`
pub fn nth_field(line: &str, index: usize) -> Option<&str> {
    line.split_whitespace().nth(index)
}

/// Same output as `grep marker | awk '{print $N}'`: one line per match,
/// empty when the matching line is too short.
pub fn select_field(text: &str, marker: &str, index: usize) -> String {
    let mut output = String::new();
    for line in matching_lines(text, marker) {
        output.push_str(nth_field(line, index).unwrap_or(""));
        output.push('\n');
    }
    output
}

/// awk program printing field `index`
pub fn awk_print_program(index: usize) -> String {
    format!("{{print ${}}}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVN_INFO: &str = "\
Path: .
Working Copy Root Path: /home/build/imagevis3d
URL: https://gforge.sci.utah.edu/svn/imagevis3d/trunk
Repository Root: https://gforge.sci.utah.edu/svn/imagevis3d
Revision: 1234
Node Kind: directory
Schedule: normal
Last Changed Author: jens
Last Changed Rev: 1230
";

    #[test]
    fn test_matching_lines() {
        let lines: Vec<_> = matching_lines(SVN_INFO, "Revision").collect();
        assert_eq!(lines, vec!["Revision: 1234"]);

        let lines: Vec<_> = matching_lines(SVN_INFO, "Last Changed").collect();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_nth_field() {
        let line = "#define IV3D_MAJOR 2 // major version";
        assert_eq!(nth_field(line, 0), Some("#define"));
        assert_eq!(nth_field(line, 2), Some("2"));
        assert_eq!(nth_field("#define\tIV3D_PATCH \t 0", 2), Some("0"));
        assert_eq!(nth_field("#define LONELY", 2), None);
        assert_eq!(nth_field("", 0), None);
    }

    #[test]
    fn test_select_field_revision() {
        assert_eq!(select_field(SVN_INFO, "Revision", 1), "1234\n");
    }

    #[test]
    fn test_select_field_every_match() {
        let text = "Revision: 10\nnoise\nRevision\nOld Revision: 9\n";
        assert_eq!(select_field(text, "Revision", 1), "10\n\nRevision:\n");
    }

    #[test]
    fn test_select_field_no_match() {
        assert_eq!(select_field("svn: E155007: not a working copy\n", "Revision", 1), "");
        assert_eq!(select_field("", "Revision", 1), "");
    }

    #[test]
    fn test_select_field_crlf() {
        assert_eq!(select_field("Revision: 77\r\n", "Revision", 1), "77\n");
    }

    #[test]
    fn test_awk_print_program() {
        assert_eq!(awk_print_program(1), "{print $2}");
        assert_eq!(awk_print_program(0), "{print $1}");
    }
}
