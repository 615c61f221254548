//! Line grammar — matches one `.fsf` line against the `set` statement form
//!
//! ```text
//! set <container>(<field>) <value>
//! ```
//!
//! Anything else (comments, blank lines, other Tcl commands) is not a
//! statement and is reported as `None`.

use once_cell::sync::Lazy;
use regex::Regex;

static STATEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^set (?P<container>[A-Za-z0-9_]+)",
        r"\((?P<field>[A-Za-z0-9_.]+)\) (?P<value>.*)$",
    ))
    .expect("statement pattern is valid")
});

/// One `set` statement, borrowed from the source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    pub container: &'a str,
    pub field: &'a str,
    pub value: &'a str,
}

/// Match a single line, returning the statement with its value unquoted
pub fn match_line(line: &str) -> Option<Statement<'_>> {
    let caps = STATEMENT_RE.captures(line)?;
    Some(Statement {
        container: caps.name("container")?.as_str(),
        field: caps.name("field")?.as_str(),
        value: strip_quotes(caps.name("value")?.as_str()),
    })
}

/// Strip one pair of enclosing double quotes.
///
/// A lone `"` is not a pair and is returned unchanged. Inner quotes are
/// left as written.
pub fn strip_quotes(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(line: &str) -> (&str, &str, &str) {
        let st = match_line(line).expect("line should match");
        (st.container, st.field, st.value)
    }

    #[test]
    fn test_match_simple_field() {
        assert_eq!(
            groups("set fmri(sscleanup_yn) 0"),
            ("fmri", "sscleanup_yn", "0")
        );
    }

    #[test]
    fn test_match_quoted_path() {
        assert_eq!(
            groups("set fmri(outputdir) \"/home/people/brettmz/replication/feat/group/balloon\""),
            (
                "fmri",
                "outputdir",
                "/home/people/brettmz/replication/feat/group/balloon"
            )
        );
    }

    #[test]
    fn test_match_positional_token() {
        assert_eq!(
            groups("set feat_files(4) \"/feat/1/balloon/sub-04_balloon.feat\""),
            ("feat_files", "4", "/feat/1/balloon/sub-04_balloon.feat")
        );
    }

    #[test]
    fn test_match_dotted_field() {
        assert_eq!(groups("set fmri(con_real1.2) 0"), ("fmri", "con_real1.2", "0"));
        assert_eq!(
            groups("set fmri(conname_real.1) \"Group mean\""),
            ("fmri", "conname_real.1", "Group mean")
        );
    }

    #[test]
    fn test_non_statements_ignored() {
        assert!(match_line("").is_none());
        assert!(match_line("# FEAT version number").is_none());
        assert!(match_line("set fmri(level)").is_none());
        assert!(match_line("  set fmri(level) 1").is_none());
        assert!(match_line("source ${FSLDIR}/etc/fslconf/feat.tcl").is_none());
        assert!(match_line("set fmri(a-b) 1").is_none());
    }

    #[test]
    fn test_value_not_trimmed() {
        assert_eq!(groups("set fmri(x)  padded ").2, " padded ");
        assert_eq!(groups("set fmri(x) ").2, "");
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"abc\""), "abc");
        assert_eq!(strip_quotes("\"\""), "");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("\"a\"b\""), "a\"b");
        assert_eq!(strip_quotes("\"abc"), "\"abc");
        assert_eq!(strip_quotes("abc"), "abc");
    }
}
