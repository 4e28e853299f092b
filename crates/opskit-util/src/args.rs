//! Argument string helpers.

/// Split a comma-delimited argument string.
///
/// Empty or absent input yields no items. Items are not trimmed, so
/// adjacent or trailing commas produce empty strings.
pub fn split_arg_string<'a>(arg_string: impl Into<Option<&'a str>>) -> Vec<String> {
    match arg_string.into() {
        None | Some("") => Vec::new(),
        Some(s) => s.split(',').map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_empty() {
        assert!(split_arg_string("").is_empty());
        assert!(split_arg_string(None).is_empty());
    }

    #[test]
    fn test_split_single() {
        assert_eq!(split_arg_string("amd64"), vec!["amd64"]);
        assert_eq!(split_arg_string(" spaced "), vec![" spaced "]);
    }

    #[test]
    fn test_split_multiple() {
        assert_eq!(
            split_arg_string("amd64,arm64,s390x"),
            vec!["amd64", "arm64", "s390x"]
        );
    }

    #[test]
    fn test_split_keeps_empty_items() {
        assert_eq!(split_arg_string("a,b,"), vec!["a", "b", ""]);
        assert_eq!(split_arg_string(",,"), vec!["", "", ""]);
        assert_eq!(split_arg_string("a, b"), vec!["a", " b"]);
    }

    #[test]
    fn test_split_owned_string() {
        let arg = String::from("x,y");
        assert_eq!(split_arg_string(arg.as_str()), vec!["x", "y"]);
        assert_eq!(split_arg_string(Some("z")), vec!["z"]);
    }
}
