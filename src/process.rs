use std::io::{Error, ErrorKind, Result};
use std::process::{Command, Stdio};

/// Splits a commandline into it's elements, handling strings and escaped
/// characters. Strings are delimited by either `'` or `"`, the character after
/// a `\` is taken literally.
pub fn split_commandline(commandline: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut elem = String::new();
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    for c in commandline.chars() {
        if escaped {
            escaped = false;
            elem.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
            }
            '"' | '\'' => match in_string {
                None => in_string = Some(c),
                Some(delim) if delim == c => in_string = None,
                Some(_) => elem.push(c),
            },
            ' ' | '\t' if in_string.is_none() => {
                if !elem.is_empty() {
                    result.push(std::mem::take(&mut elem));
                }
            }
            _ => {
                elem.push(c);
            }
        }
    }
    if !elem.is_empty() {
        result.push(elem);
    }
    result
}

/// Runs the command, waits for it to finish, and returns its standard output.
/// A non-zero exit status is reported as an error.
pub fn run_and_await_with_output(cmd: &[impl AsRef<str>]) -> Result<String> {
    let (program, args) = cmd
        .split_first()
        .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "empty command"))?;
    let output = Command::new(program.as_ref())
        .args(args.iter().map(|a| a.as_ref()))
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()?;
    if !output.status.success() {
        return Err(Error::new(
            ErrorKind::Other,
            format!("`{}` failed: {}", program.as_ref(), output.status),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_words() {
        assert_eq!(
            split_commandline("date  +%s"),
            vec!["date".to_string(), "+%s".to_string()]
        );
    }

    #[test]
    fn split_quoted_and_escaped() {
        assert_eq!(
            split_commandline(r#"sh -c 'echo "hi there"' a\ b"#),
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo \"hi there\"".to_string(),
                "a b".to_string(),
            ]
        );
    }

    #[test]
    fn run_reports_failure() {
        assert!(run_and_await_with_output(&["false"]).is_err());
        assert!(run_and_await_with_output(&[] as &[&str]).is_err());
    }

    #[test]
    fn run_captures_stdout() {
        let out = run_and_await_with_output(&["echo", "hello"]).unwrap();
        assert_eq!(out.trim(), "hello");
    }
}
