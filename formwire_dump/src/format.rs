use std::fmt::{self, Write};

use formwire::Value;

/// Displays a value as an indented tree.
pub struct Tree<'a>(pub &'a Value);

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_value(f, self.0, 0)
    }
}

/// Formats a value with the given indentation level.
fn format_value(output: &mut impl Write, value: &Value, indent: usize) -> fmt::Result {
    let indent_str = "  ".repeat(indent);

    match value {
        Value::Scalar(s) => format_string_literal(output, s),

        Value::List(elements) => {
            if elements.is_empty() {
                return output.write_str("[]");
            }
            output.write_str("[\n")?;
            for elem in elements {
                write!(output, "{indent_str}  ")?;
                format_value(output, elem, indent + 1)?;
                output.write_str(",\n")?;
            }
            write!(output, "{indent_str}]")
        }

        Value::Object(fields) => {
            if fields.is_empty() {
                return output.write_str("{}");
            }
            output.write_str("{\n")?;
            for (name, field_value) in fields {
                write!(output, "{indent_str}  ")?;
                format_field_name(output, name)?;
                output.write_str(": ")?;
                format_value(output, field_value, indent + 1)?;
                output.write_str(",\n")?;
            }
            write!(output, "{indent_str}}}")
        }
    }
}

/// Field names are written bare unless they need quoting.
fn format_field_name(output: &mut impl Write, name: &str) -> fmt::Result {
    let bare = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        output.write_str(name)
    } else {
        format_string_literal(output, name)
    }
}

/// Formats a string as a quoted literal with escapes.
fn format_string_literal(output: &mut impl Write, s: &str) -> fmt::Result {
    output.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => output.write_str("\\\"")?,
            '\\' => output.write_str("\\\\")?,
            '\n' => output.write_str("\\n")?,
            '\r' => output.write_str("\\r")?,
            '\t' => output.write_str("\\t")?,
            c if c.is_ascii_control() => write!(output, "\\x{:02x}", c as u32)?,
            c => output.write_char(c)?,
        }
    }
    output.write_char('"')
}

#[cfg(test)]
mod tests {
    use formwire::Value;

    use super::Tree;

    #[test]
    fn test_format_scalar() {
        assert_eq!(Tree(&Value::from("Hello")).to_string(), "\"Hello\"");
        assert_eq!(
            Tree(&Value::from("Hello\r\nWorld\u{7}")).to_string(),
            "\"Hello\\r\\nWorld\\x07\""
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(Tree(&Value::object()).to_string(), "{}");
        assert_eq!(Tree(&Value::List(vec![])).to_string(), "[]");
    }

    #[test]
    fn test_format_list() {
        let list = Value::from(vec!["red", "blue"]);
        assert_eq!(Tree(&list).to_string(), "[\n  \"red\",\n  \"blue\",\n]");
    }

    #[test]
    fn test_format_field_names() {
        let value = Value::from_iter([("due-date", "x"), ("first name", "y")]);
        assert_eq!(
            Tree(&value).to_string(),
            "{\n  due-date: \"x\",\n  \"first name\": \"y\",\n}"
        );
    }
}
