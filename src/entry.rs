use url::form_urlencoded;

/// One `(name, value)` pair of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub name: String,
    pub value: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Entry {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Entry {
    fn from((name, value): (N, V)) -> Self {
        Entry::new(name, value)
    }
}

/// Splits an `application/x-www-form-urlencoded` body into entries, keeping
/// their order.
pub fn parse_urlencoded(body: &[u8]) -> Vec<Entry> {
    form_urlencoded::parse(body)
        .map(|(name, value)| Entry::new(name, value))
        .collect()
}

/// Serializes entries as an `application/x-www-form-urlencoded` string.
pub fn to_urlencoded<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for entry in entries {
        serializer.append_pair(&entry.name, &entry.value);
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::{Entry, parse_urlencoded, to_urlencoded};

    #[test]
    fn test_parse_urlencoded() {
        let entries = parse_urlencoded(b"todo%5B0%5D.content=Buy+milk&tag=red&tag=blue&empty=");
        assert_eq!(
            entries,
            vec![
                Entry::new("todo[0].content", "Buy milk"),
                Entry::new("tag", "red"),
                Entry::new("tag", "blue"),
                Entry::new("empty", ""),
            ]
        );
    }

    #[test]
    fn test_to_urlencoded() {
        let entries = [Entry::new("todo[0].content", "Buy milk & eggs")];
        let body = to_urlencoded(&entries);
        assert_eq!(body, "todo%5B0%5D.content=Buy+milk+%26+eggs");
        assert_eq!(parse_urlencoded(body.as_bytes()), entries);
    }
}
