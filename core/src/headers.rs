//! Structured view over a raw response header block.

/// Response headers keyed by lowercase name.
///
/// Names keep the order in which they first appeared; repeated names keep
/// every value in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    /// Build the map from a decoded header block. The first line is the
    /// status line and is skipped.
    pub fn parse(raw: &str) -> Self {
        let mut map = HeaderMap::default();
        for line in raw.split("\r\n").skip(1) {
            if line.is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) => map.append(name.trim(), value.trim()),
                None => log::warn!("skipping malformed header line {line:?}"),
            }
        }
        map
    }

    fn append(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => self.entries.push((key, vec![value.to_string()])),
        }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Every value for `name`, empty when absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.get_all(name).is_empty()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
