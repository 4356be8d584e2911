//! Ordered option dictionary that becomes the worker's command line.

/// A single worker option: a bare flag or a `name=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    /// Renders as the flag name alone, e.g. `--pdf`.
    Flag(String),
    /// Renders as `name=value`, e.g. `--pageFormat=A4`.
    Value(String, String),
}

impl OptionEntry {
    /// The flag name, including its `--` prefix.
    pub fn name(&self) -> &str {
        match self {
            OptionEntry::Flag(name) => name,
            OptionEntry::Value(name, _) => name,
        }
    }

    /// Render the entry as a single command-line argument.
    pub fn render(&self) -> String {
        match self {
            OptionEntry::Flag(name) => name.clone(),
            OptionEntry::Value(name, value) => format!("{}={}", name, value),
        }
    }
}

/// Ordered mapping from flag name to [`OptionEntry`].
///
/// Insertion order is preserved and becomes the command-line argument order.
/// Setting a name that is already present replaces the entry in place, so
/// the value follows the last write while the position follows the first.
/// This overwrite-by-key mechanism is how preset defaults are overridden by
/// later layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<OptionEntry>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a bare flag.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.insert(OptionEntry::Flag(name.into()));
    }

    /// Set a `name=value` option. A value that is blank after trimming is
    /// stored as a bare flag, never as `name=`.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.insert(OptionEntry::Flag(name));
        } else {
            self.insert(OptionEntry::Value(name, value));
        }
    }

    fn insert(&mut self, entry: OptionEntry) {
        debug_assert!(!entry.name().is_empty(), "option names are never empty");
        match self.entries.iter_mut().find(|e| e.name() == entry.name()) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Overlay `other` onto this map; entries from `other` win on shared
    /// names.
    pub fn extend(&mut self, other: &OptionMap) {
        for entry in &other.entries {
            self.insert(entry.clone());
        }
    }

    /// Precedence-ordered merge into a new map: `other` wins on shared
    /// names, neither input is mutated.
    pub fn merge(&self, other: &OptionMap) -> OptionMap {
        let mut merged = self.clone();
        merged.extend(other);
        merged
    }

    /// Render every entry in insertion order.
    pub fn render(&self) -> Vec<String> {
        self.entries.iter().map(OptionEntry::render).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
