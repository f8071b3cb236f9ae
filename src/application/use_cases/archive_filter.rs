/// Selects archive entries by file name.
///
/// A name is accepted when, for every include group, it contains at least one
/// of the group's substrings, and it contains none of the exclude substrings.
/// With no include groups every name not excluded is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    include: Vec<Vec<String>>,
    exclude: Vec<String>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group of alternatives; the name must match one of them.
    pub fn require_any<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include
            .push(alternatives.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude(mut self, fragment: impl Into<String>) -> Self {
        self.exclude.push(fragment.into());
        self
    }

    pub fn accepts(&self, name: &str) -> bool {
        let included = self
            .include
            .iter()
            .all(|group| group.iter().any(|fragment| name.contains(fragment.as_str())));
        let excluded = self
            .exclude
            .iter()
            .any(|fragment| name.contains(fragment.as_str()));
        included && !excluded
    }

    /// Filters `names` keeping their order.
    pub fn select<'a, I>(&self, names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().filter(|name| self.accepts(name)).collect()
    }
}
