use anyhow::Result;

use crate::domain::ServiceKey;

use super::super::Container;

pub struct CheckController<'a> {
    container: &'a Container,
}

impl<'a> CheckController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Resolves each named service; failures are reported, not returned.
    pub fn check(&self, names: Vec<String>) -> Result<String> {
        let names = if names.is_empty() {
            ServiceKey::ALL.iter().map(|key| key.to_string()).collect()
        } else {
            names
        };

        let lines: Vec<String> = names
            .iter()
            .map(|name| match self.container.get_by_name(name) {
                Ok(handle) => format!("{name}: ok ({})", handle.kind()),
                Err(e) => format!("{name}: {e}"),
            })
            .collect();
        Ok(lines.join("\n"))
    }
}
