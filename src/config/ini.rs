use std::collections::HashMap;

pub type Section = HashMap<String, String>;

/// Parses `[section]` headers and `key = value` lines.
///
/// Lines before the first header and lines without `=` are ignored.
/// Declaring a section twice starts it over.
pub fn parse(data: &str) -> HashMap<String, Section> {
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut current: Option<String> = None;

    for line in data.lines() {
        let line = line.trim_end_matches('\r');

        if let Some(name) = section_name(line) {
            sections.insert(name.to_owned(), Section::new());
            current = Some(name.to_owned());
            continue;
        }

        let trimmed = line.trim_start();
        if trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }

        let Some(section) = current.as_ref().and_then(|name| sections.get_mut(name)) else {
            continue;
        };

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                section.insert(key.to_owned(), value.trim().to_owned());
            }
        }
    }

    sections
}

fn section_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    let name = &rest[..end];

    (!name.is_empty()).then_some(name)
}
