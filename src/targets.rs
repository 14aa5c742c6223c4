/// A named HTTP endpoint to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub name: String,
    pub url: String,
}

impl ProbeTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Probed when no usable target list is configured: (name, url).
pub const DEFAULT_TARGETS: &[(&str, &str)] = &[
    ("Dominat8.com", "https://www.dominat8.com/api/d8/health"),
    ("Dominat8.io", "https://dominat8.io/api/io/health"),
];

pub fn default_targets() -> Vec<ProbeTarget> {
    DEFAULT_TARGETS
        .iter()
        .map(|(name, url)| ProbeTarget::new(*name, *url))
        .collect()
}

/// Resolve a `name=url;name=url` list into probe targets.
///
/// Malformed entries are dropped without complaint, as are repeats of a name already
/// seen. An absent, blank, or entirely malformed list resolves to [`DEFAULT_TARGETS`].
pub fn resolve_targets(raw: Option<&str>) -> Vec<ProbeTarget> {
    let mut parsed: Vec<ProbeTarget> = Vec::new();
    for target in raw.unwrap_or_default().split(';').filter_map(parse_entry) {
        if parsed.iter().all(|seen| seen.name != target.name) {
            parsed.push(target);
        }
    }

    if parsed.is_empty() {
        default_targets()
    } else {
        parsed
    }
}

fn parse_entry(entry: &str) -> Option<ProbeTarget> {
    let (name, url) = entry.trim().split_once('=')?;
    let name = name.trim();
    let url = url.trim();
    if name.is_empty() || url.is_empty() {
        return None;
    }
    Some(ProbeTarget::new(name, url))
}
