//! Ordered regex probes for free-text rows.
//!
//! Each entry in [`PROBES`] targets one field. [`run_probes`] walks the table
//! once; the first pattern that matches for a field wins and later patterns
//! for that field are skipped. Fields are independent, so one stretch of text
//! may feed several of them.

use regex::Regex;
use std::sync::LazyLock;

/// Field a probe fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeField {
    Action,
    Actor,
    Resource,
    Container,
    Application,
}

/// `(field, pattern)` pairs in evaluation order. Every pattern captures the
/// value in group 1.
pub const PROBES: &[(ProbeField, &str)] = &[
    // action
    (ProbeField::Action, r"(?i)\b(delet\w*|remov\w*|purg\w*)"),
    (ProbeField::Action, r"(?i)\b(mov(?:e|ed|es|ing)|relocat\w*|transfer\w*)\b"),
    (ProbeField::Action, r"(?i)\b(export\w*|sent to folder)\b"),
    (ProbeField::Action, r"(?i)\b(check(?:ed|ing)?[\s-]?(?:out|in)|free(?:d|s|ing)?)\b"),
    (ProbeField::Action, r"(?i)\b(replac\w*|overwr\w*|updat\w*)"),
    (ProbeField::Action, r"(?i)\b(creat\w*|add(?:ed|s|ing)?)\b"),
    (ProbeField::Action, r"(?i)\b(modif\w*|chang\w*|edit\w*)"),
    (ProbeField::Action, r"(?i)\b(cop(?:y|ied|ies|ying)|duplicat\w*)\b"),
    (ProbeField::Action, r"(?i)\b(access\w*|open(?:ed|s|ing)?|view\w*)\b"),
    // actor
    (ProbeField::Actor, r"(?i)\bby\s+([\w.\-]+)"),
    (ProbeField::Actor, r"(?i)\buser:\s*([\w.\-]+)"),
    (ProbeField::Actor, r"(?i)([\w.\-]+)\s+performed\b"),
    (ProbeField::Actor, r"(?i)([\w.\-]+)\s+(?:deleted|moved|created|modified)\b"),
    // resource
    (ProbeField::Resource, r"(?i)\bdocument:\s*([^\s,]+)"),
    (ProbeField::Resource, r"(?i)\bfile:\s*([^\s,]+)"),
    (ProbeField::Resource, r"\b([\w\-]+\.[A-Za-z][A-Za-z0-9]{0,4})\b"),
    (ProbeField::Resource, r#""([^"]+\.[A-Za-z][A-Za-z0-9]{0,4})""#),
    // container
    (ProbeField::Container, r"(?i)\bfolder:\s*([^\s,]+)"),
    (ProbeField::Container, r"(?i)\bpath:\s*([^\s,]+)"),
    (ProbeField::Container, r"(?i)\bin\s+([^\s,]+)"),
    (ProbeField::Container, r"(?i)\bfrom\s+([^\s,]+)"),
    (ProbeField::Container, r"(?i)\bto\s+([^\s,]+)"),
    // application
    (ProbeField::Application, r"(?i)\bapplication:\s*([\w.\-]+)"),
    (ProbeField::Application, r"(?i)\bapp:\s*([\w.\-]+)"),
    (ProbeField::Application, r"(?i)\bvia\s+([\w.\-]+)"),
];

static COMPILED: LazyLock<Vec<(ProbeField, Regex)>> = LazyLock::new(|| {
    PROBES
        .iter()
        .map(|(field, pattern)| (*field, Regex::new(pattern).expect("valid probe pattern")))
        .collect()
});

/// First capture of each field's first matching probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeHits {
    pub action: Option<String>,
    pub actor: Option<String>,
    pub resource: Option<String>,
    pub container: Option<String>,
    pub application: Option<String>,
}

impl ProbeHits {
    fn slot(&mut self, field: ProbeField) -> &mut Option<String> {
        match field {
            ProbeField::Action => &mut self.action,
            ProbeField::Actor => &mut self.actor,
            ProbeField::Resource => &mut self.resource,
            ProbeField::Container => &mut self.container,
            ProbeField::Application => &mut self.application,
        }
    }
}

/// Run one probe by its index in [`PROBES`].
pub fn probe(index: usize, text: &str) -> Option<String> {
    let (_, regex) = COMPILED.get(index)?;
    regex
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// First hit among the probes for a single field.
pub fn probe_first(field: ProbeField, text: &str) -> Option<String> {
    COMPILED
        .iter()
        .enumerate()
        .filter(|(_, (f, _))| *f == field)
        .find_map(|(index, _)| probe(index, text))
}

/// Run the whole table against `text`.
pub fn run_probes(text: &str) -> ProbeHits {
    let mut hits = ProbeHits::default();
    for (index, (field, _)) in COMPILED.iter().enumerate() {
        let slot = hits.slot(*field);
        if slot.is_some() {
            continue;
        }
        *slot = probe(index, text);
    }
    hits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
