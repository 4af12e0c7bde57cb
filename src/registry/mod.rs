//! Scan registry
//!
//! Every scan module registers itself by name at init time, so name
//! collisions are data the caller can see instead of a silent pick. The
//! registry is rebuilt by full rediscovery whenever it is needed and never
//! persisted.

use crate::core::PipelineError;
use crate::scans::{PipelineStep, ScanArgs};
use std::collections::BTreeMap;

/// Builds a fully parameterized step from the operator's scan arguments
pub type StepBuilder = fn(&ScanArgs) -> Result<Box<dyn PipelineStep>, PipelineError>;

/// One registered scan implementation
#[derive(Clone, Copy)]
pub struct ScanEntry {
    /// Command name the operator uses, e.g. "gobuster"
    pub name: &'static str,

    /// Module that provides the implementation
    pub module: &'static str,

    /// Constructor for the step
    pub build: StepBuilder,
}

impl std::fmt::Debug for ScanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanEntry")
            .field("name", &self.name)
            .field("module", &self.module)
            .finish()
    }
}

/// Mapping of command name to every module implementing it
pub struct ScanRegistry {
    entries: BTreeMap<&'static str, Vec<ScanEntry>>,
}

impl ScanRegistry {
    /// An empty registry (tests register into this directly)
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Register every built-in scan. Idempotent: two discoveries of the
    /// same build yield identical mappings.
    pub fn discover() -> Self {
        let mut registry = Self::empty();
        crate::scans::register_all(&mut registry);
        registry
    }

    /// Record a scan implementation; duplicates accumulate rather than
    /// overwrite so ambiguity stays visible
    pub fn register(&mut self, entry: ScanEntry) {
        self.entries.entry(entry.name).or_default().push(entry);
    }

    /// Every implementation of a command name
    pub fn lookup(&self, name: &str) -> Result<&[ScanEntry], PipelineError> {
        self.entries
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| PipelineError::NotFound(name.to_string()))
    }

    /// The single implementation of a command name; ambiguous names are an
    /// error that lists every claiming module
    pub fn lookup_unique(&self, name: &str) -> Result<&ScanEntry, PipelineError> {
        let entries = self.lookup(name)?;
        match entries {
            [entry] => Ok(entry),
            _ => Err(PipelineError::AmbiguousScan {
                name: name.to_string(),
                modules: entries.iter().map(|e| e.module.to_string()).collect(),
            }),
        }
    }

    /// Registered command names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_is_idempotent() {
        let first = ScanRegistry::discover();
        let second = ScanRegistry::discover();
        assert_eq!(first.names(), second.names());

        for name in first.names() {
            let a: Vec<_> = first.lookup(name).unwrap().iter().map(|e| e.module).collect();
            let b: Vec<_> = second.lookup(name).unwrap().iter().map(|e| e.module).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let registry = ScanRegistry::discover();
        assert!(matches!(
            registry.lookup("nmap"),
            Err(PipelineError::NotFound(name)) if name == "nmap"
        ));
    }

    #[test]
    fn test_duplicate_registration_is_ambiguous() {
        fn fake_build(_: &ScanArgs) -> Result<Box<dyn PipelineStep>, PipelineError> {
            Err(PipelineError::InvalidParameter("fake".to_string()))
        }

        let mut registry = ScanRegistry::empty();
        registry.register(ScanEntry { name: "amass", module: "mod_a", build: fake_build });
        registry.register(ScanEntry { name: "amass", module: "mod_b", build: fake_build });

        // every implementation is visible
        assert_eq!(registry.lookup("amass").unwrap().len(), 2);

        // and nothing silently picks one
        let err = registry.lookup_unique("amass").unwrap_err();
        match err {
            PipelineError::AmbiguousScan { modules, .. } => {
                assert_eq!(modules, vec!["mod_a".to_string(), "mod_b".to_string()]);
            }
            other => panic!("expected AmbiguousScan, got {other:?}"),
        }
    }

    #[test]
    fn test_builtin_scans_are_unambiguous() {
        let registry = ScanRegistry::discover();
        for name in registry.names() {
            registry.lookup_unique(name).unwrap();
        }
    }
}
