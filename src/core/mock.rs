//! Call-site mocking for tests
//!
//! A [`MockFn`] is asked once per configured kind, when installed, for a
//! replacement call-site. Kinds it returns a call-site for bypass dispatch
//! entirely; kinds it returns `None` for keep logging normally.

use super::log_entry::LogValue;
use super::log_types::{LogType, LogTypes};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Replacement for a kind's call-site
pub type MockCallSite = Arc<dyn Fn(&[LogValue]) + Send + Sync>;

/// Produces the replacement call-site for a kind, if any
pub type MockFn = Arc<dyn Fn(&str, &LogType) -> Option<MockCallSite> + Send + Sync>;

/// Installed mock: the factory plus the call-sites it produced
#[derive(Clone)]
pub(crate) struct MockTable {
    factory: MockFn,
    sites: HashMap<String, MockCallSite>,
}

impl MockTable {
    pub(crate) fn install(factory: MockFn, types: &LogTypes) -> Self {
        let sites = types
            .iter()
            .filter_map(|(name, log_type)| factory(name, log_type).map(|site| (name.to_string(), site)))
            .collect();
        Self { factory, sites }
    }

    pub(crate) fn factory(&self) -> MockFn {
        Arc::clone(&self.factory)
    }

    pub(crate) fn site(&self, kind: &str) -> Option<MockCallSite> {
        self.sites.get(kind).cloned()
    }
}

/// Records every mocked call as `(kind, args)`
#[derive(Clone, Default)]
pub struct MockRecorder {
    calls: Arc<Mutex<Vec<(String, Vec<LogValue>)>>>,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock factory that records calls for every kind
    pub fn mock_fn(&self) -> MockFn {
        let calls = Arc::clone(&self.calls);
        Arc::new(move |kind: &str, _: &LogType| {
            let calls = Arc::clone(&calls);
            let kind = kind.to_string();
            let site: MockCallSite = Arc::new(move |args: &[LogValue]| {
                calls.lock().push((kind.clone(), args.to_vec()));
            });
            Some(site)
        })
    }

    pub fn calls(&self) -> Vec<(String, Vec<LogValue>)> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl std::fmt::Debug for MockRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRecorder")
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_sites_for_every_kind() {
        let recorder = MockRecorder::new();
        let types = LogTypes::default();
        let table = MockTable::install(recorder.mock_fn(), &types);

        let site = table.site("warn").expect("mocked");
        site(&["careful".into()]);
        assert_eq!(recorder.calls(), vec![("warn".to_string(), vec![LogValue::from("careful")])]);
        assert!(table.site("nonexistent").is_none());
    }

    #[test]
    fn test_selective_factory() {
        let factory: MockFn = Arc::new(|kind: &str, _: &LogType| {
            if kind == "error" {
                let site: MockCallSite = Arc::new(|_: &[LogValue]| {});
                Some(site)
            } else {
                None
            }
        });
        let table = MockTable::install(factory, &LogTypes::default());
        assert!(table.site("error").is_some());
        assert!(table.site("info").is_none());
    }
}
