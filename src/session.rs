use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::ingestion::FileKind;
use crate::schema::AnalysisReport;
use crate::FinancialStatementAnalyzer;
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of an uploaded file: a hash of its bytes and how it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputKey {
    digest: u64,
    kind: FileKind,
}

impl InputKey {
    pub fn new(bytes: &[u8], kind: FileKind) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Self {
            digest: hasher.finish(),
            kind,
        }
    }
}

/// One interactive session: analyses are memoized by input identity, so
/// re-submitting the same file reuses the earlier report without recomputing it.
/// A hit under a different file name returns a copy carrying the new name.
///
/// Only successful analyses are cached; a file that failed is re-processed.
pub struct AnalysisSession {
    analyzer: FinancialStatementAnalyzer,
    cache: HashMap<InputKey, Arc<AnalysisReport>>,
}

impl AnalysisSession {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            analyzer: FinancialStatementAnalyzer::new(config)?,
            cache: HashMap::new(),
        })
    }

    pub fn analyzer(&self) -> &FinancialStatementAnalyzer {
        &self.analyzer
    }

    pub fn analyze(
        &mut self,
        source_name: &str,
        bytes: &[u8],
        kind: FileKind,
    ) -> Result<Arc<AnalysisReport>> {
        let key = InputKey::new(bytes, kind);
        if let Some(report) = self.cache.get(&key) {
            debug!("Reusing cached analysis for {}", source_name);
            if report.source_name == source_name {
                return Ok(Arc::clone(report));
            }
            return Ok(Arc::new(AnalysisReport {
                source_name: source_name.to_string(),
                ..(**report).clone()
            }));
        }

        let report = Arc::new(self.analyzer.analyze_bytes(source_name, bytes, kind)?);
        self.cache.insert(key, Arc::clone(&report));
        Ok(report)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
