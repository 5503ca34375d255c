use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use crate::models::UploadedDataset;
use crate::services::analytics::AnalysisResult;

/// Keyed storage for uploads and their analyses, injected into the router state.
pub trait AnalysisStore: Send + Sync {
    fn save_dataset(&self, dataset: Arc<UploadedDataset>);
    fn get_dataset(&self, id: &str) -> Option<Arc<UploadedDataset>>;
    fn save_analysis(&self, id: &str, analysis: AnalysisResult);
    fn get_analysis(&self, id: &str) -> Option<Arc<AnalysisResult>>;
}

/// Process-lifetime store. Nothing is evicted.
#[derive(Default)]
pub struct MemoryStore {
    datasets: RwLock<HashMap<String, Arc<UploadedDataset>>>,
    analyses: RwLock<HashMap<String, Arc<AnalysisResult>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalysisStore for MemoryStore {
    fn save_dataset(&self, dataset: Arc<UploadedDataset>) {
        self.datasets.write().insert(dataset.id.clone(), dataset);
    }

    fn get_dataset(&self, id: &str) -> Option<Arc<UploadedDataset>> {
        self.datasets.read().get(id).cloned()
    }

    fn save_analysis(&self, id: &str, analysis: AnalysisResult) {
        self.analyses.write().insert(id.to_string(), Arc::new(analysis));
    }

    fn get_analysis(&self, id: &str) -> Option<Arc<AnalysisResult>> {
        self.analyses.read().get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analytics::compute_analysis;

    #[test]
    fn test_dataset_round_trip() {
        let store = MemoryStore::new();
        let dataset = UploadedDataset::new("id-1".into(), "a.csv".into(), vec!["x".into()], Vec::new());
        store.save_dataset(Arc::new(dataset));

        assert_eq!(store.get_dataset("id-1").unwrap().filename, "a.csv");
        assert!(store.get_dataset("missing").is_none());
    }

    #[test]
    fn test_analysis_round_trip() {
        let store = MemoryStore::new();
        let columns = vec!["track".to_string()];
        store.save_analysis("id-2", compute_analysis(&[], &columns));

        assert_eq!(store.get_analysis("id-2").unwrap().summary.columns, columns);
        assert!(store.get_analysis("id-1").is_none());
    }

    #[test]
    fn test_shared_across_threads() {
        let store: Arc<dyn AnalysisStore> = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let id = format!("ds-{}", i);
                    store.save_dataset(Arc::new(UploadedDataset::new(id, "f.csv".into(), Vec::new(), Vec::new())));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!((0..4).all(|i| store.get_dataset(&format!("ds-{}", i)).is_some()));
    }
}
