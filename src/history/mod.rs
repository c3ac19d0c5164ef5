mod store;

pub use store::AnalysisHistory;
