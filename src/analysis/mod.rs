// Analysis layer
// - state.rs: Session state (document store, change counter, lifecycle)
// - analyzer.rs: Analyzer trait and the placeholder implementation

pub mod analyzer;
pub mod state;

pub use analyzer::{Analyzer, AnalyzerError, PlaceholderAnalyzer};
pub use state::{DocumentStore, Lifecycle, SessionState};
