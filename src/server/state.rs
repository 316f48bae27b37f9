use crate::core::context::AnalyzerContext;
use std::sync::Arc;

/// Shared application state; clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AnalyzerContext>,
    /// Also write the text reports for API runs.
    pub write_outputs: bool,
}

impl AppState {
    pub fn new(context: AnalyzerContext) -> Self {
        let write_outputs = context.config.write_outputs();
        Self {
            context: Arc::new(context),
            write_outputs,
        }
    }
}
