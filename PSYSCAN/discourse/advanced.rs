use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_logging::LogLevel;

use crate::{
    engine::{DiscourseAnalysis, DiscourseAnalyzer, Document},
    telemetry::DiscourseTelemetry,
};

/// One document of a batch and its origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisJob {
    /// Document to analyze.
    pub document: Document,
    /// Correlation id for tracing.
    pub correlation_id: String,
}

/// Result of one job. A failed document does not fail the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Correlation id of the job.
    pub correlation_id: String,
    /// Analysis, or the engine error message.
    pub result: Result<DiscourseAnalysis, String>,
}

/// Controller analyzing many documents concurrently. Each document still
/// runs its blocks strictly in order.
pub struct BatchAnalyzer {
    analyzer: Arc<DiscourseAnalyzer>,
    telemetry: Option<DiscourseTelemetry>,
}

impl BatchAnalyzer {
    /// Creates a new controller.
    #[must_use]
    pub const fn new(
        analyzer: Arc<DiscourseAnalyzer>,
        telemetry: Option<DiscourseTelemetry>,
    ) -> Self {
        Self {
            analyzer,
            telemetry,
        }
    }

    /// Analyzes `jobs` on the blocking pool; outcomes keep the job order.
    pub async fn process_batch(&self, jobs: Vec<AnalysisJob>) -> Result<Vec<BatchOutcome>> {
        self.log("discourse.batch.start", jobs.len());
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let analyzer = Arc::clone(&self.analyzer);
                let tel = self.telemetry.clone();
                tokio::task::spawn_blocking(move || {
                    if let Some(t) = tel {
                        let _ = t.log(
                            LogLevel::Debug,
                            "discourse.batch.job",
                            json!({ "correlation_id": job.correlation_id }),
                        );
                    }
                    BatchOutcome {
                        result: analyzer
                            .analyze(&job.document)
                            .map_err(|err| err.to_string()),
                        correlation_id: job.correlation_id,
                    }
                })
            })
            .collect();
        let outcomes = futures::future::try_join_all(handles).await?;
        self.log("discourse.batch.complete", outcomes.len());
        Ok(outcomes)
    }

    fn log(&self, message: &str, count: usize) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(LogLevel::Info, message, json!({ "count": count }));
        }
    }
}
