use crate::api::types::AnalyticsReport;
use crate::client::{ApiError, SessionClient};

impl SessionClient {
    /// Platform-wide analytics over the last `range_days` days. Admin only.
    pub async fn global_analytics(&self, range_days: u32) -> Result<AnalyticsReport, ApiError> {
        self.get_query(
            "/issues/analytics/global",
            &[("range", &range_days.to_string())],
        )
        .await
    }

    /// The signed-in organization's analytics over the last `range_days`
    /// days. Authority only.
    pub async fn organization_analytics(
        &self,
        range_days: u32,
    ) -> Result<AnalyticsReport, ApiError> {
        self.get_query(
            "/issues/analytics/organization",
            &[("range", &range_days.to_string())],
        )
        .await
    }
}
