use axum::{extract::State, Json};
use serde::Serialize;
use sysinfo::System;
use tracing::info;

use crate::adapters::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    #[serde(rename = "bucketName")]
    pub bucket_name: String,
    #[serde(rename = "tableName")]
    pub table_name: String,
    #[serde(rename = "signedIn")]
    pub signed_in: bool,
    pub metrics: SystemMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryBackendStats>,
}

#[derive(Debug, Serialize)]
pub struct MemoryBackendStats {
    pub objects: usize,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage_percent: f32,
    #[serde(rename = "memoryUsedBytes")]
    pub memory_used_bytes: u64,
    #[serde(rename = "memoryTotalBytes")]
    pub memory_total_bytes: u64,
    #[serde(rename = "memoryUsagePercent")]
    pub memory_usage_percent: f32,
}

pub struct HealthController;

impl HealthController {
    /// GET /api/v1/health
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        info!("Health check requested");

        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let memory_used = sys.used_memory();
        let memory_total = sys.total_memory();
        let memory_usage_percent = if memory_total > 0 {
            (memory_used as f32 / memory_total as f32) * 100.0
        } else {
            0.0
        };

        Json(HealthResponse {
            status: "healthy".to_string(),
            provider: format!("{:?}", app_state.provider()),
            bucket_name: app_state.config.bucket_name.clone(),
            table_name: app_state.config.table_name.clone(),
            signed_in: app_state.shell.session().current_user().is_some(),
            metrics: SystemMetrics {
                cpu_usage_percent: sys.global_cpu_usage(),
                memory_used_bytes: memory_used,
                memory_total_bytes: memory_total,
                memory_usage_percent,
            },
            memory: app_state.memory.as_ref().map(|memory| MemoryBackendStats {
                objects: memory.object_count(),
                rows: memory.row_count(),
            }),
        })
    }
}
