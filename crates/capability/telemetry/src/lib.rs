//! 日志初始化、运行 ID 与筛选/方案操作计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_evaluated: u64,
    pub records_matched: u64,
    pub schemes_created: u64,
    pub schemes_applied: u64,
    pub schemes_updated: u64,
    pub schemes_deleted: u64,
    pub corrupt_reads: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    records_evaluated: AtomicU64,
    records_matched: AtomicU64,
    schemes_created: AtomicU64,
    schemes_applied: AtomicU64,
    schemes_updated: AtomicU64,
    schemes_deleted: AtomicU64,
    corrupt_reads: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            records_evaluated: AtomicU64::new(0),
            records_matched: AtomicU64::new(0),
            schemes_created: AtomicU64::new(0),
            schemes_applied: AtomicU64::new(0),
            schemes_updated: AtomicU64::new(0),
            schemes_deleted: AtomicU64::new(0),
            corrupt_reads: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_evaluated: self.records_evaluated.load(Ordering::Relaxed),
            records_matched: self.records_matched.load(Ordering::Relaxed),
            schemes_created: self.schemes_created.load(Ordering::Relaxed),
            schemes_applied: self.schemes_applied.load(Ordering::Relaxed),
            schemes_updated: self.schemes_updated.load(Ordering::Relaxed),
            schemes_deleted: self.schemes_deleted.load(Ordering::Relaxed),
            corrupt_reads: self.corrupt_reads.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info，可用 RUST_LOG 覆盖）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// 生成一次命令运行的追踪 ID。
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录一次筛选：参与评估的记录数与命中数。
pub fn record_evaluation(evaluated: u64, matched: u64) {
    let metrics = metrics();
    metrics
        .records_evaluated
        .fetch_add(evaluated, Ordering::Relaxed);
    metrics.records_matched.fetch_add(matched, Ordering::Relaxed);
}

/// 记录方案创建次数。
pub fn record_scheme_created() {
    metrics().schemes_created.fetch_add(1, Ordering::Relaxed);
}

/// 记录方案应用次数。
pub fn record_scheme_applied() {
    metrics().schemes_applied.fetch_add(1, Ordering::Relaxed);
}

/// 记录方案更新次数。
pub fn record_scheme_updated() {
    metrics().schemes_updated.fetch_add(1, Ordering::Relaxed);
}

/// 记录方案删除次数（仅统计实际删除）。
pub fn record_scheme_deleted() {
    metrics().schemes_deleted.fetch_add(1, Ordering::Relaxed);
}

/// 记录存储内容无法解析、按空集合处理的次数。
pub fn record_corrupt_read() {
    metrics().corrupt_reads.fetch_add(1, Ordering::Relaxed);
}
