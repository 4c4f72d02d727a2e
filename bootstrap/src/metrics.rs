//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出

use metrics_exporter_prometheus::{BuildError, PrometheusHandle};

/// Metrics 记录器
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 recorder，进程内只能调用一次
    pub fn install() -> Result<Self, BuildError> {
        let handle = telemetry::init_metrics()?;
        Ok(Self { handle })
    }

    /// 使用已有的句柄（测试中不安装全局 recorder）
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
