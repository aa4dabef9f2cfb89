use crate::api::jwt::get_jwt_service;
use crate::storage::{SeaOrmStorage, StorageFactory};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
}

/// 准备服务器启动的上下文
///
/// 连接数据库并执行迁移，预热 JWT 服务（secret 为空时在此处告警）。
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let _ = get_jwt_service();
    debug!("JWT service initialized");

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage })
}
