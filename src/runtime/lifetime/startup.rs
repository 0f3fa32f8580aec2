use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::seed;
use crate::services::AppServices;
use crate::storage::StorageFactory;

/// 启动后可共享的服务集合
pub struct StartupContext {
    pub services: AppServices,
}

/// 打开存储并加载课程内容（CLI 与服务器共用）
pub async fn build_services(config: &StaticConfig) -> Result<AppServices> {
    let storage = StorageFactory::create_with(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let content = seed::load_course(config.course.content_path.as_deref())
        .context("Failed to load course content")?;
    info!(
        "Course loaded: {} chapters, {} materials",
        content.chapters().len(),
        content.total_materials()
    );

    Ok(AppServices::new(storage, Arc::new(content), &config.course))
}

/// 准备服务器启动的上下文
///
/// 包括存储、课程内容、目录种子数据和初始管理员
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();
    let services = build_services(&config).await?;

    if config.catalog.seed_on_empty {
        let seeded = services
            .seed_empty_collections()
            .await
            .context("Failed to seed catalog collections")?;
        if seeded > 0 {
            info!("Seeded {} catalog entries into empty collections", seeded);
        }
    }

    match (&config.auth.admin_email, &config.auth.admin_password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            let created = services
                .users
                .ensure_admin(email, password, &config.auth.admin_name)
                .await
                .context("Failed to bootstrap admin account")?;
            if created {
                info!("Admin account {} created from config", email);
            }
        }
        (Some(_), _) | (_, Some(_)) => {
            warn!("auth.admin_email and auth.admin_password must both be set; skipping admin bootstrap");
        }
        _ => debug!("No admin bootstrap configured"),
    }

    if config.auth.jwt_secret.is_empty() {
        warn!("auth.jwt_secret is empty; sessions will not survive a restart");
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { services })
}
