use anyhow::Context;
use product_catalog::{
    build_router, infrastructure::logger::Logger, AppConfig, AppState, CatalogStore,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("加载配置失败")?;
    Logger::init(config.level()?);

    info!("启动产品目录服务...");

    let store = CatalogStore::seeded();
    info!("✅ 已初始化 {} 个示例产品", store.len()?);

    if config.api_key.is_some() {
        info!("🔐 /api/products 需要 x-api-key 请求头");
    } else {
        warn!("未设置 API_KEY，产品接口不做认证");
    }

    let app = build_router(AppState::new(store), config.api_key.clone());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法绑定到 {address}"))?;

    info!("🚀 服务器运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /api/products         - 产品列表 (category, page, limit)");
    info!("   GET    /api/products/search  - 按名称搜索 (name)");
    info!("   GET    /api/products/stats   - 分类统计");
    info!("   GET    /api/products/:id     - 获取特定产品");
    info!("   POST   /api/products         - 创建产品");
    info!("   PUT    /api/products/:id     - 更新产品");
    info!("   DELETE /api/products/:id     - 删除产品");

    axum::serve(listener, app).await.context("服务器运行失败")?;
    Ok(())
}
