//! 排队叫号服务器主程序

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use queue_database::{DatabasePool, PatientQueries, PgPatientStore};
use queue_engine::QueueEngine;
use queue_web::WebServer;
use tracing::{error, info};

mod config;
use crate::config::AppConfig;

/// 排队叫号服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "queue-server")]
#[command(about = "门诊排队叫号系统服务器")]
struct Args {
    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 数据库连接字符串
    #[arg(short, long)]
    database_url: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 开启严格状态转换校验（默认允许任意状态改写）
    #[arg(long)]
    strict_transitions: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    info!("启动排队叫号服务器...");

    // 命令行参数优先于配置文件和环境变量
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    info!("服务器配置:");
    info!("  监听地址: {}:{}", config.server.host, config.server.port);
    info!("  数据库最大连接数: {}", config.database.max_connections);
    info!("  严格状态转换: {}", args.strict_transitions);

    // 建立数据库连接池并初始化表结构
    let pool = DatabasePool::connect(&config.database.url, config.database.max_connections).await?;
    PatientQueries::new(&pool).create_tables().await?;

    // 组装引擎与Web服务
    let store = Arc::new(PgPatientStore::new(pool));
    let engine =
        Arc::new(QueueEngine::new(store).with_strict_transitions(args.strict_transitions));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let server = WebServer::new(addr, engine);
    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e.into());
    }

    Ok(())
}
