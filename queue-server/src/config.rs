//! 配置管理
//!
//! 配置来源按优先级从低到高：内置默认值、配置文件、QUEUE_前缀环境变量。
//! 命令行参数的覆盖在main中处理。

use ::config::{Config, ConfigError, Environment, File};
use queue_core::{QueueError, Result};
use serde::Deserialize;

/// 服务完整配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 连接字符串
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl AppConfig {
    /// 加载配置，配置文件可选
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::build(path).map_err(|e| QueueError::Config(e.to_string()))
    }

    fn build(path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 2022)?
            .set_default("database.url", "postgres://localhost/clinic_queue")?
            .set_default("database.max_connections", 10)?;

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        builder
            .add_source(
                Environment::with_prefix("QUEUE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
