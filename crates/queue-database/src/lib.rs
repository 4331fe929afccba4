//! # Queue Database
//!
//! 患者排队记录的持久化层，提供PostgreSQL连接池和完整的CRUD操作，
//! 并以[`PgPatientStore`]实现引擎的存储接口。

pub mod connection;
pub mod models;
pub mod queries;
pub mod store;

// 重新导出主要类型
pub use connection::DatabasePool;
pub use models::DbPatient;
pub use queries::PatientQueries;
pub use store::PgPatientStore;
