//! 患者记录存储接口
//!
//! 引擎对持久化层的唯一依赖。所有扫描按到达时间升序返回，
//! 到达时间相同时按记录ID升序（先登记者在前）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use queue_core::{Patient, PatientStatus, Result};

/// 新患者插入模型
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub full_name: String,
    pub id_number: String,
    pub consultation_room: i32,
    pub arrival_time: DateTime<Utc>,
    pub status: PatientStatus,
}

/// 存储接口
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// 插入一条记录，ID、created_at、updated_at由存储层分配
    async fn insert(&self, patient: NewPatient) -> Result<Patient>;

    /// 根据记录ID查找
    async fn fetch_by_id(&self, id: i64) -> Result<Option<Patient>>;

    /// 全量扫描
    async fn fetch_all(&self) -> Result<Vec<Patient>>;

    /// 按诊室扫描，包含终态记录
    async fn fetch_by_room(&self, room: i32) -> Result<Vec<Patient>>;

    /// 按状态扫描
    async fn fetch_by_status(&self, status: PatientStatus) -> Result<Vec<Patient>>;

    /// 扫描候诊中与就诊中的记录，供公共显示使用
    async fn fetch_active(&self) -> Result<Vec<Patient>>;

    /// 指定诊室中到达最早的候诊记录
    async fn next_waiting_in_room(&self, room: i32) -> Result<Option<Patient>>;

    /// 条件更新：仅当记录仍为候诊状态时置为就诊中并刷新updated_at。
    /// 返回None表示记录不存在或已被其他调用方抢先，未发生任何写入。
    async fn claim_for_consultation(&self, id: i64) -> Result<Option<Patient>>;

    /// 无条件写入状态并刷新updated_at，记录不存在时返回None
    async fn set_status(&self, id: i64, status: PatientStatus) -> Result<Option<Patient>>;
}
