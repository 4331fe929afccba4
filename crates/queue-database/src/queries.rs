//! 数据库查询操作

use queue_core::{Patient, PatientStatus, QueueError, Result};
use queue_engine::NewPatient;

use crate::connection::DatabasePool;
use crate::models::DbPatient;

/// 数据库查询操作接口
pub struct PatientQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> PatientQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 创建数据库表
    pub async fn create_tables(&self) -> Result<()> {
        let pool = self.pool.pool();

        // 创建患者表
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS patients (
                id BIGSERIAL PRIMARY KEY,
                full_name VARCHAR(255) NOT NULL,
                id_number VARCHAR(64) NOT NULL,
                consultation_room INTEGER NOT NULL,
                arrival_time TIMESTAMP WITH TIME ZONE NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'waiting',
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
        "#).execute(pool).await.map_err(|e| QueueError::Database(e.to_string()))?;

        // 创建索引以优化查询性能
        self.create_indexes().await?;

        tracing::info!("Database tables created successfully");
        Ok(())
    }

    /// 创建数据库索引
    async fn create_indexes(&self) -> Result<()> {
        let pool = self.pool.pool();

        let indexes = vec![
            "CREATE INDEX IF NOT EXISTS idx_patients_room ON patients(consultation_room)",
            "CREATE INDEX IF NOT EXISTS idx_patients_status ON patients(status)",
            "CREATE INDEX IF NOT EXISTS idx_patients_arrival_time ON patients(arrival_time)",
            "CREATE INDEX IF NOT EXISTS idx_patients_room_status ON patients(consultation_room, status, arrival_time)",
        ];

        for index_sql in indexes {
            sqlx::query(index_sql)
                .execute(pool)
                .await
                .map_err(|e| QueueError::Database(e.to_string()))?;
        }

        tracing::info!("Database indexes created successfully");
        Ok(())
    }

    /// 插入新患者记录，返回包含数据库分配字段的完整记录
    pub async fn insert_patient(&self, patient: &NewPatient) -> Result<Patient> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbPatient>(r#"
            INSERT INTO patients (full_name, id_number, consultation_room, arrival_time, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        "#)
        .bind(&patient.full_name)
        .bind(&patient.id_number)
        .bind(patient.consultation_room)
        .bind(patient.arrival_time)
        .bind(patient.status.as_str())
        .fetch_one(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(Patient::from(result))
    }

    /// 根据记录ID查找患者
    pub async fn get_patient_by_id(&self, id: i64) -> Result<Option<Patient>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbPatient>(
            "SELECT * FROM patients WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(result.map(Patient::from))
    }

    /// 全部患者，到达时间升序
    pub async fn get_all_patients(&self) -> Result<Vec<Patient>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbPatient>(
            "SELECT * FROM patients ORDER BY arrival_time, id"
        )
        .fetch_all(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(results.into_iter().map(Patient::from).collect())
    }

    /// 指定诊室的全部患者，到达时间升序
    pub async fn get_patients_by_room(&self, room: i32) -> Result<Vec<Patient>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbPatient>(
            "SELECT * FROM patients WHERE consultation_room = $1 ORDER BY arrival_time, id"
        )
        .bind(room)
        .fetch_all(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(results.into_iter().map(Patient::from).collect())
    }

    /// 指定状态的全部患者，到达时间升序
    pub async fn get_patients_by_status(&self, status: PatientStatus) -> Result<Vec<Patient>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbPatient>(
            "SELECT * FROM patients WHERE status = $1 ORDER BY arrival_time, id"
        )
        .bind(status.as_str())
        .fetch_all(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(results.into_iter().map(Patient::from).collect())
    }

    /// 候诊中与就诊中的患者，供公共显示使用
    pub async fn get_active_patients(&self) -> Result<Vec<Patient>> {
        let pool = self.pool.pool();

        let results = sqlx::query_as::<_, DbPatient>(
            "SELECT * FROM patients WHERE status IN ('waiting', 'in_consultation') ORDER BY arrival_time, id"
        )
        .fetch_all(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(results.into_iter().map(Patient::from).collect())
    }

    /// 指定诊室到达最早的候诊患者
    pub async fn next_waiting_in_room(&self, room: i32) -> Result<Option<Patient>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbPatient>(r#"
            SELECT * FROM patients
            WHERE consultation_room = $1 AND status = 'waiting'
            ORDER BY arrival_time, id
            LIMIT 1
        "#)
        .bind(room)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(result.map(Patient::from))
    }

    /// 条件更新：仅当记录仍为候诊状态时置为就诊中
    ///
    /// WHERE子句同时匹配ID和候诊状态，并发叫号时只有一方能改写成功，
    /// 未命中（返回None）表示记录已被抢先或不存在。
    pub async fn claim_for_consultation(&self, id: i64) -> Result<Option<Patient>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbPatient>(r#"
            UPDATE patients
            SET status = 'in_consultation', updated_at = NOW()
            WHERE id = $1 AND status = 'waiting'
            RETURNING *
        "#)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(result.map(Patient::from))
    }

    /// 无条件写入状态并刷新updated_at
    pub async fn set_patient_status(
        &self,
        id: i64,
        status: PatientStatus,
    ) -> Result<Option<Patient>> {
        let pool = self.pool.pool();

        let result = sqlx::query_as::<_, DbPatient>(r#"
            UPDATE patients
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
        "#)
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await
        .map_err(|e| QueueError::Database(e.to_string()))?;

        Ok(result.map(Patient::from))
    }
}
