//! 数据库模型

use chrono::{DateTime, Utc};
use queue_core::{Patient, PatientStatus};
use sqlx::FromRow;

/// 数据库患者表行
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub id: i64,
    pub full_name: String,
    pub id_number: String,
    pub consultation_room: i32,
    pub arrival_time: DateTime<Utc>,
    pub status: String, // 存储为字符串，转换为PatientStatus枚举
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbPatient> for Patient {
    fn from(db_patient: DbPatient) -> Self {
        Patient {
            id: db_patient.id,
            full_name: db_patient.full_name,
            id_number: db_patient.id_number,
            consultation_room: db_patient.consultation_room,
            arrival_time: db_patient.arrival_time,
            status: PatientStatus::parse(&db_patient.status)
                .unwrap_or(PatientStatus::Waiting), // 默认状态
            created_at: db_patient.created_at,
            updated_at: db_patient.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_patient(status: &str) -> DbPatient {
        DbPatient {
            id: 7,
            full_name: "测试患者".to_string(),
            id_number: "320504197812011234".to_string(),
            consultation_room: 4,
            arrival_time: Utc::now(),
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(
            Patient::from(db_patient("in_consultation")).status,
            PatientStatus::InConsultation
        );
        assert_eq!(
            Patient::from(db_patient("cancelled")).status,
            PatientStatus::Cancelled
        );
    }

    #[test]
    fn test_unknown_status_falls_back_to_waiting() {
        assert_eq!(
            Patient::from(db_patient("paused")).status,
            PatientStatus::Waiting
        );
    }
}
