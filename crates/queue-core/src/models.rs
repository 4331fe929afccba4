//! 核心数据模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::id_last_three;

/// 诊室数量，诊室编号固定为 1-8
pub const ROOM_COUNT: i32 = 8;

/// 患者就诊状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    Waiting,        // 候诊中
    InConsultation, // 就诊中
    Completed,      // 已完成
    Cancelled,      // 已取消
}

impl PatientStatus {
    /// 数据库存储使用的状态字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Waiting => "waiting",
            PatientStatus::InConsultation => "in_consultation",
            PatientStatus::Completed => "completed",
            PatientStatus::Cancelled => "cancelled",
        }
    }

    /// 从状态字符串解析，未知字符串返回None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(PatientStatus::Waiting),
            "in_consultation" => Some(PatientStatus::InConsultation),
            "completed" => Some(PatientStatus::Completed),
            "cancelled" => Some(PatientStatus::Cancelled),
            _ => None,
        }
    }
}

/// 患者排队记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: i64,                        // 数据库自增ID，同一到达时间按此先后取号
    pub full_name: String,              // 患者姓名
    pub id_number: String,              // 证件号，对外仅展示末3位
    pub consultation_room: i32,         // 诊室编号 (1-8)
    pub arrival_time: DateTime<Utc>,    // 到达时间，候诊排序的唯一依据
    pub status: PatientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 挂号登记输入
#[derive(Debug, Clone, Deserialize)]
pub struct AddPatientInput {
    pub full_name: String,
    pub id_number: String,
    pub consultation_room: i32,
    /// 缺省时使用登记当刻的时间
    pub arrival_time: Option<DateTime<Utc>>,
}

/// 状态更新输入
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePatientStatusInput {
    pub patient_id: i64,
    pub status: PatientStatus,
}

/// 公共显示屏投影
///
/// 唯一对外暴露患者信息的结构，证件号只保留末3位，完整证件号不得出现在此结构中。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicPatientDisplay {
    pub id_last_three: String,
    pub full_name: String,
    pub consultation_room: i32,
    pub status: PatientStatus,
}

impl PublicPatientDisplay {
    /// 将患者记录脱敏为公共显示条目
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            id_last_three: id_last_three(&patient.id_number),
            full_name: patient.full_name.clone(),
            consultation_room: patient.consultation_room,
            status: patient.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_str_round_trip() {
        for status in [
            PatientStatus::Waiting,
            PatientStatus::InConsultation,
            PatientStatus::Completed,
            PatientStatus::Cancelled,
        ] {
            assert_eq!(PatientStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PatientStatus::parse("paused"), None);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&PatientStatus::InConsultation).unwrap();
        assert_eq!(json, r#""in_consultation""#);

        let status: PatientStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(status, PatientStatus::Cancelled);
    }

    #[test]
    fn test_public_display_redacts_id_number() {
        let patient = Patient {
            id: 1,
            full_name: "张三".to_string(),
            id_number: "1234567890".to_string(),
            consultation_room: 3,
            arrival_time: Utc::now(),
            status: PatientStatus::Waiting,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let display = PublicPatientDisplay::from_patient(&patient);
        assert_eq!(display.id_last_three, "890");
        assert_eq!(display.full_name, "张三");
        assert_eq!(display.consultation_room, 3);

        let json = serde_json::to_string(&display).unwrap();
        assert!(!json.contains("1234567890"));
    }
}
