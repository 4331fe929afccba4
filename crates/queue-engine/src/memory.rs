//! 内存存储实现
//!
//! 与数据库实现遵守同一份存储契约（排序、条件更新语义），
//! 用于引擎和适配层的测试以及无数据库环境下的演示。

use async_trait::async_trait;
use chrono::Utc;
use queue_core::{Patient, PatientStatus, Result};
use tokio::sync::RwLock;

use crate::store::{NewPatient, PatientStore};

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    patients: Vec<Patient>,
}

/// 内存患者存储
#[derive(Debug, Default)]
pub struct MemoryPatientStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 到达时间升序，相同到达时间按ID升序
fn ordered(mut patients: Vec<Patient>) -> Vec<Patient> {
    patients.sort_by(|a, b| a.arrival_time.cmp(&b.arrival_time).then(a.id.cmp(&b.id)));
    patients
}

#[async_trait]
impl PatientStore for MemoryPatientStore {
    async fn insert(&self, patient: NewPatient) -> Result<Patient> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let now = Utc::now();
        let record = Patient {
            id: inner.next_id,
            full_name: patient.full_name,
            id_number: patient.id_number,
            consultation_room: patient.consultation_room,
            arrival_time: patient.arrival_time,
            status: patient.status,
            created_at: now,
            updated_at: now,
        };
        inner.patients.push(record.clone());
        Ok(record)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Patient>> {
        let inner = self.inner.read().await;
        Ok(inner.patients.iter().find(|p| p.id == id).cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<Patient>> {
        let inner = self.inner.read().await;
        Ok(ordered(inner.patients.clone()))
    }

    async fn fetch_by_room(&self, room: i32) -> Result<Vec<Patient>> {
        let inner = self.inner.read().await;
        Ok(ordered(
            inner
                .patients
                .iter()
                .filter(|p| p.consultation_room == room)
                .cloned()
                .collect(),
        ))
    }

    async fn fetch_by_status(&self, status: PatientStatus) -> Result<Vec<Patient>> {
        let inner = self.inner.read().await;
        Ok(ordered(
            inner
                .patients
                .iter()
                .filter(|p| p.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn fetch_active(&self) -> Result<Vec<Patient>> {
        let inner = self.inner.read().await;
        Ok(ordered(
            inner
                .patients
                .iter()
                .filter(|p| {
                    matches!(
                        p.status,
                        PatientStatus::Waiting | PatientStatus::InConsultation
                    )
                })
                .cloned()
                .collect(),
        ))
    }

    async fn next_waiting_in_room(&self, room: i32) -> Result<Option<Patient>> {
        let inner = self.inner.read().await;
        Ok(ordered(
            inner
                .patients
                .iter()
                .filter(|p| p.consultation_room == room && p.status == PatientStatus::Waiting)
                .cloned()
                .collect(),
        )
        .into_iter()
        .next())
    }

    async fn claim_for_consultation(&self, id: i64) -> Result<Option<Patient>> {
        let mut inner = self.inner.write().await;
        match inner
            .patients
            .iter_mut()
            .find(|p| p.id == id && p.status == PatientStatus::Waiting)
        {
            Some(patient) => {
                patient.status = PatientStatus::InConsultation;
                patient.updated_at = Utc::now();
                Ok(Some(patient.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_status(&self, id: i64, status: PatientStatus) -> Result<Option<Patient>> {
        let mut inner = self.inner.write().await;
        match inner.patients.iter_mut().find(|p| p.id == id) {
            Some(patient) => {
                patient.status = status;
                patient.updated_at = Utc::now();
                Ok(Some(patient.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_patient(room: i32) -> NewPatient {
        NewPatient {
            full_name: "测试患者".to_string(),
            id_number: "110101199001011234".to_string(),
            consultation_room: room,
            arrival_time: Utc::now(),
            status: PatientStatus::Waiting,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_monotonic_ids() {
        let store = MemoryPatientStore::new();

        let first = store.insert(new_patient(1)).await.unwrap();
        let second = store.insert(new_patient(1)).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_claim_only_succeeds_on_waiting() {
        let store = MemoryPatientStore::new();
        let patient = store.insert(new_patient(2)).await.unwrap();

        let claimed = store.claim_for_consultation(patient.id).await.unwrap();
        assert_eq!(
            claimed.map(|p| p.status),
            Some(PatientStatus::InConsultation)
        );

        // 第二次认领同一记录必须失败，且无任何写入
        let second = store.claim_for_consultation(patient.id).await.unwrap();
        assert!(second.is_none());

        let stored = store.fetch_by_id(patient.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PatientStatus::InConsultation);
    }

    #[tokio::test]
    async fn test_claim_missing_record_returns_none() {
        let store = MemoryPatientStore::new();
        assert!(store.claim_for_consultation(42).await.unwrap().is_none());
    }
}
