//! 排队引擎
//!
//! 七个对外操作的统一入口：挂号登记、各类查询、叫号和状态更新。
//! 引擎无内部队列状态，所有选取和校验都基于存储层当前内容计算。

use std::sync::Arc;

use chrono::Utc;
use queue_core::{
    utils::validate_room, AddPatientInput, Patient, PatientStatus, PublicPatientDisplay,
    QueueError, Result, UpdatePatientStatusInput,
};
use tracing::{info, warn};

use crate::state_machine::PatientStateMachine;
use crate::store::{NewPatient, PatientStore};

/// 排队引擎
pub struct QueueEngine {
    store: Arc<dyn PatientStore>,
    state_machine: PatientStateMachine,
    strict_transitions: bool,
}

impl QueueEngine {
    /// 创建引擎，默认不校验状态转换（与历史行为一致，允许回退操作）
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self {
            store,
            state_machine: PatientStateMachine::new(),
            strict_transitions: false,
        }
    }

    /// 开启严格模式后，状态更新仅允许状态机定义的转换
    pub fn with_strict_transitions(mut self, strict: bool) -> Self {
        self.strict_transitions = strict;
        self
    }

    /// 挂号登记
    ///
    /// 新记录一律以候诊状态入队；到达时间缺省时取本次调用当刻的时间。
    pub async fn add_patient(&self, input: AddPatientInput) -> Result<Patient> {
        if input.full_name.is_empty() {
            return Err(QueueError::Validation("患者姓名不能为空".to_string()));
        }
        if input.id_number.is_empty() {
            return Err(QueueError::Validation("证件号不能为空".to_string()));
        }
        validate_room(input.consultation_room)?;

        let arrival_time = input.arrival_time.unwrap_or_else(Utc::now);

        let patient = self
            .store
            .insert(NewPatient {
                full_name: input.full_name,
                id_number: input.id_number,
                consultation_room: input.consultation_room,
                arrival_time,
                status: PatientStatus::Waiting,
            })
            .await?;

        info!(
            "Registered patient {} for room {}",
            patient.id, patient.consultation_room
        );
        Ok(patient)
    }

    /// 全部患者，按到达时间升序
    pub async fn all_patients(&self) -> Result<Vec<Patient>> {
        self.store.fetch_all().await
    }

    /// 指定诊室的全部患者（含终态记录），按到达时间升序
    pub async fn patients_by_room(&self, room: i32) -> Result<Vec<Patient>> {
        validate_room(room)?;
        self.store.fetch_by_room(room).await
    }

    /// 全部候诊患者，按到达时间升序
    pub async fn waiting_patients(&self) -> Result<Vec<Patient>> {
        self.store.fetch_by_status(PatientStatus::Waiting).await
    }

    /// 叫号：取指定诊室到达最早的候诊患者并置为就诊中
    ///
    /// 选取与置位之间通过存储层的条件更新衔接，认领失败（已被其他
    /// 调用方抢先）时重新选取，候诊集为空时返回None。
    pub async fn call_next_patient(&self, room: i32) -> Result<Option<Patient>> {
        validate_room(room)?;

        loop {
            let candidate = match self.store.next_waiting_in_room(room).await? {
                Some(candidate) => candidate,
                None => return Ok(None),
            };

            match self.store.claim_for_consultation(candidate.id).await? {
                Some(patient) => {
                    info!("Called patient {} to room {}", patient.id, room);
                    return Ok(Some(patient));
                }
                None => {
                    warn!(
                        "Patient {} no longer waiting, reselecting for room {}",
                        candidate.id, room
                    );
                }
            }
        }
    }

    /// 状态更新
    ///
    /// 默认不检查前驱状态，四个状态之间任意改写均被接受；
    /// 严格模式下非法转换返回错误且不发生写入。
    pub async fn update_patient_status(&self, input: UpdatePatientStatusInput) -> Result<Patient> {
        if self.strict_transitions {
            let current = self
                .store
                .fetch_by_id(input.patient_id)
                .await?
                .ok_or_else(|| {
                    QueueError::NotFound(format!("患者不存在: {}", input.patient_id))
                })?;
            self.state_machine.transition(current.status, input.status)?;
        }

        match self.store.set_status(input.patient_id, input.status).await? {
            Some(patient) => {
                info!(
                    "Patient {} status updated to {}",
                    patient.id,
                    patient.status.as_str()
                );
                Ok(patient)
            }
            None => Err(QueueError::NotFound(format!(
                "患者不存在: {}",
                input.patient_id
            ))),
        }
    }

    /// 公共显示投影：候诊中与就诊中的记录，证件号脱敏为末3位
    pub async fn public_display(&self) -> Result<Vec<PublicPatientDisplay>> {
        let patients = self.store.fetch_active().await?;
        Ok(patients
            .iter()
            .map(PublicPatientDisplay::from_patient)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPatientStore;
    use chrono::Duration;

    fn setup() -> (Arc<MemoryPatientStore>, QueueEngine) {
        let store = Arc::new(MemoryPatientStore::new());
        let engine = QueueEngine::new(store.clone());
        (store, engine)
    }

    fn input(full_name: &str, id_number: &str, room: i32) -> AddPatientInput {
        AddPatientInput {
            full_name: full_name.to_string(),
            id_number: id_number.to_string(),
            consultation_room: room,
            arrival_time: None,
        }
    }

    /// 绕过引擎直接写入指定状态的记录
    async fn seed(
        store: &MemoryPatientStore,
        room: i32,
        arrival_offset_min: i64,
        status: PatientStatus,
    ) -> Patient {
        store
            .insert(NewPatient {
                full_name: "预置患者".to_string(),
                id_number: "440301199212120011".to_string(),
                consultation_room: room,
                arrival_time: Utc::now() - Duration::minutes(arrival_offset_min),
                status,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_patient_forces_waiting_status() {
        let (_, engine) = setup();

        let patient = engine.add_patient(input("李四", "330102198805054321", 5)).await.unwrap();
        assert_eq!(patient.status, PatientStatus::Waiting);
        assert_eq!(patient.consultation_room, 5);
        assert_eq!(patient.created_at, patient.updated_at);
    }

    #[tokio::test]
    async fn test_add_patient_defaults_arrival_to_call_instant() {
        let (_, engine) = setup();

        let before = Utc::now();
        let patient = engine.add_patient(input("王五", "12345", 1)).await.unwrap();
        let after = Utc::now();

        assert!(patient.arrival_time >= before);
        assert!(patient.arrival_time <= after);
    }

    #[tokio::test]
    async fn test_add_patient_keeps_supplied_arrival() {
        let (_, engine) = setup();

        let arrival = Utc::now() - Duration::hours(2);
        let patient = engine
            .add_patient(AddPatientInput {
                arrival_time: Some(arrival),
                ..input("赵六", "99887", 2)
            })
            .await
            .unwrap();
        assert_eq!(patient.arrival_time, arrival);
    }

    #[tokio::test]
    async fn test_add_patient_validation_rejects_before_write() {
        let (store, engine) = setup();

        assert!(engine.add_patient(input("", "12345", 1)).await.is_err());
        assert!(engine.add_patient(input("张三", "", 1)).await.is_err());
        assert!(engine.add_patient(input("张三", "12345", 0)).await.is_err());
        assert!(engine.add_patient(input("张三", "12345", 9)).await.is_err());

        // 校验失败时不允许有任何写入
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_call_next_on_empty_room_returns_none() {
        let (store, engine) = setup();

        let result = engine.call_next_patient(3).await.unwrap();
        assert!(result.is_none());
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_call_next_rejects_invalid_room() {
        let (_, engine) = setup();
        assert!(engine.call_next_patient(0).await.is_err());
        assert!(engine.call_next_patient(9).await.is_err());
    }

    #[tokio::test]
    async fn test_call_next_picks_earliest_arrival_first() {
        let (store, engine) = setup();

        let later = seed(&store, 1, 5, PatientStatus::Waiting).await;
        let earlier = seed(&store, 1, 30, PatientStatus::Waiting).await;

        let first = engine.call_next_patient(1).await.unwrap().unwrap();
        assert_eq!(first.id, earlier.id);
        assert_eq!(first.status, PatientStatus::InConsultation);

        let second = engine.call_next_patient(1).await.unwrap().unwrap();
        assert_eq!(second.id, later.id);

        assert!(engine.call_next_patient(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_call_next_breaks_arrival_ties_by_id() {
        let (store, engine) = setup();

        let arrival = Utc::now() - Duration::minutes(10);
        let mut patients = Vec::new();
        for _ in 0..2 {
            patients.push(
                store
                    .insert(NewPatient {
                        full_name: "同时到达".to_string(),
                        id_number: "777".to_string(),
                        consultation_room: 6,
                        arrival_time: arrival,
                        status: PatientStatus::Waiting,
                    })
                    .await
                    .unwrap(),
            );
        }

        let called = engine.call_next_patient(6).await.unwrap().unwrap();
        assert_eq!(called.id, patients[0].id);
    }

    #[tokio::test]
    async fn test_call_next_never_selects_non_waiting() {
        let (store, engine) = setup();

        // 最早的三条记录都不在候诊状态
        seed(&store, 2, 60, PatientStatus::Completed).await;
        seed(&store, 2, 50, PatientStatus::Cancelled).await;
        seed(&store, 2, 40, PatientStatus::InConsultation).await;
        let waiting = seed(&store, 2, 10, PatientStatus::Waiting).await;

        let called = engine.call_next_patient(2).await.unwrap().unwrap();
        assert_eq!(called.id, waiting.id);
    }

    #[tokio::test]
    async fn test_call_next_scoped_to_requested_room() {
        let (store, engine) = setup();

        let other_room = seed(&store, 2, 30, PatientStatus::Waiting).await;

        assert!(engine.call_next_patient(1).await.unwrap().is_none());

        let called = engine.call_next_patient(2).await.unwrap().unwrap();
        assert_eq!(called.id, other_room.id);
        assert_eq!(called.consultation_room, 2);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_fails_without_write() {
        let (store, engine) = setup();
        let existing = seed(&store, 1, 5, PatientStatus::Waiting).await;

        let err = engine
            .update_patient_status(UpdatePatientStatusInput {
                patient_id: 999,
                status: PatientStatus::Completed,
            })
            .await
            .unwrap_err();
        match err {
            QueueError::NotFound(msg) => assert!(msg.contains("999")),
            other => panic!("unexpected error: {other}"),
        }

        let unchanged = store.fetch_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(unchanged, existing);
    }

    #[tokio::test]
    async fn test_update_status_bumps_updated_at() {
        let (store, engine) = setup();
        let patient = seed(&store, 1, 5, PatientStatus::Waiting).await;

        let updated = engine
            .update_patient_status(UpdatePatientStatusInput {
                patient_id: patient.id,
                status: PatientStatus::Cancelled,
            })
            .await
            .unwrap();
        assert_eq!(updated.status, PatientStatus::Cancelled);
        assert!(updated.updated_at > patient.updated_at);
        assert_eq!(updated.created_at, patient.created_at);
    }

    #[tokio::test]
    async fn test_update_status_lenient_by_default() {
        let (store, engine) = setup();
        let patient = seed(&store, 1, 5, PatientStatus::Completed).await;

        // 默认模式下允许从终态改回候诊（撤销操作）
        let updated = engine
            .update_patient_status(UpdatePatientStatusInput {
                patient_id: patient.id,
                status: PatientStatus::Waiting,
            })
            .await
            .unwrap();
        assert_eq!(updated.status, PatientStatus::Waiting);
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_illegal_transition() {
        let store = Arc::new(MemoryPatientStore::new());
        let engine = QueueEngine::new(store.clone()).with_strict_transitions(true);
        let patient = seed(&store, 1, 5, PatientStatus::Completed).await;

        let err = engine
            .update_patient_status(UpdatePatientStatusInput {
                patient_id: patient.id,
                status: PatientStatus::Waiting,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QueueError::InvalidStateTransition { .. }));

        // 拒绝时不发生写入
        let unchanged = store.fetch_by_id(patient.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, PatientStatus::Completed);

        // 合法转换正常放行
        let waiting = seed(&store, 1, 3, PatientStatus::Waiting).await;
        let cancelled = engine
            .update_patient_status(UpdatePatientStatusInput {
                patient_id: waiting.id,
                status: PatientStatus::Cancelled,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, PatientStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_public_display_excludes_terminal_states() {
        let (store, engine) = setup();

        seed(&store, 1, 40, PatientStatus::Completed).await;
        seed(&store, 1, 30, PatientStatus::Cancelled).await;
        let waiting = seed(&store, 1, 20, PatientStatus::Waiting).await;
        let in_consultation = seed(&store, 2, 10, PatientStatus::InConsultation).await;

        let display = engine.public_display().await.unwrap();
        assert_eq!(display.len(), 2);
        for entry in &display {
            assert!(matches!(
                entry.status,
                PatientStatus::Waiting | PatientStatus::InConsultation
            ));
            assert_eq!(entry.id_last_three, "011");
        }
        assert!(display.iter().any(|e| e.consultation_room == waiting.consultation_room));
        assert!(display
            .iter()
            .any(|e| e.consultation_room == in_consultation.consultation_room));
    }

    #[tokio::test]
    async fn test_round_trip_via_room_query() {
        let (_, engine) = setup();

        let patient = engine.add_patient(input("孙七", "11010819760203456X", 7)).await.unwrap();

        let room_patients = engine.patients_by_room(7).await.unwrap();
        assert_eq!(room_patients, vec![patient]);
    }

    #[tokio::test]
    async fn test_queries_order_by_arrival_time() {
        let (store, engine) = setup();

        let third = seed(&store, 1, 10, PatientStatus::Waiting).await;
        let first = seed(&store, 2, 50, PatientStatus::Waiting).await;
        let second = seed(&store, 1, 30, PatientStatus::Completed).await;

        let all: Vec<i64> = engine.all_patients().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(all, vec![first.id, second.id, third.id]);

        let waiting: Vec<i64> = engine
            .waiting_patients()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(waiting, vec![first.id, third.id]);

        let room1: Vec<i64> = engine
            .patients_by_room(1)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(room1, vec![second.id, third.id]);
    }

    #[tokio::test]
    async fn test_scenario_earlier_arrival_called_first() {
        let (_, engine) = setup();

        let a = engine
            .add_patient(input("患者甲", "1234567890", 1))
            .await
            .unwrap();
        let b = engine
            .add_patient(AddPatientInput {
                arrival_time: Some(Utc::now() - Duration::minutes(10)),
                ..input("患者乙", "000000001111", 1)
            })
            .await
            .unwrap();

        // 乙到达更早，先被叫号；甲保持候诊
        let called = engine.call_next_patient(1).await.unwrap().unwrap();
        assert_eq!(called.id, b.id);

        let room = engine.patients_by_room(1).await.unwrap();
        let a_now = room.iter().find(|p| p.id == a.id).unwrap();
        assert_eq!(a_now.status, PatientStatus::Waiting);
    }

    #[tokio::test]
    async fn test_scenario_short_id_number_shown_whole() {
        let (_, engine) = setup();

        let c = engine.add_patient(input("患者丙", "55", 4)).await.unwrap();

        let display = engine.public_display().await.unwrap();
        assert_eq!(
            display,
            vec![PublicPatientDisplay {
                id_last_three: "55".to_string(),
                full_name: c.full_name.clone(),
                consultation_room: 4,
                status: PatientStatus::Waiting,
            }]
        );
    }
}
