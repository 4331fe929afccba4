//! 就诊状态机
//!
//! 管理患者记录的生命周期状态转换。状态更新操作默认不做转换检查
//! （保留撤销取消等回退操作的空间），本状态机仅在引擎开启严格模式时生效。

use queue_core::{PatientStatus, QueueError, Result};
use std::collections::HashSet;

/// 就诊状态机
#[derive(Debug)]
pub struct PatientStateMachine {
    transitions: HashSet<(PatientStatus, PatientStatus)>,
}

impl PatientStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        let mut transitions = HashSet::new();

        // 定义状态转换规则
        transitions.insert((PatientStatus::Waiting, PatientStatus::InConsultation));
        transitions.insert((PatientStatus::Waiting, PatientStatus::Cancelled));
        transitions.insert((PatientStatus::InConsultation, PatientStatus::Completed));
        transitions.insert((PatientStatus::InConsultation, PatientStatus::Cancelled));

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: PatientStatus, to: PatientStatus) -> bool {
        self.transitions.contains(&(from, to))
    }

    /// 校验状态转换，非法转换返回错误
    pub fn transition(&self, from: PatientStatus, to: PatientStatus) -> Result<PatientStatus> {
        if self.can_transition(from, to) {
            Ok(to)
        } else {
            Err(QueueError::InvalidStateTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    /// 获取状态的所有合法后继
    pub fn successors(&self, from: PatientStatus) -> Vec<PatientStatus> {
        self.transitions
            .iter()
            .filter(|(f, _)| *f == from)
            .map(|(_, t)| *t)
            .collect()
    }
}

impl Default for PatientStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
