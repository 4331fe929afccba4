//! # Queue Engine
//!
//! 排队叫号系统的决策核心：输入校验、候诊选取、状态转换和公共显示投影。
//! 引擎本身不持有任何队列状态，每次调用都基于存储层的当前内容重新计算。

pub mod engine;
pub mod memory;
pub mod state_machine;
pub mod store;

pub use engine::QueueEngine;
pub use memory::MemoryPatientStore;
pub use state_machine::PatientStateMachine;
pub use store::{NewPatient, PatientStore};
