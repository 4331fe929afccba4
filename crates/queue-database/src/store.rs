//! 引擎存储接口的PostgreSQL实现

use async_trait::async_trait;
use queue_core::{Patient, PatientStatus, Result};
use queue_engine::{NewPatient, PatientStore};

use crate::connection::DatabasePool;
use crate::queries::PatientQueries;

/// PostgreSQL患者存储
#[derive(Debug, Clone)]
pub struct PgPatientStore {
    pool: DatabasePool,
}

impl PgPatientStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn queries(&self) -> PatientQueries<'_> {
        PatientQueries::new(&self.pool)
    }
}

#[async_trait]
impl PatientStore for PgPatientStore {
    async fn insert(&self, patient: NewPatient) -> Result<Patient> {
        self.queries().insert_patient(&patient).await
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Patient>> {
        self.queries().get_patient_by_id(id).await
    }

    async fn fetch_all(&self) -> Result<Vec<Patient>> {
        self.queries().get_all_patients().await
    }

    async fn fetch_by_room(&self, room: i32) -> Result<Vec<Patient>> {
        self.queries().get_patients_by_room(room).await
    }

    async fn fetch_by_status(&self, status: PatientStatus) -> Result<Vec<Patient>> {
        self.queries().get_patients_by_status(status).await
    }

    async fn fetch_active(&self) -> Result<Vec<Patient>> {
        self.queries().get_active_patients().await
    }

    async fn next_waiting_in_room(&self, room: i32) -> Result<Option<Patient>> {
        self.queries().next_waiting_in_room(room).await
    }

    async fn claim_for_consultation(&self, id: i64) -> Result<Option<Patient>> {
        self.queries().claim_for_consultation(id).await
    }

    async fn set_status(&self, id: i64, status: PatientStatus) -> Result<Option<Patient>> {
        self.queries().set_patient_status(id, status).await
    }
}
