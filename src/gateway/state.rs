use std::sync::Arc;

use sqlx::PgPool;

use crate::admission::AdmissionService;
use crate::status::StatusService;
use crate::store::Database;

/// Shared gateway state
pub struct AppState {
    pub db: Arc<Database>,
    pub admission: Arc<AdmissionService>,
    pub status: Arc<StatusService>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        admission: Arc<AdmissionService>,
        status: Arc<StatusService>,
    ) -> Self {
        Self {
            db,
            admission,
            status,
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}
