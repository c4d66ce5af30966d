use std::sync::Arc;

use crate::{
    config::Config,
    db::connection::DbPool,
    services::{AttendanceService, GuardianNotifier},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    pub attendance: AttendanceService,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, notifier: Arc<dyn GuardianNotifier>) -> Self {
        Self {
            pool,
            config,
            attendance: AttendanceService::new(notifier),
        }
    }
}
