use std::sync::Arc;

use fairway_core::TeeTimeRepository;
use fairway_reserve::ReservationManager;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ReservationManager>,
    pub repo: Arc<dyn TeeTimeRepository>,
    pub auth: AuthConfig,
}
