use std::sync::Arc;

use crate::config::Config;
use crate::email::Mailer;
use crate::rate_limit::LoginRateLimiter;
use crate::store::Store;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
    pub login_limiter: LoginRateLimiter,
}
