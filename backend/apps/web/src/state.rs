//! Application State
//!
//! Long-lived services shared by every request. Per-request state lives
//! in [`RequestScope`](crate::middleware::RequestScope).

use std::sync::Arc;

use currency::{CurrencyService, RateSource};
use platform::cookie::CookieConfig;
use preferences::Catalogs;
use session::{IdentityProvider, LayoutGate, SessionConfig};

pub struct WebState<I, R>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    pub identity: Arc<I>,
    pub currency: Arc<CurrencyService<R>>,
    pub catalogs: Arc<Catalogs>,
    pub session: Arc<SessionConfig>,
    pub gate: Arc<LayoutGate>,
    pub cookies: CookieConfig,
}

impl<I, R> WebState<I, R>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    pub fn new(
        identity: Arc<I>,
        currency: CurrencyService<R>,
        session: SessionConfig,
        cookies: CookieConfig,
    ) -> Self {
        let gate = LayoutGate::new(Default::default(), session.home_path.clone());
        Self {
            identity,
            currency: Arc::new(currency),
            catalogs: Arc::new(Catalogs::builtin()),
            session: Arc::new(session),
            gate: Arc::new(gate),
            cookies,
        }
    }
}

impl<I, R> Clone for WebState<I, R>
where
    I: IdentityProvider + Send + Sync + 'static,
    R: RateSource + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            currency: self.currency.clone(),
            catalogs: self.catalogs.clone(),
            session: self.session.clone(),
            gate: self.gate.clone(),
            cookies: self.cookies.clone(),
        }
    }
}
