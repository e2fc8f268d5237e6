//! 对真实后端的冒烟测试
//!
//! 需要 `native` feature 和以下环境变量，默认忽略：
//! `IDEAHUB_API_BASE`、`IDEAHUB_LIVE_EMAIL`、`IDEAHUB_LIVE_PASSWORD`。
//!
//! cargo test --features native -- --ignored

#![cfg(feature = "native")]

use ideahub::route::{AppRoute, Navigator};
use ideahub::storage::MemoryStorage;
use ideahub::transport::ReqwestTransport;
use ideahub::{ApiClient, AuthPhase, AuthService, ClientConfig, SessionStore};
use ideahub_shared::Credentials;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct LastRoute(RefCell<Option<AppRoute>>);

impl Navigator for LastRoute {
    fn navigate(&self, route: AppRoute) {
        *self.0.borrow_mut() = Some(route);
    }
}

#[tokio::test]
#[ignore]
async fn login_against_live_backend() {
    let (Ok(email), Ok(password)) = (
        std::env::var("IDEAHUB_LIVE_EMAIL"),
        std::env::var("IDEAHUB_LIVE_PASSWORD"),
    ) else {
        eprintln!("IDEAHUB_LIVE_EMAIL / IDEAHUB_LIVE_PASSWORD not set, skipping");
        return;
    };

    let config = ClientConfig::from_env();
    let navigator = Rc::new(LastRoute::default());
    let session = SessionStore::new(
        Rc::new(MemoryStorage::new()),
        navigator.clone(),
        config.session_key.clone(),
    );
    session.restore();

    let client = ApiClient::new(&config, Rc::new(ReqwestTransport::new()), session.clone());
    let auth = AuthService::new(client, navigator.clone());

    let signed_in = auth
        .login(Credentials { email, password })
        .await
        .expect("login should succeed");

    assert_eq!(session.phase(), AuthPhase::Authorized(signed_in.role));
    assert_eq!(*navigator.0.borrow(), Some(AppRoute::home_for(signed_in.role)));

    auth.logout();
    assert_eq!(session.phase(), AuthPhase::Unauthenticated);
}
