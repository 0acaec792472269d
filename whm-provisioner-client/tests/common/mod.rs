//! 共享测试工具和辅助函数

#![allow(dead_code)]

use whm_provisioner_client::{Credentials, WhmClient};
use wiremock::MockServer;

pub const API_USER: &str = "root";
pub const API_TOKEN: &str = "TESTTOKEN123";

/// Expected `Authorization` header for [`API_USER`] / [`API_TOKEN`].
pub fn auth_header() -> String {
    format!("whm {API_USER}:{API_TOKEN}")
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// A mock server plus a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub client: WhmClient,
}

impl TestContext {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let credentials =
            Credentials::new(server.uri(), API_USER, API_TOKEN).expect("valid test credentials");
        let client = WhmClient::new(credentials).expect("client");
        Self { server, client }
    }

    /// Host part of the mock server URI, as reported in `NotFound` errors.
    pub fn host(&self) -> String {
        self.client.credentials().host()
    }
}
