//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{Mutex, RwLock};
use whm_provisioner_client::{ApiError, ApiResponse, ProvisioningRequest, WhmApi};

use crate::error::{CoreError, CoreResult};
use crate::services::{ProvisioningService, ServiceContext};
use crate::traits::{ExternalAccountRepository, Notifier};
use crate::types::{
    ExternalAccount, Notification, OrderContext, PackageInfo, ProvisioningOptions, UserInfo,
};

// ===== MockWhmApi =====

/// Records every request and answers from a queue; an empty queue answers
/// with a plain success body.
pub struct MockWhmApi {
    calls: Mutex<Vec<ProvisioningRequest>>,
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
}

impl MockWhmApi {
    pub const HOSTNAME: &'static str = "https://panel.example.com";

    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a JSON body for the next unanswered call.
    pub async fn respond_with(&self, body: Value) {
        self.responses.lock().await.push_back(Ok(body));
    }

    /// Queue an error for the next unanswered call.
    pub async fn fail_next(&self, err: ApiError) {
        self.responses.lock().await.push_back(Err(err));
    }

    pub async fn calls(&self) -> Vec<ProvisioningRequest> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl WhmApi for MockWhmApi {
    fn hostname(&self) -> &str {
        Self::HOSTNAME
    }

    async fn call(
        &self,
        request: &ProvisioningRequest,
    ) -> whm_provisioner_client::Result<ApiResponse> {
        self.calls.lock().await.push(request.clone());
        let next = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"metadata": {"result": 1, "reason": "OK"}})));

        match next? {
            Value::Object(map) => Ok(ApiResponse::new(map)),
            other => panic!("mock responses must be JSON objects, got {other}"),
        }
    }
}

// ===== MockAccountRepository =====

pub struct MockAccountRepository {
    accounts: RwLock<HashMap<String, ExternalAccount>>,
    /// 如果 Some，save 时返回此错误（用于测试 cleanup 路径）
    save_error: RwLock<Option<String>>,
    /// 如果 Some，查询时返回此错误
    lookup_error: RwLock<Option<String>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            save_error: RwLock::new(None),
            lookup_error: RwLock::new(None),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn set_lookup_error(&self, err: Option<String>) {
        *self.lookup_error.write().await = err;
    }

    async fn check_lookup(&self) -> CoreResult<()> {
        match *self.lookup_error.read().await {
            Some(ref msg) => Err(CoreError::Storage(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExternalAccountRepository for MockAccountRepository {
    async fn find_by_order(&self, order_id: &str) -> CoreResult<Option<ExternalAccount>> {
        self.check_lookup().await?;
        Ok(self.accounts.read().await.get(order_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<Vec<ExternalAccount>> {
        self.check_lookup().await?;
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .filter(|a| a.username == username)
            .cloned()
            .collect())
    }

    async fn save(&self, account: &ExternalAccount) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::Storage(msg.clone()));
        }
        self.accounts
            .write()
            .await
            .insert(account.order_id.clone(), account.clone());
        Ok(())
    }

    async fn delete(&self, order_id: &str) -> CoreResult<()> {
        self.accounts.write().await.remove(order_id);
        Ok(())
    }
}

// ===== RecordingNotifier =====

pub struct RecordingNotifier {
    sent: Mutex<Vec<(UserInfo, Notification)>>,
    error: RwLock<Option<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            error: RwLock::new(None),
        }
    }

    pub async fn set_error(&self, err: Option<String>) {
        *self.error.write().await = err;
    }

    pub async fn sent(&self) -> Vec<(UserInfo, Notification)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user: &UserInfo, notification: &Notification) -> CoreResult<()> {
        if let Some(ref msg) = *self.error.read().await {
            return Err(CoreError::Storage(msg.clone()));
        }
        self.sent
            .lock()
            .await
            .push((user.clone(), notification.clone()));
        Ok(())
    }
}

// ===== 工厂方法 =====

pub fn create_test_context(
    options: ProvisioningOptions,
) -> (
    Arc<ServiceContext>,
    Arc<MockWhmApi>,
    Arc<MockAccountRepository>,
    Arc<RecordingNotifier>,
) {
    let api = Arc::new(MockWhmApi::new());
    let repo = Arc::new(MockAccountRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let ctx = Arc::new(ServiceContext::new(
        api.clone(),
        repo.clone(),
        notifier.clone(),
        options,
    ));
    (ctx, api, repo, notifier)
}

pub fn create_test_service(
    options: ProvisioningOptions,
) -> (
    ProvisioningService,
    Arc<MockWhmApi>,
    Arc<MockAccountRepository>,
    Arc<RecordingNotifier>,
) {
    let (ctx, api, repo, notifier) = create_test_context(options);
    (ProvisioningService::new(ctx), api, repo, notifier)
}

/// An order by `username` (`<username>@example.com`); `plan` goes into the
/// package settings when given.
pub fn test_order(
    id: &str,
    username: &str,
    domain: Option<&str>,
    plan: Option<&str>,
) -> OrderContext {
    let mut data = HashMap::new();
    if let Some(plan) = plan {
        data.insert(PackageInfo::PLAN_KEY.to_string(), plan.to_string());
    }
    OrderContext {
        id: id.to_string(),
        domain: domain.map(ToString::to_string),
        user: UserInfo {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
        package: PackageInfo {
            id: "pkg-1".to_string(),
            data,
        },
    }
}
