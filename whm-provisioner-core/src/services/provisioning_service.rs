//! 账户生命周期服务
//!
//! Drives one control-panel account per order through
//! `Unprovisioned → Active ⇄ Suspended → Terminated`.
//!
//! Every operation either succeeds and updates the local record, or fails and
//! leaves it untouched. Remote calls always happen before local writes.

use std::collections::BTreeMap;
use std::sync::Arc;

use whm_provisioner_client::{ApiError, ApiResponse, ProvisioningRequest};

use crate::error::{CoreError, CoreResult};
use crate::types::{
    AccountState, ExternalAccount, Notification, NotificationButton, OrderContext, PackageInfo,
    TerminationPolicy,
};
use crate::utils::generator::{
    derive_domain, derive_username, generate_password, validate_password,
};

use super::ServiceContext;

const LIST_PACKAGES: &str = "listpkgs";
const CREATE_ACCOUNT: &str = "createacct";
const SUSPEND_ACCOUNT: &str = "suspendacct";
const UNSUSPEND_ACCOUNT: &str = "unsuspendacct";
const CHANGE_PACKAGE: &str = "changepackage";
const CHANGE_PASSWORD: &str = "passwd";
const REMOVE_ACCOUNT: &str = "removeacct";

const LIVE_STATES: &[AccountState] = &[AccountState::Active, AccountState::Suspended];

/// 账户生命周期服务
pub struct ProvisioningService {
    ctx: Arc<ServiceContext>,
}

impl ProvisioningService {
    /// 创建账户生命周期服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Check that the control panel is reachable and accepts the credentials.
    ///
    /// An HTTP-200 answer flagged as failed (e.g. an ACL denial) is a failure.
    pub async fn test_connection(&self) -> CoreResult<()> {
        self.send(&ProvisioningRequest::get(LIST_PACKAGES))
            .await
            .map_err(|e| self.ctx.report("test connection", e))?;
        log::info!("Connection to {} verified", self.ctx.api.hostname());
        Ok(())
    }

    /// Plans configured on the control panel, as plan-name → plan-name.
    pub async fn list_packages(&self) -> CoreResult<BTreeMap<String, String>> {
        self.ctx
            .api
            .list_packages()
            .await
            .map_err(|e| self.ctx.report("list packages", e.into()))
    }

    /// Provision a new account for an order.
    ///
    /// 流程：生成用户名/密码 -> 调用 createacct -> 保存本地记录 -> 发送通知
    ///
    /// The local record is written only after the control panel confirmed the
    /// account. If that write fails, the remote account is removed again; if
    /// the removal fails too, the account is left for
    /// [`remove_orphaned_account`](Self::remove_orphaned_account).
    pub async fn create_account(&self, order: &OrderContext) -> CoreResult<ExternalAccount> {
        let existing = self
            .ctx
            .accounts
            .find_by_order(&order.id)
            .await
            .map_err(|e| self.ctx.report("create", e))?;
        if existing.is_some() {
            return Err(self
                .ctx
                .report("create", CoreError::ExternalAccountExists(order.id.clone())));
        }

        let domain = derive_domain(order.domain.as_deref(), &order.user.username);
        let plan = order.package.plan().to_string();
        let retries = self.ctx.options.username_collision_retries;

        let mut attempt = 0;
        let (username, password) = loop {
            let (username, password) = {
                let mut rng = rand::rng();
                (
                    derive_username(&order.user.username, &mut rng),
                    generate_password(self.ctx.options.password_length, &mut rng),
                )
            };

            let request = ProvisioningRequest::post(CREATE_ACCOUNT)
                .param("domain", domain.as_str())
                .param("username", username.as_str())
                .param("contactemail", order.user.email.as_str())
                .param("password", password.as_str())
                .param("plan", plan.as_str());

            log::info!(
                "Creating account {username} ({domain}, plan {plan}) for order {}",
                order.id
            );
            match self.send(&request).await {
                Ok(_) => break (username, password),
                Err(CoreError::Api(ApiError::AccountExists { .. })) if attempt < retries => {
                    attempt += 1;
                    log::warn!(
                        "Username {username} is taken, retrying with a new one ({attempt}/{retries})"
                    );
                }
                Err(e) => return Err(self.ctx.report("create", e)),
            }
        };

        let account = ExternalAccount::new(&order.id, username, password, plan, domain);

        if let Err(e) = self.ctx.accounts.save(&account).await {
            log::error!(
                "Failed to save account record for order {}, removing remote account {}: {e}",
                order.id,
                account.username
            );
            let cleanup = ProvisioningRequest::post(REMOVE_ACCOUNT).param("user", &account.username);
            if let Err(cleanup_err) = self.send(&cleanup).await {
                log::warn!(
                    "Cleanup: remote account {} is orphaned: {cleanup_err}",
                    account.username
                );
            }
            return Err(e);
        }
        log::info!("Account {} created for order {}", account.username, order.id);

        if self.ctx.options.send_welcome_notification {
            let notification = self.welcome_notification(&account);
            if let Err(e) = self.ctx.notifier.notify(&order.user, &notification).await {
                log::warn!(
                    "Welcome notification for order {} was not sent: {e}",
                    order.id
                );
            }
        }

        Ok(account)
    }

    /// Suspend an active account.
    ///
    /// Suspending an already suspended account is a precondition error, not a
    /// no-op.
    pub async fn suspend_account(&self, order_id: &str) -> CoreResult<ExternalAccount> {
        self.transition(
            order_id,
            "suspend",
            SUSPEND_ACCOUNT,
            &[AccountState::Active],
            AccountState::Suspended,
        )
        .await
    }

    /// Reactivate a suspended account.
    pub async fn unsuspend_account(&self, order_id: &str) -> CoreResult<ExternalAccount> {
        self.transition(
            order_id,
            "unsuspend",
            UNSUSPEND_ACCOUNT,
            &[AccountState::Suspended],
            AccountState::Active,
        )
        .await
    }

    /// Move an account to the plan of another package. The suspension state
    /// is kept.
    pub async fn upgrade_account(
        &self,
        order_id: &str,
        package: &PackageInfo,
    ) -> CoreResult<ExternalAccount> {
        let mut account = self.load(order_id, "upgrade", LIVE_STATES).await?;
        let plan = package.plan().to_string();

        let request = ProvisioningRequest::post(CHANGE_PACKAGE)
            .param("user", &account.username)
            .param("pkg", plan.as_str());
        self.send(&request)
            .await
            .map_err(|e| self.ctx.report("upgrade", e))?;

        log::info!(
            "Account {} moved from plan {} to {plan}",
            account.username,
            account.plan
        );
        account.plan = plan;
        account.touch();
        self.persist(&account, "upgrade").await?;
        Ok(account)
    }

    /// Set a customer-chosen password.
    ///
    /// The password policy is checked first; a rejected password never reaches
    /// the control panel.
    pub async fn change_password(
        &self,
        order_id: &str,
        new_password: &str,
    ) -> CoreResult<ExternalAccount> {
        validate_password(new_password).map_err(|e| self.ctx.report("change password", e))?;

        let mut account = self.load(order_id, "change the password of", LIVE_STATES).await?;

        let request = ProvisioningRequest::post(CHANGE_PASSWORD)
            .param("user", &account.username)
            .param("password", new_password);
        self.send(&request)
            .await
            .map_err(|e| self.ctx.report("change password", e))?;

        log::info!("Password changed for account {}", account.username);
        account.password = new_password.to_string();
        account.touch();
        self.persist(&account, "change password").await?;
        Ok(account)
    }

    /// Remove the account from the control panel.
    ///
    /// Depending on [`TerminationPolicy`](crate::types::TerminationPolicy) the
    /// local record is kept as `Terminated` or deleted. The returned record is
    /// always in the `Terminated` state.
    pub async fn terminate_account(&self, order_id: &str) -> CoreResult<ExternalAccount> {
        let mut account = self.load(order_id, "terminate", LIVE_STATES).await?;

        let request = ProvisioningRequest::post(REMOVE_ACCOUNT).param("user", &account.username);
        self.send(&request)
            .await
            .map_err(|e| self.ctx.report("terminate", e))?;

        account.state = AccountState::Terminated;
        account.touch();
        match self.ctx.options.termination_policy {
            TerminationPolicy::Retain => {
                self.persist(&account, "terminate").await?;
            }
            TerminationPolicy::Delete => {
                self.ctx
                    .accounts
                    .delete(order_id)
                    .await
                    .map_err(|e| self.ctx.report("terminate", e))?;
            }
        }
        log::info!("Account {} terminated", account.username);
        Ok(account)
    }

    /// Direct login link for the customer. No API call is made.
    pub async fn login_url(&self, order_id: &str) -> CoreResult<String> {
        let account = self.load(order_id, "log in to", LIVE_STATES).await?;
        Ok(build_login_url(
            self.ctx.api.hostname(),
            &account.username,
            &account.password,
        ))
    }

    /// Remove a control-panel account that has no local record.
    ///
    /// Used to reconcile accounts orphaned by a failure between the remote
    /// create and the local write. Refuses usernames still held by a live
    /// local record.
    pub async fn remove_orphaned_account(&self, username: &str) -> CoreResult<()> {
        let holders = self
            .ctx
            .accounts
            .find_by_username(username)
            .await
            .map_err(|e| self.ctx.report("remove orphaned account", e))?;
        if let Some(account) = holders.into_iter().find(|a| a.state.is_live()) {
            return Err(self.ctx.report(
                "remove orphaned account",
                CoreError::ExternalAccountExists(account.order_id),
            ));
        }

        let request = ProvisioningRequest::post(REMOVE_ACCOUNT).param("user", username);
        self.send(&request)
            .await
            .map_err(|e| self.ctx.report("remove orphaned account", e))?;
        log::info!("Orphaned account {username} removed");
        Ok(())
    }

    // ===== 内部辅助方法 =====

    /// Call the API and treat HTTP-200 rejections as errors.
    async fn send(&self, request: &ProvisioningRequest) -> CoreResult<ApiResponse> {
        let response = self.ctx.api.call(request).await?;
        Ok(response.ensure_accepted(request)?)
    }

    /// Load the order's record and check its state.
    async fn load(
        &self,
        order_id: &str,
        operation: &'static str,
        allowed: &[AccountState],
    ) -> CoreResult<ExternalAccount> {
        let account = self
            .ctx
            .accounts
            .find_by_order(order_id)
            .await
            .and_then(|found| {
                found.ok_or_else(|| CoreError::ExternalAccountNotFound(order_id.to_string()))
            })
            .map_err(|e| self.ctx.report(operation, e))?;

        if !allowed.contains(&account.state) {
            return Err(self.ctx.report(
                operation,
                CoreError::InvalidState {
                    operation,
                    state: account.state,
                },
            ));
        }
        Ok(account)
    }

    /// Single-call state transition on the account's username.
    async fn transition(
        &self,
        order_id: &str,
        operation: &'static str,
        endpoint: &str,
        allowed: &[AccountState],
        target: AccountState,
    ) -> CoreResult<ExternalAccount> {
        let mut account = self.load(order_id, operation, allowed).await?;

        let request = ProvisioningRequest::post(endpoint).param("user", &account.username);
        self.send(&request)
            .await
            .map_err(|e| self.ctx.report(operation, e))?;

        account.state = target;
        account.touch();
        self.persist(&account, operation).await?;
        log::info!("Account {} is now {target}", account.username);
        Ok(account)
    }

    /// Save after a remote change; a failure here means the two sides diverged.
    async fn persist(&self, account: &ExternalAccount, operation: &str) -> CoreResult<()> {
        self.ctx.accounts.save(account).await.map_err(|e| {
            log::error!(
                "{operation}: remote account {} changed but the local record was not saved",
                account.username
            );
            self.ctx.report(operation, e)
        })
    }

    fn welcome_notification(&self, account: &ExternalAccount) -> Notification {
        Notification {
            subject: "Your hosting account is ready".to_string(),
            html_content: format!(
                "<p>Your hosting account for <strong>{}</strong> has been created.</p>\
                 <p>Username: <strong>{}</strong><br>Plan: {}</p>",
                account.domain, account.username, account.plan
            ),
            button: Some(NotificationButton {
                label: "Open control panel".to_string(),
                url: format!("{}/login/", self.ctx.api.hostname()),
            }),
        }
    }
}

/// `<hostname>/login/?user=<username>&pass=<password>`, values URL-encoded.
pub(crate) fn build_login_url(hostname: &str, username: &str, password: &str) -> String {
    format!(
        "{}/login/?user={}&pass={}",
        hostname.trim_end_matches('/'),
        urlencoding::encode(username),
        urlencoding::encode(password)
    )
}
