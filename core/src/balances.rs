//! Balance lookups for users and repositories.

use crate::base::BaseApi;
use crate::error::MeritError;
use crate::http::HttpRequest;
use crate::types::{RepoBalance, UserBalance};

#[derive(Debug, Clone)]
pub struct BalancesApi {
    base: BaseApi,
}

impl BalancesApi {
    pub fn new(base: BaseApi) -> Self {
        Self { base }
    }

    pub fn build_user_balance_by_login(&self, login: &str) -> HttpRequest {
        self.base.build_get(&format!("/users/{login}/balance"))
    }

    pub fn build_user_balance_by_github_id(&self, github_id: u64) -> HttpRequest {
        self.base.build_get(&format!("/user/{github_id}/balance"))
    }

    pub fn build_repo_balance_by_name(&self, owner: &str, repo: &str) -> HttpRequest {
        self.base.build_get(&format!("/repos/{owner}/{repo}/balance"))
    }

    pub fn build_repo_balance_by_github_id(&self, github_id: u64) -> HttpRequest {
        self.base.build_get(&format!("/repositories/{github_id}/balance"))
    }

    /// Balance of the user with GitHub login `login` (for example `octocat`).
    pub fn get_user_balance_by_login(&self, login: &str) -> Result<UserBalance, MeritError> {
        self.base.send(self.build_user_balance_by_login(login))
    }

    /// Balance of the user with numeric GitHub id `github_id`.
    pub fn get_user_balance_by_github_id(&self, github_id: u64) -> Result<UserBalance, MeritError> {
        self.base.send(self.build_user_balance_by_github_id(github_id))
    }

    pub fn get_repo_balance_by_name(&self, owner: &str, repo: &str) -> Result<RepoBalance, MeritError> {
        self.base.send(self.build_repo_balance_by_name(owner, repo))
    }

    pub fn get_repo_balance_by_github_id(&self, github_id: u64) -> Result<RepoBalance, MeritError> {
        self.base.send(self.build_repo_balance_by_github_id(github_id))
    }
}
