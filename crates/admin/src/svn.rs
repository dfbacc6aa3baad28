use crate::config::AdminConfig;
use crate::error::{require, AdminError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use winops_gather::{children_of, expand, ChildSource};
use winops_protocol::{AccessLevel, ItemKind, Permission, RepositoryItem, UserPermission};
use winops_shell::Invoke;
use winops_tabular::extract::{
    item_id, FolderExtractor, PermissionExtractor, RepositoryExtractor, UserPermissionExtractor,
};
use winops_tabular::{parse_listing, ParserLimits};

/// Folders created with every new repository.
pub const STANDARD_LAYOUT: &str = "/branches,/tags,/trunk";

/// VisualSVN Server through its PowerShell module.
pub struct SvnService {
    powershell: Arc<dyn Invoke>,
    limits: ParserLimits,
}

impl SvnService {
    pub fn new(powershell: Arc<dyn Invoke>, limits: ParserLimits) -> Self {
        Self { powershell, limits }
    }

    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        if !config.svn.enabled {
            return Err(AdminError::Disabled("svn"));
        }
        Ok(Self::new(Arc::new(config.powershell()?), config.parser))
    }

    /// All repositories; with `folders`, each one carries its full folder tree.
    pub async fn repositories(&self, folders: bool) -> Result<Vec<RepositoryItem>> {
        let text = self
            .powershell
            .run_str(&["Get-SvnRepository", "|", "Select", "Name,Revisions,URL"])
            .await?;
        let mut repositories = parse_listing(&text, &RepositoryExtractor::new(&self.limits))?;
        if folders {
            for repository in &mut repositories {
                expand(self, repository, true).await?;
            }
        }
        Ok(repositories)
    }

    /// Folders directly under `path`, or the whole subtree when `recursive`.
    pub async fn folders(
        &self,
        repository: &str,
        path: &str,
        recursive: bool,
    ) -> Result<Vec<RepositoryItem>> {
        require("repository", repository)?;
        require("path", path)?;
        let parent = RepositoryItem {
            id: item_id(repository, path),
            repository: repository.to_string(),
            name: String::new(),
            path: path.to_string(),
            kind: ItemKind::Folder,
            url: String::new(),
            revisions: 0,
            children: Vec::new(),
        };
        children_of(self, parent, recursive).await
    }

    pub async fn new_repository(&self, name: &str) -> Result<()> {
        require("repository", name)?;
        self.powershell.run_str(&["New-SvnRepository", name]).await?;
        self.powershell
            .run_str(&[
                "New-SvnRepositoryItem",
                name,
                "-Path",
                STANDARD_LAYOUT,
                "-Type",
                "Folder",
            ])
            .await?;
        Ok(())
    }

    /// Rules that apply to `path`, with rules declared on ancestors marked inherited.
    pub async fn permissions(&self, repository: &str, path: &str) -> Result<Vec<Permission>> {
        require("repository", repository)?;
        require("path", path)?;
        let text = self
            .powershell
            .run_str(&[
                "Select-SvnAccessRule",
                repository,
                "-Path",
                path,
                "|",
                "Select",
                "Path,Access,AccountId,AccountName",
            ])
            .await?;
        Ok(parse_listing(
            &text,
            &PermissionExtractor::new(&self.limits, path),
        )?)
    }

    pub async fn user_permissions(&self, account_id: &str) -> Result<Vec<UserPermission>> {
        require("account id", account_id)?;
        let text = self
            .powershell
            .run_str(&[
                "Get-SvnAccessRule",
                "-AccountId",
                account_id,
                "|",
                "Select",
                "Repository,Path,Access",
            ])
            .await?;
        Ok(parse_listing(
            &text,
            &UserPermissionExtractor::new(&self.limits),
        )?)
    }

    pub async fn add_permission(
        &self,
        repository: &str,
        path: &str,
        account_id: &str,
        access: AccessLevel,
    ) -> Result<()> {
        self.write_rule("Add-SvnAccessRule", repository, path, account_id, access)
            .await
    }

    pub async fn set_permission(
        &self,
        repository: &str,
        path: &str,
        account_id: &str,
        access: AccessLevel,
    ) -> Result<()> {
        self.write_rule("Set-SvnAccessRule", repository, path, account_id, access)
            .await
    }

    pub async fn remove_permission(
        &self,
        repository: &str,
        path: &str,
        account_id: &str,
    ) -> Result<()> {
        check_rule(repository, path, account_id)?;
        self.powershell
            .run_str(&[
                "Remove-SvnAccessRule",
                repository,
                "-Path",
                path,
                "-AccountId",
                account_id,
                "-Confirm:$false",
            ])
            .await?;
        Ok(())
    }

    async fn write_rule(
        &self,
        verb: &str,
        repository: &str,
        path: &str,
        account_id: &str,
        access: AccessLevel,
    ) -> Result<()> {
        check_rule(repository, path, account_id)?;
        self.powershell
            .run_str(&[
                verb,
                repository,
                "-Path",
                path,
                "-AccountId",
                account_id,
                "-Access",
                access.as_str(),
            ])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChildSource<RepositoryItem> for SvnService {
    type Error = AdminError;

    async fn children(&self, parent: &RepositoryItem) -> Result<Vec<RepositoryItem>> {
        require("repository", &parent.repository)?;
        require("path", &parent.path)?;
        let text = self
            .powershell
            .run_str(&[
                "Get-SvnRepositoryItem",
                parent.repository.as_str(),
                parent.path.as_str(),
                "-Type",
                "Folder",
                "|",
                "Select",
                "Repository,Name,Path,Url",
            ])
            .await?;
        let extractor =
            FolderExtractor::new(&self.limits, parent.repository.as_str()).under(parent.path.as_str());
        Ok(parse_listing(&text, &extractor)?)
    }
}

fn check_rule(repository: &str, path: &str, account_id: &str) -> Result<()> {
    require("repository", repository)?;
    require("path", path)?;
    require("account id", account_id)
}
