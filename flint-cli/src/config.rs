//! Configuration module
//!
//! Carries the resolved invocation settings: API endpoint, token, and the
//! repository every command operates on.

use anyhow::{Result, anyhow};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the API
    pub api_url: String,
    /// Token sent with every request
    pub token: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl Config {
    /// Build a configuration from raw CLI inputs
    ///
    /// `repo` must be in `owner/repo` form, the same shape the
    /// `GITHUB_REPOSITORY` environment variable uses.
    pub fn new(api_url: String, token: String, repo: &str) -> Result<Self> {
        let (owner, name) = split_repo(repo)?;
        Ok(Self {
            api_url,
            token,
            owner,
            repo: name,
        })
    }
}

fn split_repo(repo: &str) -> Result<(String, String)> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(anyhow!(
            "invalid repository '{}': expected owner/repo",
            repo
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_owner_and_repo() {
        let config = Config::new(
            "https://api.github.com".to_string(),
            "token".to_string(),
            "acme/widgets",
        )
        .unwrap();
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "widgets");
    }

    #[test]
    fn test_rejects_malformed_repo() {
        for bad in ["widgets", "acme/", "/widgets", "a/b/c"] {
            assert!(
                Config::new("u".to_string(), "t".to_string(), bad).is_err(),
                "'{bad}' should be rejected"
            );
        }
    }
}
