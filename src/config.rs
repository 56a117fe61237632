use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const BLOG_ROOT: &str = "CMS_BLOG_ROOT";
    pub const DB_PATH: &str = "CMS_DB_PATH";
    pub const PORT: &str = "PORT";
    pub const ADMIN_USER: &str = "CMS_ADMIN_USER";
    pub const ADMIN_PASSWORD_HASH: &str = "CMS_ADMIN_PASSWORD_HASH";
    pub const JWT_SECRET: &str = "CMS_JWT_SECRET";
    pub const JWT_EXPIRE_HOURS: &str = "CMS_JWT_EXPIRE_HOURS";
    pub const ALLOWED_ORIGIN: &str = "CMS_ALLOWED_ORIGIN";
    pub const GIT_BRANCH: &str = "CMS_GIT_BRANCH";
    pub const GIT_REMOTE: &str = "CMS_GIT_REMOTE";
    pub const GIT_REMOTE_URL: &str = "CMS_GIT_REMOTE_URL";
    pub const GIT_TOKEN: &str = "CMS_GIT_TOKEN";
    pub const SECURE_COOKIE: &str = "CMS_SECURE_COOKIE";
}

/// Default values
pub mod defaults {
    pub const BLOG_ROOT: &str = "/workspace/blog";
    pub const DB_PATH: &str = "/data/app.db";
    pub const PORT: u16 = 8080;
    pub const ADMIN_USER: &str = "admin";
    pub const JWT_SECRET: &str = "change-me";
    pub const JWT_EXPIRE_HOURS: i64 = 8;
    pub const ALLOWED_ORIGIN: &str = "http://localhost:8080";
    pub const GIT_BRANCH: &str = "main";
    pub const GIT_REMOTE: &str = "origin";
}

/// Name of the session cookie set on login
pub const SESSION_COOKIE: &str = "cms_token";

#[derive(Clone)]
pub struct Config {
    pub blog_root: PathBuf,
    pub db_path: PathBuf,
    pub port: u16,
    pub admin_user: String,
    /// bcrypt hash of the admin password; empty means login is unconfigured
    pub admin_password_hash: String,
    pub jwt_secret: String,
    pub jwt_expire_hours: i64,
    pub allowed_origin: String,
    pub git_branch: String,
    pub git_remote: String,
    pub git_remote_url: String,
    pub git_token: String,
    pub secure_cookie: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            blog_root: PathBuf::from(
                env::var(env_vars::BLOG_ROOT).unwrap_or_else(|_| defaults::BLOG_ROOT.to_string()),
            ),
            db_path: PathBuf::from(
                env::var(env_vars::DB_PATH).unwrap_or_else(|_| defaults::DB_PATH.to_string()),
            ),
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            admin_user: env::var(env_vars::ADMIN_USER)
                .unwrap_or_else(|_| defaults::ADMIN_USER.to_string()),
            admin_password_hash: env::var(env_vars::ADMIN_PASSWORD_HASH).unwrap_or_default(),
            jwt_secret: env::var(env_vars::JWT_SECRET)
                .unwrap_or_else(|_| defaults::JWT_SECRET.to_string()),
            jwt_expire_hours: env::var(env_vars::JWT_EXPIRE_HOURS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::JWT_EXPIRE_HOURS),
            allowed_origin: env::var(env_vars::ALLOWED_ORIGIN)
                .unwrap_or_else(|_| defaults::ALLOWED_ORIGIN.to_string()),
            git_branch: env::var(env_vars::GIT_BRANCH)
                .unwrap_or_else(|_| defaults::GIT_BRANCH.to_string()),
            git_remote: env::var(env_vars::GIT_REMOTE)
                .unwrap_or_else(|_| defaults::GIT_REMOTE.to_string()),
            git_remote_url: env::var(env_vars::GIT_REMOTE_URL).unwrap_or_default(),
            git_token: env::var(env_vars::GIT_TOKEN).unwrap_or_default(),
            secure_cookie: env::var(env_vars::SECURE_COOKIE)
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Content root for notes
    pub fn notes_dir(&self) -> PathBuf {
        self.blog_root.join("content").join("notes")
    }

    /// Content root for posts
    pub fn posts_dir(&self) -> PathBuf {
        self.blog_root.join("content").join("posts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_dirs_under_blog_root() {
        let config = Config {
            blog_root: PathBuf::from("/srv/blog"),
            db_path: PathBuf::from("/tmp/app.db"),
            port: 8080,
            admin_user: "admin".to_string(),
            admin_password_hash: String::new(),
            jwt_secret: "secret".to_string(),
            jwt_expire_hours: 8,
            allowed_origin: "http://localhost:8080".to_string(),
            git_branch: "main".to_string(),
            git_remote: "origin".to_string(),
            git_remote_url: String::new(),
            git_token: String::new(),
            secure_cookie: true,
        };

        assert_eq!(config.notes_dir(), PathBuf::from("/srv/blog/content/notes"));
        assert_eq!(config.posts_dir(), PathBuf::from("/srv/blog/content/posts"));
    }
}
