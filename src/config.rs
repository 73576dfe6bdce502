use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admission: AdmissionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmissionConfig {
    /// Admission outcome when the allowlist holds no entries at all.
    /// The evaluator itself only answers containment; this default is
    /// applied by `AdmissionPolicy` on top of it.
    #[serde(default)]
    pub allow_when_empty: bool,
}

fn default_db_path() -> String {
    "./ip-acl.db".to_string()
}

pub fn validate(cfg: &Config) -> Result<()> {
    if let Some(parent) = std::path::Path::new(&cfg.database.path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            anyhow::bail!(
                "CONFIG ERROR: Database directory does not exist: {}",
                parent.display()
            );
        }
    }

    Ok(())
}

pub fn load() -> Result<Config> {
    let cfg: Config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("IP_ACL").separator("__"))
        .set_default("database.path", "./ip-acl.db")?
        .set_default("admission.allow_when_empty", false)?
        .build()?
        .try_deserialize()?;

    validate(&cfg)?;

    Ok(cfg)
}
