use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::InvoiceError;

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// 环境变量前缀，如 `INVOICE_OUTPUT_FOLDER`
pub const ENV_PREFIX: &str = "INVOICE";

/// 应用配置 (公司信息、输出目录、货币符号)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub company_name: String,
    /// 多行地址，以换行分隔
    pub company_address: String,
    pub company_phone: String,
    pub company_email: String,
    pub company_website: String,
    pub logo_path: Option<PathBuf>,
    pub output_folder: PathBuf,
    pub currency_symbol: String,
    pub thank_you_note: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            company_name: "Your Company Name".to_string(),
            company_address: "123 Business Street\nCity, State 12345".to_string(),
            company_phone: "+1 (555) 123-4567".to_string(),
            company_email: "info@yourcompany.com".to_string(),
            company_website: String::new(),
            logo_path: None,
            output_folder: PathBuf::from("generated_invoices"),
            currency_symbol: "$".to_string(),
            thank_you_note: "Thank you for your business!".to_string(),
        }
    }
}

impl AppConfig {
    /// 分层加载：默认值 → 配置文件 → `INVOICE_*` 环境变量
    ///
    /// 显式给出的配置文件必须存在；默认的 `config.json` 可以缺省。
    pub fn load(path: Option<&Path>) -> Result<Self, InvoiceError> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let settings = config::Config::builder()
            .add_source(config::File::from(file.as_path()).required(required))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let loaded: AppConfig = settings.try_deserialize()?;
        Ok(loaded.normalized())
    }

    /// 空字符串的 logo 路径视为未配置
    fn normalized(mut self) -> Self {
        if self
            .logo_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.logo_path = None;
        }
        self
    }

    pub fn logo(&self) -> Option<&Path> {
        self.logo_path.as_deref()
    }

    pub fn company_address_lines(&self) -> impl Iterator<Item = &str> {
        self.company_address
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_the_stock_template() {
        let config = AppConfig::default();
        assert_eq!(config.output_folder, PathBuf::from("generated_invoices"));
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(
            config.company_address_lines().collect::<Vec<_>>(),
            vec!["123 Business Street", "City, State 12345"]
        );
        assert!(config.logo().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let body = serde_json::json!({
            "company_name": "Acme Tools",
            "currency_symbol": "€",
            "logo_path": "",
            "output_folder": "out/invoices"
        });
        fs::write(&path, body.to_string()).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.company_name, "Acme Tools");
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.output_folder, PathBuf::from("out/invoices"));
        assert_eq!(config.logo_path, None);
        // 文件未给出的键保留默认值
        assert_eq!(config.thank_you_note, "Thank you for your business!");
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, InvoiceError::Config(_)));
    }
}
