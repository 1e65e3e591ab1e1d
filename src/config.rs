use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    /// One directory per blog, named after the owner's username
    pub posts_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct Defaults {
    pub page_size: u32,
}

#[derive(Deserialize, Clone)]
pub struct SiteConfig {
    pub base_domain: String,
    #[serde(default = "default_reserved_subdomains")]
    pub reserved_subdomains: Vec<String>,
}

fn default_reserved_subdomains() -> Vec<String> {
    vec!["www".to_string(), "bloggish".to_string()]
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub paths: Paths,
    pub defaults: Defaults,
    pub site: SiteConfig,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    let Some(str_path) = path.to_str() else {
        return Ok(path);
    };

    if !str_path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .and_then(|p| p.to_str())
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Could not find the executable directory"))?;
    Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if cfg.defaults.page_size == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "defaults.page_size has to be greater than 0"));
    }

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
        posts_dir: parse_path(cfg.paths.posts_dir)?,
    };

    if let Some(ref mut log) = cfg.log {
        if let Some(location) = log.location.take() {
            log.location = Some(parse_path(location)?);
        }
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_SAMPLE: &str = r#"
[paths]
template_dir = "res/template"
public_dir = "res/public"
posts_dir = "blogs"

[defaults]
page_size = 10

[site]
base_domain = "bloggish.io"

[server]
address = "0.0.0.0"
port = 8001

[log]
level = "Debug"
log_to_console = true
location = "logs/bloggish.log"
"#;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config(CONFIG_SAMPLE).unwrap();
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("blogs"));
        assert_eq!(cfg.defaults.page_size, 10);
        assert_eq!(cfg.site.base_domain, "bloggish.io");
        assert_eq!(cfg.site.reserved_subdomains, ["www", "bloggish"]);
        assert_eq!(cfg.server.port, 8001);
        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert_eq!(log.location, Some(PathBuf::from("logs/bloggish.log")));
    }

    #[test]
    fn test_exe_dir_is_expanded() {
        let cfg = CONFIG_SAMPLE.replace("\"res/template\"", "\"${exe_dir}/res/template\"");
        let cfg = parse_config(&cfg).unwrap();
        let template_dir = cfg.paths.template_dir.to_str().unwrap().to_string();
        assert!(!template_dir.contains("${exe_dir}"));
        assert!(template_dir.ends_with("/res/template"));
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[paths]\n").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let zero_page = CONFIG_SAMPLE.replace("page_size = 10", "page_size = 0");
        assert!(parse_config(&zero_page).is_err());
    }
}
