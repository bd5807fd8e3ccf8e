use crate::cli::args::{ConfigArgs, ConfigCommand};
use crate::config::{Config, API_KEY_ENV};
use crate::error::Result;

/// Execute config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("✅ 설정이 저장되었습니다: {} = {}", key, display_value(&key, &value));
            Ok(())
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}: {}", key, display_value(&key, &value));
                }
                None => {
                    println!("설정 키 '{}'에 값이 없습니다", key);
                }
            }
            Ok(())
        }
        ConfigCommand::Path => {
            let path = Config::config_file_path()?;
            println!("설정 파일: {}", path.display());
            Ok(())
        }
        ConfigCommand::Init => {
            Config::initialize()?;
            println!("✅ 설정 파일이 생성되었습니다");
            println!();
            println!("서비스 키를 등록하려면:");
            println!("  kosha config set kosha.key YOUR_SERVICE_KEY");
            println!("또는 환경 변수 {}를 설정하세요.", API_KEY_ENV);
            println!();
            println!("서비스 키 발급: https://www.data.go.kr");
            Ok(())
        }
    }
}

fn display_value(key: &str, value: &str) -> String {
    if key == "kosha.key" {
        mask_value(value)
    } else {
        value.to_string()
    }
}

/// Mask sensitive values for display
fn mask_value(value: &str) -> String {
    let len = value.chars().count();
    if len > 10 {
        let head: String = value.chars().take(10).collect();
        format!("{}...({} characters)", head, len)
    } else {
        value.to_string()
    }
}
