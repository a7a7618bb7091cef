use anyhow::Result;
use qti_analyzer::utils::logging;
use qti_analyzer::{App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 命令行参数为待分析的文件，未指定时扫描输入目录
    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run(paths).await?;

    if stats.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
