//! Steward CLI
//!
//! 入口：加载 .env 与配置、初始化日志、创建助手，对每条请求跑一次 Supervisor 图并打印回复。
//! 不带请求时运行三条演示请求（日程 / 调研 / 邮件）。

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use steward::config::{load_config, AppConfig};
use steward::graph::GraphEvent;
use steward::{create_assistant, Assistant};
use tokio::sync::mpsc;

const DEMO_REQUESTS: [&str; 3] = [
    "Schedule a meeting with the team for next Tuesday at 2pm to discuss Q4 goals",
    "Research the latest trends in AI agents",
    "Draft an email to the marketing team about the product launch",
];

#[derive(Parser, Debug)]
#[command(
    name = "steward",
    version,
    about = "Route requests to calendar / email / research specialists"
)]
struct Cli {
    /// 请求文本；多个参数各自独立运行
    requests: Vec<String>,

    /// 从 stdin 逐行读取请求
    #[arg(short, long)]
    interactive: bool,

    /// 以 JSON 行打印过程事件
    #[arg(long)]
    events: bool,

    /// 强制使用 Mock LLM（无需 API Key）
    #[arg(long)]
    mock: bool,

    /// 额外的配置文件（覆盖 config/default.toml）
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();
    steward::observability::init();

    let cli = Cli::parse();

    let mut cfg = load_config(cli.config.clone()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    if cli.mock {
        cfg.llm.provider = "mock".to_string();
    }

    let assistant = create_assistant(&cfg).context("Failed to create assistant")?;

    if cli.interactive {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read stdin")?;
            let request = line.trim();
            if request.is_empty() {
                continue;
            }
            if matches!(request, "exit" | "quit") {
                break;
            }
            handle(&assistant, request, cli.events).await?;
        }
    } else if cli.requests.is_empty() {
        for request in DEMO_REQUESTS {
            println!("{}", "=".repeat(60));
            println!("Request: {request}");
            println!("{}", "=".repeat(60));
            handle(&assistant, request, cli.events).await?;
        }
    } else {
        for request in &cli.requests {
            handle(&assistant, request, cli.events).await?;
        }
    }

    let (prompt, completion, total) = assistant.token_usage();
    tracing::info!(prompt, completion, total, "Token usage");
    Ok(())
}

async fn handle(assistant: &Assistant, request: &str, print_events: bool) -> anyhow::Result<()> {
    let result = if print_events {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<GraphEvent>();
        let result = assistant.ask_with_events(request, &event_tx).await;
        drop(event_tx);
        while let Some(event) = event_rx.recv().await {
            println!("{}", serde_json::to_string(&event)?);
        }
        result
    } else {
        assistant.ask(request).await
    };

    let result = result.with_context(|| format!("Run failed for request: {request}"))?;
    println!("\nResponse:\n{}\n", result.reply().unwrap_or_default());
    Ok(())
}
