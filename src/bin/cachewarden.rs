//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 缓存管理命令行
//!
//! 以配置文件构造引擎，执行一次操作后以 JSON 输出结果。

use anyhow::Context;
use cachewarden::prelude::*;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "cachewarden")]
#[command(about = "Inspect and purge managed cache pools", long_about = None)]
struct Args {
    /// Configuration file (.yaml, .yml or .toml)
    #[arg(short, long, default_value = "cachewarden.yaml")]
    config: String,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List managed pools
    Pools,
    /// List keys of one pool (or all pools)
    Keys {
        /// Pool name; unknown names list every pool
        #[arg(short, long)]
        pool: Option<String>,
        /// Case-insensitive substring filter
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Delete raw keys that belong to a managed namespace
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Clear one pool (or all pools)
    Clear {
        #[arg(short, long)]
        pool: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&LoggingConfig::new(&args.log))?;

    let config = AdminConfig::from_file(&args.config)
        .with_context(|| format!("加载配置失败: {}", args.config))?;
    let admin = CacheAdmin::from_config(&config)
        .await
        .context("创建缓存管理引擎失败")?;

    match args.command {
        Command::Pools => print_json(&admin.list_managed_pools())?,
        Command::Keys { pool, query } => {
            let listing = admin.list_keys(pool.as_deref(), &query).await;
            print_json(&listing)?;
        }
        Command::Delete { keys } => {
            let report = admin.delete_keys(&keys).await;
            print_json(&report)?;
        }
        Command::Clear { pool } => {
            let report = admin.clear_pools(pool.as_deref()).await;
            print_json(&report)?;
        }
    }

    Ok(())
}
