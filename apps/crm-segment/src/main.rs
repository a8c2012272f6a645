//! 流量池客户分群命令行工具。
//!
//! ```bash
//! crm-segment filter --conditions '{"tags":["VIP"]}' --sort rfm-total
//! crm-segment schemes save --name "北京高价值客户" --conditions '{"regions":["北京"],"rfmMin":12}'
//! crm-segment schemes list
//! crm-segment schemes apply scheme_1705305600000
//! crm-segment schemes rename scheme_1705305600000 --name "京城 VIP"
//! crm-segment schemes delete scheme_1705305600000
//! ```
//!
//! 输出统一为 `ApiResponse` JSON；日志写到 stderr。

mod commands;

use api_contract::ApiResponse;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{CommandError, SortChoice};
use crm_config::{AppConfig, SchemeBackend};
use crm_filter::{SortField, SortOrder};
use crm_storage::{
    CustomerSource, FileKeyValue, InMemoryCustomerSource, InMemoryKeyValue,
    JsonFileCustomerSource, KeyValueBackend, KvSchemeStore, RedisKeyValue, SchemeStore,
    StorageError,
};
use crm_telemetry::{init_tracing, new_run_id};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Instrument;

/// 命令共享的存储依赖。
#[derive(Clone)]
pub struct AppState {
    pub schemes: Arc<dyn SchemeStore>,
    pub customers: Arc<dyn CustomerSource>,
}

#[derive(Parser)]
#[command(name = "crm-segment")]
#[command(version)]
#[command(about = "Filter traffic-pool customers and manage saved filter schemes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter customers by a condition set
    Filter {
        /// Condition set as JSON, e.g. '{"tags":["VIP"],"rfmMin":6}'
        #[arg(long)]
        conditions: Option<String>,
        #[command(flatten)]
        sort: SortArgs,
    },
    /// Manage saved filter schemes
    Schemes {
        #[command(subcommand)]
        action: SchemeCommands,
    },
}

#[derive(Subcommand)]
enum SchemeCommands {
    /// List schemes, most recently used first
    List,
    /// Save a condition set as a named scheme
    Save {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        conditions: String,
    },
    /// Apply a scheme and print the matching customers
    Apply {
        id: String,
        #[command(flatten)]
        sort: SortArgs,
    },
    /// Rename a scheme or change its description
    Rename {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a scheme
    Delete { id: String },
}

#[derive(clap::Args)]
struct SortArgs {
    /// Sort matched customers by this field
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    #[arg(long, value_enum, default_value = "desc")]
    order: OrderArg,
}

impl SortArgs {
    fn choice(&self) -> SortChoice {
        let field = match self.sort? {
            SortArg::RfmTotal => SortField::RfmTotal,
            SortArg::AddTime => SortField::AddTime,
            SortArg::Nickname => SortField::Nickname,
        };
        let order = match self.order {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        };
        Some((field, order))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    RfmTotal,
    AddTime,
    Nickname,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    init_tracing();

    let state = build_state(&config)?;
    let span = tracing::info_span!("run", run_id = %new_run_id());
    async move { dispatch(&state, cli.command).await }
        .instrument(span)
        .await
}

/// 按配置组装方案存储与客户来源。
fn build_state(config: &AppConfig) -> Result<AppState, StorageError> {
    let backend: Arc<dyn KeyValueBackend> = match config.scheme_backend {
        SchemeBackend::Memory => Arc::new(InMemoryKeyValue::new()),
        SchemeBackend::File => Arc::new(FileKeyValue::new(&config.data_dir)),
        SchemeBackend::Redis => {
            Arc::new(RedisKeyValue::connect(&config.redis_url)?.with_prefix("crm:"))
        }
    };
    let customers: Arc<dyn CustomerSource> = match &config.records_path {
        Some(path) => Arc::new(JsonFileCustomerSource::new(path)),
        None => Arc::new(InMemoryCustomerSource::with_demo_customers()),
    };
    tracing::debug!(backend = ?config.scheme_backend, key = %config.scheme_key, "state ready");
    Ok(AppState {
        schemes: Arc::new(KvSchemeStore::with_key(backend, config.scheme_key.clone())),
        customers,
    })
}

async fn dispatch(
    state: &AppState,
    command: Commands,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let exit = match command {
        Commands::Filter { conditions, sort } => {
            let result = match commands::parse_conditions(conditions.as_deref()) {
                Ok(conditions) => commands::run_filter(state, &conditions, sort.choice()).await,
                Err(err) => Err(err),
            };
            render(result)?
        }
        Commands::Schemes { action } => match action {
            SchemeCommands::List => render(commands::list_schemes(state).await)?,
            SchemeCommands::Save {
                name,
                description,
                conditions,
            } => {
                let result = match commands::parse_conditions(Some(&conditions)) {
                    Ok(conditions) => {
                        commands::save_scheme(state, name, description, conditions).await
                    }
                    Err(err) => Err(err),
                };
                render(result)?
            }
            SchemeCommands::Apply { id, sort } => {
                render(commands::apply_scheme(state, &id, sort.choice()).await)?
            }
            SchemeCommands::Rename {
                id,
                name,
                description,
            } => render(commands::rename_scheme(state, &id, name, description).await)?,
            SchemeCommands::Delete { id } => {
                render(commands::delete_scheme(state, &id).await)?
            }
        },
    };
    Ok(exit)
}

/// 以 ApiResponse JSON 输出结果，失败时返回非零退出码。
fn render<T: Serialize>(result: Result<T, CommandError>) -> Result<ExitCode, serde_json::Error> {
    match result {
        Ok(data) => {
            println!("{}", serde_json::to_string_pretty(&ApiResponse::success(data))?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::warn!(code = err.code(), error = %err, "command failed");
            let response = ApiResponse::<()>::error(err.code(), err.to_string());
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
