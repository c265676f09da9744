//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, QueryArgs};
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::pagination::Page;
use crate::statement::{parse_date, StatementClient, StatementQuery};
use chrono::NaiveDate;
use futures::{StreamExt, TryStreamExt};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Statements {
                query,
                start,
                max_records,
            } => self.statements(query, *start, *max_records).await,
            Commands::Page { query, start } => self.page(query, *start).await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load configuration, applying command-line overrides
    pub(crate) fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match (&self.cli.config, &self.cli.base_url) {
            (Some(path), _) => ClientConfig::from_file(path)?,
            (None, Some(url)) => ClientConfig::new(url.clone()),
            (None, None) => {
                return Err(Error::config(
                    "No configuration given (use --config or --base-url)",
                ))
            }
        };

        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }
        config.validate()?;
        Ok(config)
    }

    /// Resolve the statement query from arguments and config
    pub(crate) fn build_query(args: &QueryArgs, config: &ClientConfig) -> Result<StatementQuery> {
        let account = args
            .account
            .clone()
            .or_else(|| config.account_number.clone())
            .ok_or_else(|| {
                Error::invalid_argument(
                    "Account number not specified (use --account or account_number in config)",
                )
            })?;

        if let Some(days) = args.days {
            return StatementQuery::for_last_days(account, days);
        }

        match (args.from.as_deref(), args.to.as_deref()) {
            (None, None) => Ok(StatementQuery::for_current_month(account)),
            (Some(from), Some(to)) => {
                let from = date_arg("from", from)?;
                let to = date_arg("to", to)?;
                if from > to {
                    return Err(Error::invalid_argument(format!(
                        "--from ({from}) is after --to ({to})"
                    )));
                }
                Ok(StatementQuery::new(account, from, to))
            }
            _ => Err(Error::invalid_argument(
                "--from and --to must be given together",
            )),
        }
    }

    /// First page window for a command
    pub(crate) fn initial_page(
        args: &QueryArgs,
        config: &ClientConfig,
        start: i64,
    ) -> Result<Page> {
        let size = args.page_size.unwrap_or(i64::from(config.page_size));
        Page::of(start, size)
    }

    fn client(config: &ClientConfig) -> Result<StatementClient> {
        let http = HttpClient::with_config(config.http_config())
            .context("Failed to build HTTP client")?;
        Ok(StatementClient::new(http))
    }

    /// Stream transactions as records
    async fn statements(
        &self,
        args: &QueryArgs,
        start: i64,
        max_records: Option<usize>,
    ) -> Result<()> {
        let config = self.load_config()?;
        let query = Self::build_query(args, &config)?;
        let page = Self::initial_page(args, &config, start)?;
        let client = Self::client(&config)?;

        info!(
            account = %query.account_number,
            from = %query.booking_date_greater_than,
            to = %query.booking_date_less_than,
            window = %page,
            "Reading statements"
        );

        let started = Instant::now();
        let stream = client
            .statements(query, page)
            .take(max_records.unwrap_or(usize::MAX));
        futures::pin_mut!(stream);

        let mut count = 0usize;
        while let Some(transaction) = stream.try_next().await? {
            self.output_message(&json!({
                "type": "RECORD",
                "record": transaction,
            }));
            count += 1;
        }

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Read {} transactions in {:.2}s",
                    count,
                    started.elapsed().as_secs_f64()
                )
            }
        }));

        Ok(())
    }

    /// Print one page with its paging metadata
    async fn page(&self, args: &QueryArgs, start: i64) -> Result<()> {
        let config = self.load_config()?;
        let query = Self::build_query(args, &config)?;
        let page = Self::initial_page(args, &config, start)?;
        let client = Self::client(&config)?;

        let result = client.fetch_statements(&query, page).await?;

        self.output_message(&json!({
            "type": "PAGE",
            "page": {
                "from": page.from(),
                "size": page.size(),
                "totalElements": result.total_elements(),
                "totalPages": result.total_pages(),
                "hasNext": result.has_next(),
                "isFirst": result.is_first(),
                "isLast": result.is_last(),
            },
            "transactions": result.items(),
        }));

        Ok(())
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Configuration for {} is valid (page size {}, {} retries)",
                    config.base_url,
                    config.page_size,
                    config.max_retries
                )
            }
        }));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn date_arg(name: &str, value: &str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| {
        Error::invalid_argument(format!("--{name} '{value}' is not a date (YYYY-MM-DD)"))
    })
}
