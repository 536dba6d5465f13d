//! Configuration

use std::path::PathBuf;

use carbo::{delivery::DeliveryOption, lifecycle::OrderStatus};
use clap::{Args, Parser, Subcommand};

use crate::domain::exchange_orders::models::ExchangeOrderId;

/// Carbo storefront checkout tools
#[derive(Debug, Parser)]
#[command(name = "carbo", about = "Carbo storefront checkout tools", long_about = None)]
pub struct AppConfig {
    #[command(flatten)]
    pub api: ApiConfig,

    #[command(flatten)]
    pub checkout: CheckoutConfig,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Storefront API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Storefront API base URL
    #[arg(long, env = "CARBO_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// Bearer token sent with every API request
    #[arg(long, env = "CARBO_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,
}

/// Checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Cart settings YAML file; storefront defaults when omitted
    #[arg(long, env = "CARBO_CART_SETTINGS")]
    pub cart_settings: Option<PathBuf>,

    /// Where the payment gateway returns the customer after paying
    #[arg(
        long,
        env = "CARBO_RETURN_URL",
        default_value = "http://localhost:3000/checkout/success"
    )]
    pub return_url: String,

    /// Where the payment gateway returns the customer after cancelling
    #[arg(
        long,
        env = "CARBO_CANCEL_URL",
        default_value = "http://localhost:3000/checkout/cancel"
    )]
    pub cancel_url: String,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a cart file
    Quote(QuoteArgs),

    /// Check a cart file against the live catalog
    Validate(ValidateArgs),

    /// Move an exchange order to a new status
    OrderStatus(OrderStatusArgs),
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Cart YAML file
    pub cart: PathBuf,

    /// Delivery option (standard, express, economy)
    #[arg(long, default_value = "standard")]
    pub delivery: DeliveryOption,

    /// Coupon, either a percentage ("10%") or an amount ("20.00 SAR")
    #[arg(long)]
    pub coupon: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Cart YAML file
    pub cart: PathBuf,

    /// Run the pre-payment check instead of the cart cleanup
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct OrderStatusArgs {
    /// Exchange order id as issued by the backend
    pub order: ExchangeOrderId,

    /// New status (e.g., `confirmed`, `pickup_scheduled`)
    pub status: OrderStatus,

    /// Note stored with the status change
    #[arg(long)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        AppConfig::command().debug_assert();
    }

    #[test]
    fn parses_order_status_command() -> TestResult {
        let config = AppConfig::try_parse_from([
            "carbo",
            "order-status",
            "65f1a2b3c4d5e6f708192a3b",
            "pickup_scheduled",
            "--notes",
            "Driver assigned",
        ])?;

        let Command::OrderStatus(args) = config.command else {
            panic!("expected order-status");
        };

        assert_eq!(args.order.as_str(), "65f1a2b3c4d5e6f708192a3b");
        assert_eq!(args.status, OrderStatus::PickupScheduled);
        assert_eq!(args.notes.as_deref(), Some("Driver assigned"));

        Ok(())
    }

    #[test]
    fn parses_quote_command() -> TestResult {
        let config = AppConfig::try_parse_from([
            "carbo",
            "quote",
            "cart.yml",
            "--delivery",
            "express",
            "--coupon",
            "10%",
        ])?;

        let Command::Quote(args) = config.command else {
            panic!("expected quote");
        };

        assert_eq!(args.delivery, DeliveryOption::Express);
        assert_eq!(args.coupon.as_deref(), Some("10%"));

        Ok(())
    }

    #[test]
    fn quote_accepts_every_delivery_option() -> TestResult {
        for (name, option) in [
            ("standard", DeliveryOption::Standard),
            ("express", DeliveryOption::Express),
            ("economy", DeliveryOption::Economy),
        ] {
            let config =
                AppConfig::try_parse_from(["carbo", "quote", "cart.yml", "--delivery", name])?;

            let Command::Quote(args) = config.command else {
                panic!("expected quote");
            };

            assert_eq!(args.delivery, option);
        }

        Ok(())
    }

    #[test]
    fn blank_order_id_is_refused() {
        let result = AppConfig::try_parse_from(["carbo", "order-status", " ", "confirmed"]);

        assert!(result.is_err());
    }
}
