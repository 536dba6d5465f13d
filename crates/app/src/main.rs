//! Carbo Application CLI

use std::process;

use carbo::{
    cart::Cart,
    discounts::Coupon,
    fixtures::{CartFixture, FixtureError, parse_percentage, parse_price},
    gifts::FreeGiftRule,
    pricing::{PricedOrder, PricingEngine},
};
use carbo_app::{
    config::{AppConfig, Command, OrderStatusArgs, QuoteArgs, ValidateArgs},
    context::AppContext,
    domain::orders::models::major_units,
    observability,
};
use rusty_money::{Money, iso::Currency};

#[tokio::main]
pub async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    if let Err(error) = observability::init_subscriber(&config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = run(config).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), String> {
    let context = AppContext::from_config(&config)
        .map_err(|error| format!("failed to initialise: {error}"))?;

    match config.command {
        Command::Quote(args) => quote(&context, args),
        Command::Validate(args) => validate(&context, args).await,
        Command::OrderStatus(args) => order_status(&context, args).await,
    }
}

fn load_cart(path: &std::path::Path) -> Result<Cart<'static>, String> {
    CartFixture::from_path(path)
        .and_then(CartFixture::into_cart)
        .map_err(|error| format!("failed to load cart {}: {error}", path.display()))
}

fn parse_coupon(raw: &str) -> Result<Coupon<'static>, FixtureError> {
    if raw.trim().ends_with('%') {
        return Ok(Coupon::PercentageOff(parse_percentage(raw)?));
    }

    let (minor, currency) = parse_price(raw)?;

    Ok(Coupon::AmountOff(Money::from_minor(minor, currency)))
}

fn amount(money: &Money<'_, Currency>) -> String {
    format!("{} {}", major_units(money), money.currency().iso_alpha_code)
}

fn quote(context: &AppContext, args: QuoteArgs) -> Result<(), String> {
    let cart = load_cart(&args.cart)?;

    let cart = FreeGiftRule::new(context.settings)
        .reconcile(&cart)
        .map_err(|error| format!("failed to reconcile gifts: {error}"))?;

    let engine = PricingEngine::new(context.settings);

    let priced = match args.coupon.as_deref() {
        Some(raw) => {
            let coupon =
                parse_coupon(raw).map_err(|error| format!("invalid coupon {raw:?}: {error}"))?;

            engine.price_with_coupon(&cart, args.delivery, &coupon)
        }
        None => engine.price(&cart, args.delivery),
    }
    .map_err(|error| format!("failed to price cart: {error}"))?;

    let gift_eligible = FreeGiftRule::new(context.settings).is_eligible(&priced.subtotal());

    print_quote(&cart, &priced, gift_eligible);

    Ok(())
}

fn print_quote(cart: &Cart<'_>, priced: &PricedOrder<'_>, gift_eligible: bool) {
    for line in cart.iter() {
        let price = if line.is_free_gift() {
            "free".to_string()
        } else {
            amount(line.unit_price())
        };

        println!("{} x{} @ {price}", line.name(), line.quantity());
    }

    println!("subtotal: {}", amount(&priced.subtotal()));
    println!(
        "shipping ({}): {}",
        priced.delivery(),
        amount(&priced.shipping_cost())
    );
    println!("tax: {}", amount(&priced.tax()));
    println!("discount: {}", amount(&priced.discount()));
    println!("total: {}", amount(&priced.total()));

    if gift_eligible {
        println!("eligible for a free gift");
    }
}

async fn validate(context: &AppContext, args: ValidateArgs) -> Result<(), String> {
    let cart = load_cart(&args.cart)?;
    let validator = context.validator();

    if args.strict {
        let report = validator.validate_for_payment(&cart).await;

        if report.is_valid() {
            println!("all {} lines verified", report.valid_lines.len());

            return Ok(());
        }

        return Err(report.errors.join("\n"));
    }

    let report = validator.cleanup_cart(&cart).await;

    if let Some(notice) = report.notice() {
        println!("{notice}");
    }

    println!("{} lines remain", report.cart.len());

    Ok(())
}

async fn order_status(context: &AppContext, args: OrderStatusArgs) -> Result<(), String> {
    let order = context
        .exchange_order_admin()
        .change_status(&args.order, args.status, args.notes)
        .await
        .map_err(|error| format!("failed to change status: {error}"))?;

    println!("order_number: {}", order.order_number());
    println!("status: {}", order.status());

    Ok(())
}
